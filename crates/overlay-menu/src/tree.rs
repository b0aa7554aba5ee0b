//! The menu hierarchy.
//!
//! [`MenuTree`] owns every menu in a `SlotMap`, tracks which one is open and
//! maps items to the submenus they open. Parent links are [`MenuId`]s rather
//! than references, so a menu that opens itself indirectly (A binds B, B binds
//! A) is just a cycle in the id graph with no ownership consequences.
//!
//! At most one menu is visible at any time. Opening a menu closes the one
//! that was open before it.
//!
//! # Example
//!
//! ```
//! use overlay_menu::{Item, Menu, MenuTree, SelectOutcome, SelectTarget};
//!
//! let mut tree = MenuTree::new();
//! let mut main = Menu::new("Main");
//! let vehicles_item = main.add_item(Item::new("Vehicles"));
//! let main = tree.add_menu(main);
//! let vehicles = tree.add_menu(Menu::new("Vehicles"));
//! tree.bind_item(main, vehicles_item, vehicles).unwrap();
//!
//! tree.open_menu(main);
//! let outcome = tree.select(SelectTarget::Current);
//! assert!(matches!(outcome, SelectOutcome::Selected { submenu: Some(_), .. }));
//! assert_eq!(tree.current_menu(), Some(vehicles));
//! assert_eq!(tree.menu(vehicles).and_then(|m| m.parent()), Some(main));
//! ```

use std::collections::HashMap;

use overlay_menu_core::Signal;
use overlay_menu_core::logging::{span_names, targets};
use slotmap::SlotMap;

use crate::error::{MenuError, Result};
use crate::event::MenuTransition;
use crate::item::{Item, ItemId};
use crate::menu::{HorizontalOutcome, LeftBackPolicy, Menu, MenuId, SelectOutcome, SelectTarget};

/// Result of going back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// No menu was open.
    Ignored,
    /// The current menu closed and its parent opened.
    Parent(MenuId),
    /// The current menu closed and had no parent; nothing is open now.
    Exited(MenuId),
}

/// Result of a left press on the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeftOutcome {
    /// The current item handled (or refused) the press.
    Horizontal(HorizontalOutcome),
    /// The press went back instead.
    Back(BackOutcome),
}

/// A trigger item's submenu, recorded with the menu the item was bound in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    parent: MenuId,
    child: MenuId,
}

/// Owner of all menus and their submenu bindings.
#[derive(Debug, Default)]
pub struct MenuTree {
    menus: SlotMap<MenuId, Menu>,
    active: Option<MenuId>,
    bindings: HashMap<ItemId, Binding>,
    main_menu: Option<MenuId>,
    menu_changed: Signal<MenuTransition>,
}

impl MenuTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a menu. The first menu registered becomes the main menu.
    pub fn add_menu(&mut self, menu: Menu) -> MenuId {
        let id = self.menus.insert_with_key(|id| {
            let mut menu = menu;
            menu.register(id);
            menu
        });
        if self.main_menu.is_none() {
            self.main_menu = Some(id);
        }
        tracing::debug!(target: targets::TREE, ?id, "menu registered");
        id
    }

    /// Unregister a menu, closing it if open and dropping every binding that
    /// involves it.
    pub fn remove_menu(&mut self, id: MenuId) -> Option<Menu> {
        if self.active == Some(id) {
            self.close_menu(id);
        }
        let menu = self.menus.remove(id)?;

        self.bindings
            .retain(|_, binding| binding.child != id && binding.parent != id);
        for other in self.menus.values_mut() {
            if other.parent() == Some(id) {
                other.set_parent(None);
            }
        }
        if self.main_menu == Some(id) {
            self.main_menu = None;
        }
        tracing::debug!(target: targets::TREE, ?id, "menu removed");
        Some(menu)
    }

    /// Number of registered menus.
    pub fn len(&self) -> usize {
        self.menus.len()
    }

    /// Whether no menu is registered.
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    /// A registered menu.
    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(id)
    }

    /// Mutable access to a registered menu.
    pub fn menu_mut(&mut self, id: MenuId) -> Option<&mut Menu> {
        self.menus.get_mut(id)
    }

    /// Every registered menu.
    pub fn menus(&self) -> impl Iterator<Item = (MenuId, &Menu)> + '_ {
        self.menus.iter()
    }

    /// The menu opened when the hierarchy is entered.
    pub fn main_menu(&self) -> Option<MenuId> {
        self.main_menu
    }

    /// Choose the main menu.
    pub fn set_main_menu(&mut self, id: MenuId) -> Result<()> {
        if !self.menus.contains_key(id) {
            return Err(MenuError::UnknownMenu(id));
        }
        self.main_menu = Some(id);
        Ok(())
    }

    /// Raised on every submenu transition and back.
    pub fn menu_changed(&self) -> &Signal<MenuTransition> {
        &self.menu_changed
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    /// Make selecting `item` (in `parent`) open `child`.
    ///
    /// Rebinding an item replaces its previous target.
    pub fn bind_item(&mut self, parent: MenuId, item: ItemId, child: MenuId) -> Result<()> {
        let parent_menu = self.menus.get(parent).ok_or(MenuError::UnknownMenu(parent))?;
        if !self.menus.contains_key(child) {
            return Err(MenuError::UnknownMenu(child));
        }
        if parent == child {
            return Err(MenuError::SelfBinding(parent));
        }
        if !parent_menu.contains_item(item) {
            return Err(MenuError::ItemNotInMenu { item, menu: parent });
        }

        if let Some(previous) = self.bindings.insert(item, Binding { parent, child }) {
            if previous.child != child {
                tracing::debug!(target: targets::TREE, %item, previous = ?previous.child, ?child, "item rebound");
            }
        }
        tracing::trace!(target: targets::TREE, %item, ?parent, ?child, "item bound");
        Ok(())
    }

    /// Remove the binding of `item`, returning its former target.
    pub fn unbind_item(&mut self, item: ItemId) -> Option<MenuId> {
        self.bindings.remove(&item).map(|binding| binding.child)
    }

    /// The submenu `item` opens. An item that has left the menu it was bound
    /// in has no submenu.
    pub fn binding_for(&self, item: ItemId) -> Option<MenuId> {
        let binding = self.bindings.get(&item)?;
        self.menus
            .get(binding.parent)
            .filter(|parent| parent.contains_item(item))
            .map(|_| binding.child)
    }

    /// Drop the bindings of items no longer held by the menu they were
    /// bound in.
    pub fn prune_bindings(&mut self) -> usize {
        let menus = &self.menus;
        let before = self.bindings.len();
        self.bindings.retain(|item, binding| {
            menus
                .get(binding.parent)
                .is_some_and(|parent| parent.contains_item(*item))
        });
        let pruned = before - self.bindings.len();
        if pruned > 0 {
            tracing::debug!(target: targets::TREE, pruned, "stale bindings dropped");
        }
        pruned
    }

    /// Submenus reachable from `parent` through its items, in item order.
    pub fn submenus_of(&self, parent: MenuId) -> Vec<MenuId> {
        let Some(menu) = self.menus.get(parent) else {
            return Vec::new();
        };
        let mut submenus = Vec::new();
        for item in menu.items().all() {
            if let Some(binding) = self.bindings.get(&item.id()) {
                if binding.parent == parent && !submenus.contains(&binding.child) {
                    submenus.push(binding.child);
                }
            }
        }
        submenus
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Remove `item` from `menu`, dropping its submenu binding.
    pub fn remove_item(&mut self, menu: MenuId, item: ItemId) -> Option<Item> {
        let removed = self.menus.get_mut(menu)?.remove_item(item)?;
        if self.bindings.remove(&item).is_some() {
            tracing::trace!(target: targets::TREE, %item, ?menu, "binding dropped with item");
        }
        Some(removed)
    }

    /// Remove every item of `menu`, dropping their submenu bindings.
    pub fn clear_items(&mut self, menu: MenuId) -> Vec<Item> {
        let Some(target) = self.menus.get_mut(menu) else {
            return Vec::new();
        };
        let removed = target.clear_items();
        self.bindings.retain(|_, binding| binding.parent != menu);
        removed
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// The open menu.
    pub fn current_menu(&self) -> Option<MenuId> {
        self.active
    }

    /// The open menu, borrowed.
    pub fn current(&self) -> Option<&Menu> {
        self.active.and_then(|id| self.menus.get(id))
    }

    /// The open menu, mutably borrowed.
    pub fn current_mut(&mut self) -> Option<&mut Menu> {
        self.active.and_then(|id| self.menus.get_mut(id))
    }

    /// Whether any menu is open.
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Open a menu, closing the one currently open.
    ///
    /// Returns `false` if the menu is unknown or already open.
    pub fn open_menu(&mut self, id: MenuId) -> bool {
        if !self.menus.contains_key(id) || self.active == Some(id) {
            return false;
        }
        if let Some(previous) = self.active.take() {
            if let Some(menu) = self.menus.get_mut(previous) {
                menu.set_open(false);
            }
        }
        if let Some(menu) = self.menus.get_mut(id) {
            menu.set_open(true);
        }
        self.active = Some(id);
        true
    }

    /// Close a menu. Returns `false` if it was not the open one.
    pub fn close_menu(&mut self, id: MenuId) -> bool {
        if self.active != Some(id) {
            return false;
        }
        self.active = None;
        if let Some(menu) = self.menus.get_mut(id) {
            menu.set_open(false);
        }
        true
    }

    /// Open the main menu if nothing is open, close everything otherwise.
    pub fn toggle(&mut self) -> bool {
        match (self.active, self.main_menu) {
            (Some(_), _) => {
                self.close_all();
                false
            }
            (None, Some(main)) => self.open_menu(main),
            (None, None) => false,
        }
    }

    /// Close whatever is open.
    pub fn close_all(&mut self) {
        if let Some(id) = self.active {
            self.close_menu(id);
        }
    }

    // =========================================================================
    // Navigation on the open menu
    // =========================================================================

    /// Move the open menu's selection up.
    pub fn go_up(&mut self) -> bool {
        self.current_mut().is_some_and(Menu::go_up)
    }

    /// Move the open menu's selection down.
    pub fn go_down(&mut self) -> bool {
        self.current_mut().is_some_and(Menu::go_down)
    }

    /// Right on the open menu's current item.
    pub fn go_right(&mut self) -> HorizontalOutcome {
        self.current_mut()
            .map_or(HorizontalOutcome::Ignored, Menu::go_right)
    }

    /// Left on the open menu's current item, going back when the menu's
    /// [`LeftBackPolicy`] says so.
    pub fn go_left(&mut self) -> LeftOutcome {
        let Some(menu) = self.current_mut() else {
            return LeftOutcome::Horizontal(HorizontalOutcome::Ignored);
        };
        let outcome = menu.go_left();
        let go_back = match (menu.behavior().left_back, outcome) {
            (LeftBackPolicy::WhenEmpty, HorizontalOutcome::Unhandled) => menu.is_empty(),
            (LeftBackPolicy::WhenUnhandled, HorizontalOutcome::Unhandled) => true,
            _ => false,
        };
        if go_back {
            LeftOutcome::Back(self.go_back())
        } else {
            LeftOutcome::Horizontal(outcome)
        }
    }

    /// Select on the open menu, entering the bound submenu on success.
    pub fn select(&mut self, target: SelectTarget) -> SelectOutcome {
        let Some(current) = self.active else {
            return SelectOutcome::Ignored;
        };
        let Some(menu) = self.menus.get_mut(current) else {
            return SelectOutcome::Ignored;
        };
        match menu.select_item(target) {
            SelectOutcome::Selected { item, index, .. } => {
                let submenu = self
                    .bindings
                    .get(&item)
                    .filter(|binding| binding.parent == current)
                    .map(|binding| binding.child)
                    .filter(|child| self.menus.contains_key(*child));
                if let Some(child) = submenu {
                    self.enter_submenu(current, child);
                }
                SelectOutcome::Selected {
                    item,
                    index,
                    submenu,
                }
            }
            other => other,
        }
    }

    /// Close the open menu and reopen its parent, or exit the hierarchy when
    /// it has none.
    pub fn go_back(&mut self) -> BackOutcome {
        let Some(current) = self.active else {
            return BackOutcome::Ignored;
        };
        let _span = tracing::debug_span!(target: targets::TREE, span_names::TRANSITION).entered();

        let parent = self
            .menus
            .get(current)
            .and_then(Menu::parent)
            .filter(|parent| self.menus.contains_key(*parent));
        self.close_menu(current);

        let outcome = match parent {
            Some(parent) => {
                self.open_menu(parent);
                BackOutcome::Parent(parent)
            }
            None => BackOutcome::Exited(current),
        };
        tracing::debug!(target: targets::TREE, ?current, ?outcome, "went back");
        self.menu_changed.emit(MenuTransition {
            from: current,
            to: parent,
            forward: false,
        });
        outcome
    }

    fn enter_submenu(&mut self, from: MenuId, to: MenuId) {
        let _span = tracing::debug_span!(target: targets::TREE, span_names::TRANSITION).entered();
        if let Some(child) = self.menus.get_mut(to) {
            child.set_parent(Some(from));
        }
        self.open_menu(to);
        tracing::debug!(target: targets::TREE, ?from, ?to, "entered submenu");
        self.menu_changed.emit(MenuTransition {
            from,
            to: Some(to),
            forward: true,
        });
    }
}

static_assertions::assert_impl_all!(MenuTree: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    struct Fixture {
        tree: MenuTree,
        main: MenuId,
        child: MenuId,
        entry: ItemId,
    }

    fn fixture() -> Fixture {
        let mut tree = MenuTree::new();
        let mut main = Menu::new("Main");
        let entry = main.add_item(Item::new("Options"));
        main.add_item(Item::new("Quit"));
        let main = tree.add_menu(main);
        let child = tree.add_menu(Menu::new("Options").with_item(Item::new("Volume")));
        tree.bind_item(main, entry, child).unwrap();
        Fixture {
            tree,
            main,
            child,
            entry,
        }
    }

    #[test]
    fn test_first_menu_is_main() {
        let f = fixture();
        assert_eq!(f.tree.main_menu(), Some(f.main));
        assert_eq!(f.tree.len(), 2);
        assert_eq!(f.tree.submenus_of(f.main), vec![f.child]);
    }

    #[test]
    fn test_only_one_menu_visible() {
        let mut f = fixture();
        assert!(f.tree.open_menu(f.main));
        assert!(f.tree.open_menu(f.child));
        let visible: Vec<_> = f
            .tree
            .menus()
            .filter(|(_, menu)| menu.is_visible())
            .map(|(id, _)| id)
            .collect();
        assert_eq!(visible, vec![f.child]);
        assert!(!f.tree.open_menu(f.child));
    }

    #[test]
    fn test_select_bound_item_enters_submenu() {
        let mut f = fixture();
        f.tree.open_menu(f.main);
        let outcome = f.tree.select(SelectTarget::Current);
        assert_eq!(
            outcome,
            SelectOutcome::Selected {
                item: f.entry,
                index: 0,
                submenu: Some(f.child),
            }
        );
        assert!(!f.tree.menu(f.main).unwrap().is_visible());
        assert!(f.tree.menu(f.child).unwrap().is_visible());
        assert_eq!(f.tree.menu(f.child).unwrap().parent(), Some(f.main));
    }

    #[test]
    fn test_go_back_returns_to_parent_then_exits() {
        let mut f = fixture();
        f.tree.open_menu(f.main);
        f.tree.select(SelectTarget::Current);
        assert_eq!(f.tree.go_back(), BackOutcome::Parent(f.main));
        assert_eq!(f.tree.current_menu(), Some(f.main));
        assert_eq!(f.tree.go_back(), BackOutcome::Exited(f.main));
        assert_eq!(f.tree.current_menu(), None);
        assert_eq!(f.tree.go_back(), BackOutcome::Ignored);
    }

    #[test]
    fn test_menu_changed_signal() {
        let mut f = fixture();
        let transitions = Arc::new(Mutex::new(Vec::new()));
        let transitions_clone = transitions.clone();
        f.tree
            .menu_changed()
            .connect(move |t| transitions_clone.lock().push(*t));

        f.tree.open_menu(f.main);
        f.tree.select(SelectTarget::Current);
        f.tree.go_back();

        let recorded = transitions.lock();
        assert_eq!(recorded.len(), 2);
        assert!(recorded[0].forward);
        assert_eq!(recorded[0].to, Some(f.child));
        assert!(!recorded[1].forward);
        assert_eq!(recorded[1].to, Some(f.main));
    }

    #[test]
    fn test_bind_errors() {
        let mut f = fixture();
        let stray = Item::new("Stray").id();
        assert!(matches!(
            f.tree.bind_item(f.main, stray, f.child),
            Err(MenuError::ItemNotInMenu { .. })
        ));
        assert!(matches!(
            f.tree.bind_item(f.main, f.entry, f.main),
            Err(MenuError::SelfBinding(_))
        ));
        let removed = f.tree.add_menu(Menu::new("Gone"));
        f.tree.remove_menu(removed);
        assert!(matches!(
            f.tree.bind_item(f.main, f.entry, removed),
            Err(MenuError::UnknownMenu(_))
        ));
    }

    #[test]
    fn test_rebinding_replaces_target() {
        let mut f = fixture();
        let other = f.tree.add_menu(Menu::new("Other"));
        f.tree.bind_item(f.main, f.entry, other).unwrap();
        assert_eq!(f.tree.binding_for(f.entry), Some(other));
        assert_eq!(f.tree.submenus_of(f.main), vec![other]);
        assert_eq!(f.tree.unbind_item(f.entry), Some(other));
        assert!(f.tree.submenus_of(f.main).is_empty());
    }

    #[test]
    fn test_left_on_empty_menu_goes_back() {
        let mut tree = MenuTree::new();
        let empty = tree.add_menu(Menu::new("Empty"));
        tree.open_menu(empty);
        assert_eq!(tree.go_left(), LeftOutcome::Back(BackOutcome::Exited(empty)));
        assert!(!tree.is_open());
    }

    #[test]
    fn test_left_policy_when_unhandled() {
        let mut f = fixture();
        f.tree.open_menu(f.main);
        assert_eq!(
            f.tree.go_left(),
            LeftOutcome::Horizontal(HorizontalOutcome::Unhandled)
        );

        let main = f.tree.menu_mut(f.main).unwrap();
        let mut behavior = main.behavior().clone();
        behavior.left_back = LeftBackPolicy::WhenUnhandled;
        main.set_behavior(behavior);
        assert_eq!(
            f.tree.go_left(),
            LeftOutcome::Back(BackOutcome::Exited(f.main))
        );
    }

    #[test]
    fn test_remove_open_menu() {
        let mut f = fixture();
        f.tree.open_menu(f.main);
        f.tree.select(SelectTarget::Current);
        let removed = f.tree.remove_menu(f.main).unwrap();
        assert_eq!(removed.title(), "Main");
        assert_eq!(f.tree.menu(f.child).unwrap().parent(), None);
        assert_eq!(f.tree.binding_for(f.entry), None);
        assert_eq!(f.tree.main_menu(), None);
    }

    #[test]
    fn test_removing_bound_item_drops_binding() {
        let mut f = fixture();
        let item = f.tree.remove_item(f.main, f.entry).unwrap();
        assert_eq!(f.tree.binding_for(f.entry), None);
        assert!(f.tree.submenus_of(f.main).is_empty());

        // Re-added elsewhere, the item opens nothing.
        let other = f.tree.add_menu(Menu::new("Other"));
        f.tree.menu_mut(other).unwrap().add_item(item);
        f.tree.open_menu(other);
        let outcome = f.tree.select(SelectTarget::Current);
        assert!(matches!(outcome, SelectOutcome::Selected { submenu: None, .. }));
        assert_eq!(f.tree.current_menu(), Some(other));
    }

    #[test]
    fn test_binding_ignored_after_direct_removal() {
        let mut f = fixture();
        let item = f.tree.menu_mut(f.main).unwrap().remove_item(f.entry).unwrap();
        assert_eq!(f.tree.binding_for(f.entry), None);

        let other = f.tree.add_menu(Menu::new("Other"));
        f.tree.menu_mut(other).unwrap().add_item(item);
        f.tree.open_menu(other);
        assert!(matches!(
            f.tree.select(SelectTarget::Current),
            SelectOutcome::Selected { submenu: None, .. }
        ));
        assert_eq!(f.tree.prune_bindings(), 1);
        assert_eq!(f.tree.prune_bindings(), 0);
    }

    #[test]
    fn test_clear_items_drops_bindings() {
        let mut f = fixture();
        assert_eq!(f.tree.clear_items(f.main).len(), 2);
        assert_eq!(f.tree.binding_for(f.entry), None);
        assert_eq!(f.tree.prune_bindings(), 0);
    }

    #[test]
    fn test_toggle() {
        let mut f = fixture();
        assert!(f.tree.toggle());
        assert_eq!(f.tree.current_menu(), Some(f.main));
        assert!(!f.tree.toggle());
        assert!(!f.tree.is_open());
    }
}
