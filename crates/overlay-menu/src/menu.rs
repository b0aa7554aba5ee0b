//! A single menu: items, selection window and notifications.
//!
//! A [`Menu`] is a title, an [`ItemCollection`] and a [`ViewWindow`] over its
//! active view. All navigation is a pure state mutation that never fails:
//! an invisible menu, an empty menu or an out-of-range index turns the call
//! into a no-op reported through the returned outcome.
//!
//! Menus become visible only through a [`MenuTree`](crate::MenuTree), which
//! guarantees that at most one menu is open at a time.
//!
//! # Signals
//!
//! - `index_changed`: the current item moved
//! - `item_selected` / `selection_rejected`: select succeeded or hit a
//!   disabled item
//! - `checkbox_changed`, `list_index_changed`, `list_selected`,
//!   `slider_changed`, `slider_selected`, `dynamic_list_changed`,
//!   `dynamic_list_selected`: kind-specific value notifications
//! - `menu_opened` / `menu_closed`: visibility changed

use std::cmp::Ordering;
use std::ops::Range;

use overlay_menu_core::Signal;
use overlay_menu_core::logging::targets;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::collection::ItemCollection;
use crate::event::{
    CheckboxChange, DynamicListChange, IndexChange, ItemEvent, ListChange, SliderChange,
};
use crate::item::{Activation, ChangeDirection, Item, ItemId, Shift, ValueChange};
use crate::view_window::{DEFAULT_ITEMS_ON_SCREEN, Step, ViewWindow};

new_key_type! {
    /// Identifies a menu registered in a [`MenuTree`](crate::MenuTree).
    pub struct MenuId;
}

/// When a left press that the current item ignores goes back instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeftBackPolicy {
    /// Left never goes back.
    Never,
    /// Left goes back only when the menu has no items to act on.
    #[default]
    WhenEmpty,
    /// Left goes back whenever the current item has no left/right behavior.
    WhenUnhandled,
}

/// Per-menu behavior switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuBehavior {
    /// Left-goes-back policy.
    pub left_back: LeftBackPolicy,
    /// Move the selection to the first row every time the menu opens.
    pub reset_cursor_on_open: bool,
    /// Show a "current / total" counter when the items span several pages.
    pub show_counter: bool,
    /// Text placed before the counter.
    pub counter_prefix: String,
}

impl Default for MenuBehavior {
    fn default() -> Self {
        Self {
            left_back: LeftBackPolicy::default(),
            reset_cursor_on_open: false,
            show_counter: true,
            counter_prefix: String::new(),
        }
    }
}

/// Which item a select call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectTarget {
    /// The current item.
    Current,
    /// The item at an active-view index.
    Index(usize),
    /// A specific item.
    Item(ItemId),
}

impl From<usize> for SelectTarget {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<ItemId> for SelectTarget {
    fn from(item: ItemId) -> Self {
        Self::Item(item)
    }
}

/// Result of a select call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The menu is hidden or the target does not exist.
    Ignored,
    /// The target is disabled.
    Rejected {
        /// The disabled item.
        item: ItemId,
    },
    /// The item was selected.
    Selected {
        /// The selected item.
        item: ItemId,
        /// Its active-view index.
        index: usize,
        /// Submenu opened by the selection, if the item was bound to one.
        submenu: Option<MenuId>,
    },
}

/// Result of a left/right call on a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalOutcome {
    /// The menu is hidden.
    Ignored,
    /// There is no current item, or it has no left/right behavior.
    Unhandled,
    /// The current item is disabled.
    Rejected(ItemId),
    /// The item reacted but its value did not change.
    Unchanged(ItemId),
    /// The item's value changed.
    Changed(ItemId),
}

/// Listener registries of a [`Menu`].
#[derive(Debug, Default)]
pub struct MenuSignals {
    /// The current item moved.
    pub index_changed: Signal<IndexChange>,
    /// An enabled item was selected.
    pub item_selected: Signal<ItemEvent>,
    /// A disabled item was selected.
    pub selection_rejected: Signal<ItemEvent>,
    /// A checkbox was toggled.
    pub checkbox_changed: Signal<CheckboxChange>,
    /// A list moved to another choice.
    pub list_index_changed: Signal<ListChange>,
    /// A list was selected.
    pub list_selected: Signal<ListChange>,
    /// A slider moved.
    pub slider_changed: Signal<SliderChange>,
    /// A slider was selected.
    pub slider_selected: Signal<SliderChange>,
    /// A dynamic list produced a new value.
    pub dynamic_list_changed: Signal<DynamicListChange>,
    /// A dynamic list was selected.
    pub dynamic_list_selected: Signal<DynamicListChange>,
    /// The menu became visible.
    pub menu_opened: Signal<MenuId>,
    /// The menu was hidden.
    pub menu_closed: Signal<MenuId>,
}

/// One page-able list of items.
#[derive(Debug)]
pub struct Menu {
    id: Option<MenuId>,
    title: String,
    subtitle: Option<String>,
    items: ItemCollection,
    window: ViewWindow,
    visible: bool,
    parent: Option<MenuId>,
    behavior: MenuBehavior,
    signals: MenuSignals,
}

impl Menu {
    /// Create an empty, hidden menu.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            subtitle: None,
            items: ItemCollection::new(),
            window: ViewWindow::new(DEFAULT_ITEMS_ON_SCREEN),
            visible: false,
            parent: None,
            behavior: MenuBehavior::default(),
            signals: MenuSignals::default(),
        }
    }

    /// Set the subtitle using builder pattern.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the page size using builder pattern.
    pub fn with_max_items_on_screen(mut self, max_items_on_screen: usize) -> Self {
        self.window.set_max_items_on_screen(max_items_on_screen);
        self
    }

    /// Set the behavior switches using builder pattern.
    pub fn with_behavior(mut self, behavior: MenuBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Add an item using builder pattern.
    pub fn with_item(mut self, item: Item) -> Self {
        self.add_item(item);
        self
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Id assigned when the menu was added to a tree.
    pub fn id(&self) -> Option<MenuId> {
        self.id
    }

    /// The title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The subtitle.
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Change the subtitle.
    pub fn set_subtitle(&mut self, subtitle: Option<String>) {
        self.subtitle = subtitle;
    }

    /// Whether the menu is open.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The menu that opened this one as a submenu.
    pub fn parent(&self) -> Option<MenuId> {
        self.parent
    }

    /// Behavior switches.
    pub fn behavior(&self) -> &MenuBehavior {
        &self.behavior
    }

    /// Replace the behavior switches.
    pub fn set_behavior(&mut self, behavior: MenuBehavior) {
        self.behavior = behavior;
    }

    /// Listener registries.
    pub fn signals(&self) -> &MenuSignals {
        &self.signals
    }

    /// Rows per page.
    pub fn max_items_on_screen(&self) -> usize {
        self.window.max_items_on_screen()
    }

    /// Change the page size (clamped to 3..=10). Returns the value used.
    pub fn set_max_items_on_screen(&mut self, max_items_on_screen: usize) -> usize {
        self.window.set_max_items_on_screen(max_items_on_screen)
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// The item store.
    pub fn items(&self) -> &ItemCollection {
        &self.items
    }

    /// Size of the active view.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the active view is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at an active-view index.
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// Item by id, including filtered-out items.
    pub fn item_by_id(&self, id: ItemId) -> Option<&Item> {
        self.items.find(id)
    }

    /// Mutable item by id, including filtered-out items.
    pub fn item_by_id_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.find_mut(id)
    }

    /// Whether `id` belongs to this menu.
    pub fn contains_item(&self, id: ItemId) -> bool {
        self.items.contains(id)
    }

    /// Active-view index of `id`.
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.position_of(id)
    }

    /// First item, in the full set, whose label equals `text`.
    pub fn find_by_text(&self, text: &str) -> Option<&Item> {
        self.items.all().iter().find(|item| item.text() == text)
    }

    /// Append an item and attach it to this menu.
    pub fn add_item(&mut self, mut item: Item) -> ItemId {
        item.attach(self.id);
        let id = item.id();
        let position = self.items.push(item);
        tracing::trace!(target: targets::MENU, title = %self.title, %id, position, "item added");
        self.sync_selection();
        id
    }

    /// Remove and detach the item with `id`.
    ///
    /// Removing at or before the current row moves the selection back by
    /// one. No index-changed notification is raised.
    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        let removed = self.items.remove(id)?;
        let size = self.items.len();
        match removed.position {
            Some(position) => self.window.on_removed(position, size),
            None => self.window.clamp(size),
        }
        tracing::trace!(target: targets::MENU, title = %self.title, %id, "item removed");
        self.sync_selection();
        Some(removed.item)
    }

    /// Remove the item at an active-view index.
    pub fn remove_item_at(&mut self, index: usize) -> Option<Item> {
        let id = self.items.get(index)?.id();
        self.remove_item(id)
    }

    /// Remove every item and reset the window.
    pub fn clear_items(&mut self) -> Vec<Item> {
        let removed = self.items.clear();
        self.window.reset();
        tracing::debug!(target: targets::MENU, title = %self.title, count = removed.len(), "items cleared");
        removed
    }

    /// Show only the items matching `predicate`, evaluated against the full
    /// set, and move the selection to the first row.
    pub fn apply_filter<P>(&mut self, predicate: P)
    where
        P: FnMut(&Item) -> bool,
    {
        self.items.apply_filter(predicate);
        self.window.reset();
        tracing::debug!(
            target: targets::MENU,
            title = %self.title,
            matched = self.items.len(),
            total = self.items.total_len(),
            "filter applied"
        );
        self.sync_selection();
    }

    /// Show every item again and move the selection to the first row.
    pub fn reset_filter(&mut self) {
        if self.items.reset_filter() {
            tracing::debug!(target: targets::MENU, title = %self.title, "filter reset");
        }
        self.window.reset();
        self.sync_selection();
    }

    /// Whether a filter is active.
    pub fn is_filtered(&self) -> bool {
        self.items.is_filtered()
    }

    /// Stable-sort the items. Any filter is cleared; the current item stays
    /// current.
    pub fn sort_items<F>(&mut self, compare: F)
    where
        F: FnMut(&Item, &Item) -> Ordering,
    {
        let current = self.current_item().map(Item::id);
        self.items.sort_by(compare);
        let size = self.items.len();
        match current.and_then(|id| self.items.position_of(id)) {
            Some(position) => self.window.refresh_index(position, None, size),
            None => self.window.reset(),
        }
        self.sync_selection();
    }

    // =========================================================================
    // Selection window
    // =========================================================================

    /// The current active-view index.
    pub fn current_index(&self) -> usize {
        self.window.current_index()
    }

    /// The current item.
    pub fn current_item(&self) -> Option<&Item> {
        self.items.get(self.window.current_index())
    }

    /// Mutable current item.
    pub fn current_item_mut(&mut self) -> Option<&mut Item> {
        self.items.get_mut(self.window.current_index())
    }

    /// First visible row as stored.
    pub fn view_offset(&self) -> usize {
        self.window.view_offset()
    }

    /// The visible slice of the active view.
    pub fn visible_range(&self) -> Range<usize> {
        self.window.visible_range(self.items.len())
    }

    /// Items on the visible page, in order.
    pub fn visible_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.visible_range()
            .filter_map(move |position| self.items.get(position))
    }

    /// The "current / total" counter, shown when the items span several
    /// pages.
    pub fn counter_text(&self) -> Option<String> {
        let size = self.items.len();
        if !self.behavior.show_counter || size <= self.window.max_items_on_screen() {
            return None;
        }
        Some(format!(
            "{}{} / {}",
            self.behavior.counter_prefix,
            self.window.current_index() + 1,
            size
        ))
    }

    /// Jump straight to `index`, clamped to the active view.
    ///
    /// Raises `index_changed` when the current item actually changes.
    pub fn set_current_index(&mut self, index: usize) {
        let size = self.items.len();
        if size == 0 {
            return;
        }
        let old_index = self.window.current_index().min(size - 1);
        self.window.refresh_index(index, None, size);
        self.commit_step(Step {
            old_index,
            new_index: self.window.current_index(),
        });
    }

    /// Set index and offset directly, for rebuilding state.
    ///
    /// The offset defaults to the page showing `index` as its bottom row and
    /// is always adjusted so `index` is visible. No notification is raised.
    pub fn refresh_index(&mut self, index: usize, offset: Option<usize>) {
        self.window.refresh_index(index, offset, self.items.len());
        self.sync_selection();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Move the selection up one row, wrapping to the last row.
    pub fn go_up(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        match self.window.go_up(self.items.len()) {
            Some(step) => {
                self.commit_step(step);
                true
            }
            None => false,
        }
    }

    /// Move the selection down one row, wrapping to the first row.
    pub fn go_down(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        match self.window.go_down(self.items.len()) {
            Some(step) => {
                self.commit_step(step);
                true
            }
            None => false,
        }
    }

    /// Apply left to the current item.
    pub fn go_left(&mut self) -> HorizontalOutcome {
        self.shift_current(ChangeDirection::Left)
    }

    /// Apply right to the current item.
    pub fn go_right(&mut self) -> HorizontalOutcome {
        self.shift_current(ChangeDirection::Right)
    }

    /// Select an item.
    ///
    /// Selecting an index other than the current one moves the selection
    /// there first. Disabled items are refused with `selection_rejected`.
    /// Submenu transitions are the tree's job; `submenu` is always `None`
    /// here.
    pub fn select_item(&mut self, target: impl Into<SelectTarget>) -> SelectOutcome {
        if !self.visible {
            return SelectOutcome::Ignored;
        }
        let index = match target.into() {
            SelectTarget::Current if self.items.is_empty() => return SelectOutcome::Ignored,
            SelectTarget::Current => self.window.current_index(),
            SelectTarget::Index(index) if index < self.items.len() => index,
            SelectTarget::Index(_) => return SelectOutcome::Ignored,
            SelectTarget::Item(id) => match self.items.position_of(id) {
                Some(index) => index,
                None => return SelectOutcome::Ignored,
            },
        };
        if index != self.window.current_index() {
            self.set_current_index(index);
        }

        let menu = self.id.unwrap_or_default();
        let Some(item) = self.items.get_mut(index) else {
            return SelectOutcome::Ignored;
        };
        let item_id = item.id();
        let event = ItemEvent {
            menu,
            item: item_id,
            index,
        };

        if !item.is_enabled() {
            tracing::debug!(target: targets::NAVIGATION, %item_id, "selection rejected");
            self.signals.selection_rejected.emit(event);
            return SelectOutcome::Rejected { item: item_id };
        }

        let activation = item.activate();
        let list_value = item.list_value().map(str::to_owned);
        tracing::debug!(target: targets::NAVIGATION, %item_id, index, "item selected");

        self.signals.item_selected.emit(event);
        match activation {
            Activation::Plain => {}
            Activation::CheckboxToggled { checked } => {
                self.signals.checkbox_changed.emit(CheckboxChange {
                    menu,
                    item: item_id,
                    checked,
                });
            }
            Activation::ListChosen { index } => {
                self.signals.list_selected.emit(ListChange {
                    menu,
                    item: item_id,
                    index,
                    value: list_value,
                });
            }
            Activation::SliderChosen { position } => {
                self.signals.slider_selected.emit(SliderChange {
                    menu,
                    item: item_id,
                    position,
                });
            }
            Activation::DynamicListChosen { value } => {
                self.signals.dynamic_list_selected.emit(DynamicListChange {
                    menu,
                    item: item_id,
                    value,
                    direction: None,
                });
            }
        }

        SelectOutcome::Selected {
            item: item_id,
            index,
            submenu: None,
        }
    }

    fn shift_current(&mut self, direction: ChangeDirection) -> HorizontalOutcome {
        if !self.visible {
            return HorizontalOutcome::Ignored;
        }
        let menu = self.id.unwrap_or_default();
        let Some(item) = self.current_item_mut() else {
            return HorizontalOutcome::Unhandled;
        };
        let item_id = item.id();
        if !item.kind().has_horizontal_behavior() {
            return HorizontalOutcome::Unhandled;
        }
        if !item.is_enabled() {
            return HorizontalOutcome::Rejected(item_id);
        }

        let change = match item.shift(direction) {
            Shift::Unhandled => return HorizontalOutcome::Unhandled,
            Shift::Unchanged => return HorizontalOutcome::Unchanged(item_id),
            Shift::Changed(change) => change,
        };
        let list_value = item.list_value().map(str::to_owned);
        tracing::trace!(target: targets::NAVIGATION, %item_id, ?direction, ?change, "value changed");

        match change {
            ValueChange::List { index } => {
                self.signals.list_index_changed.emit(ListChange {
                    menu,
                    item: item_id,
                    index,
                    value: list_value,
                });
            }
            ValueChange::Slider { position } => {
                self.signals.slider_changed.emit(SliderChange {
                    menu,
                    item: item_id,
                    position,
                });
            }
            ValueChange::DynamicList { value } => {
                self.signals.dynamic_list_changed.emit(DynamicListChange {
                    menu,
                    item: item_id,
                    value,
                    direction: Some(direction),
                });
            }
        }
        HorizontalOutcome::Changed(item_id)
    }

    fn commit_step(&mut self, step: Step) {
        self.sync_selection();
        if step.old_index == step.new_index {
            return;
        }
        let (Some(old_item), Some(new_item)) = (
            self.items.get(step.old_index).map(Item::id),
            self.items.get(step.new_index).map(Item::id),
        ) else {
            return;
        };
        tracing::trace!(
            target: targets::NAVIGATION,
            old_index = step.old_index,
            new_index = step.new_index,
            offset = self.window.view_offset(),
            "index changed"
        );
        self.signals.index_changed.emit(IndexChange {
            menu: self.id.unwrap_or_default(),
            old_item,
            new_item,
            old_index: step.old_index,
            new_index: step.new_index,
        });
    }

    /// Mark exactly the current item of a visible menu as selected.
    fn sync_selection(&mut self) {
        for item in self.items.all_mut() {
            item.set_selected(false);
        }
        if !self.visible {
            return;
        }
        let current = self.window.current_index();
        if let Some(item) = self.items.get_mut(current) {
            item.set_selected(true);
        }
    }

    // =========================================================================
    // Tree hooks
    // =========================================================================

    pub(crate) fn register(&mut self, id: MenuId) {
        self.id = Some(id);
        for item in self.items.all_mut() {
            item.attach(Some(id));
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<MenuId>) {
        self.parent = parent;
    }

    /// Show or hide the menu, raising `menu_opened` / `menu_closed`.
    pub(crate) fn set_open(&mut self, open: bool) {
        if self.visible == open {
            return;
        }
        self.visible = open;
        if open && self.behavior.reset_cursor_on_open {
            self.window.reset();
        }
        self.window.clamp(self.items.len());
        self.sync_selection();

        let id = self.id.unwrap_or_default();
        if open {
            tracing::debug!(target: targets::MENU, title = %self.title, "menu opened");
            self.signals.menu_opened.emit(id);
        } else {
            tracing::debug!(target: targets::MENU, title = %self.title, "menu closed");
            self.signals.menu_closed.emit(id);
        }
    }
}

static_assertions::assert_impl_all!(Menu: Send, Sync);
