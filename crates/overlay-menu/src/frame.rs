//! What a renderer needs to draw the open menu.

use crate::item::Item;
use crate::menu::{Menu, MenuId};

/// A read-only snapshot of the open menu's visible page.
///
/// Built once per tick by the [`MenuController`](crate::MenuController) and
/// handed to the host's [`FrameSink`](crate::FrameSink). Borrowing from the
/// menu keeps it free; the renderer must not hold on to it past the call.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    /// Menu being drawn.
    pub menu: MenuId,
    /// Menu title.
    pub title: &'a str,
    /// Menu subtitle.
    pub subtitle: Option<&'a str>,
    /// Items on the visible page, top to bottom.
    pub items: Vec<&'a Item>,
    /// Active-view index of `items[0]`.
    pub first_index: usize,
    /// Active-view index of the current item, `None` for an empty menu.
    pub selection: Option<usize>,
    /// Size of the active view.
    pub total: usize,
    /// "current / total" text, when enabled and the items span several pages.
    pub counter: Option<String>,
}

impl<'a> Frame<'a> {
    /// Snapshot `menu` as it stands.
    pub fn capture(menu: &'a Menu) -> Self {
        let range = menu.visible_range();
        let total = menu.len();
        Self {
            menu: menu.id().unwrap_or_default(),
            title: menu.title(),
            subtitle: menu.subtitle(),
            items: menu.visible_items().collect(),
            first_index: range.start,
            selection: (total > 0).then(|| menu.current_index()),
            total,
            counter: menu.counter_text(),
        }
    }

    /// The current item.
    pub fn selected_item(&self) -> Option<&'a Item> {
        let selection = self.selection?;
        self.items
            .get(selection.checked_sub(self.first_index)?)
            .copied()
    }

    /// Row of the current item on the visible page.
    pub fn selected_row(&self) -> Option<usize> {
        self.selection?.checked_sub(self.first_index)
    }

    /// Description of the current item, for a footer line.
    pub fn description(&self) -> Option<&'a str> {
        self.selected_item().and_then(Item::description)
    }
}
