//! Notification payloads.
//!
//! Each struct here is the argument of one [`Signal`](overlay_menu_core::Signal)
//! on [`MenuSignals`](crate::MenuSignals) or [`MenuTree`](crate::MenuTree).

use crate::item::{ChangeDirection, ItemId};
use crate::menu::MenuId;

/// The current item of a menu moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexChange {
    /// Menu whose selection moved.
    pub menu: MenuId,
    /// Item selected before the move.
    pub old_item: ItemId,
    /// Item selected after the move.
    pub new_item: ItemId,
    /// Active-view index before the move.
    pub old_index: usize,
    /// Active-view index after the move.
    pub new_index: usize,
}

/// An item was selected, or a selection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemEvent {
    /// Owning menu.
    pub menu: MenuId,
    /// The item.
    pub item: ItemId,
    /// Its active-view index.
    pub index: usize,
}

/// A checkbox was toggled by selecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxChange {
    /// Owning menu.
    pub menu: MenuId,
    /// The checkbox.
    pub item: ItemId,
    /// State after the toggle.
    pub checked: bool,
}

/// A list item moved to, or was selected on, a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChange {
    /// Owning menu.
    pub menu: MenuId,
    /// The list item.
    pub item: ItemId,
    /// Index of the choice.
    pub index: usize,
    /// Text of the choice.
    pub value: Option<String>,
}

/// A slider moved, or was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderChange {
    /// Owning menu.
    pub menu: MenuId,
    /// The slider.
    pub item: ItemId,
    /// Position after the change.
    pub position: i32,
}

/// A dynamic list produced a value, or was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicListChange {
    /// Owning menu.
    pub menu: MenuId,
    /// The dynamic list item.
    pub item: ItemId,
    /// The value.
    pub value: String,
    /// Direction of the change; `None` when selected.
    pub direction: Option<ChangeDirection>,
}

/// The active menu of a tree changed through a submenu transition or back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuTransition {
    /// Menu that was closed.
    pub from: MenuId,
    /// Menu that was opened, `None` when the hierarchy was exited.
    pub to: Option<MenuId>,
    /// `true` for entering a submenu, `false` for going back.
    pub forward: bool,
}
