//! Menu items.
//!
//! An [`Item`] is the leaf of the menu hierarchy: a label with an optional
//! right-hand label and description, an enabled flag, and a kind-specific
//! payload ([`ItemKind`]). Item behavior is a closed set of variants rather
//! than a trait hierarchy; the per-kind reactions to left/right and select
//! live in [`Item::shift`] and [`Item::activate`].
//!
//! # Example
//!
//! ```
//! use overlay_menu::{Item, ItemKind};
//!
//! let volume = Item::slider("Volume", 0, 10, 5).with_description("Master volume");
//! let god_mode = Item::checkbox("God mode", false);
//! let weather = Item::list("Weather", vec!["Clear".into(), "Rain".into()], 0);
//!
//! assert_eq!(volume.slider_position(), Some(5));
//! assert_eq!(god_mode.checked(), Some(false));
//! assert!(matches!(weather.kind(), ItemKind::List { .. }));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::menu::MenuId;

/// Stable identity of an item, independent of its position.
///
/// Positions change when items are removed, sorted or filtered; the id does
/// not, which is why submenu bindings are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Which mark a checkbox draws when checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckboxStyle {
    /// A tick mark.
    #[default]
    Tick,
    /// A cross.
    Cross,
}

/// Direction of a horizontal value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeDirection {
    /// Towards the previous value.
    Left,
    /// Towards the next value.
    Right,
}

/// Produces the next value of a dynamic list from its current value.
pub type DynamicListCallback = Arc<dyn Fn(&str, ChangeDirection) -> String + Send + Sync>;

/// The kind-specific payload of an item.
#[derive(Clone)]
pub enum ItemKind {
    /// A plain selectable entry.
    Basic,
    /// An on/off toggle, flipped on select.
    Checkbox {
        /// Current state.
        checked: bool,
        /// Mark drawn when checked.
        style: CheckboxStyle,
    },
    /// A bounded integer value moved by left/right.
    Slider {
        /// Lowest position.
        min: i32,
        /// Highest position.
        max: i32,
        /// Current position, always within `[min, max]`.
        position: i32,
        /// Amount moved per left/right step.
        step: i32,
    },
    /// A fixed list of choices cycled by left/right.
    List {
        /// The choices.
        items: Vec<String>,
        /// Index of the current choice.
        current_index: usize,
    },
    /// A value computed on demand by a callback for each left/right.
    DynamicList {
        /// The value currently shown.
        current_value: String,
        /// Computes the next value.
        callback: DynamicListCallback,
    },
}

impl fmt::Debug for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => f.write_str("Basic"),
            Self::Checkbox { checked, style } => f
                .debug_struct("Checkbox")
                .field("checked", checked)
                .field("style", style)
                .finish(),
            Self::Slider {
                min,
                max,
                position,
                step,
            } => f
                .debug_struct("Slider")
                .field("min", min)
                .field("max", max)
                .field("position", position)
                .field("step", step)
                .finish(),
            Self::List {
                items,
                current_index,
            } => f
                .debug_struct("List")
                .field("items", items)
                .field("current_index", current_index)
                .finish(),
            Self::DynamicList { current_value, .. } => f
                .debug_struct("DynamicList")
                .field("current_value", current_value)
                .finish_non_exhaustive(),
        }
    }
}

/// Discriminator of [`ItemKind`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKindTag {
    /// [`ItemKind::Basic`].
    Basic,
    /// [`ItemKind::Checkbox`].
    Checkbox,
    /// [`ItemKind::Slider`].
    Slider,
    /// [`ItemKind::List`].
    List,
    /// [`ItemKind::DynamicList`].
    DynamicList,
}

impl ItemKind {
    /// The payload-free discriminator.
    pub fn tag(&self) -> ItemKindTag {
        match self {
            Self::Basic => ItemKindTag::Basic,
            Self::Checkbox { .. } => ItemKindTag::Checkbox,
            Self::Slider { .. } => ItemKindTag::Slider,
            Self::List { .. } => ItemKindTag::List,
            Self::DynamicList { .. } => ItemKindTag::DynamicList,
        }
    }

    /// Whether left/right mean something for this kind.
    pub fn has_horizontal_behavior(&self) -> bool {
        matches!(
            self,
            Self::Slider { .. } | Self::List { .. } | Self::DynamicList { .. }
        )
    }
}

/// A value change produced by left/right on an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueChange {
    /// A list moved to a new choice.
    List {
        /// New index.
        index: usize,
    },
    /// A slider moved.
    Slider {
        /// New position.
        position: i32,
    },
    /// A dynamic list produced a new value.
    DynamicList {
        /// New value.
        value: String,
    },
}

/// Result of applying left/right to an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Shift {
    /// The kind has no horizontal behavior.
    Unhandled,
    /// The kind reacts to left/right, but the value stayed put (slider at a
    /// bound, empty list).
    Unchanged,
    /// The value changed.
    Changed(ValueChange),
}

/// What selecting an item did, by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A basic item was selected.
    Plain,
    /// A checkbox flipped.
    CheckboxToggled {
        /// The state after toggling.
        checked: bool,
    },
    /// A list was selected on its current choice.
    ListChosen {
        /// Index of the current choice.
        index: usize,
    },
    /// A slider was selected at its current position.
    SliderChosen {
        /// Current position.
        position: i32,
    },
    /// A dynamic list was selected on its current value.
    DynamicListChosen {
        /// Current value.
        value: String,
    },
}

/// A single menu entry.
///
/// Items are created detached. Adding one to a [`Menu`](crate::Menu) attaches
/// it: its parent is set and it receives an index in the menu's active view.
/// Items are not `Clone`, since a copy would share the same [`ItemId`].
#[derive(Debug)]
pub struct Item {
    id: ItemId,
    text: String,
    right_label: Option<String>,
    description: Option<String>,
    enabled: bool,
    left_icon: Option<String>,
    right_icon: Option<String>,
    index: Option<usize>,
    selected: bool,
    parent: Option<MenuId>,
    kind: ItemKind,
}

impl Item {
    /// Create a basic item.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_kind(text, ItemKind::Basic)
    }

    /// Create an item with an explicit payload.
    pub fn with_kind(text: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::next(),
            text: text.into(),
            right_label: None,
            description: None,
            enabled: true,
            left_icon: None,
            right_icon: None,
            index: None,
            selected: false,
            parent: None,
            kind,
        }
    }

    /// Create a checkbox item.
    pub fn checkbox(text: impl Into<String>, checked: bool) -> Self {
        Self::with_kind(
            text,
            ItemKind::Checkbox {
                checked,
                style: CheckboxStyle::default(),
            },
        )
    }

    /// Create a slider item. A reversed range is swapped and `position` is
    /// clamped into it.
    pub fn slider(text: impl Into<String>, min: i32, max: i32, position: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self::with_kind(
            text,
            ItemKind::Slider {
                min,
                max,
                position: position.clamp(min, max),
                step: 1,
            },
        )
    }

    /// Create a list item. `current_index` is clamped to the last choice.
    pub fn list(text: impl Into<String>, items: Vec<String>, current_index: usize) -> Self {
        let current_index = current_index.min(items.len().saturating_sub(1));
        Self::with_kind(
            text,
            ItemKind::List {
                items,
                current_index,
            },
        )
    }

    /// Create a dynamic list item whose values come from `callback`.
    pub fn dynamic_list<F>(text: impl Into<String>, initial: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&str, ChangeDirection) -> String + Send + Sync + 'static,
    {
        Self::with_kind(
            text,
            ItemKind::DynamicList {
                current_value: initial.into(),
                callback: Arc::new(callback),
            },
        )
    }

    // =========================================================================
    // Builder Pattern
    // =========================================================================

    /// Set the description using builder pattern.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the right-hand label using builder pattern.
    pub fn with_right_label(mut self, label: impl Into<String>) -> Self {
        self.right_label = Some(label.into());
        self
    }

    /// Set the enabled flag using builder pattern.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the left icon tag using builder pattern.
    pub fn with_left_icon(mut self, icon: impl Into<String>) -> Self {
        self.left_icon = Some(icon.into());
        self
    }

    /// Set the right icon tag using builder pattern.
    pub fn with_right_icon(mut self, icon: impl Into<String>) -> Self {
        self.right_icon = Some(icon.into());
        self
    }

    /// Set the checkbox style using builder pattern. Ignored for other kinds.
    pub fn with_checkbox_style(mut self, new_style: CheckboxStyle) -> Self {
        if let ItemKind::Checkbox { style, .. } = &mut self.kind {
            *style = new_style;
        }
        self
    }

    /// Set the slider step using builder pattern. Ignored for other kinds.
    pub fn with_step(mut self, new_step: i32) -> Self {
        if let ItemKind::Slider { step, .. } = &mut self.kind {
            *step = new_step.max(1);
        }
        self
    }

    // =========================================================================
    // Common attributes
    // =========================================================================

    /// The item's stable id.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// The label.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Change the label.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The right-hand label, if any.
    pub fn right_label(&self) -> Option<&str> {
        self.right_label.as_deref()
    }

    /// Change the right-hand label.
    pub fn set_right_label(&mut self, label: Option<String>) {
        self.right_label = label;
    }

    /// The description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Change the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Whether the item can be selected or changed.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the item.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The left icon tag.
    pub fn left_icon(&self) -> Option<&str> {
        self.left_icon.as_deref()
    }

    /// The right icon tag.
    pub fn right_icon(&self) -> Option<&str> {
        self.right_icon.as_deref()
    }

    /// Position in the owning menu's active view.
    ///
    /// `None` while the item is detached or hidden by a filter.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Whether this is the current item of a visible menu.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// The menu this item belongs to.
    pub fn parent(&self) -> Option<MenuId> {
        self.parent
    }

    /// The kind-specific payload.
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    // =========================================================================
    // Kind accessors
    // =========================================================================

    /// Checkbox state, `None` for other kinds.
    pub fn checked(&self) -> Option<bool> {
        match self.kind {
            ItemKind::Checkbox { checked, .. } => Some(checked),
            _ => None,
        }
    }

    /// Set the checkbox state. Returns `false` if this is not a checkbox.
    pub fn set_checked(&mut self, value: bool) -> bool {
        match &mut self.kind {
            ItemKind::Checkbox { checked, .. } => {
                *checked = value;
                true
            }
            _ => false,
        }
    }

    /// Slider position, `None` for other kinds.
    pub fn slider_position(&self) -> Option<i32> {
        match self.kind {
            ItemKind::Slider { position, .. } => Some(position),
            _ => None,
        }
    }

    /// Move the slider, clamped to its range. Returns `false` if this is not
    /// a slider.
    pub fn set_slider_position(&mut self, value: i32) -> bool {
        match &mut self.kind {
            ItemKind::Slider {
                min, max, position, ..
            } => {
                *position = value.clamp(*min, *max);
                true
            }
            _ => false,
        }
    }

    /// Current list index, `None` for other kinds.
    pub fn list_index(&self) -> Option<usize> {
        match self.kind {
            ItemKind::List { current_index, .. } => Some(current_index),
            _ => None,
        }
    }

    /// Current list choice, `None` for other kinds or an empty list.
    pub fn list_value(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::List {
                items,
                current_index,
            } => items.get(*current_index).map(String::as_str),
            _ => None,
        }
    }

    /// The choice at `index` of a list item.
    pub fn list_item_at(&self, index: usize) -> Option<&str> {
        match &self.kind {
            ItemKind::List { items, .. } => items.get(index).map(String::as_str),
            _ => None,
        }
    }

    /// Index of the first choice equal to `value` in a list item.
    pub fn list_index_of(&self, value: &str) -> Option<usize> {
        match &self.kind {
            ItemKind::List { items, .. } => items.iter().position(|item| item == value),
            _ => None,
        }
    }

    /// Select a list choice. Returns `false` if this is not a list or the
    /// index is out of range.
    pub fn set_list_index(&mut self, index: usize) -> bool {
        match &mut self.kind {
            ItemKind::List {
                items,
                current_index,
            } if index < items.len() => {
                *current_index = index;
                true
            }
            _ => false,
        }
    }

    /// Current dynamic list value, `None` for other kinds.
    pub fn dynamic_value(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::DynamicList { current_value, .. } => Some(current_value),
            _ => None,
        }
    }

    /// Replace the dynamic list value. Returns `false` for other kinds.
    pub fn set_dynamic_value(&mut self, value: impl Into<String>) -> bool {
        match &mut self.kind {
            ItemKind::DynamicList { current_value, .. } => {
                *current_value = value.into();
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Behavior table
    // =========================================================================

    /// Apply left/right to the payload.
    pub(crate) fn shift(&mut self, direction: ChangeDirection) -> Shift {
        match &mut self.kind {
            ItemKind::Basic | ItemKind::Checkbox { .. } => Shift::Unhandled,
            ItemKind::List {
                items,
                current_index,
            } => {
                let len = items.len();
                if len < 2 {
                    return Shift::Unchanged;
                }
                *current_index = match direction {
                    ChangeDirection::Left if *current_index == 0 => len - 1,
                    ChangeDirection::Left => *current_index - 1,
                    ChangeDirection::Right => (*current_index + 1) % len,
                };
                Shift::Changed(ValueChange::List {
                    index: *current_index,
                })
            }
            ItemKind::Slider {
                min,
                max,
                position,
                step,
            } => {
                let next = match direction {
                    ChangeDirection::Left => position.saturating_sub(*step),
                    ChangeDirection::Right => position.saturating_add(*step),
                }
                .clamp(*min, *max);
                if next == *position {
                    return Shift::Unchanged;
                }
                *position = next;
                Shift::Changed(ValueChange::Slider { position: next })
            }
            ItemKind::DynamicList {
                current_value,
                callback,
            } => {
                let value = callback(current_value, direction);
                *current_value = value.clone();
                Shift::Changed(ValueChange::DynamicList { value })
            }
        }
    }

    /// Apply select to the payload.
    pub(crate) fn activate(&mut self) -> Activation {
        match &mut self.kind {
            ItemKind::Basic => Activation::Plain,
            ItemKind::Checkbox { checked, .. } => {
                *checked = !*checked;
                Activation::CheckboxToggled { checked: *checked }
            }
            ItemKind::List { current_index, .. } => Activation::ListChosen {
                index: *current_index,
            },
            ItemKind::Slider { position, .. } => Activation::SliderChosen {
                position: *position,
            },
            ItemKind::DynamicList { current_value, .. } => Activation::DynamicListChosen {
                value: current_value.clone(),
            },
        }
    }

    // =========================================================================
    // Attachment (driven by the owning collection / menu)
    // =========================================================================

    pub(crate) fn attach(&mut self, parent: Option<MenuId>) {
        self.parent = parent;
    }

    pub(crate) fn detach(&mut self) {
        self.parent = None;
        self.index = None;
        self.selected = false;
    }

    pub(crate) fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
