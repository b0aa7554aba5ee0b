//! Overlay Menu - a navigation and windowing engine for in-game overlay menus.
//!
//! This crate holds the state behind a paged, keyboard/gamepad driven menu:
//!
//! - **Items**: basic, checkbox, slider, list and dynamic-list entries
//! - **Menus**: an item collection with live filtering and a scrolling view
//!   window that wraps around both ends
//! - **Menu tree**: submenu bindings, parent links and the single open menu
//! - **Repeat navigation**: held-key stepping on an accelerating schedule
//! - **Controller**: the per-frame tick tying input, menus and renderer
//!   together
//!
//! Drawing, audio and platform input stay with the host, behind the
//! [`InputSource`], [`FrameSink`] and [`FeedbackSink`] traits.
//!
//! # Example
//!
//! ```
//! use overlay_menu::prelude::*;
//!
//! let mut tree = MenuTree::new();
//!
//! let mut main = Menu::new("Trainer").with_subtitle("Main");
//! let options = main.add_item(Item::new("Options").with_description("Tweak things"));
//! main.add_item(Item::checkbox("God mode", false));
//! let main = tree.add_menu(main);
//!
//! let settings = tree.add_menu(
//!     Menu::new("Options").with_item(Item::slider("Volume", 0, 10, 5)),
//! );
//! tree.bind_item(main, options, settings).unwrap();
//!
//! tree.open_menu(main);
//! tree.select(SelectTarget::Current);
//! assert_eq!(tree.current_menu(), Some(settings));
//! ```

pub mod collection;
pub mod controller;
mod error;
pub mod event;
pub mod frame;
pub mod input;
pub mod item;
pub mod menu;
pub mod navigator;
pub mod settings;
pub mod tree;
pub mod view_window;

pub use overlay_menu_core::{Clock, ConnectionId, ManualClock, Signal, SystemClock};

pub use collection::ItemCollection;
pub use controller::{Feedback, FeedbackSink, FrameSink, MenuController};
pub use error::{MenuError, Result, SettingsError};
pub use event::{
    CheckboxChange, DynamicListChange, IndexChange, ItemEvent, ListChange, MenuTransition,
    SliderChange,
};
pub use frame::Frame;
pub use input::{Action, Control, ControlCode, ControlMap, Direction, InputSource, MappedInput, RawInput};
pub use item::{
    Activation, ChangeDirection, CheckboxStyle, DynamicListCallback, Item, ItemId, ItemKind,
    ItemKindTag, ValueChange,
};
pub use menu::{
    HorizontalOutcome, LeftBackPolicy, Menu, MenuBehavior, MenuId, MenuSignals, SelectOutcome,
    SelectTarget,
};
pub use navigator::{RepeatNavigator, RepeatSchedule, RepeatThreshold};
pub use settings::MenuSettings;
pub use tree::{BackOutcome, LeftOutcome, MenuTree};
pub use view_window::{ViewWindow, MAX_ITEMS_ON_SCREEN, MIN_ITEMS_ON_SCREEN};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::controller::{Feedback, FeedbackSink, FrameSink, MenuController};
    pub use crate::frame::Frame;
    pub use crate::input::{Action, Direction, InputSource};
    pub use crate::item::{ChangeDirection, Item, ItemId, ItemKind};
    pub use crate::menu::{HorizontalOutcome, Menu, MenuId, SelectOutcome, SelectTarget};
    pub use crate::settings::MenuSettings;
    pub use crate::tree::{BackOutcome, MenuTree};
}
