//! Core systems for overlay-menu.
//!
//! This crate provides the pieces of the overlay menu engine that have no
//! knowledge of menus themselves:
//!
//! - **Signal/Slot System**: Ordered listener registries for engine events
//! - **Clocks**: The monotonic millisecond clock consumed by key repeat
//! - **Logging**: `tracing` targets, span names and a scoped perf span
//!
//! # Signal/Slot Example
//!
//! ```
//! use overlay_menu_core::Signal;
//!
//! let checkbox_changed = Signal::<bool>::new();
//!
//! let conn_id = checkbox_changed.connect(|checked| {
//!     println!("checked: {}", checked);
//! });
//!
//! checkbox_changed.emit(true);
//! checkbox_changed.disconnect(conn_id);
//! ```

mod clock;
pub mod logging;
pub mod signal;

pub use clock::{Clock, ManualClock, SystemClock};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
