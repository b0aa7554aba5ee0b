//! Logging facilities for the overlay menu engine.
//!
//! This module provides:
//! - Target names for every subsystem, so embedders can filter with `tracing`
//!   directives such as `overlay_menu::repeat=trace`
//! - [`PerfSpan`], a scoped span for timing a unit of work
//! - Span names for the tick and menu transitions
//!
//! # Tracing Integration
//!
//! The engine only emits through the `tracing` facade. To see logs, install a
//! subscriber in the embedding application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("overlay_menu=debug")
//!     .init();
//! ```

/// Span names used throughout the engine.
pub mod span_names {
    /// One controller tick.
    pub const TICK: &str = "overlay_menu::tick";
    /// A menu transition (submenu open or back).
    pub const TRANSITION: &str = "overlay_menu::transition";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "overlay_menu_core";
    /// Signal/slot registry target.
    pub const SIGNAL: &str = "overlay_menu_core::signal";
    /// Prefix shared by the menu crate's targets.
    pub const MENU_CRATE: &str = "overlay_menu";
    /// Menu state target (items, filtering, window).
    pub const MENU: &str = "overlay_menu::menu";
    /// Menu tree target (registration, bindings, visibility).
    pub const TREE: &str = "overlay_menu::tree";
    /// Up/down/left/right navigation target.
    pub const NAVIGATION: &str = "overlay_menu::navigation";
    /// Held-key repeat target.
    pub const REPEAT: &str = "overlay_menu::repeat";
    /// Tick loop target.
    pub const CONTROLLER: &str = "overlay_menu::controller";
    /// Settings loading target.
    pub const SETTINGS: &str = "overlay_menu::settings";
    /// Performance spans.
    pub const PERF: &str = "overlay_menu::perf";
}

/// A performance span that is active until dropped.
///
/// ```
/// use overlay_menu_core::logging::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("rebuild_items");
///     // ... work ...
/// }
/// ```
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

impl std::fmt::Debug for PerfSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfSpan").finish_non_exhaustive()
    }
}
