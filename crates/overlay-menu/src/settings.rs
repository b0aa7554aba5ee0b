//! Engine configuration.
//!
//! [`MenuSettings`] gathers every tunable of the engine (page size, left-back
//! policy, counter, repeat curve and control bindings) in one serde struct,
//! loaded from TOML. Missing keys take their defaults, so an empty file is a
//! valid configuration.
//!
//! # Example
//!
//! ```
//! use overlay_menu::{LeftBackPolicy, MenuSettings};
//!
//! let settings = MenuSettings::from_toml_str(
//!     r#"
//!     max_items_on_screen = 7
//!     left_back = "when_unhandled"
//!
//!     [repeat]
//!     initial_delay_ms = 250
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(settings.max_items_on_screen, 7);
//! assert_eq!(settings.left_back, LeftBackPolicy::WhenUnhandled);
//! assert_eq!(settings.repeat.initial_delay_ms, 250);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use overlay_menu_core::logging::targets;

use crate::controller::MenuController;
use crate::error::SettingsError;
use crate::input::ControlMap;
use crate::menu::{LeftBackPolicy, Menu, MenuBehavior};
use crate::navigator::RepeatSchedule;
use crate::tree::MenuTree;
use crate::view_window::{DEFAULT_ITEMS_ON_SCREEN, MAX_ITEMS_ON_SCREEN, MIN_ITEMS_ON_SCREEN};

/// Result type alias for settings operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// Every tunable of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    /// Rows per page, 3 to 10.
    pub max_items_on_screen: usize,
    /// Move the selection to the first row whenever a menu opens.
    pub reset_cursor_on_open: bool,
    /// When left goes back.
    pub left_back: LeftBackPolicy,
    /// Show the "current / total" counter on multi-page menus.
    pub show_counter: bool,
    /// Text placed before the counter.
    pub counter_prefix: String,
    /// Held-key acceleration curve.
    pub repeat: RepeatSchedule,
    /// Control bindings.
    pub controls: ControlMap,
}

impl Default for MenuSettings {
    fn default() -> Self {
        let behavior = MenuBehavior::default();
        Self {
            max_items_on_screen: DEFAULT_ITEMS_ON_SCREEN,
            reset_cursor_on_open: behavior.reset_cursor_on_open,
            left_back: behavior.left_back,
            show_counter: behavior.show_counter,
            counter_prefix: behavior.counter_prefix,
            repeat: RepeatSchedule::default(),
            controls: ControlMap::default(),
        }
    }
}

impl MenuSettings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(source: &str) -> SettingsResult<Self> {
        let settings: Self = toml::from_str(source)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| SettingsError::io(path, e))?;
        let settings = Self::from_toml_str(&source)?;
        tracing::debug!(target: targets::SETTINGS, path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Render the settings as TOML.
    pub fn to_toml_string(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> SettingsResult<()> {
        let path = path.as_ref();
        let source = self.to_toml_string()?;
        std::fs::write(path, source).map_err(|e| SettingsError::io(path, e))?;
        tracing::debug!(target: targets::SETTINGS, path = %path.display(), "settings saved");
        Ok(())
    }

    /// Clamp out-of-range values, warning about each one.
    fn sanitized(mut self) -> Self {
        let clamped = self
            .max_items_on_screen
            .clamp(MIN_ITEMS_ON_SCREEN, MAX_ITEMS_ON_SCREEN);
        if clamped != self.max_items_on_screen {
            tracing::warn!(
                target: targets::SETTINGS,
                requested = self.max_items_on_screen,
                used = clamped,
                "max_items_on_screen out of range"
            );
            self.max_items_on_screen = clamped;
        }
        if self.repeat.initial_delay_ms == 0 {
            tracing::warn!(
                target: targets::SETTINGS,
                "repeat.initial_delay_ms is zero, keys will repeat every frame"
            );
        }
        self
    }

    /// The per-menu behavior these settings describe.
    pub fn behavior(&self) -> MenuBehavior {
        MenuBehavior {
            left_back: self.left_back,
            reset_cursor_on_open: self.reset_cursor_on_open,
            show_counter: self.show_counter,
            counter_prefix: self.counter_prefix.clone(),
        }
    }

    /// Apply page size and behavior to one menu.
    pub fn apply_to(&self, menu: &mut Menu) {
        menu.set_max_items_on_screen(self.max_items_on_screen);
        menu.set_behavior(self.behavior());
    }

    /// Apply page size and behavior to every menu of a tree.
    pub fn apply_to_tree(&self, tree: &mut MenuTree) {
        let ids: Vec<_> = tree.menus().map(|(id, _)| id).collect();
        tracing::debug!(target: targets::SETTINGS, menus = ids.len(), "applying settings to tree");
        for id in ids {
            if let Some(menu) = tree.menu_mut(id) {
                self.apply_to(menu);
            }
        }
    }

    /// A controller using these settings' repeat curve.
    pub fn controller(&self) -> MenuController {
        MenuController::new(self.repeat.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ControlCode, Direction};
    use crate::item::Item;

    #[test]
    fn test_empty_document_is_default() {
        let settings = MenuSettings::from_toml_str("").unwrap();
        assert_eq!(settings, MenuSettings::default());
    }

    #[test]
    fn test_page_size_is_clamped() {
        let settings = MenuSettings::from_toml_str("max_items_on_screen = 40").unwrap();
        assert_eq!(settings.max_items_on_screen, 10);
        let settings = MenuSettings::from_toml_str("max_items_on_screen = 1").unwrap();
        assert_eq!(settings.max_items_on_screen, 3);
    }

    #[test]
    fn test_warnings_use_settings_target() {
        use std::sync::Arc;

        use parking_lot::Mutex;
        use tracing_subscriber::layer::{Context, SubscriberExt};

        struct Recorder(Arc<Mutex<Vec<(tracing::Level, String)>>>);

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Recorder {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                let meta = event.metadata();
                self.0.lock().push((*meta.level(), meta.target().to_string()));
            }
        }

        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(Recorder(events.clone()));
        tracing::subscriber::with_default(subscriber, || {
            MenuSettings::from_toml_str(
                "max_items_on_screen = 40\n[repeat]\ninitial_delay_ms = 0",
            )
            .unwrap();
        });

        let warnings: Vec<_> = events
            .lock()
            .iter()
            .filter(|(level, _)| *level == tracing::Level::WARN)
            .map(|(_, target)| target.clone())
            .collect();
        assert_eq!(warnings, vec![targets::SETTINGS.to_string(); 2]);
    }

    #[test]
    fn test_controls_and_thresholds() {
        let settings = MenuSettings::from_toml_str(
            r#"
            [controls]
            up = [38, 87]

            [repeat]
            thresholds = [{ after_steps = 1, delay_ms = 80 }]
            "#,
        )
        .unwrap();
        assert_eq!(
            settings.controls.bindings(Direction::Up),
            &[ControlCode(38), ControlCode(87)]
        );
        assert_eq!(
            settings.controls.bindings(Direction::Down),
            ControlMap::default().bindings(Direction::Down)
        );
        assert_eq!(settings.repeat.initial_delay_ms, 200);
        assert_eq!(settings.repeat.delay_after(2), 80);
    }

    #[test]
    fn test_invalid_document_is_parse_error() {
        let err = MenuSettings::from_toml_str("left_back = \"sometimes\"").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = MenuSettings {
            counter_prefix: "Page ".into(),
            ..MenuSettings::default()
        };
        settings.controls.rebind(Direction::Left, vec![ControlCode(37)]);
        let text = settings.to_toml_string().unwrap();
        assert_eq!(MenuSettings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_apply_to_menu() {
        let settings = MenuSettings {
            max_items_on_screen: 4,
            counter_prefix: "#".into(),
            ..MenuSettings::default()
        };
        let mut menu = Menu::new("Main");
        for n in 0..6 {
            menu.add_item(Item::new(n.to_string()));
        }
        settings.apply_to(&mut menu);
        assert_eq!(menu.max_items_on_screen(), 4);
        assert_eq!(menu.counter_text(), Some("#1 / 6".to_string()));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.toml");
        let settings = MenuSettings {
            max_items_on_screen: 6,
            left_back: LeftBackPolicy::Never,
            ..MenuSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(MenuSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MenuSettings::load("/nonexistent/overlay-menu.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
