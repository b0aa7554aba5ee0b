//! Error types for the menu engine.
//!
//! Navigation never fails; it degrades to no-ops. Errors are reserved for
//! structural misuse of the tree (binding to an unknown menu) and for
//! loading settings.

use std::path::PathBuf;

use crate::item::ItemId;
use crate::menu::MenuId;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, MenuError>;

/// Errors from structural operations on a [`MenuTree`](crate::MenuTree).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    /// The menu id is not registered.
    #[error("Unknown menu {0:?}")]
    UnknownMenu(MenuId),

    /// The item does not belong to the menu it was bound from.
    #[error("Item {item} does not belong to menu {menu:?}")]
    ItemNotInMenu { item: ItemId, menu: MenuId },

    /// A menu cannot be its own submenu.
    #[error("Menu {0:?} cannot open itself as a submenu")]
    SelfBinding(MenuId),
}

/// Errors from loading or saving [`MenuSettings`](crate::MenuSettings).
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File I/O error.
    #[error("Failed to access settings '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML could not be parsed into settings.
    #[error("Invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be written as TOML.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl SettingsError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
