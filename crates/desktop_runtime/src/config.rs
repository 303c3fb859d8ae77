//! Desktop runtime configuration: storage keys, icon grid geometry, shortcut apps, seed URLs.
//!
//! Every field has a default, so an embedding page only needs to override what differs. A TOML
//! document can be supplied through [`DesktopConfig::from_toml_str`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{apps, model::AppId};

/// Storage key of the filesystem blob.
pub const FS_STORAGE_KEY: &str = "webdesk.fs.v1";
/// Storage key of the desktop session blob.
pub const SESSION_STORAGE_KEY: &str = "webdesk.desktop.v1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Configuration load failures.
pub enum ConfigError {
    /// The document is not valid TOML or does not match the expected shape.
    #[error("failed to parse desktop config: {0}")]
    Parse(String),
    /// The document parsed but describes an unusable configuration.
    #[error("invalid desktop config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Geometry of the logical icon grid. Slots are scanned column-major.
pub struct IconGridConfig {
    pub cell_width: i32,
    pub cell_height: i32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub rows_per_column: u32,
}

impl Default for IconGridConfig {
    fn default() -> Self {
        Self {
            cell_width: 96,
            cell_height: 104,
            origin_x: 16,
            origin_y: 16,
            rows_per_column: 7,
        }
    }
}

impl IconGridConfig {
    /// Pixel position of a grid cell.
    pub fn slot_position(&self, col: u32, row: u32) -> (i32, i32) {
        (
            self.origin_x + col as i32 * self.cell_width,
            self.origin_y + row as i32 * self.cell_height,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub fs_storage_key: String,
    pub session_storage_key: String,
    pub icon_grid: IconGridConfig,
    /// Shortcut icons seeded on first run, in grid order.
    pub desktop_apps: Vec<AppId>,
    pub manifest_url: String,
    pub version_url: String,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            fs_storage_key: FS_STORAGE_KEY.to_string(),
            session_storage_key: SESSION_STORAGE_KEY.to_string(),
            icon_grid: IconGridConfig::default(),
            desktop_apps: apps::desktop_shortcut_apps(),
            manifest_url: "/seed/manifest.json".to_string(),
            version_url: "/version.json".to_string(),
        }
    }
}

impl DesktopConfig {
    /// Parses and validates a TOML document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and [`ConfigError::Invalid`] for
    /// unusable values.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the grid is degenerate or the two storage keys
    /// collide.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.icon_grid;
        if grid.cell_width <= 0 || grid.cell_height <= 0 {
            return Err(ConfigError::Invalid(
                "icon grid cells must have a positive size".to_string(),
            ));
        }
        if grid.rows_per_column == 0 {
            return Err(ConfigError::Invalid(
                "icon grid needs at least one row per column".to_string(),
            ));
        }
        if self.fs_storage_key == self.session_storage_key {
            return Err(ConfigError::Invalid(
                "filesystem and session blobs must use different storage keys".to_string(),
            ));
        }
        Ok(())
    }
}
