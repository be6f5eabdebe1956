//! Gallery configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! are the base layer; a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]
//! gap = 16                  # Pixels between items and columns
//! breakpoints = [[640, 150], [768, 200], [1024, 250]]
//! max_column_width = 300    # Column width at and above the last breakpoint
//!
//! [preview]
//! suffix = ".pv.webp"       # Appended to a photo's path for the large view
//! swipe_threshold = 50.0    # Minimum horizontal swipe travel (pixels)
//!
//! [thumbnails]
//! mime_type = "image/webp"  # MIME type of inline thumbnail payloads
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::masonry::{DEFAULT_BREAKPOINTS, DEFAULT_GAP, DEFAULT_MAX_COLUMN_WIDTH};
use crate::preview::{DEFAULT_SWIPE_THRESHOLD, SwipeTracker};
use crate::types::{DEFAULT_PREVIEW_SUFFIX, DEFAULT_THUMBNAIL_MIME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Masonry grid settings.
    pub layout: LayoutConfig,
    /// Full-screen preview settings.
    pub preview: PreviewConfig,
    /// Inline thumbnail settings.
    pub thumbnails: ThumbnailsConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.max_column_width == 0 {
            return Err(ConfigError::Validation(
                "layout.max_column_width must be non-zero".into(),
            ));
        }
        if self.layout.breakpoints.iter().any(|[_, width]| *width == 0) {
            return Err(ConfigError::Validation(
                "layout.breakpoints column widths must be non-zero".into(),
            ));
        }
        if self
            .layout
            .breakpoints
            .windows(2)
            .any(|pair| pair[0][0] >= pair[1][0])
        {
            return Err(ConfigError::Validation(
                "layout.breakpoints must be in strictly ascending order".into(),
            ));
        }
        if !(self.preview.swipe_threshold.is_finite() && self.preview.swipe_threshold > 0.0) {
            return Err(ConfigError::Validation(
                "preview.swipe_threshold must be a positive number".into(),
            ));
        }
        if self.preview.suffix.is_empty() {
            return Err(ConfigError::Validation(
                "preview.suffix must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Masonry grid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Gap between items and columns, in pixels.
    pub gap: u32,
    /// `[container upper bound, column width]` pairs, ascending.
    pub breakpoints: Vec<[u32; 2]>,
    /// Column width once the container reaches the last breakpoint.
    pub max_column_width: u32,
}

impl LayoutConfig {
    /// Breakpoints as tuples for [`crate::masonry::column_width_for`].
    pub fn breakpoint_pairs(&self) -> Vec<(u32, u32)> {
        self.breakpoints.iter().map(|[b, w]| (*b, *w)).collect()
    }

    /// Responsive column width for a container of the given width.
    pub fn column_width_for(&self, container_width: f64) -> u32 {
        crate::masonry::column_width_for(
            container_width,
            &self.breakpoint_pairs(),
            self.max_column_width,
        )
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            breakpoints: DEFAULT_BREAKPOINTS.iter().map(|(b, w)| [*b, *w]).collect(),
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }
}

/// Full-screen preview settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Appended to a photo's path to locate its large preview rendition.
    pub suffix: String,
    /// Minimum horizontal travel for a touch to count as a swipe.
    pub swipe_threshold: f64,
}

impl PreviewConfig {
    /// A fresh touch tracker using the configured swipe threshold.
    pub fn swipe_tracker(&self) -> SwipeTracker {
        SwipeTracker::new(self.swipe_threshold)
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_PREVIEW_SUFFIX.to_string(),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

/// Inline thumbnail settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// MIME type used when turning an inline payload into a `data:` URI.
    pub mime_type: String,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            mime_type: DEFAULT_THUMBNAIL_MIME.to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of the
/// stock defaults.
pub fn load_config(dir: &Path) -> Result<GalleryConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// A fully-commented stock `config.toml`. Used by the `gen-config` command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Portfolio Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Masonry layout
# ---------------------------------------------------------------------------
[layout]
# Pixels between items and between columns.
gap = 16

# Responsive column widths as [container upper bound, column width] pairs,
# in ascending order. The first bound the container is narrower than wins.
breakpoints = [[640, 150], [768, 200], [1024, 250]]

# Column width when the container is at least as wide as the last bound.
max_column_width = 300

# ---------------------------------------------------------------------------
# Full-screen preview
# ---------------------------------------------------------------------------
[preview]
# Appended to a photo's path to locate its large preview rendition.
suffix = ".pv.webp"

# Minimum horizontal travel, in pixels, for a touch to count as a swipe.
swipe_threshold = 50.0

# ---------------------------------------------------------------------------
# Inline thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# MIME type of the base64 thumbnail payloads embedded in the index.
mime_type = "image/webp"
"##
}
