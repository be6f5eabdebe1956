//! Shared types: the normalized [`Photo`] and its capture metadata.
//!
//! A `Photo` is built once by [`normalize`](crate::normalize::normalize) and
//! never mutated afterwards. Every later stage (filtering, masonry packing,
//! preview) works on borrowed or cloned snapshots of these values.

use crate::file_type::{self, FileCategory};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Suffix appended to a photo's path to locate its large preview rendition.
pub const DEFAULT_PREVIEW_SUFFIX: &str = ".pv.webp";

/// MIME type assumed for inline thumbnail payloads.
pub const DEFAULT_THUMBNAIL_MIME: &str = "image/webp";

/// One of the capture-metadata fields the index may carry.
///
/// Declaration order is the canonical display order; [`Metadata`] iterates
/// in this order because the derived `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataKey {
    Lens,
    LensMake,
    FocalLength,
    FocalLength35mm,
    Aperture,
    ShutterSpeed,
    Iso,
    ExposureCompensation,
    Flash,
    WhiteBalance,
    MeteringMode,
    Orientation,
}

impl MetadataKey {
    pub const ALL: [MetadataKey; 12] = [
        MetadataKey::Lens,
        MetadataKey::LensMake,
        MetadataKey::FocalLength,
        MetadataKey::FocalLength35mm,
        MetadataKey::Aperture,
        MetadataKey::ShutterSpeed,
        MetadataKey::Iso,
        MetadataKey::ExposureCompensation,
        MetadataKey::Flash,
        MetadataKey::WhiteBalance,
        MetadataKey::MeteringMode,
        MetadataKey::Orientation,
    ];

    /// Field name as it appears in the JSON index.
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataKey::Lens => "lens",
            MetadataKey::LensMake => "lens_make",
            MetadataKey::FocalLength => "focal_length",
            MetadataKey::FocalLength35mm => "focal_length_35mm",
            MetadataKey::Aperture => "aperture",
            MetadataKey::ShutterSpeed => "shutter_speed",
            MetadataKey::Iso => "iso",
            MetadataKey::ExposureCompensation => "exposure_compensation",
            MetadataKey::Flash => "flash",
            MetadataKey::WhiteBalance => "white_balance",
            MetadataKey::MeteringMode => "metering_mode",
            MetadataKey::Orientation => "orientation",
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown metadata key '{0}'")]
pub struct UnknownMetadataKey(pub String);

impl FromStr for MetadataKey {
    type Err = UnknownMetadataKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetadataKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownMetadataKey(s.to_string()))
    }
}

/// A metadata value as found in the index.
///
/// Nulls never make it this far: the normalizer drops null fields entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl fmt::Display for MetadataValue {
    /// Stringifies like a browser does: `100`, `2.8`, `-0.7`, `true`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Text(s) => f.write_str(s),
            MetadataValue::Number(n) => write!(f, "{n}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Capture metadata, keyed and ordered by [`MetadataKey`].
pub type Metadata = BTreeMap<MetadataKey, MetadataValue>;

/// A normalized gallery entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Photo {
    /// Source `name`, or `photo-<index>` when the record had none.
    pub filename: String,
    /// Source `path`. Empty when only inline thumbnail data is available.
    pub url: String,
    /// Inline thumbnail payload (base64-encoded image bytes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_data: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
    /// File size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_date: Option<String>,
    /// Last-modified date of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Photo {
    /// Width over height. Both are guaranteed positive by normalization.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// File-type category derived from the MIME type; `Other` when absent.
    pub fn category(&self) -> FileCategory {
        file_type::categorize(self.mime_type.as_deref().unwrap_or(""))
    }

    /// Image source for a grid card: the inline payload as a `data:` URI when
    /// present, otherwise the photo's own url.
    pub fn thumbnail_source(&self, mime_type: &str) -> String {
        match &self.thumbnail_data {
            Some(data) => format!("data:{mime_type};base64,{data}"),
            None => self.url.clone(),
        }
    }

    /// Path of the large preview rendition (`<url><suffix>`).
    pub fn preview_url(&self, suffix: &str) -> String {
        format!("{}{}", self.url, suffix)
    }

    /// "Download original" always resolves to the unmodified source url.
    pub fn download_url(&self) -> &str {
        &self.url
    }

    pub fn metadata_value(&self, key: MetadataKey) -> Option<&MetadataValue> {
        self.metadata.get(&key)
    }
}
