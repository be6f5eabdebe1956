//! File-type categorization from MIME strings.
//!
//! Camera RAW formats are usually reported under an `image/*` MIME type even
//! though a browser cannot display them directly. They are checked against a
//! fixed list first, before falling back to the primary MIME component.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const RAW_MIME_TYPES: &[&str] = &[
    "image/x-canon-cr2",
    "image/x-canon-cr3",
    "image/x-nikon-nef",
    "image/x-sony-arw",
    "image/x-panasonic-rw2",
    "image/x-olympus-orf",
    "image/x-fuji-raf",
    "image/x-pentax-pef",
    "image/dng",
    "image/x-adobe-dng",
    "image/x-hasselblad-3fr",
    "image/x-phaseone-iiq",
    "image/x-sigma-x3f",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Raw,
    Audio,
    Video,
    Other,
}

impl FileCategory {
    pub const ALL: [FileCategory; 5] = [
        FileCategory::Image,
        FileCategory::Raw,
        FileCategory::Audio,
        FileCategory::Video,
        FileCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Raw => "raw",
            FileCategory::Audio => "audio",
            FileCategory::Video => "video",
            FileCategory::Other => "other",
        }
    }

    /// Human-readable plural label for filter menus.
    pub fn label(self) -> &'static str {
        match self {
            FileCategory::Image => "Images",
            FileCategory::Raw => "RAW Files",
            FileCategory::Audio => "Audio",
            FileCategory::Video => "Video",
            FileCategory::Other => "Other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown file type '{0}' (expected image, raw, audio, video or other)")]
pub struct UnknownFileCategory(pub String);

impl FromStr for FileCategory {
    type Err = UnknownFileCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FileCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownFileCategory(s.to_string()))
    }
}

/// Categorize a MIME type string. Empty or unrecognized input is `Other`.
pub fn categorize(mime_type: &str) -> FileCategory {
    let mime = mime_type.trim().to_ascii_lowercase();
    if mime.is_empty() {
        return FileCategory::Other;
    }
    if RAW_MIME_TYPES.contains(&mime.as_str()) {
        return FileCategory::Raw;
    }
    match mime.split('/').next() {
        Some("image") => FileCategory::Image,
        Some("audio") => FileCategory::Audio,
        Some("video") => FileCategory::Video,
        _ => FileCategory::Other,
    }
}
