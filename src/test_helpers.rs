//! Shared test utilities for the photo-portfolio test suite.
//!
//! Provides photo builders, the fixture index, and in-memory [`Source`]
//! implementations so loader tests never need the network.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let photos = vec![
//!     photo("a.jpg", 800, 600),
//!     with_mime(photo("b.nef", 6000, 4000), "image/x-nikon-nef"),
//! ];
//! ```

use std::cell::Cell;
use std::path::Path;

use crate::loader::{FetchError, Source};
use crate::types::{MetadataKey, MetadataValue, Photo};

// =========================================================================
// Photo builders
// =========================================================================

/// A minimal photo with url `photos/<filename>` and no metadata.
pub fn photo(filename: &str, width: u32, height: u32) -> Photo {
    Photo {
        filename: filename.to_string(),
        url: format!("photos/{filename}"),
        thumbnail_data: None,
        width,
        height,
        metadata: Default::default(),
        size: None,
        hash: None,
        mime_type: None,
        extension: None,
        capture_date: None,
        date: None,
    }
}

pub fn with_mime(mut photo: Photo, mime_type: &str) -> Photo {
    photo.mime_type = Some(mime_type.to_string());
    photo
}

pub fn with_text(mut photo: Photo, key: MetadataKey, value: &str) -> Photo {
    photo
        .metadata
        .insert(key, MetadataValue::Text(value.to_string()));
    photo
}

pub fn with_number(mut photo: Photo, key: MetadataKey, value: f64) -> Photo {
    photo.metadata.insert(key, MetadataValue::Number(value));
    photo
}

/// `count` photos of identical geometry named `p0.jpg`, `p1.jpg`, ...
pub fn uniform_photos(count: usize, width: u32, height: u32) -> Vec<Photo> {
    (0..count)
        .map(|i| photo(&format!("p{i}.jpg"), width, height))
        .collect()
}

/// Filenames in order, for compact assertions.
pub fn filenames<'a>(photos: impl IntoIterator<Item = &'a Photo>) -> Vec<&'a str> {
    photos.into_iter().map(|p| p.filename.as_str()).collect()
}

// =========================================================================
// Fixture index
// =========================================================================

/// Contents of `fixtures/index.jsonl`.
///
/// Nine lines: six loadable records, one blank line, one unparseable line
/// and one record with neither path nor thumbnail.
pub fn fixture_index() -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/index.jsonl");
    std::fs::read_to_string(path).unwrap()
}

pub fn fixture_photos() -> Vec<Photo> {
    crate::loader::parse_index(&fixture_index()).0
}

// =========================================================================
// Sources
// =========================================================================

/// Serves a fixed body and counts how often it was asked.
pub struct CountingSource {
    body: String,
    calls: Cell<usize>,
}

impl CountingSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Source for CountingSource {
    fn fetch(&self, _locator: &str) -> Result<String, FetchError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.body.clone())
    }
}

/// Always answers 404.
pub struct FailingSource;

impl Source for FailingSource {
    fn fetch(&self, locator: &str) -> Result<String, FetchError> {
        Err(FetchError::Status {
            locator: locator.to_string(),
            status: 404,
            reason: "Not Found".to_string(),
        })
    }
}
