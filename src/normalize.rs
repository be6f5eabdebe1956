//! Record normalization: one raw index record → one [`Photo`].
//!
//! Malformed individual fields never fail a record. They degrade to a
//! default (dimensions, filename) or are treated as absent (optional
//! strings, size). A record is only rejected when it is not a JSON object
//! or when it has neither a `path` nor an inline `thumbnail`, because such a
//! photo has nothing to display.

use crate::types::{Metadata, MetadataKey, MetadataValue, Photo};
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },
    #[error("record {index} has neither a path nor thumbnail data")]
    MissingSource { index: usize },
}

/// Normalize a parsed record.
///
/// `index` is the record's position in the source and is only used to
/// synthesize a `photo-<index>` filename and to label rejections.
pub fn normalize(record: &Value, index: usize) -> Result<Photo, RecordError> {
    let fields = record
        .as_object()
        .ok_or(RecordError::NotAnObject { index })?;

    let url = string_field(fields, "path").unwrap_or_default();
    let thumbnail_data = string_field(fields, "thumbnail").filter(|s| !s.is_empty());
    if url.is_empty() && thumbnail_data.is_none() {
        return Err(RecordError::MissingSource { index });
    }

    let filename = string_field(fields, "name")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("photo-{index}"));

    Ok(Photo {
        filename,
        url,
        thumbnail_data,
        width: dimension(fields.get("width")).unwrap_or(DEFAULT_WIDTH),
        height: dimension(fields.get("height")).unwrap_or(DEFAULT_HEIGHT),
        metadata: collect_metadata(fields),
        size: fields.get("size").and_then(Value::as_u64),
        hash: string_field(fields, "hash"),
        mime_type: string_field(fields, "type"),
        extension: string_field(fields, "extension"),
        capture_date: string_field(fields, "capture_date"),
        date: string_field(fields, "date"),
    })
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(String::from)
}

/// Coerce a width/height field to a positive integer.
///
/// Accepts JSON numbers and numeric strings. Anything that is missing,
/// non-numeric, non-finite or rounds to zero or below yields `None`.
fn dimension(value: Option<&Value>) -> Option<u32> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    let rounded = n.round();
    if rounded < 1.0 {
        return None;
    }
    Some(rounded.min(u32::MAX as f64) as u32)
}

fn collect_metadata(fields: &Map<String, Value>) -> Metadata {
    MetadataKey::ALL
        .into_iter()
        .filter_map(|key| {
            let value = match fields.get(key.as_str())? {
                Value::Null => return None,
                Value::String(s) => MetadataValue::Text(s.clone()),
                Value::Bool(b) => MetadataValue::Bool(*b),
                Value::Number(n) => MetadataValue::Number(n.as_f64()?),
                nested => MetadataValue::Text(nested.to_string()),
            };
            Some((key, value))
        })
        .collect()
}
