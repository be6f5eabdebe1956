//! CLI output formatting.
//!
//! Every entity follows the same two-level pattern:
//!
//! 1. **Header line**: positional index + filename (+ optional detail)
//! 2. **Context lines**: indented geometry, type, metadata, resource paths
//!
//! ## Summary
//!
//! ```text
//! Index
//!     6 loaded from 9 lines (1 blank, 1 unparseable, 1 rejected)
//!
//! Types
//!     Images: 3
//!     RAW Files: 1
//!
//! Metadata
//!     aperture: 1.4, 1.8, 2
//! ```
//!
//! ## Layout
//!
//! ```text
//! 4 columns × 300px, gap 16px
//! Column 1 (632px)
//!     001 sunrise.jpg (200px)
//! ```
//!
//! Each command has a `format_*` function returning `Vec<String>` so tests
//! can check output without capturing stdout, and [`print_lines`] writes it.

use crate::config::GalleryConfig;
use crate::file_type::FileCategory;
use crate::filter::{self, FilterOutcome, FilterSpec};
use crate::loader::LoadStats;
use crate::masonry::MasonryLayout;
use crate::preview::PreviewState;
use crate::types::{MetadataKey, MetadataValue, Photo};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn photo_header(index: usize, photo: &Photo) -> String {
    format!("{} {}", format_index(index), photo.filename)
}

/// Byte count as megabytes with one decimal, e.g. `8.0 MB`.
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Display label for a metadata key.
///
/// Most keys are title-cased with underscores as spaces; a few get shorter
/// names.
pub fn metadata_label(key: MetadataKey) -> String {
    match key {
        MetadataKey::FocalLength35mm => "35mm Equiv".to_string(),
        MetadataKey::ShutterSpeed => "Shutter".to_string(),
        MetadataKey::MeteringMode => "Metering".to_string(),
        MetadataKey::ExposureCompensation => "Exposure Comp".to_string(),
        _ => key
            .as_str()
            .split('_')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display value for a metadata entry (`f/2.8`, `ISO 400`, `+0.7 EV`).
pub fn format_metadata_value(key: MetadataKey, value: &MetadataValue) -> String {
    match key {
        MetadataKey::Aperture => format!("f/{value}"),
        MetadataKey::Iso => format!("ISO {value}"),
        MetadataKey::ExposureCompensation => {
            let number = match value {
                MetadataValue::Number(n) => Some(*n),
                MetadataValue::Text(s) => s.trim().parse::<f64>().ok(),
                MetadataValue::Bool(_) => None,
            };
            match number {
                Some(n) if n > 0.0 => format!("+{n} EV"),
                Some(n) => format!("{n} EV"),
                None => format!("{value} EV"),
            }
        }
        _ => value.to_string(),
    }
}

/// Date portion of an ISO-8601 timestamp; other strings pass through.
fn format_date(date: &str) -> &str {
    date.split('T').next().unwrap_or(date)
}

fn photo_detail_lines(photo: &Photo, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let mut lines = Vec::new();

    let mut geometry = format!("{}{} × {}", pad, photo.width, photo.height);
    if let Some(size) = photo.size {
        geometry.push_str(&format!(" • {}", format_size(size)));
    }
    lines.push(geometry);

    let category = photo.category();
    match &photo.mime_type {
        Some(mime) => lines.push(format!("{}Type: {} ({})", pad, category.label(), mime)),
        None => lines.push(format!("{}Type: {}", pad, category.label())),
    }
    if let Some(date) = &photo.capture_date {
        lines.push(format!("{}Captured: {}", pad, format_date(date)));
    }
    for (key, value) in &photo.metadata {
        lines.push(format!(
            "{}{}: {}",
            pad,
            metadata_label(*key),
            format_metadata_value(*key, value)
        ));
    }
    lines
}

/// Write lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// summary
// ============================================================================

/// Load statistics, type breakdown and metadata facets.
pub fn format_summary(photos: &[Photo], stats: &LoadStats) -> Vec<String> {
    let mut lines = vec!["Index".to_string(), format!("{}{}", indent(1), stats)];

    let counts = filter::category_counts(photos);
    if !counts.is_empty() {
        lines.push(String::new());
        lines.push("Types".to_string());
        for category in FileCategory::ALL {
            if let Some(n) = counts.get(&category) {
                lines.push(format!("{}{}: {}", indent(1), category.label(), n));
            }
        }
    }

    let keys = filter::available_metadata_keys(photos);
    if !keys.is_empty() {
        lines.push(String::new());
        lines.push("Metadata".to_string());
        for key in keys {
            let values = filter::metadata_values(photos, key);
            lines.push(format!("{}{}: {}", indent(1), key, values.join(", ")));
        }
    }

    lines
}

// ============================================================================
// filter
// ============================================================================

/// Matching photos followed by a "Showing N of M" footer.
pub fn format_filter(outcome: &FilterOutcome<'_>, total: usize, spec: &FilterSpec) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, photo) in outcome.photos.iter().enumerate() {
        lines.push(photo_header(i + 1, photo));
        lines.extend(photo_detail_lines(photo, 1));
    }
    if outcome.photos.is_empty() && total > 0 {
        lines.push("No photos match your filters.".to_string());
    }
    lines.push(String::new());
    lines.push(format!(
        "Showing {} of {} photos",
        outcome.photos.len(),
        total
    ));
    if outcome.active > 0 {
        lines.push(format!("Filters active ({}): {}", outcome.active, spec));
    }
    lines
}

// ============================================================================
// layout
// ============================================================================

/// Columns with their placed photos and heights.
pub fn format_layout(layout: &MasonryLayout<'_>) -> Vec<String> {
    let mut lines = vec![format!(
        "{} columns × {}px, gap {}px",
        layout.column_count, layout.column_width, layout.gap
    )];
    for (i, column) in layout.columns.iter().enumerate() {
        lines.push(format!("Column {} ({}px)", i + 1, column.height));
        for item in &column.items {
            lines.push(format!(
                "{}{} ({}px)",
                indent(1),
                photo_header(item.index + 1, item.photo),
                item.height
            ));
        }
    }
    lines
}

// ============================================================================
// preview
// ============================================================================

/// The current preview photo with its resources, or a closed notice.
pub fn format_preview(state: &PreviewState, config: &GalleryConfig) -> Vec<String> {
    let Some(photo) = state.current().filter(|_| state.is_open()) else {
        return vec!["Preview closed".to_string()];
    };
    let (position, total) = state.position();

    let mut lines = vec![
        photo.filename.clone(),
        format!("{}{} of {}", indent(1), position, total),
    ];
    lines.extend(photo_detail_lines(photo, 1));
    if !photo.url.is_empty() {
        lines.push(format!(
            "{}Preview: {}",
            indent(1),
            photo.preview_url(&config.preview.suffix)
        ));
        lines.push(format!("{}Download: {}", indent(1), photo.download_url()));
    }
    lines.push(format!(
        "{}Thumbnail: {}",
        indent(1),
        photo.thumbnail_source(&config.thumbnails.mime_type)
    ));
    lines
}
