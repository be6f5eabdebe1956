//! Masonry layout: greedy shortest-column-first packing.
//!
//! All functions here are pure. The layout is recomputed from scratch
//! whenever the photos, column width, container width or gap change.
//!
//! ```text
//! columns      = max(1, floor((container + gap) / (column_width + gap)))
//! item height  = round(column_width / (width / height))
//! placement    = leftmost column with the smallest accumulated height
//! accumulate   = item height + gap
//! ```
//!
//! Ties resolve to the first (leftmost) minimum, so equal-height items fill
//! columns round-robin. This keeps re-layouts visually reproducible.
//!
//! Heights saturate at `u32::MAX` instead of overflowing. At most one column
//! per photo is materialized; the columns beyond that could never receive an
//! item, so a very wide container costs nothing.

use crate::types::Photo;

/// Gap between items and columns, in pixels.
pub const DEFAULT_GAP: u32 = 16;

/// `(container width upper bound, column width)` pairs used below the
/// widest breakpoint, ordered ascending.
pub const DEFAULT_BREAKPOINTS: [(u32, u32); 3] = [(640, 150), (768, 200), (1024, 250)];

/// Column width once the container is at least as wide as the last breakpoint.
pub const DEFAULT_MAX_COLUMN_WIDTH: u32 = 300;

/// A photo placed into a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPhoto<'a> {
    /// Position of the photo in the sequence given to [`layout`]. Use this
    /// to open the preview on the clicked photo.
    pub index: usize,
    pub photo: &'a Photo,
    /// Rendered height at the layout's column width.
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasonryColumn<'a> {
    pub items: Vec<PlacedPhoto<'a>>,
    /// Sum of item heights plus one gap per item.
    pub height: u32,
}

impl<'a> MasonryColumn<'a> {
    pub fn photos(&self) -> impl Iterator<Item = &'a Photo> + '_ {
        self.items.iter().map(|item| item.photo)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasonryLayout<'a> {
    /// Columns that fit in the container. `columns` holds at most this many,
    /// and never more than there are photos.
    pub column_count: usize,
    pub column_width: u32,
    pub gap: u32,
    /// Empty when there were no photos to place.
    pub columns: Vec<MasonryColumn<'a>>,
}

impl MasonryLayout<'_> {
    /// Height of the tallest column.
    pub fn height(&self) -> u32 {
        self.columns.iter().map(|c| c.height).max().unwrap_or(0)
    }
}

/// Number of columns that fit in the container.
pub fn column_count(container_width: f64, column_width: u32, gap: u32) -> usize {
    if container_width.is_nan() || container_width <= 0.0 {
        return 1;
    }
    let pitch = column_width as f64 + gap as f64;
    if pitch <= 0.0 {
        return 1;
    }
    let fitted = ((container_width + gap as f64) / pitch).floor();
    (fitted as usize).max(1)
}

/// Rendered height of a photo scaled to `column_width`, saturating at
/// `u32::MAX` for extreme aspect ratios.
pub fn display_height(photo: &Photo, column_width: u32) -> u32 {
    (column_width as f64 / photo.aspect_ratio()).round() as u32
}

/// Responsive column width for a container.
///
/// `breakpoints` is a list of `(upper bound, column width)` pairs in
/// ascending order; the first bound the container is narrower than wins,
/// and `max_column_width` applies beyond the last one.
pub fn column_width_for(
    container_width: f64,
    breakpoints: &[(u32, u32)],
    max_column_width: u32,
) -> u32 {
    breakpoints
        .iter()
        .find(|(bound, _)| container_width < *bound as f64)
        .map(|(_, width)| *width)
        .unwrap_or(max_column_width)
}

/// Pack `photos` into columns.
pub fn layout(
    photos: &[Photo],
    column_width: u32,
    container_width: f64,
    gap: u32,
) -> MasonryLayout<'_> {
    let column_count = column_count(container_width, column_width, gap);
    let mut columns: Vec<MasonryColumn<'_>> = Vec::new();

    if !photos.is_empty() {
        columns.resize_with(column_count.min(photos.len()), MasonryColumn::default);
        for (index, photo) in photos.iter().enumerate() {
            let height = display_height(photo, column_width);
            let shortest = shortest_column(&columns);
            let column = &mut columns[shortest];
            column.items.push(PlacedPhoto {
                index,
                photo,
                height,
            });
            column.height = column.height.saturating_add(height).saturating_add(gap);
        }
    }

    MasonryLayout {
        column_count,
        column_width,
        gap,
        columns,
    }
}

/// Index of the first column with the minimum height.
fn shortest_column(columns: &[MasonryColumn<'_>]) -> usize {
    let mut shortest = 0;
    for (i, column) in columns.iter().enumerate() {
        if column.height < columns[shortest].height {
            shortest = i;
        }
    }
    shortest
}
