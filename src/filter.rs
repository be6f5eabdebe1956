//! Client-side filtering of the loaded photo list.
//!
//! A [`FilterSpec`] combines up to three constraint categories:
//!
//! | Category  | Active when                          | Passes when                                   |
//! |-----------|--------------------------------------|-----------------------------------------------|
//! | text      | search term non-empty                | term ⊂ filename or any metadata value (any case) |
//! | file type | `category` is `Some`                 | photo's [`FileCategory`] matches              |
//! | metadata  | any constraint value non-empty       | every non-empty constraint equals the stringified value |
//!
//! Filtering is a linear scan recomputed from scratch on every change and
//! always preserves input order.
//!
//! [`FilterState`] owns a spec and tells subscribers whenever it changes,
//! so a toolbar can clear filters through an explicit handle rather than a
//! broadcast event.

use crate::file_type::FileCategory;
use crate::types::{MetadataKey, Photo};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The user's active constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Case-insensitive substring; empty means unconstrained.
    pub search: String,
    /// Required stringified values; an empty value means unconstrained.
    pub metadata: BTreeMap<MetadataKey, String>,
    pub category: Option<FileCategory>,
}

impl FilterSpec {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn with_metadata(mut self, key: MetadataKey, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value.into());
        self
    }

    pub fn with_category(mut self, category: FileCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Number of active constraint categories (0–3).
    pub fn active_count(&self) -> usize {
        let text = !self.search.is_empty();
        let category = self.category.is_some();
        let metadata = self.metadata.values().any(|v| !v.is_empty());
        [text, category, metadata].into_iter().filter(|&b| b).count()
    }

    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }

    /// Whether a single photo passes every active constraint.
    pub fn matches(&self, photo: &Photo) -> bool {
        self.matches_search(photo) && self.matches_category(photo) && self.matches_metadata(photo)
    }

    fn matches_search(&self, photo: &Photo) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        photo.filename.to_lowercase().contains(&needle)
            || photo
                .metadata
                .values()
                .any(|v| v.to_string().to_lowercase().contains(&needle))
    }

    fn matches_category(&self, photo: &Photo) -> bool {
        self.category.is_none_or(|c| photo.category() == c)
    }

    fn matches_metadata(&self, photo: &Photo) -> bool {
        self.metadata
            .iter()
            .filter(|(_, required)| !required.is_empty())
            .all(|(key, required)| {
                photo
                    .metadata_value(*key)
                    .is_some_and(|v| v.to_string() == *required)
            })
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.search.is_empty() {
            parts.push(format!("search \"{}\"", self.search));
        }
        if let Some(category) = self.category {
            parts.push(format!("type {category}"));
        }
        for (key, value) in self.metadata.iter().filter(|(_, v)| !v.is_empty()) {
            parts.push(format!("{key} = {value}"));
        }
        if parts.is_empty() {
            f.write_str("no filters")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// Result of a filter pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome<'a> {
    pub photos: Vec<&'a Photo>,
    pub active: usize,
}

/// Select the photos matching `spec`, in input order.
pub fn filter<'a>(photos: &'a [Photo], spec: &FilterSpec) -> FilterOutcome<'a> {
    FilterOutcome {
        photos: photos.iter().filter(|p| spec.matches(p)).collect(),
        active: spec.active_count(),
    }
}

// ============================================================================
// Facets
// ============================================================================

/// Metadata keys present on at least one photo, sorted by key name.
pub fn available_metadata_keys(photos: &[Photo]) -> Vec<MetadataKey> {
    let mut keys: Vec<MetadataKey> = photos
        .iter()
        .flat_map(|p| p.metadata.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    keys.sort_by_key(|k| k.as_str());
    keys
}

/// Distinct stringified values of `key` across all photos, sorted.
pub fn metadata_values(photos: &[Photo], key: MetadataKey) -> Vec<String> {
    photos
        .iter()
        .filter_map(|p| p.metadata_value(key))
        .map(ToString::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of photos per file-type category. Categories with no photos are
/// omitted.
pub fn category_counts(photos: &[Photo]) -> BTreeMap<FileCategory, usize> {
    let mut counts = BTreeMap::new();
    for photo in photos {
        *counts.entry(photo.category()).or_insert(0) += 1;
    }
    counts
}

// ============================================================================
// Observable filter state
// ============================================================================

type Subscriber = Box<dyn FnMut(&FilterSpec)>;

/// Owned filter state with change notification.
///
/// Every setter that actually changes the spec notifies all subscribers
/// with the new spec. Setting a value to what it already is does nothing.
#[derive(Default)]
pub struct FilterState {
    spec: FilterSpec,
    subscribers: Vec<Subscriber>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn is_active(&self) -> bool {
        self.spec.is_active()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&FilterSpec) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if self.spec.search != term {
            self.spec.search = term;
            self.notify();
        }
    }

    /// Constrain `key` to `value`; an empty value removes the constraint.
    pub fn set_metadata(&mut self, key: MetadataKey, value: impl Into<String>) {
        let value = value.into();
        let changed = if value.is_empty() {
            self.spec.metadata.remove(&key).is_some_and(|old| !old.is_empty())
        } else {
            self.spec.metadata.insert(key, value.clone()).as_ref() != Some(&value)
        };
        if changed {
            self.notify();
        }
    }

    pub fn set_category(&mut self, category: Option<FileCategory>) {
        if self.spec.category != category {
            self.spec.category = category;
            self.notify();
        }
    }

    /// Reset to the default spec. Notifies only if the spec differed from it.
    pub fn clear(&mut self) {
        if self.spec != FilterSpec::default() {
            self.spec = FilterSpec::default();
            self.notify();
        }
    }

    pub fn apply<'a>(&self, photos: &'a [Photo]) -> FilterOutcome<'a> {
        filter(photos, &self.spec)
    }

    fn notify(&mut self) {
        for subscriber in &mut self.subscribers {
            subscriber(&self.spec);
        }
    }
}

impl fmt::Debug for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterState")
            .field("spec", &self.spec)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
