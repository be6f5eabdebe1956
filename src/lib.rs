//! # Photo Portfolio
//!
//! Load, filter and lay out a photo gallery described by a JSON Lines index.
//! Each line of the index describes one photo: its path, dimensions, an
//! optional inline thumbnail, and capture metadata.
//!
//! # Pipeline
//!
//! ```text
//! Source ──► IndexLoader ──► Vec<Photo> ──► filter ──► masonry::layout ──► columns
//!                                              │
//!                                              └──► PreviewState (snapshot + index)
//! ```
//!
//! Every stage after loading is a pure function from an input snapshot to a
//! new output snapshot, recomputed in full whenever its inputs change.
//! Expected galleries are tens to low thousands of photos, so there is no
//! incremental diffing anywhere.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Photo`, `MetadataKey`, `MetadataValue` |
//! | [`file_type`] | MIME type → `FileCategory` (RAW formats checked first) |
//! | [`normalize`] | One raw JSON record → `Photo`, or a rejection |
//! | [`loader`] | `Source` transports and the load-once `IndexLoader` |
//! | [`filter`] | `FilterSpec`, facets, and the observable `FilterState` |
//! | [`masonry`] | Shortest-column-first masonry packing |
//! | [`preview`] | Clamped preview navigation, key bindings, swipe detection |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Owned Loader, No Global Cache
//!
//! The load-once cache lives in an [`loader::IndexLoader`] value that the
//! caller owns and can [`reset`](loader::IndexLoader::reset). Two galleries
//! in one process are simply two loaders.
//!
//! ## Per-Line Tolerance
//!
//! A bad line never fails a load. Unparseable JSON and records with nothing
//! to display are logged through `tracing` and skipped; only a transport
//! failure is fatal.
//!
//! ## Stable Tie-Break
//!
//! When several masonry columns share the minimum height, the leftmost one
//! wins. Equal-height photos therefore fill columns round-robin and a
//! re-layout of the same input is visually identical.

pub mod config;
pub mod file_type;
pub mod filter;
pub mod loader;
pub mod masonry;
pub mod normalize;
pub mod output;
pub mod preview;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
