//! Index loading: fetch a JSON Lines resource and normalize every record.
//!
//! ## Transport
//!
//! Retrieval goes through the [`Source`] trait so the loader never cares
//! whether the index lives on disk or behind HTTP. [`AutoSource`] picks
//! [`HttpSource`] for `http://` / `https://` locators and [`FileSource`]
//! for everything else. A transport failure is the only fatal error: it is
//! returned to the caller as-is, with no retry and no partial result.
//!
//! ## Per-line tolerance
//!
//! ```text
//! blank / whitespace-only line  → skipped silently
//! invalid JSON                  → warned, skipped
//! normalizer rejection          → warned, skipped
//! ```
//!
//! None of these abort the load. [`LoadStats`] records how many lines fell
//! into each bucket.
//!
//! ## Caching
//!
//! [`IndexLoader`] is an owned value, not a global. Once a load succeeds,
//! further calls to [`IndexLoader::load`] return the cached list without
//! touching the source until [`IndexLoader::reset`] is called. Each gallery
//! that needs its own data simply owns its own loader.

use crate::normalize::{self, RecordError};
use crate::types::Photo;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to fetch {locator}: {status} {reason}")]
    Status {
        locator: String,
        status: u16,
        reason: String,
    },
}

/// Something that can turn a resource locator into the index text.
pub trait Source {
    fn fetch(&self, locator: &str) -> Result<String, FetchError>;
}

/// Reads the index from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileSource;

impl Source for FileSource {
    fn fetch(&self, locator: &str) -> Result<String, FetchError> {
        let path = PathBuf::from(locator);
        std::fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source })
    }
}

/// Fetches the index over HTTP(S) with a blocking client.
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    /// Use a preconfigured client (user agent, timeouts, proxy settings).
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Source for HttpSource {
    fn fetch(&self, locator: &str) -> Result<String, FetchError> {
        let response = self.client.get(locator).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                locator: locator.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        Ok(response.text()?)
    }
}

/// Dispatches on the locator's scheme.
#[derive(Debug, Clone, Default)]
pub struct AutoSource {
    file: FileSource,
    http: HttpSource,
}

impl AutoSource {
    pub fn new(http: HttpSource) -> Self {
        Self {
            file: FileSource,
            http,
        }
    }
}

impl Source for AutoSource {
    fn fetch(&self, locator: &str) -> Result<String, FetchError> {
        if is_remote(locator) {
            self.http.fetch(locator)
        } else {
            self.file.fetch(locator)
        }
    }
}

/// True for `http://` and `https://` locators (scheme is case-insensitive).
pub fn is_remote(locator: &str) -> bool {
    let lower = locator.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Line accounting for a single load.
///
/// `loaded == lines - blank - parse_failures - rejected` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub lines: usize,
    pub blank: usize,
    pub parse_failures: usize,
    pub rejected: usize,
    pub loaded: usize,
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} loaded from {} lines ({} blank, {} unparseable, {} rejected)",
            self.loaded, self.lines, self.blank, self.parse_failures, self.rejected
        )
    }
}

/// Parse the full text of a JSON Lines index.
///
/// Records are numbered by their position among non-blank lines; warnings
/// report the 1-based line number in the body.
pub fn parse_index(body: &str) -> (Vec<Photo>, LoadStats) {
    let mut stats = LoadStats::default();
    let mut photos = Vec::new();
    let mut record_index = 0;

    for (line_no, line) in body.lines().enumerate().map(|(i, l)| (i + 1, l)) {
        stats.lines += 1;
        if line.trim().is_empty() {
            stats.blank += 1;
            continue;
        }
        let index = record_index;
        record_index += 1;

        let record: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(err) => {
                stats.parse_failures += 1;
                warn!(line = line_no, error = %RecordError::from(err), "skipping index line");
                continue;
            }
        };
        match normalize::normalize(&record, index) {
            Ok(photo) => photos.push(photo),
            Err(err) => {
                stats.rejected += 1;
                warn!(line = line_no, error = %err, "skipping index record");
            }
        }
    }

    stats.loaded = photos.len();
    (photos, stats)
}

/// Owns the loaded photo list and its load-once guard.
#[derive(Debug)]
pub struct IndexLoader<S> {
    source: S,
    photos: Vec<Photo>,
    stats: LoadStats,
    loaded: bool,
}

impl<S: Source> IndexLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            photos: Vec::new(),
            stats: LoadStats::default(),
            loaded: false,
        }
    }

    /// Load the index at `locator`, or return the cached list if a previous
    /// load succeeded. The cache ignores `locator`; call [`reset`](Self::reset)
    /// to load a different index.
    pub fn load(&mut self, locator: &str) -> Result<&[Photo], FetchError> {
        if self.loaded {
            debug!(locator, "index already loaded, returning cached photos");
            return Ok(&self.photos);
        }

        let body = self.source.fetch(locator)?;
        let (photos, stats) = parse_index(&body);
        info!(locator, %stats, "index loaded");

        self.photos = photos;
        self.stats = stats;
        self.loaded = true;
        Ok(&self.photos)
    }

    /// The cached photos; empty until a load succeeds.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Drop the cached list so the next `load` fetches again.
    pub fn reset(&mut self) {
        self.photos.clear();
        self.stats = LoadStats::default();
        self.loaded = false;
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{CountingSource, FailingSource, fixture_index};
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    /// Serve exactly one HTTP response on a loopback port and return the
    /// index URL pointing at it.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/x-ndjson\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        (format!("http://{addr}/index.jsonl"), handle)
    }

    fn loopback_source() -> AutoSource {
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .build()
            .unwrap();
        AutoSource::new(HttpSource::new(client))
    }

    // =========================================================================
    // parse_index()
    // =========================================================================

    #[test]
    fn counts_add_up() {
        let body = concat!(
            "{\"name\":\"a.jpg\",\"path\":\"a.jpg\"}\n",
            "\n",
            "   \t\n",
            "{not json\n",
            "{\"name\":\"orphan\"}\n",
            "{\"name\":\"b.jpg\",\"thumbnail\":\"AAAA\"}\n",
            "[1, 2]\n",
        );
        let (photos, stats) = parse_index(body);
        assert_eq!(
            stats,
            LoadStats {
                lines: 7,
                blank: 2,
                parse_failures: 1,
                rejected: 2,
                loaded: 2,
            }
        );
        assert_eq!(
            stats.loaded,
            stats.lines - stats.blank - stats.parse_failures - stats.rejected
        );
        let names: Vec<&str> = photos.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn record_index_skips_blank_lines() {
        let body = "\n\n{\"path\":\"x.jpg\"}\n\n{\"path\":\"y.jpg\"}\n";
        let (photos, _) = parse_index(body);
        assert_eq!(photos[0].filename, "photo-0");
        assert_eq!(photos[1].filename, "photo-1");
    }

    #[test]
    fn crlf_line_endings_parse() {
        let body = "{\"path\":\"x.jpg\"}\r\n{\"path\":\"y.jpg\"}\r\n";
        let (photos, stats) = parse_index(body);
        assert_eq!(photos.len(), 2);
        assert_eq!(stats.lines, 2);
    }

    #[test]
    fn empty_body_loads_nothing() {
        let (photos, stats) = parse_index("");
        assert!(photos.is_empty());
        assert_eq!(stats, LoadStats::default());
    }

    #[test]
    fn preserves_source_order() {
        let (photos, _) = parse_index(&fixture_index());
        let names: Vec<&str> = photos.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "sunrise.jpg",
                "harbor.jpg",
                "DSC_0042.NEF",
                "portrait.jpg",
                "field-recording.flac",
                "photo-7",
            ]
        );
    }

    // =========================================================================
    // IndexLoader
    // =========================================================================

    #[test]
    fn second_load_returns_cached_list_without_fetching() {
        let mut loader = IndexLoader::new(CountingSource::new(fixture_index()));
        let first = loader.load("index.jsonl").unwrap().as_ptr();
        let second = loader.load("index.jsonl").unwrap().as_ptr();
        assert!(std::ptr::eq(first, second));
        assert_eq!(loader.source().calls(), 1);
    }

    #[test]
    fn cache_ignores_locator_until_reset() {
        let mut loader = IndexLoader::new(CountingSource::new(fixture_index()));
        loader.load("first.jsonl").unwrap();
        loader.load("second.jsonl").unwrap();
        assert_eq!(loader.source().calls(), 1);

        loader.reset();
        assert!(!loader.is_loaded());
        assert!(loader.photos().is_empty());
        assert_eq!(loader.stats(), LoadStats::default());

        loader.load("second.jsonl").unwrap();
        assert_eq!(loader.source().calls(), 2);
    }

    #[test]
    fn fetch_failure_is_surfaced_and_leaves_loader_unloaded() {
        let mut loader = IndexLoader::new(FailingSource);
        let err = loader.load("https://example.com/index.jsonl").unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert!(!loader.is_loaded());
        assert!(loader.photos().is_empty());
    }

    #[test]
    fn stats_reflect_last_load() {
        let mut loader = IndexLoader::new(CountingSource::new(fixture_index()));
        loader.load("index.jsonl").unwrap();
        let stats = loader.stats();
        assert_eq!(stats.loaded, loader.photos().len());
        assert_eq!(stats.parse_failures, 1);
        assert_eq!(stats.rejected, 1);
    }

    // =========================================================================
    // Sources
    // =========================================================================

    #[test]
    fn file_source_reads_local_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.jsonl");
        fs::write(&path, "{\"path\":\"a.jpg\"}\n").unwrap();

        let mut loader = IndexLoader::new(FileSource);
        let photos = loader.load(path.to_str().unwrap()).unwrap();
        assert_eq!(photos.len(), 1);
    }

    #[test]
    fn file_source_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.jsonl");
        let err = FileSource.fetch(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[test]
    fn http_source_loads_remote_index() {
        let (url, server) = serve_once(
            "200 OK",
            "{\"name\":\"dawn.jpg\",\"path\":\"photos/dawn.jpg\",\"iso\":200}\n\n{broken\n",
        );
        let mut loader = IndexLoader::new(loopback_source());
        let photos = loader.load(&url).unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].filename, "dawn.jpg");
        assert_eq!(loader.stats().parse_failures, 1);
        server.join().unwrap();
    }

    #[test]
    fn http_non_success_status_is_status_error() {
        let (url, server) = serve_once("404 Not Found", "");
        let err = loopback_source().fetch(&url).unwrap_err();
        match err {
            FetchError::Status {
                locator,
                status,
                reason,
            } => {
                assert_eq!(locator, url);
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn http_unreachable_host_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = loopback_source()
            .fetch(&format!("http://127.0.0.1:{port}/index.jsonl"))
            .unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }

    #[test]
    fn remote_detection() {
        assert!(is_remote("https://example.com/ztindex.jsonl"));
        assert!(is_remote("HTTP://example.com/ztindex.jsonl"));
        assert!(!is_remote("./ztindex.jsonl"));
        assert!(!is_remote("/srv/photos/ztindex.jsonl"));
        assert!(!is_remote("httpdocs/index.jsonl"));
    }

    #[test]
    fn stats_display() {
        let stats = LoadStats {
            lines: 10,
            blank: 2,
            parse_failures: 1,
            rejected: 1,
            loaded: 6,
        };
        assert_eq!(
            stats.to_string(),
            "6 loaded from 10 lines (2 blank, 1 unparseable, 1 rejected)"
        );
    }
}
