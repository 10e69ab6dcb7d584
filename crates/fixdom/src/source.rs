//! Where fixture text comes from.
//!
//! [`Fixtures`](crate::Fixtures) asks a [`FixtureSource`] for the text at a
//! resolved URL (`<fixtures_path>/<name>`). Sources are synchronous: a load
//! blocks until the text is available.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::result::{FixdomError, FixdomResult};

/// Synchronous fetch of fixture text by resolved URL.
pub trait FixtureSource {
    /// Fetch the full text at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::FetchFailed`] when the resource is unavailable.
    fn fetch(&self, url: &str) -> FixdomResult<String>;
}

impl<F> FixtureSource for F
where
    F: Fn(&str) -> FixdomResult<String>,
{
    fn fetch(&self, url: &str) -> FixdomResult<String> {
        self(url)
    }
}

/// Reads fixtures from the filesystem, relative URLs resolved under `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Source rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, url: &str) -> PathBuf {
        let path = Path::new(url);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FixtureSource for FileSource {
    fn fetch(&self, url: &str) -> FixdomResult<String> {
        let path = self.path_for(url);
        debug!(path = %path.display(), "reading fixture file");
        std::fs::read_to_string(&path)
            .map_err(|e| FixdomError::fetch_failed(url, format!("{}: {e}", path.display())))
    }
}

/// Fixtures held in memory, keyed by resolved URL.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    fixtures: HashMap<String, String>,
    fallback: Option<String>,
}

impl MemorySource {
    /// Empty source; every fetch fails
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source that answers every URL with `html`
    #[must_use]
    pub fn answering(html: impl Into<String>) -> Self {
        Self {
            fixtures: HashMap::new(),
            fallback: Some(html.into()),
        }
    }

    /// Add a fixture at `url`
    #[must_use]
    pub fn with_fixture(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(url, html);
        self
    }

    /// Add or replace a fixture at `url`
    pub fn insert(&mut self, url: impl Into<String>, html: impl Into<String>) {
        let _ = self.fixtures.insert(url.into(), html.into());
    }
}

impl FixtureSource for MemorySource {
    fn fetch(&self, url: &str) -> FixdomResult<String> {
        self.fixtures
            .get(url)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| FixdomError::fetch_failed(url, "no such fixture"))
    }
}

/// Fetches fixtures with blocking HTTP GETs against `base_url`.
#[cfg(feature = "http")]
pub struct HttpSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    /// Source resolving URLs against `base_url`
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> FixdomResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| FixdomError::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

/// `url` appended to `base_url` with exactly one `/`; absolute URLs pass through.
#[cfg_attr(not(feature = "http"), allow(dead_code))]
fn join_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

#[cfg(feature = "http")]
impl fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSource")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "http")]
impl FixtureSource for HttpSource {
    fn fetch(&self, url: &str) -> FixdomResult<String> {
        let full = join_url(&self.base_url, url);
        debug!(url = %full, "fetching fixture over HTTP");
        let response = self
            .client
            .get(&full)
            .send()
            .map_err(|e| FixdomError::fetch_failed(url, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FixdomError::fetch_failed(url, format!("HTTP {status}")));
        }
        response
            .text()
            .map_err(|e| FixdomError::fetch_failed(url, e.to_string()))
    }
}

/// Boxed source with a printable description, for logs and `Debug` output.
pub(crate) struct SourceSlot {
    pub(crate) label: String,
    pub(crate) source: Box<dyn FixtureSource>,
}

impl fmt::Debug for SourceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    mod file_source_tests {
        use super::*;

        #[test]
        fn test_reads_relative_to_root() {
            let dir = TempDir::new().unwrap();
            std::fs::create_dir_all(dir.path().join("spec/fixtures")).unwrap();
            std::fs::write(dir.path().join("spec/fixtures/a.html"), "<p>a</p>").unwrap();
            let source = FileSource::new(dir.path());
            assert_eq!(source.fetch("spec/fixtures/a.html").unwrap(), "<p>a</p>");
        }

        #[test]
        fn test_missing_file_is_fetch_failure() {
            let dir = TempDir::new().unwrap();
            let err = FileSource::new(dir.path()).fetch("nope.html").unwrap_err();
            assert!(err.is_fetch_failure());
            assert!(err.to_string().contains("nope.html"));
        }
    }

    mod memory_source_tests {
        use super::*;

        #[test]
        fn test_keyed_lookup() {
            let source = MemorySource::new().with_fixture("f/a.html", "A");
            assert_eq!(source.fetch("f/a.html").unwrap(), "A");
            assert!(source.fetch("f/b.html").is_err());
        }

        #[test]
        fn test_answering_fallback() {
            let source = MemorySource::answering("<div>any</div>").with_fixture("x", "X");
            assert_eq!(source.fetch("x").unwrap(), "X");
            assert_eq!(source.fetch("whatever").unwrap(), "<div>any</div>");
        }

        #[test]
        fn test_closure_source() {
            let source = |url: &str| -> FixdomResult<String> { Ok(format!("<b>{url}</b>")) };
            assert_eq!(source.fetch("u").unwrap(), "<b>u</b>");
        }
    }

    mod http_source_tests {
        use super::*;

        #[test]
        fn test_join_url_single_slash() {
            assert_eq!(join_url("http://h/base", "f/a.html"), "http://h/base/f/a.html");
            assert_eq!(join_url("http://h/base/", "/f/a.html"), "http://h/base/f/a.html");
            assert_eq!(join_url("http://h", "https://other/x"), "https://other/x");
        }

        /// Serves one canned response per accepted connection.
        #[cfg(feature = "http")]
        fn serve(responses: Vec<&'static str>) -> String {
            use std::io::{Read, Write};
            use std::net::TcpListener;

            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            std::thread::spawn(move || {
                for response in responses {
                    let (mut stream, _) = listener.accept().unwrap();
                    let mut buf = [0u8; 2048];
                    let _ = stream.read(&mut buf).unwrap();
                    stream.write_all(response.as_bytes()).unwrap();
                }
            });
            format!("http://{addr}")
        }

        #[cfg(feature = "http")]
        #[test]
        fn test_http_status_handling() {
            let base = serve(vec![
                "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\n<p/>\n",
                "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            ]);
            let source = HttpSource::new(base).unwrap();
            assert_eq!(source.fetch("spec/a.html").unwrap(), "<p/>\n");
            let err = source.fetch("spec/missing.html").unwrap_err();
            assert!(err.is_fetch_failure());
            assert!(err.to_string().contains("404"));
        }
    }
}
