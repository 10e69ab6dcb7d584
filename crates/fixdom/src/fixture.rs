//! Fixture cache and container management.
//!
//! [`Fixtures`] maps resolved fixture URLs to fetched HTML and owns one
//! container element in a [`Document`], found by id. Loading a fixture
//! replaces the container's content; cleaning up removes the container.
//!
//! ```
//! use fixdom::{Document, Fixtures, MemorySource};
//!
//! let source = MemorySource::new()
//!     .with_fixture("spec/javascripts/fixtures/list.html", "<ul><li>one</li></ul>");
//! let mut fixtures = Fixtures::new().with_source(source);
//! let mut doc = Document::new();
//!
//! let container = fixtures.load(&mut doc, ["list.html"]).unwrap();
//! assert_eq!(doc.inner_html(container), "<ul><li>one</li></ul>");
//!
//! fixtures.clean_up(&mut doc);
//! assert!(doc.element_by_id("jasmine-fixtures").is_none());
//! ```

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace, warn};

use crate::config::{FetchErrorPolicy, FixtureConfig};
use crate::dom::{Document, NodeId, Selection};
use crate::result::FixdomResult;
use crate::source::{FileSource, FixtureSource, SourceSlot};

/// Default base path for fixture names
pub const DEFAULT_FIXTURES_PATH: &str = "spec/javascripts/fixtures";
/// Default id of the fixture container
pub const DEFAULT_CONTAINER_ID: &str = "jasmine-fixtures";
/// Default id of a sandbox element
pub const DEFAULT_SANDBOX_ID: &str = "sandbox";

/// Content accepted by [`Fixtures::set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureContent {
    /// Markup parsed into the container
    Html(String),
    /// Existing nodes moved into the container with their live state
    Nodes(Vec<NodeId>),
}

impl From<&str> for FixtureContent {
    fn from(html: &str) -> Self {
        Self::Html(html.to_string())
    }
}

impl From<String> for FixtureContent {
    fn from(html: String) -> Self {
        Self::Html(html)
    }
}

impl From<NodeId> for FixtureContent {
    fn from(node: NodeId) -> Self {
        Self::Nodes(vec![node])
    }
}

impl From<Vec<NodeId>> for FixtureContent {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Nodes(nodes)
    }
}

impl From<Selection> for FixtureContent {
    fn from(selection: Selection) -> Self {
        Self::Nodes(selection.into_iter().collect())
    }
}

/// Cache of fetched fixtures plus the container they are loaded into.
#[derive(Debug)]
pub struct Fixtures {
    /// Base path prefixed to fixture names
    pub fixtures_path: String,
    /// Id of the container element
    pub container_id: String,
    fetch_errors: FetchErrorPolicy,
    cache: HashMap<String, String>,
    source: SourceSlot,
    fetch_count: usize,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixtures {
    /// Cache with default paths, reading files relative to the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fixtures_path: DEFAULT_FIXTURES_PATH.to_string(),
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            fetch_errors: FetchErrorPolicy::Raise,
            cache: HashMap::new(),
            source: SourceSlot {
                label: "file:.".to_string(),
                source: Box::new(FileSource::default()),
            },
            fetch_count: 0,
        }
    }

    /// Cache built from configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configured source cannot be built.
    pub fn from_config(config: &FixtureConfig) -> FixdomResult<Self> {
        config.validate()?;
        Ok(Self {
            fixtures_path: config.fixtures_path.clone(),
            container_id: config.container_id.clone(),
            fetch_errors: config.fetch_errors,
            cache: HashMap::new(),
            source: SourceSlot {
                label: config.source_label(),
                source: config.build_source()?,
            },
            fetch_count: 0,
        })
    }

    /// Replace the fetch primitive. The cache is kept.
    #[must_use]
    pub fn with_source<S: FixtureSource + 'static>(mut self, source: S) -> Self {
        self.source = SourceSlot {
            label: std::any::type_name::<S>().to_string(),
            source: Box::new(source),
        };
        self
    }

    /// Set the base path
    #[must_use]
    pub fn with_fixtures_path(mut self, path: impl Into<String>) -> Self {
        self.fixtures_path = path.into();
        self
    }

    /// Set the container id
    #[must_use]
    pub fn with_container_id(mut self, id: impl Into<String>) -> Self {
        self.container_id = id.into();
        self
    }

    /// Set the fetch error policy
    #[must_use]
    pub fn with_fetch_errors(mut self, policy: FetchErrorPolicy) -> Self {
        self.fetch_errors = policy;
        self
    }

    /// Current fetch error policy
    #[must_use]
    pub const fn fetch_errors(&self) -> FetchErrorPolicy {
        self.fetch_errors
    }

    /// Number of fetches made against the source so far.
    #[must_use]
    pub const fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    /// Cached URLs, sorted.
    #[must_use]
    pub fn cached_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.cache.keys().cloned().collect();
        urls.sort();
        urls
    }

    /// Whether `url` (unresolved) is cached.
    #[must_use]
    pub fn is_cached(&self, url: &str) -> bool {
        self.cache.contains_key(&self.resolve_url(url))
    }

    /// Empty the cache. Later reads fetch again.
    pub fn clear_cache(&mut self) {
        debug!(entries = self.cache.len(), "clearing fixture cache");
        self.cache.clear();
    }

    /// `fixtures_path` joined with `url`, adding `/` only when needed.
    #[must_use]
    pub fn resolve_url(&self, url: &str) -> String {
        if self.fixtures_path.ends_with('/') {
            format!("{}{url}", self.fixtures_path)
        } else {
            format!("{}/{url}", self.fixtures_path)
        }
    }

    /// `failed` holds URLs whose fetch was suppressed earlier in the same
    /// call; they are not fetched again until the next call.
    fn fetch_or_cached(
        &mut self,
        url: &str,
        failed: &mut HashSet<String>,
    ) -> FixdomResult<String> {
        let resolved = self.resolve_url(url);
        if let Some(html) = self.cache.get(&resolved) {
            trace!(url = %resolved, "fixture cache hit");
            return Ok(html.clone());
        }
        if failed.contains(&resolved) {
            return Ok(String::new());
        }

        debug!(url = %resolved, source = %self.source.label, "fixture cache miss");
        self.fetch_count += 1;
        match self.source.source.fetch(&resolved) {
            Ok(html) => {
                let _ = self.cache.insert(resolved, html.clone());
                Ok(html)
            }
            Err(err) if self.fetch_errors == FetchErrorPolicy::Suppress => {
                warn!(url = %resolved, error = %err, "fixture fetch failed; using empty content");
                let _ = failed.insert(resolved);
                Ok(String::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Concatenated content of every URL, in order. Repeats repeat content.
    ///
    /// # Errors
    ///
    /// Returns the first fetch failure under [`FetchErrorPolicy::Raise`].
    pub fn read<I, S>(&mut self, urls: I) -> FixdomResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut failed = HashSet::new();
        let mut html = String::new();
        for url in urls {
            html.push_str(&self.fetch_or_cached(url.as_ref(), &mut failed)?);
        }
        Ok(html)
    }

    /// Fill the cache for every URL without returning content.
    ///
    /// # Errors
    ///
    /// Returns the first fetch failure under [`FetchErrorPolicy::Raise`].
    pub fn preload<I, S>(&mut self, urls: I) -> FixdomResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut failed = HashSet::new();
        for url in urls {
            let _ = self.fetch_or_cached(url.as_ref(), &mut failed)?;
        }
        Ok(())
    }

    /// Replace the container's content with [`Fixtures::read`] of `urls`.
    ///
    /// Returns the container. Inserted scripts run after insertion.
    ///
    /// # Errors
    ///
    /// Fetch failures (under `Raise`) leave the document untouched; script
    /// failures propagate after insertion.
    pub fn load<I, S>(&mut self, document: &mut Document, urls: I) -> FixdomResult<NodeId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let html = self.read(urls)?;
        let container = self.prepare_container(document)?;
        let _ = document.append_html(container, &html)?;
        Ok(container)
    }

    /// Replace the container's content with markup or existing nodes.
    ///
    /// Returns the container.
    ///
    /// # Errors
    ///
    /// Fails when a node cannot be moved into the container or a script fails.
    pub fn set(
        &mut self,
        document: &mut Document,
        content: impl Into<FixtureContent>,
    ) -> FixdomResult<NodeId> {
        let content = content.into();
        let container = self.prepare_container(document)?;
        match content {
            FixtureContent::Html(html) => {
                let _ = document.append_html(container, &html)?;
            }
            FixtureContent::Nodes(nodes) => document.append_nodes(container, &nodes)?,
        }
        Ok(container)
    }

    /// A new detached `<div id="sandbox">`.
    pub fn sandbox(&self, document: &mut Document) -> NodeId {
        self.sandbox_with(document, &[])
    }

    /// A new detached `<div id="sandbox">` with `attributes` applied in order.
    /// An `id` among them replaces the default.
    pub fn sandbox_with(&self, document: &mut Document, attributes: &[(&str, &str)]) -> NodeId {
        let sandbox = document.create_element("div");
        document.set_attr(sandbox, "id", DEFAULT_SANDBOX_ID);
        for (name, value) in attributes {
            document.set_attr(sandbox, name, value);
        }
        sandbox
    }

    /// The container, if present in the document.
    #[must_use]
    pub fn container(&self, document: &Document) -> Option<NodeId> {
        document.element_by_id(&self.container_id)
    }

    /// Remove the container from the document.
    pub fn clean_up(&self, document: &mut Document) {
        if let Some(container) = self.container(document) {
            debug!(container_id = %self.container_id, "removing fixture container");
            document.detach(container);
        }
    }

    fn prepare_container(&self, document: &mut Document) -> FixdomResult<NodeId> {
        if let Some(container) = self.container(document) {
            document.remove_children(container);
            return Ok(container);
        }
        let container = document.create_element("div");
        document.set_attr(container, "id", &self.container_id);
        let body = document.body();
        document.append_child(body, container)?;
        Ok(container)
    }
}
