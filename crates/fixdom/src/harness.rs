//! Per-test fixture context.
//!
//! [`FixtureHarness`] bundles a [`Document`] with a [`Fixtures`] cache and
//! offers the familiar fixture helpers (`load_fixtures`, `set_fixtures`,
//! ...) as methods. [`HarnessScope`] resets the document when dropped, so
//! every test starts from a blank DOM while sharing the fixture cache.
//!
//! ```
//! use fixdom::{expect, FixtureHarness, MemorySource};
//!
//! let mut harness = FixtureHarness::new()
//!     .with_source(MemorySource::answering("<p class=\"note\">hi</p>"));
//! {
//!     let mut scope = harness.scope();
//!     scope.load_fixtures(["note.html"]).unwrap();
//!     let note = scope.document.select(".note").unwrap();
//!     expect(&scope.document, &note).to_have_text("hi").unwrap();
//! }
//! assert!(harness.document.select(".note").unwrap().is_empty());
//! assert_eq!(harness.fixtures.fetch_count(), 1);
//! ```

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::config::FixtureConfig;
use crate::dom::{Document, NodeId};
use crate::fixture::{FixtureContent, Fixtures};
use crate::result::FixdomResult;
use crate::source::FixtureSource;

/// A document plus the fixture cache that loads into it.
#[derive(Debug, Default)]
pub struct FixtureHarness {
    /// The document under test
    pub document: Document,
    /// The fixture cache
    pub fixtures: Fixtures,
}

impl FixtureHarness {
    /// Harness with default fixture settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Harness built from configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configured source cannot be built.
    pub fn from_config(config: &FixtureConfig) -> FixdomResult<Self> {
        Ok(Self {
            document: Document::new(),
            fixtures: Fixtures::from_config(config)?,
        })
    }

    /// Replace the fixture source
    #[must_use]
    pub fn with_source<S: FixtureSource + 'static>(mut self, source: S) -> Self {
        self.fixtures = self.fixtures.with_source(source);
        self
    }

    /// See [`Fixtures::read`].
    ///
    /// # Errors
    ///
    /// Returns fetch failures under the `raise` policy.
    pub fn read_fixtures<I, S>(&mut self, urls: I) -> FixdomResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fixtures.read(urls)
    }

    /// See [`Fixtures::preload`].
    ///
    /// # Errors
    ///
    /// Returns fetch failures under the `raise` policy.
    pub fn preload_fixtures<I, S>(&mut self, urls: I) -> FixdomResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fixtures.preload(urls)
    }

    /// See [`Fixtures::load`].
    ///
    /// # Errors
    ///
    /// Returns fetch or script failures.
    pub fn load_fixtures<I, S>(&mut self, urls: I) -> FixdomResult<NodeId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fixtures.load(&mut self.document, urls)
    }

    /// See [`Fixtures::set`].
    ///
    /// # Errors
    ///
    /// Returns insertion or script failures.
    pub fn set_fixtures(&mut self, content: impl Into<FixtureContent>) -> FixdomResult<NodeId> {
        self.fixtures.set(&mut self.document, content)
    }

    /// See [`Fixtures::sandbox`].
    pub fn sandbox(&mut self) -> NodeId {
        self.fixtures.sandbox(&mut self.document)
    }

    /// See [`Fixtures::sandbox_with`].
    pub fn sandbox_with(&mut self, attributes: &[(&str, &str)]) -> NodeId {
        self.fixtures.sandbox_with(&mut self.document, attributes)
    }

    /// See [`Fixtures::clean_up`].
    pub fn clean_up(&mut self) {
        self.fixtures.clean_up(&mut self.document);
    }

    /// Blank the document for the next test. The cache survives.
    ///
    /// Swaps in an empty document (see [`Document::reset`]), so nodes,
    /// focus, event bindings and spy records from the last test are gone
    /// and the arena does not grow across tests.
    pub fn reset(&mut self) {
        debug!(nodes = self.document.node_count(), "resetting fixture harness document");
        self.document.reset();
    }

    /// [`FixtureHarness::reset`] plus emptying the cache.
    pub fn teardown(&mut self) {
        self.reset();
        self.fixtures.clear_cache();
    }

    /// Borrow the harness in a scope that resets it on drop.
    pub fn scope(&mut self) -> HarnessScope<'_> {
        HarnessScope { harness: self }
    }
}

/// Resets its harness when dropped.
#[derive(Debug)]
pub struct HarnessScope<'a> {
    harness: &'a mut FixtureHarness,
}

impl Deref for HarnessScope<'_> {
    type Target = FixtureHarness;

    fn deref(&self) -> &Self::Target {
        self.harness
    }
}

impl DerefMut for HarnessScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.harness
    }
}

impl Drop for HarnessScope<'_> {
    fn drop(&mut self) {
        self.harness.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn harness() -> FixtureHarness {
        FixtureHarness::new().with_source(
            MemorySource::new()
                .with_fixture("spec/javascripts/fixtures/a.html", "<div id=\"a\">A</div>")
                .with_fixture("spec/javascripts/fixtures/b.html", "<div id=\"b\">B</div>"),
        )
    }

    #[test]
    fn test_aliases_forward_to_cache() {
        let mut h = harness();
        assert_eq!(
            h.read_fixtures(["a.html", "b.html"]).unwrap(),
            "<div id=\"a\">A</div><div id=\"b\">B</div>"
        );
        h.preload_fixtures(["a.html"]).unwrap();
        assert_eq!(h.fixtures.fetch_count(), 2);
        let container = h.load_fixtures(["a.html"]).unwrap();
        assert_eq!(h.document.inner_html(container), "<div id=\"a\">A</div>");
        h.set_fixtures("<i></i>").unwrap();
        assert_eq!(h.document.inner_html(container), "<i></i>");
        let sandbox = h.sandbox();
        assert_eq!(h.document.id(sandbox), Some("sandbox"));
    }

    #[test]
    fn test_reset_keeps_cache() {
        let mut h = harness();
        h.load_fixtures(["a.html"]).unwrap();
        let a = h.document.element_by_id("a").unwrap();
        h.document.focus(a);
        h.document.spy_on_event(a, "click");
        h.reset();
        assert!(h.document.element_by_id("a").is_none());
        assert!(h.document.focused().is_none());
        assert!(h.fixtures.is_cached("a.html"));
    }

    #[test]
    fn test_reset_clears_stray_body_content() {
        let mut h = harness();
        let body = h.document.body();
        h.document.append_html(body, "<p id=\"stray\"></p>").unwrap();
        h.reset();
        assert!(h.document.element_by_id("stray").is_none());
    }

    #[test]
    fn test_reset_does_not_grow_document() {
        let mut h = harness();
        let baseline = h.document.node_count();
        for _ in 0..50 {
            let mut scope = h.scope();
            scope.load_fixtures(["a.html", "b.html"]).unwrap();
        }
        assert_eq!(h.document.node_count(), baseline);
        assert_eq!(h.fixtures.fetch_count(), 2);
    }

    #[test]
    fn test_teardown_clears_cache() {
        let mut h = harness();
        h.load_fixtures(["a.html"]).unwrap();
        h.teardown();
        assert!(h.fixtures.cached_urls().is_empty());
    }

    #[test]
    fn test_scope_resets_on_drop() {
        let mut h = harness();
        {
            let mut scope = h.scope();
            scope.set_fixtures(scope_content()).unwrap();
            assert!(scope.document.element_by_id("pollution").is_some());
        }
        assert!(h.document.element_by_id("pollution").is_none());
    }

    fn scope_content() -> &'static str {
        "<div id=\"pollution\"></div>"
    }

    #[test]
    fn test_from_config() {
        let config = FixtureConfig::default().with_container_id("custom");
        let mut h = FixtureHarness::from_config(&config).unwrap();
        h.set_fixtures("<p></p>").unwrap();
        assert!(h.document.element_by_id("custom").is_some());
    }
}
