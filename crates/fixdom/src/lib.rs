//! fixdom: HTML fixtures and DOM matchers for Rust unit tests
//!
//! Load HTML fixture files into an in-memory document, cache them across
//! tests, and assert on the result with jQuery-flavored matchers.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   read/load   ┌────────────────┐   append_html   ┌──────────────┐
//! │ FixtureSource  │──────────────►│ Fixtures       │────────────────►│ Document     │
//! │ (file, memory, │   fetch once  │ (cache +       │  container div  │ (arena DOM,  │
//! │  http)         │               │  container)    │                 │  events)     │
//! └────────────────┘               └────────────────┘                 └──────┬───────┘
//!                                                                            │
//!                                  ┌────────────────┐    Matcher::matches    │
//!                                  │ expect()       │◄───────────────────────┘
//!                                  │ (negation,     │
//!                                  │  messages)     │
//!                                  └────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use fixdom::{expect, FixtureHarness, MemorySource};
//!
//! let source = MemorySource::new().with_fixture(
//!     "spec/javascripts/fixtures/form.html",
//!     "<form><input id=\"name\" value=\"Ada\" class=\"field\"></form>",
//! );
//! let mut harness = FixtureHarness::new().with_source(source);
//! harness.load_fixtures(["form.html"]).unwrap();
//!
//! let doc = &harness.document;
//! let name = doc.select("#name").unwrap();
//! expect(doc, &name).to_have_value("Ada").unwrap();
//! expect(doc, &name).to_have_class("field").unwrap();
//! expect(doc, &name).not().to_be_disabled().unwrap();
//! ```

#![warn(missing_docs)]

pub mod dom;
pub mod event;
pub mod matcher;
pub mod script;

mod config;
mod expect;
mod fixture;
mod harness;
mod result;
mod source;
mod tracing_support;

pub use config::{
    FetchErrorPolicy, FixtureConfig, SourceConfig, ENV_CONTAINER_ID, ENV_FETCH_ERRORS,
    ENV_FIXTURES_PATH,
};
pub use dom::serialize::normalize_html;
pub use dom::{Document, NodeId, Selection};
pub use event::{Event, EventTarget, HandlerRef, SpiedEvent};
pub use expect::{expect, expect_event, AssertionResult, EventExpect, Expect};
pub use fixture::{
    FixtureContent, Fixtures, DEFAULT_CONTAINER_ID, DEFAULT_FIXTURES_PATH, DEFAULT_SANDBOX_ID,
};
pub use harness::{FixtureHarness, HarnessScope};
pub use matcher::{ElementLike, Matcher, TextMatcher, MATCHER_NAMES};
pub use result::{FixdomError, FixdomResult};
pub use script::ScriptRunner;
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{FileSource, FixtureSource, MemorySource};
pub use tracing_support::{init_test_tracing, init_tracing, LogFormat};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
