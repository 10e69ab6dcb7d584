//! Fixture configuration.
//!
//! Loaded from YAML (`fixdom.yaml`), then overridden by environment
//! variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `FIXDOM_FIXTURES_PATH` | `fixtures_path` |
//! | `FIXDOM_CONTAINER_ID` | `container_id` |
//! | `FIXDOM_FETCH_ERRORS` | `fetch_errors` (`raise` or `suppress`) |
//!
//! ```yaml
//! fixtures_path: spec/javascripts/fixtures
//! container_id: jasmine-fixtures
//! fetch_errors: raise
//! source:
//!   kind: file
//!   root: .
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fixture::{DEFAULT_CONTAINER_ID, DEFAULT_FIXTURES_PATH};
use crate::result::{FixdomError, FixdomResult};
use crate::source::{FileSource, FixtureSource};

/// Environment variable overriding `fixtures_path`
pub const ENV_FIXTURES_PATH: &str = "FIXDOM_FIXTURES_PATH";
/// Environment variable overriding `container_id`
pub const ENV_CONTAINER_ID: &str = "FIXDOM_CONTAINER_ID";
/// Environment variable overriding `fetch_errors`
pub const ENV_FETCH_ERRORS: &str = "FIXDOM_FETCH_ERRORS";

/// What a load does when the source cannot deliver a fixture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorPolicy {
    /// Return the error to the caller
    #[default]
    Raise,
    /// Log a warning and use empty text (not cached)
    Suppress,
}

impl FromStr for FetchErrorPolicy {
    type Err = FixdomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raise" => Ok(Self::Raise),
            "suppress" => Ok(Self::Suppress),
            other => Err(FixdomError::config(format!(
                "unknown fetch error policy '{other}' (expected 'raise' or 'suppress')"
            ))),
        }
    }
}

impl fmt::Display for FetchErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raise => write!(f, "raise"),
            Self::Suppress => write!(f, "suppress"),
        }
    }
}

/// Where fixture text is fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Files under `root`
    File {
        /// Directory that resolved fixture URLs are relative to
        #[serde(default = "default_root")]
        root: PathBuf,
    },
    /// HTTP GETs under `base_url` (needs the `http` feature)
    Http {
        /// Base URL that resolved fixture URLs are appended to
        base_url: String,
    },
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::File {
            root: default_root(),
        }
    }
}

/// Settings for [`Fixtures`](crate::Fixtures).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Base path prefixed to fixture names
    pub fixtures_path: String,
    /// Id of the container element fixtures are loaded into
    pub container_id: String,
    /// Behavior on fetch failure
    pub fetch_errors: FetchErrorPolicy,
    /// Fixture source
    pub source: SourceConfig,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            fixtures_path: DEFAULT_FIXTURES_PATH.to_string(),
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            fetch_errors: FetchErrorPolicy::Raise,
            source: SourceConfig::default(),
        }
    }
}

impl FixtureConfig {
    /// Parse from YAML and validate.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or invalid values.
    pub fn from_yaml_str(yaml: &str) -> FixdomResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> FixdomResult<Self> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }

    /// Apply overrides from a variable lookup (see module docs).
    ///
    /// # Errors
    ///
    /// Fails on an unknown fetch error policy or an empty override.
    pub fn apply_env<F>(&mut self, lookup: F) -> FixdomResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_FIXTURES_PATH) {
            self.fixtures_path = path;
        }
        if let Some(id) = lookup(ENV_CONTAINER_ID) {
            self.container_id = id;
        }
        if let Some(policy) = lookup(ENV_FETCH_ERRORS) {
            self.fetch_errors = policy.parse()?;
        }
        self.validate()
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`FixtureConfig::apply_env`].
    pub fn with_env_overrides(mut self) -> FixdomResult<Self> {
        self.apply_env(|key| std::env::var(key).ok())?;
        Ok(self)
    }

    /// Set the fixtures path
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
    pub const fn with_fetch_errors(mut self, policy: FetchErrorPolicy) -> Self {
        self.fetch_errors = policy;
        self
    }

    /// Set the source
    #[must_use]
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    /// Check values a loader cannot work with.
    ///
    /// # Errors
    ///
    /// Fails on an empty or whitespace-containing container id, or an
    /// empty HTTP base URL.
    pub fn validate(&self) -> FixdomResult<()> {
        if self.container_id.is_empty() {
            return Err(FixdomError::config("container_id must not be empty"));
        }
        if self.container_id.chars().any(char::is_whitespace) {
            return Err(FixdomError::config(format!(
                "container_id '{}' must not contain whitespace",
                self.container_id
            )));
        }
        if let SourceConfig::Http { base_url } = &self.source {
            if base_url.trim().is_empty() {
                return Err(FixdomError::config("http source needs a base_url"));
            }
        }
        Ok(())
    }

    /// Build the configured source.
    ///
    /// # Errors
    ///
    /// Fails for an HTTP source when the `http` feature is disabled.
    pub fn build_source(&self) -> FixdomResult<Box<dyn FixtureSource>> {
        match &self.source {
            SourceConfig::File { root } => Ok(Box::new(FileSource::new(root.clone()))),
            #[cfg(feature = "http")]
            SourceConfig::Http { base_url } => {
                Ok(Box::new(crate::source::HttpSource::new(base_url.clone())?))
            }
            #[cfg(not(feature = "http"))]
            SourceConfig::Http { .. } => Err(FixdomError::config(
                "http source requires fixdom to be built with the `http` feature",
            )),
        }
    }

    /// Short description of the source for logs.
    #[must_use]
    pub fn source_label(&self) -> String {
        match &self.source {
            SourceConfig::File { root } => format!("file:{}", root.display()),
            SourceConfig::Http { base_url } => format!("http:{base_url}"),
        }
    }
}
