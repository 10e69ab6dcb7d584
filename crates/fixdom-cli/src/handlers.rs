//! Command handlers.
//!
//! Each handler writes its report to the given writer so the binary can
//! pass stdout and tests can pass a buffer.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use console::style;
use fixdom::{
    expect, FixtureConfig, FixtureHarness, Fixtures, Matcher, SourceConfig, MATCHER_NAMES,
};
use tracing::debug;

use crate::commands::{AssertArgs, FixtureArgs, PreloadArgs, ReadArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "fixdom.yaml";

/// Resolve fixture settings: file, then environment, then flags.
pub fn resolve_fixture_config<F>(args: &FixtureArgs, env: F) -> CliResult<FixtureConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &args.config {
        Some(path) if !path.exists() => {
            return Err(CliError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Some(path) => FixtureConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            FixtureConfig::from_file(DEFAULT_CONFIG_FILE)?
        }
        None => FixtureConfig::default(),
    };
    config.apply_env(env)?;

    if let Some(path) = &args.fixtures_path {
        config = config.with_fixtures_path(path.clone());
    }
    if let Some(root) = &args.root {
        config = config.with_source(SourceConfig::File { root: root.clone() });
    }
    if let Some(policy) = args.fetch_errors {
        config = config.with_fetch_errors(policy.into());
    }
    config.validate()?;
    debug!(
        fixtures_path = %config.fixtures_path,
        source = %config.source_label(),
        fetch_errors = %config.fetch_errors,
        "resolved fixture configuration"
    );
    Ok(config)
}

/// `fixdom read`
pub fn run_read(
    fixture_config: &FixtureConfig,
    args: &ReadArgs,
    out: &mut impl Write,
) -> CliResult<()> {
    let mut fixtures = Fixtures::from_config(fixture_config)?;
    let html = fixtures.read(&args.fixtures)?;
    writeln!(out, "{html}")?;
    Ok(())
}

/// `fixdom preload`
pub fn run_preload(
    config: &CliConfig,
    fixture_config: &FixtureConfig,
    args: &PreloadArgs,
    out: &mut impl Write,
) -> CliResult<()> {
    let mut fixtures = Fixtures::from_config(fixture_config)?;
    fixtures.preload(&args.fixtures)?;

    if config.verbosity.is_quiet() {
        return Ok(());
    }
    let requested: BTreeSet<&str> = args.fixtures.iter().map(String::as_str).collect();
    let cached = fixtures.cached_urls();
    let color = config.color.should_color();
    writeln!(
        out,
        "{} preloaded {} of {} fixture(s) from {} ({} fetch(es))",
        style("✓").green().force_styling(color),
        cached.len(),
        requested.len(),
        fixture_config.source_label(),
        fixtures.fetch_count()
    )?;
    if config.verbosity.is_verbose() {
        for url in cached {
            writeln!(out, "  {url}")?;
        }
    }
    Ok(())
}

/// `fixdom assert`; a failing matcher is returned as
/// [`CliError::AssertionFailed`].
pub fn run_assert(
    config: &CliConfig,
    fixture_config: &FixtureConfig,
    args: &AssertArgs,
    out: &mut impl Write,
) -> CliResult<()> {
    let matcher = Matcher::from_name(&args.matcher, &args.args)
        .map_err(|e| CliError::invalid_argument(e.to_string()))?;

    let mut harness = FixtureHarness::from_config(fixture_config)?;
    harness.load_fixtures(&args.fixtures)?;
    let document = &harness.document;
    let subject = document.select(&args.selector)?;
    debug!(selector = %args.selector, matched = subject.len(), "selected subject");

    let mut expectation = expect(document, &subject);
    if args.not {
        expectation = expectation.not();
    }
    let result = expectation.evaluate(&matcher);
    if !result.passed {
        return Err(CliError::assertion_failed(result.message));
    }

    if !config.verbosity.is_quiet() {
        let negation = if args.not { "not " } else { "" };
        writeln!(
            out,
            "{} {} {negation}{matcher}",
            style("PASS").green().bold().force_styling(config.color.should_color()),
            args.selector
        )?;
    }
    Ok(())
}

/// `fixdom matchers`
pub fn run_matchers(out: &mut impl Write) -> CliResult<()> {
    for name in MATCHER_NAMES {
        writeln!(out, "{name}")?;
    }
    Ok(())
}
