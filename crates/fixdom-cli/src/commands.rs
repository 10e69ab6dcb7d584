//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// fixdom: HTML fixtures and DOM matchers from the command line
#[derive(Parser, Debug)]
#[command(name = "fixdom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Fixture settings
    #[command(flatten)]
    pub fixtures: FixtureArgs,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override the fixture configuration
#[derive(Args, Debug, Default, Clone)]
pub struct FixtureArgs {
    /// YAML configuration file (default: ./fixdom.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base path prefixed to fixture names
    #[arg(long, global = true)]
    pub fixtures_path: Option<String>,

    /// Directory fixture files are read from
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Behavior when a fixture cannot be fetched
    #[arg(long, global = true)]
    pub fetch_errors: Option<FetchErrorsArg>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the concatenated HTML of one or more fixtures
    Read(ReadArgs),

    /// Fetch fixtures once and report how many were fetched
    Preload(PreloadArgs),

    /// Load fixtures and evaluate one matcher against a selector
    Assert(AssertArgs),

    /// List matcher names accepted by `assert`
    Matchers,
}

/// Arguments for the read command
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Fixture names, resolved against the fixtures path
    #[arg(required = true)]
    pub fixtures: Vec<String>,
}

/// Arguments for the preload command
#[derive(Args, Debug)]
pub struct PreloadArgs {
    /// Fixture names, resolved against the fixtures path
    #[arg(required = true)]
    pub fixtures: Vec<String>,
}

/// Arguments for the assert command
#[derive(Args, Debug)]
pub struct AssertArgs {
    /// Fixture names, loaded in order into the container
    #[arg(required = true)]
    pub fixtures: Vec<String>,

    /// CSS selector picking the subject
    #[arg(short, long)]
    pub selector: String,

    /// Matcher name (toHaveClass, have-class, be_visible, ...)
    #[arg(short, long)]
    pub matcher: String,

    /// Matcher argument; repeat for matchers taking two. `/re/` is a pattern
    #[arg(short, long = "arg", value_name = "VALUE")]
    pub args: Vec<String>,

    /// Negate the matcher
    #[arg(long)]
    pub not: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Fetch error policy argument
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FetchErrorsArg {
    /// Fail the command
    Raise,
    /// Warn and treat the fixture as empty
    Suppress,
}

impl From<FetchErrorsArg> for fixdom::FetchErrorPolicy {
    fn from(arg: FetchErrorsArg) -> Self {
        match arg {
            FetchErrorsArg::Raise => Self::Raise,
            FetchErrorsArg::Suppress => Self::Suppress,
        }
    }
}
