//! fixdom CLI library
//!
//! Command-line front end over the fixdom fixture cache: print fixtures,
//! warm the cache, and evaluate a single matcher from a shell script.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;

pub use commands::{
    AssertArgs, Cli, ColorArg, Commands, FetchErrorsArg, FixtureArgs, PreloadArgs, ReadArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
