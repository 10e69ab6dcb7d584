//! fixdom CLI: HTML fixtures from the command line
//!
//! ## Usage
//!
//! ```bash
//! fixdom read form.html                              # Print a fixture
//! fixdom preload form.html list.html                 # Warm the cache
//! fixdom assert form.html -s '#name' -m toHaveValue -a Ada
//! fixdom assert form.html -s '.error' -m toExist --not
//! ```

use clap::Parser;
use fixdom::{init_tracing, LogFormat};
use fixdom_cli::{handlers, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity.log_directive(), LogFormat::Text);

    let mut stdout = std::io::stdout().lock();
    let fixture_config =
        || handlers::resolve_fixture_config(&cli.fixtures, |key| std::env::var(key).ok());
    match &cli.command {
        Commands::Read(args) => handlers::run_read(&fixture_config()?, args, &mut stdout),
        Commands::Preload(args) => {
            handlers::run_preload(&config, &fixture_config()?, args, &mut stdout)
        }
        Commands::Assert(args) => {
            handlers::run_assert(&config, &fixture_config()?, args, &mut stdout)
        }
        Commands::Matchers => handlers::run_matchers(&mut stdout),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}
