//! Rulegen CLI - converts design-document rule lines into Java
//!
//! This is the main entry point for the `rulegen` binary, providing commands
//! for converting rule lines, inspecting entity sources and managing
//! configuration.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    // Configuration comes first so its logging section applies
    let result = Config::load_with_file(cli.config.as_deref()).and_then(|config| {
        if let Err(e) = init_logging(&cli, &config) {
            eprintln!("Failed to initialize logging: {}", e);
        }
        run(cli, config)
    });

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(cli.output, cli.use_color(), cli.quiet, cli.verbosity_level());

    tracing::info!(
        command = ?cli.command,
        verbosity = output.verbosity(),
        format = ?output.format(),
        config = ?config.source,
        "Executing command"
    );

    let result = match cli.command {
        Commands::Convert(args) => handlers::handle_convert(args, &config, &mut output),
        Commands::Inspect(args) => handlers::handle_inspect(args, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    };

    tracing::debug!(elapsed_ms = timer.elapsed().as_millis() as u64, ok = result.is_ok(), "Command finished");
    result
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    // File settings first, then environment overrides
    logging_config.merge_with_file(&config.logging, verbosity);
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["rulegen", "-vv", "convert", "rules.txt"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["rulegen", "--quiet", "inspect", "Entity.java"]);
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::parse_from(["rulegen", "config", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Config(_)));
    }
}
