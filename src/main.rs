//! Electron bundler - macOS app bundle assembler
//!
//! Turns an Electron runtime release archive plus an application's entry
//! script, page markup and assets into a `.app` bundle, shipped as a tar
//! archive that keeps symlinks and executable permissions intact.

use clap::{CommandFactory, Parser};
use miette::Diagnostic;

mod archive;
mod bundle;
mod cli;
mod commands;
mod common;
mod config;
mod error;
mod pipeline;
mod prepare;
mod runner;
mod ui;

use cli::{Cli, Commands};
use commands::bundle::OutputOptions;

/// Exit status for every failure, usage errors included
const FAILURE_EXIT_CODE: i32 = 1;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(FAILURE_EXIT_CODE);
        }
    };

    if let Err(e) = pipeline::workspace::install_interrupt_handler() {
        eprintln!("Warning: {}", e);
    }

    let options = OutputOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let result = match &cli.command {
        Some(Commands::Prepare(args)) => commands::prepare::run(args, options.quiet),
        Some(Commands::Completions(args)) => commands::completions::run(args),
        None => {
            let Some(request) = cli.bundle.into_request() else {
                eprintln!("{}", Cli::command().render_usage());
                std::process::exit(FAILURE_EXIT_CODE);
            };
            commands::bundle::run(cli.config.as_deref(), &request, options)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let Some(help) = e.help() {
            eprintln!("Help: {}", help);
        }
        std::process::exit(FAILURE_EXIT_CODE);
    }
}
