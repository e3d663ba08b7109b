//! CLI definitions using clap derive API
//!
//! The default command takes the bundling positionals directly; the
//! submodules hold argument types for the auxiliary subcommands:
//! - bundle: positional arguments of the default command
//! - prepare: web build pre-processing arguments
//! - completions: completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_ENV_VAR;

pub mod bundle;
pub mod completions;
pub mod prepare;

pub use bundle::BundleArgs;
pub use completions::CompletionsArgs;
pub use prepare::PrepareArgs;

/// Electron bundler - macOS app bundle assembler
///
/// Builds a redistributable application bundle from an Electron runtime archive.
#[derive(Parser, Debug)]
#[command(
    name = "electron-bundler",
    author,
    version,
    subcommand_negates_reqs = true,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Assemble a macOS Electron app bundle into a tar archive",
    long_about = "Extracts an Electron runtime archive, installs the application's main.js, \
                  index.html and assets into the bundle, patches Info.plist, restores executable \
                  permissions and writes a tar archive that keeps symlinks and modes intact.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  electron-bundler Foo.tar Foo main.js index.html electron.zip      \x1b[90m# Minimal bundle\x1b[0m\n   \
                  electron-bundler Foo.tar.gz Foo main.js index.html electron.zip icon.png assets/\n   \
                  electron-bundler prepare client/dist build/app                    \x1b[90m# Rewrite a web build\x1b[0m\n\n\
                  An OUTPUT named like a subcommand is read as that subcommand; write ./prepare or\n\
                  ./completions instead.\n\
                  "
)]
pub struct Cli {
    /// Configuration file overriding the built-in bundle layout
    #[arg(long, short = 'c', global = true, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub bundle: BundleArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite a web build's index.html for loading from the bundle
    Prepare(PrepareArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
