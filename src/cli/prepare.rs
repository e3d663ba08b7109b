use clap::Parser;
use std::path::PathBuf;

/// Arguments for the prepare command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Prepare a Vite build for bundling:\n    electron-bundler prepare client/dist build/app")]
pub struct PrepareArgs {
    /// Web build output containing index.html and an optional assets/ directory
    pub dist_dir: PathBuf,

    /// Directory receiving the rewritten index.html and assets/
    pub output_dir: PathBuf,
}
