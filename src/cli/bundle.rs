use clap::Args;
use std::path::PathBuf;

use crate::pipeline::BundleRequest;

/// Positional arguments of the default bundling command
#[derive(Args, Debug, Default)]
pub struct BundleArgs {
    /// Output archive path (`.tar`, or `.tar.gz`/`.tgz` for a compressed archive)
    #[arg(value_name = "OUTPUT", required = true)]
    pub output: Option<PathBuf>,

    /// Application name, used for the bundle directory and identifiers
    #[arg(value_name = "APP_NAME", required = true)]
    pub app_name: Option<String>,

    /// Entry script, installed as main.js
    #[arg(value_name = "MAIN_JS", required = true)]
    pub entry_script: Option<PathBuf>,

    /// Page markup, installed as index.html
    #[arg(value_name = "INDEX_HTML", required = true)]
    pub markup: Option<PathBuf>,

    /// Electron runtime release archive (zip, tar or tar.gz)
    #[arg(value_name = "ELECTRON_ZIP", required = true)]
    pub runtime_archive: Option<PathBuf>,

    /// Extra files or directories copied next to main.js
    #[arg(value_name = "ASSETS")]
    pub assets: Vec<PathBuf>,
}

impl BundleArgs {
    /// The pipeline request, `None` unless every required positional is present
    pub fn into_request(self) -> Option<BundleRequest> {
        Some(BundleRequest {
            output: self.output?,
            app_name: self.app_name?,
            entry_script: self.entry_script?,
            markup: self.markup?,
            runtime_archive: self.runtime_archive?,
            assets: self.assets,
        })
    }
}
