//! Resource manifest (`package.json`) written next to the application code

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{self, BundlerError, Result};

/// The manifest the runtime reads to find the application entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceManifest {
    pub name: String,
    pub version: String,
    #[serde(rename = "main")]
    pub entry_point: String,
}

impl ResourceManifest {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            entry_point: entry_point.into(),
        }
    }

    /// Write the manifest as `file_name` inside `resources_dir`
    ///
    /// The entry point must already be present in `resources_dir`.
    pub fn write(&self, resources_dir: &Path, file_name: &str) -> Result<PathBuf> {
        if !resources_dir.join(&self.entry_point).is_file() {
            return Err(BundlerError::ManifestInvalid {
                message: format!(
                    "entry point '{}' does not exist in {}",
                    self.entry_point,
                    resources_dir.display()
                ),
            });
        }

        let path = resources_dir.join(file_name);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| error::fs::write_failed(&path, e))?;

        Ok(path)
    }
}
