//! Declarative table of paths that must carry the executable bit

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{self, Result};

/// Mode applied to every permission target: rwx for owner, r-x for group and other
pub const EXECUTABLE_MODE: u32 = 0o755;

const FRAMEWORK_VERSION_DIR: &str = "Contents/Frameworks/Electron Framework.framework/Versions/A";

/// How a table row selects files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// The path itself
    #[default]
    File,
    /// Direct children of the path
    Directory,
}

/// One row of the permission table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionTarget {
    /// Path relative to the bundle root
    pub path: PathBuf,
    #[serde(default)]
    pub kind: TargetKind,
    /// Glob on child file names, only meaningful for directory rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// A missing required row is reported as a warning
    #[serde(default)]
    pub required: bool,
}

impl PermissionTarget {
    pub fn file(path: impl Into<PathBuf>, required: bool) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::File,
            pattern: None,
            required,
        }
    }

    pub fn directory(path: impl Into<PathBuf>, pattern: Option<&str>) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::Directory,
            pattern: pattern.map(str::to_string),
            required: false,
        }
    }

    /// Whether a child file name is selected by this row
    pub fn matches_name(&self, name: &str) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };

        Glob::new(pattern)
            .map(|glob| glob.matched(&CandidatePath::from(name)).is_some())
            .unwrap_or(false)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let Some(pattern) = &self.pattern else {
            return Ok(());
        };

        if self.kind == TargetKind::File {
            return Err(error::config::invalid(format!(
                "permission target '{}' is a file row and cannot have a pattern",
                self.path.display()
            )));
        }

        Glob::new(pattern).map(|_| ()).map_err(|e| {
            error::config::invalid(format!("invalid permission pattern '{pattern}': {e}"))
        })
    }
}

/// Targets for an Electron runtime bundle
pub fn default_permission_targets() -> Vec<PermissionTarget> {
    vec![
        PermissionTarget::file("Contents/MacOS/Electron", true),
        PermissionTarget::file(format!("{FRAMEWORK_VERSION_DIR}/Electron Framework"), true),
        PermissionTarget::directory(format!("{FRAMEWORK_VERSION_DIR}/Helpers"), None),
        PermissionTarget::directory(format!("{FRAMEWORK_VERSION_DIR}/Libraries"), Some("*.dylib")),
    ]
}
