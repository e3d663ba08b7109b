//! Executable bit restoration
//!
//! Unpacking with tools that drop mode bits leaves the runtime binaries
//! non-executable. Every row of the permission table is applied relative to
//! the bundle root. Symlinks are never followed or modified.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::{PermissionTarget, TargetKind};
use crate::error::{self, Result};

/// Outcome of applying the permission table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionReport {
    /// Regular files whose mode was set
    pub updated: Vec<PathBuf>,
    /// Entries selected by a row but left alone: symlinks, non-regular files,
    /// and every file on hosts without Unix modes
    pub skipped: Vec<PathBuf>,
    /// Rows whose path does not exist in the bundle
    pub missing: Vec<PathBuf>,
    /// Subset of `missing` marked as required
    pub missing_required: Vec<PathBuf>,
}

impl PermissionReport {
    fn record_missing(&mut self, path: PathBuf, required: bool) {
        if required {
            self.missing_required.push(path.clone());
        }
        self.missing.push(path);
    }
}

/// Apply `targets` to the bundle rooted at `bundle_root`
pub fn fix_permissions(bundle_root: &Path, targets: &[PermissionTarget]) -> Result<PermissionReport> {
    let mut report = PermissionReport::default();

    for target in targets {
        let path = bundle_root.join(&target.path);

        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                report.record_missing(path, target.required);
                continue;
            }
            Err(e) => return Err(error::bundle::permission_failed(&path, e)),
        };

        match target.kind {
            TargetKind::File => {
                if metadata.file_type().is_file() && set_executable(&path)? {
                    report.updated.push(path);
                } else {
                    report.skipped.push(path);
                }
            }
            TargetKind::Directory => {
                if !metadata.file_type().is_dir() {
                    report.record_missing(path, target.required);
                    continue;
                }
                apply_to_children(&path, target, &mut report)?;
            }
        }
    }

    Ok(report)
}

fn apply_to_children(
    dir: &Path,
    target: &PermissionTarget,
    report: &mut PermissionReport,
) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| error::bundle::permission_failed(dir, e))?;

    let mut entries = entries
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| error::bundle::permission_failed(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name();
        if !target.matches_name(&name.to_string_lossy()) {
            continue;
        }

        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| error::bundle::permission_failed(&path, e))?;

        if file_type.is_file() && set_executable(&path)? {
            report.updated.push(path);
        } else {
            report.skipped.push(path);
        }
    }

    Ok(())
}

/// Set the executable mode, returning whether a mode was actually written
#[cfg(unix)]
fn set_executable(path: &Path) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    use crate::config::permissions::EXECUTABLE_MODE;

    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))
        .map_err(|e| error::bundle::permission_failed(path, e))?;
    Ok(true)
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn set_executable(_path: &Path) -> Result<bool> {
    Ok(false)
}
