//! Scoped staging directory for one bundling run
//!
//! The workspace lives under an absolute temp base so a relative `TMPDIR`
//! never lands staging data in the current directory. Live workspaces are
//! tracked in a process-wide registry; the interrupt handler drains it before
//! exiting, and `Drop` covers every other exit path.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tempfile::TempDir;

use crate::error::{BundlerError, Result};

const PREFIX: &str = "electron-bundler-";

/// Exit status used after an interrupt, 128 + SIGINT
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

static ACTIVE: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

fn registry() -> MutexGuard<'static, Vec<PathBuf>> {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Directory suitable for creating temporary directories, never relative
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// An exclusively owned staging directory, removed when dropped
#[derive(Debug)]
pub struct StagingWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl StagingWorkspace {
    pub fn create() -> Result<Self> {
        Self::create_in(&temp_dir_base())
    }

    pub fn create_in(base: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir_in(base)
            .map_err(|e| BundlerError::WorkspaceFailed {
                reason: format!("cannot create staging directory in {}: {e}", base.display()),
            })?;

        // macOS temp paths go through /var -> /private/var
        let path = dunce::canonicalize(dir.path()).unwrap_or_else(|_| dir.path().to_path_buf());
        registry().push(path.clone());

        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the workspace now, reporting failure instead of ignoring it
    pub fn close(mut self) -> Result<()> {
        unregister(&self.path);
        match self.dir.take() {
            Some(dir) => {
                make_removable(&self.path);
                dir.close().map_err(|e| BundlerError::WorkspaceFailed {
                    reason: format!("cannot remove {}: {e}", self.path.display()),
                })
            }
            None => Ok(()),
        }
    }
}

impl Drop for StagingWorkspace {
    fn drop(&mut self) {
        if self.dir.is_some() {
            unregister(&self.path);
            make_removable(&self.path);
        }
    }
}

fn unregister(path: &Path) {
    registry().retain(|p| p != path);
}

/// Give the owner full access to every directory under `root`
///
/// Read-only directories unpacked from a runtime archive or copied from the
/// inputs would otherwise block removal for non-root users. The walk is
/// pre-order so each directory is opened after its mode is fixed.
#[cfg(unix)]
fn make_removable(root: &Path) {
    use std::os::unix::fs::PermissionsExt;
    use walkdir::WalkDir;

    for entry in WalkDir::new(root).follow_links(false).into_iter().flatten() {
        if !entry.file_type().is_dir() {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let mode = metadata.permissions().mode();
        if mode & 0o700 != 0o700 {
            let _ = std::fs::set_permissions(
                entry.path(),
                std::fs::Permissions::from_mode(mode | 0o700),
            );
        }
    }
}

#[cfg(not(unix))]
fn make_removable(_root: &Path) {}

/// Whether `path` belongs to a live workspace
#[cfg(test)]
pub fn is_active(path: &Path) -> bool {
    registry().iter().any(|p| p == path)
}

/// Remove every live workspace from disk and clear the registry
///
/// Returns the number of directories removed.
pub fn remove_active() -> usize {
    let paths: Vec<PathBuf> = registry().drain(..).collect();
    paths
        .iter()
        .filter(|path| {
            make_removable(path);
            std::fs::remove_dir_all(path).is_ok()
        })
        .count()
}

/// Install a Ctrl-C handler that removes live workspaces before exiting
pub fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        remove_active();
        std::process::exit(INTERRUPTED_EXIT_CODE);
    })
    .map_err(|e| BundlerError::WorkspaceFailed {
        reason: format!("cannot install interrupt handler: {e}"),
    })
}
