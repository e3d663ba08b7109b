//! Bundle root discovery
//!
//! Release archives do not agree on where the bundle sits: some put
//! `Electron.app` at the top, others nest it in a versioned directory. The
//! tree is walked in file name order at every level and the shallowest
//! matching directory wins, so the result never depends on the order the
//! filesystem happens to return entries in.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{self, Result};

/// Find the bundle root directory under `staging`
///
/// `pattern` is a glob matched against directory names. Symlinked
/// directories are never followed or returned, and a matched bundle is not
/// searched for nested matches.
pub fn locate_bundle_root(staging: &Path, pattern: &str) -> Result<PathBuf> {
    let glob = Glob::new(pattern).map_err(|e| {
        error::config::invalid(format!("bundle pattern '{pattern}' is not a valid glob: {e}"))
    })?;

    shallowest_match(staging, &glob)
        .found
        .ok_or_else(|| error::bundle::not_found(pattern, staging))
}

struct Search {
    found: Option<PathBuf>,
    /// Directories examined, including pruned ones
    #[cfg_attr(not(test), allow(dead_code))]
    visited: usize,
}

/// Walk `staging` and keep the shallowest directory whose name matches
///
/// Once a match sits at depth `d`, nothing at depth `d` or below can replace
/// it, so those subtrees are pruned instead of walked.
fn shallowest_match(staging: &Path, glob: &Glob<'_>) -> Search {
    let mut walker = WalkDir::new(staging)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    let mut best: Option<(usize, PathBuf)> = None;
    let mut visited = 0;

    while let Some(entry) = walker.next() {
        // Unreadable subtrees cannot hold a usable bundle
        let Ok(entry) = entry else {
            continue;
        };

        if !entry.file_type().is_dir() {
            continue;
        }
        visited += 1;

        let depth = entry.depth();
        let best_depth = best.as_ref().map(|(d, _)| *d);
        if best_depth.is_some_and(|d| depth >= d) {
            walker.skip_current_dir();
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if glob.matched(&CandidatePath::from(name.as_ref())).is_none() {
            if best_depth.is_some_and(|d| depth + 1 >= d) {
                walker.skip_current_dir();
            }
            continue;
        }

        walker.skip_current_dir();
        best = Some((depth, entry.into_path()));
    }

    Search {
        found: best.map(|(_, path)| path),
        visited,
    }
}
