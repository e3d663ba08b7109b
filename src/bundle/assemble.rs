//! Bundle assembly
//!
//! Turns the located runtime bundle into the application bundle:
//! 1. rename `Electron.app` to `<AppName>.app` at the staging root
//! 2. create `Contents/Resources/app`
//! 3. copy the entry script and markup file under their fixed names
//! 4. copy assets (files overwrite, directories must not collide)
//! 5. write `package.json`

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::fs::copy_dir_recursive;
use crate::config::{BundlerConfig, LayoutConfig, ManifestConfig};
use crate::error::{self, BundlerError, Result};

use super::BundleDescriptor;
use super::manifest::ResourceManifest;

/// Caller-supplied application resources
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInputs<'a> {
    pub app_name: &'a str,
    pub entry_script: &'a Path,
    pub markup: &'a Path,
    pub assets: &'a [PathBuf],
}

/// Check that an application name can be used as a bundle directory name
pub fn validate_app_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("must not be empty")
    } else if name == "." || name == ".." {
        Some("must not be a relative directory reference")
    } else if name.contains(['/', '\\']) {
        Some("must not contain path separators")
    } else if name.contains('\0') {
        Some("must not contain NUL characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(error::bundle::invalid_name(name, reason)),
        None => Ok(()),
    }
}

/// Populates a located runtime bundle with application resources
pub struct BundleAssembler<'a> {
    layout: &'a LayoutConfig,
    manifest: &'a ManifestConfig,
}

impl<'a> BundleAssembler<'a> {
    pub fn new(config: &'a BundlerConfig) -> Self {
        Self {
            layout: &config.layout,
            manifest: &config.manifest,
        }
    }

    /// Assemble the application bundle and return its descriptor
    pub fn assemble(
        &self,
        staging: &Path,
        located: &Path,
        inputs: &AssemblyInputs<'_>,
    ) -> Result<BundleDescriptor> {
        validate_app_name(inputs.app_name)?;

        let root = self.rename_bundle(staging, located, inputs.app_name)?;
        let descriptor = BundleDescriptor::new(root, inputs.app_name, self.layout);

        fs::create_dir_all(&descriptor.resources_dir)
            .map_err(|e| error::fs::write_failed(&descriptor.resources_dir, e))?;

        copy_file(
            inputs.entry_script,
            &descriptor.resources_dir.join(&self.manifest.entry_file),
        )?;
        copy_file(
            inputs.markup,
            &descriptor.resources_dir.join(&self.manifest.markup_file),
        )?;

        for asset in inputs.assets {
            copy_asset(asset, &descriptor.resources_dir)?;
        }

        ResourceManifest::new(
            inputs.app_name,
            &self.manifest.version,
            &self.manifest.entry_file,
        )
        .write(&descriptor.resources_dir, &self.manifest.file_name)?;

        Ok(descriptor)
    }

    fn rename_bundle(&self, staging: &Path, located: &Path, app_name: &str) -> Result<PathBuf> {
        let target = staging.join(self.layout.bundle_dir_name(app_name));

        if target == located {
            return Ok(target);
        }

        if target.symlink_metadata().is_ok() {
            return Err(BundlerError::BundleExists {
                path: target.display().to_string(),
            });
        }

        fs::rename(located, &target).map_err(|e| BundlerError::WorkspaceFailed {
            reason: format!(
                "failed to rename {} to {}: {e}",
                located.display(),
                target.display()
            ),
        })?;

        Ok(target)
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| error::bundle::copy_failed(from, to, e))
}

/// Name an asset is stored under inside the resource directory
fn asset_name(asset: &Path) -> Result<PathBuf> {
    if let Some(name) = asset.file_name() {
        return Ok(PathBuf::from(name));
    }

    // Paths like `.` or `dir/..` only have a name once resolved
    dunce::canonicalize(asset)
        .ok()
        .and_then(|p| p.file_name().map(PathBuf::from))
        .ok_or_else(|| BundlerError::AssetNotFound {
            path: asset.display().to_string(),
        })
}

fn copy_asset(asset: &Path, resources_dir: &Path) -> Result<()> {
    let metadata = fs::metadata(asset).map_err(|_| BundlerError::AssetNotFound {
        path: asset.display().to_string(),
    })?;

    let dest = resources_dir.join(asset_name(asset)?);

    if !metadata.is_dir() {
        return copy_file(asset, &dest);
    }

    if dest.symlink_metadata().is_ok() {
        return Err(BundlerError::AssetCollision {
            path: dest.display().to_string(),
        });
    }

    copy_dir_recursive(asset, &dest).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            BundlerError::AssetCollision {
                path: dest.display().to_string(),
            }
        } else {
            error::bundle::copy_failed(asset, &dest, e)
        }
    })
}
