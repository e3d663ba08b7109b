//! Application bundle stages
//!
//! This module handles everything that happens to the runtime bundle between
//! extraction and packing:
//! - [`locate`]: finding the bundle root in the extracted tree
//! - [`assemble`]: renaming it and copying application resources in
//! - [`manifest`]: the `package.json` written into the resource directory
//! - [`metadata`]: patching identifiers in `Info.plist`
//! - [`permissions`]: restoring executable bits before packing

pub mod assemble;
pub mod locate;
pub mod manifest;
pub mod metadata;
pub mod permissions;

use std::path::PathBuf;

use crate::config::LayoutConfig;

pub use assemble::{AssemblyInputs, BundleAssembler, validate_app_name};
pub use locate::locate_bundle_root;
pub use metadata::{PatchReport, patch_metadata};
pub use permissions::{PermissionReport, fix_permissions};

/// A bundle directory and the well-known paths inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDescriptor {
    pub root: PathBuf,
    pub app_name: String,
    pub resources_dir: PathBuf,
    pub metadata_path: PathBuf,
}

impl BundleDescriptor {
    pub fn new(root: PathBuf, app_name: impl Into<String>, layout: &LayoutConfig) -> Self {
        Self {
            resources_dir: root.join(&layout.resources_dir),
            metadata_path: root.join(&layout.metadata_file),
            root,
            app_name: app_name.into(),
        }
    }

    /// Directory name of the bundle root, e.g. `Foo.app`
    pub fn dir_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
