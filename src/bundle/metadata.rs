//! Info.plist patching
//!
//! Two literal substitutions, no plist parsing: the runtime's display name
//! (first `<string>` occurrence only, which is `CFBundleDisplayName`) and every
//! occurrence of the runtime's package identifier.

use std::fs;
use std::io::ErrorKind;

use crate::config::MetadataConfig;
use crate::error::{self, Result};

use super::BundleDescriptor;

/// What the patcher changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub display_replaced: bool,
    pub package_replacements: usize,
}

/// Patch identifying strings in the bundle's metadata descriptor
///
/// Returns `Ok(None)` when the descriptor does not exist.
pub fn patch_metadata(
    descriptor: &BundleDescriptor,
    config: &MetadataConfig,
) -> Result<Option<PatchReport>> {
    let path = &descriptor.metadata_path;

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(error::bundle::metadata_failed(path, e)),
    };

    let (patched, report) = patch_text(&content, &descriptor.app_name, config);
    fs::write(path, patched).map_err(|e| error::bundle::metadata_failed(path, e))?;

    Ok(Some(report))
}

/// Apply both substitutions to descriptor text
pub fn patch_text(content: &str, app_name: &str, config: &MetadataConfig) -> (String, PatchReport) {
    let app_name = xml_escape(app_name);
    let display = plist_string(&config.display_identifier);
    let package = plist_string(&config.package_identifier);

    let display_replaced = content.contains(&display);
    let patched = content.replacen(&display, &plist_string(&app_name), 1);

    let package_replacements = patched.matches(&package).count();
    let patched = patched.replace(
        &package,
        &plist_string(&config.package_identifier_for(&app_name)),
    );

    (
        patched,
        PatchReport {
            display_replaced,
            package_replacements,
        },
    )
}

fn plist_string(value: &str) -> String {
    format!("<string>{value}</string>")
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
