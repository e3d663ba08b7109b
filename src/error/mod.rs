//! Error types and handling for the bundler
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`archive`]: Extraction and archive creation errors
//! - [`bundle`]: Bundle location and assembly errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors

pub mod archive;
pub mod bundle;
pub mod config;
pub mod fs;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for bundler operations
#[derive(Error, Diagnostic, Debug)]
pub enum BundlerError {
    // Archive errors
    #[error("Failed to extract '{archive}': {reason}")]
    #[diagnostic(
        code(bundler::archive::extraction_failed),
        help("Check that the runtime archive is a valid Electron zip and that `unzip` is installed")
    )]
    ExtractionFailed { archive: String, reason: String },

    #[error("Failed to create archive '{path}': {reason}")]
    #[diagnostic(code(bundler::archive::create_failed))]
    ArchiveCreateFailed { path: String, reason: String },

    // Bundle errors
    #[error("Bundle root not found: no directory matching '{pattern}' in {staging}")]
    #[diagnostic(
        code(bundler::bundle::not_found),
        help("The runtime archive must contain an application bundle such as Electron.app")
    )]
    BundleNotFound { pattern: String, staging: String },

    #[error("Invalid application name '{name}': {reason}")]
    #[diagnostic(code(bundler::bundle::invalid_name))]
    InvalidAppName { name: String, reason: String },

    #[error("Bundle already exists: {path}")]
    #[diagnostic(code(bundler::bundle::exists))]
    BundleExists { path: String },

    #[error("Failed to copy '{from}' to '{to}': {reason}")]
    #[diagnostic(code(bundler::bundle::copy_failed))]
    CopyFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Asset not found: {path}")]
    #[diagnostic(
        code(bundler::bundle::asset_not_found),
        help("Every asset argument must name an existing file or directory")
    )]
    AssetNotFound { path: String },

    #[error("Asset destination already exists: {path}")]
    #[diagnostic(
        code(bundler::bundle::asset_collision),
        help("Two assets share a directory name, or an asset collides with a generated file")
    )]
    AssetCollision { path: String },

    #[error("Invalid resource manifest: {message}")]
    #[diagnostic(code(bundler::bundle::manifest_invalid))]
    ManifestInvalid { message: String },

    #[error("Failed to patch metadata '{path}': {reason}")]
    #[diagnostic(code(bundler::bundle::metadata_failed))]
    MetadataPatchFailed { path: String, reason: String },

    #[error("Failed to set permissions on '{path}': {reason}")]
    #[diagnostic(code(bundler::bundle::permission_failed))]
    PermissionFixFailed { path: String, reason: String },

    #[error("Staging workspace error: {reason}")]
    #[diagnostic(code(bundler::bundle::workspace_failed))]
    WorkspaceFailed { reason: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(bundler::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(bundler::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(bundler::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(bundler::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(bundler::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(bundler::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for BundlerError {
    fn from(err: std::io::Error) -> Self {
        BundlerError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BundlerError {
    fn from(err: serde_json::Error) -> Self {
        BundlerError::ManifestInvalid {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BundlerError>;
