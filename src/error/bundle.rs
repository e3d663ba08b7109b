//! Bundle location and assembly errors

use std::path::Path;

use super::BundlerError;

/// Creates a bundle root not found error
pub fn not_found(pattern: impl Into<String>, staging: &Path) -> BundlerError {
    BundlerError::BundleNotFound {
        pattern: pattern.into(),
        staging: staging.display().to_string(),
    }
}

/// Creates an invalid application name error
pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> BundlerError {
    BundlerError::InvalidAppName {
        name: name.into(),
        reason: reason.into(),
    }
}

/// Creates a copy failed error
pub fn copy_failed(from: &Path, to: &Path, reason: impl ToString) -> BundlerError {
    BundlerError::CopyFailed {
        from: from.display().to_string(),
        to: to.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a metadata patch failed error
pub fn metadata_failed(path: &Path, reason: impl ToString) -> BundlerError {
    BundlerError::MetadataPatchFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a permission fix failed error
pub fn permission_failed(path: &Path, reason: impl ToString) -> BundlerError {
    BundlerError::PermissionFixFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
