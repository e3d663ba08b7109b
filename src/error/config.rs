//! Configuration errors

use std::path::Path;

use super::BundlerError;

/// Creates a configuration parse failed error
pub fn parse_failed(path: &Path, reason: impl ToString) -> BundlerError {
    BundlerError::ConfigParseFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates an invalid configuration error
pub fn invalid(message: impl Into<String>) -> BundlerError {
    BundlerError::ConfigInvalid {
        message: message.into(),
    }
}
