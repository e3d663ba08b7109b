//! Extraction and archive creation errors

use std::path::Path;

use super::BundlerError;

/// Creates an extraction failed error
pub fn extraction_failed(archive: &Path, reason: impl Into<String>) -> BundlerError {
    BundlerError::ExtractionFailed {
        archive: archive.display().to_string(),
        reason: reason.into(),
    }
}

/// Creates an archive creation failed error
pub fn create_failed(path: &Path, reason: impl ToString) -> BundlerError {
    BundlerError::ArchiveCreateFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
