//! Output archive creation
//!
//! The finished bundle is written as a tar archive whose single top-level
//! entry is the bundle directory. Symlinks are stored as symlink entries and
//! mode bits are stored as they are on disk, so the permission pass has to
//! run before packing.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{Builder, HeaderMode};

use crate::error::{self, Result};

/// Compression applied to the output archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCompression {
    None,
    Gzip,
}

impl OutputCompression {
    /// Pick compression from the output file name
    pub fn for_output(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Self::Gzip
        } else {
            Self::None
        }
    }
}

/// Writes a bundle directory into a tar archive
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchivePacker {
    reproducible: bool,
}

impl ArchivePacker {
    pub fn new(reproducible: bool) -> Self {
        Self { reproducible }
    }

    /// Pack `bundle_root` into `output`
    ///
    /// The archive is assembled in a temporary file next to `output` and only
    /// moved into place once complete.
    pub fn pack(&self, bundle_root: &Path, output: &Path) -> Result<OutputCompression> {
        let entry_name = bundle_root
            .file_name()
            .ok_or_else(|| error::archive::create_failed(output, "bundle root has no name"))?
            .to_owned();

        let parent = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        std::fs::create_dir_all(&parent).map_err(|e| error::archive::create_failed(output, e))?;

        let mut partial = tempfile::Builder::new()
            .prefix(".electron-bundler-")
            .suffix(".partial")
            .tempfile_in(&parent)
            .map_err(|e| error::archive::create_failed(output, e))?;

        let compression = OutputCompression::for_output(output);
        let file = partial.as_file_mut();

        match compression {
            OutputCompression::None => {
                self.write_tar(file, &entry_name, bundle_root)
                    .map_err(|e| error::archive::create_failed(output, e))?;
            }
            OutputCompression::Gzip => {
                let encoder = GzEncoder::new(file, Compression::default());
                self.write_tar(encoder, &entry_name, bundle_root)
                    .and_then(GzEncoder::finish)
                    .map_err(|e| error::archive::create_failed(output, e))?;
            }
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(partial.path(), std::fs::Permissions::from_mode(0o644))
                .map_err(|e| error::archive::create_failed(output, e))?;
        }

        partial
            .persist(output)
            .map_err(|e| error::archive::create_failed(output, e.error))?;

        Ok(compression)
    }

    fn write_tar<W: Write>(
        &self,
        writer: W,
        entry_name: &std::ffi::OsStr,
        bundle_root: &Path,
    ) -> std::io::Result<W> {
        let mut builder = Builder::new(writer);
        builder.follow_symlinks(false);
        builder.mode(if self.reproducible {
            HeaderMode::Deterministic
        } else {
            HeaderMode::Complete
        });
        builder.append_dir_all(entry_name, bundle_root)?;
        builder.into_inner()
    }
}
