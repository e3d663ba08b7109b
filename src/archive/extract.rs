//! Runtime archive extraction
//!
//! Zip archives are handed to `unzip` through the [`CommandRunner`] port.
//! Tar archives (plain or gzip-compressed) are unpacked in-process with the
//! `tar` crate. Both routes recreate symlinks as symlinks.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{self, Result};
use crate::runner::CommandRunner;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const ZIP_MAGIC: &[u8] = b"PK";
const USTAR_MAGIC: &[u8] = b"ustar";
const USTAR_OFFSET: usize = 257;

/// Container format of a runtime archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Detect the format from the leading bytes
    ///
    /// Anything unrecognised is treated as zip and left for `unzip` to reject.
    pub fn sniff(header: &[u8]) -> Self {
        if header.starts_with(GZIP_MAGIC) {
            Self::TarGz
        } else if header.starts_with(ZIP_MAGIC) {
            Self::Zip
        } else if header.get(USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len()) == Some(USTAR_MAGIC) {
            Self::Tar
        } else {
            Self::Zip
        }
    }

    pub fn detect(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| error::archive::extraction_failed(path, e.to_string()))?;

        let mut header = Vec::with_capacity(512);
        file.take(512)
            .read_to_end(&mut header)
            .map_err(|e| error::archive::extraction_failed(path, e.to_string()))?;

        Ok(Self::sniff(&header))
    }
}

/// Extracts runtime archives into a staging directory
pub struct ArchiveExtractor<'a, R: CommandRunner> {
    runner: &'a R,
    unzip_program: &'a str,
}

impl<'a, R: CommandRunner> ArchiveExtractor<'a, R> {
    pub fn new(runner: &'a R, unzip_program: &'a str) -> Self {
        Self {
            runner,
            unzip_program,
        }
    }

    /// Extract `archive` into `dest`, returning the detected format
    pub fn extract(&self, archive: &Path, dest: &Path) -> Result<ArchiveFormat> {
        let format = ArchiveFormat::detect(archive)?;

        match format {
            ArchiveFormat::Zip => self.extract_zip(archive, dest)?,
            ArchiveFormat::Tar => {
                let file = open(archive)?;
                unpack_tar(BufReader::new(file), archive, dest)?;
            }
            ArchiveFormat::TarGz => {
                let file = open(archive)?;
                unpack_tar(GzDecoder::new(BufReader::new(file)), archive, dest)?;
            }
        }

        Ok(format)
    }

    fn extract_zip(&self, archive: &Path, dest: &Path) -> Result<()> {
        let args: Vec<OsString> = vec![
            "-q".into(),
            archive.as_os_str().to_owned(),
            "-d".into(),
            dest.as_os_str().to_owned(),
        ];

        let output = self.runner.run(self.unzip_program, &args).map_err(|e| {
            error::archive::extraction_failed(
                archive,
                format!("failed to run {}: {e}", self.unzip_program),
            )
        })?;

        if !output.success {
            return Err(error::archive::extraction_failed(
                archive,
                output.diagnostic(),
            ));
        }

        Ok(())
    }
}

fn open(archive: &Path) -> Result<File> {
    File::open(archive).map_err(|e| error::archive::extraction_failed(archive, e.to_string()))
}

fn unpack_tar<T: Read>(reader: T, archive: &Path, dest: &Path) -> Result<()> {
    let mut tar = tar::Archive::new(reader);
    tar.set_preserve_permissions(true);
    tar.set_overwrite(true);
    tar.unpack(dest)
        .map_err(|e| error::archive::extraction_failed(archive, e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BundlerError;
    use crate::runner::CommandOutput;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Records invocations and plays back a canned result
    struct FakeRunner {
        calls: RefCell<Vec<(String, Vec<OsString>)>>,
        output: CommandOutput,
        populate: bool,
    }

    impl FakeRunner {
        fn succeeding() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                output: CommandOutput {
                    success: true,
                    code: Some(0),
                    ..CommandOutput::default()
                },
                populate: true,
            }
        }

        fn failing(stderr: &str) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                output: CommandOutput {
                    success: false,
                    code: Some(9),
                    stderr: stderr.to_string(),
                    ..CommandOutput::default()
                },
                populate: false,
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, program: &str, args: &[OsString]) -> std::io::Result<CommandOutput> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            if self.populate {
                let dest = PathBuf::from(&args[3]);
                std::fs::create_dir_all(dest.join("Electron.app/Contents"))?;
            }
            Ok(self.output.clone())
        }
    }

    fn write_zip_header(dir: &Path) -> PathBuf {
        let path = dir.join("electron.zip");
        std::fs::write(&path, b"PK\x03\x04rest-of-zip").unwrap();
        path
    }

    #[test]
    fn test_sniff_formats() {
        assert_eq!(ArchiveFormat::sniff(b"PK\x03\x04"), ArchiveFormat::Zip);
        assert_eq!(ArchiveFormat::sniff(&[0x1f, 0x8b, 0x08]), ArchiveFormat::TarGz);

        let mut tar_header = vec![0u8; 512];
        tar_header[257..262].copy_from_slice(b"ustar");
        assert_eq!(ArchiveFormat::sniff(&tar_header), ArchiveFormat::Tar);

        assert_eq!(ArchiveFormat::sniff(b"garbage"), ArchiveFormat::Zip);
        assert_eq!(ArchiveFormat::sniff(b""), ArchiveFormat::Zip);
    }

    #[test]
    fn test_zip_extraction_invokes_unzip() {
        let temp = TempDir::new().unwrap();
        let archive = write_zip_header(temp.path());
        let dest = temp.path().join("staging");
        std::fs::create_dir(&dest).unwrap();

        let runner = FakeRunner::succeeding();
        let format = ArchiveExtractor::new(&runner, "unzip")
            .extract(&archive, &dest)
            .unwrap();

        assert_eq!(format, ArchiveFormat::Zip);
        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "unzip");
        assert_eq!(calls[0].1[0], OsString::from("-q"));
        assert_eq!(calls[0].1[1], archive.as_os_str());
        assert_eq!(calls[0].1[2], OsString::from("-d"));
        assert!(dest.join("Electron.app/Contents").is_dir());
    }

    #[test]
    fn test_zip_extraction_failure_carries_stderr() {
        let temp = TempDir::new().unwrap();
        let archive = write_zip_header(temp.path());
        let runner = FakeRunner::failing("End-of-central-directory signature not found");

        let err = ArchiveExtractor::new(&runner, "unzip")
            .extract(&archive, temp.path())
            .unwrap_err();

        match err {
            BundlerError::ExtractionFailed { reason, .. } => {
                assert!(reason.contains("End-of-central-directory"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_archive_is_extraction_error() {
        let temp = TempDir::new().unwrap();
        let runner = FakeRunner::succeeding();

        let result = ArchiveExtractor::new(&runner, "unzip")
            .extract(&temp.path().join("missing.zip"), temp.path());

        assert!(matches!(result, Err(BundlerError::ExtractionFailed { .. })));
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_spawn_failure_is_extraction_error() {
        let temp = TempDir::new().unwrap();
        let archive = write_zip_header(temp.path());

        let result = ArchiveExtractor::new(&crate::runner::SystemRunner, "no-such-unzip-binary")
            .extract(&archive, temp.path());

        match result {
            Err(BundlerError::ExtractionFailed { reason, .. }) => {
                assert!(reason.contains("no-such-unzip-binary"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_tar_gz_extraction_preserves_symlinks() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        std::fs::create_dir_all(source.join("Versions/A")).unwrap();
        std::fs::write(source.join("Versions/A/lib"), b"binary").unwrap();
        std::os::unix::fs::symlink("A", source.join("Versions/Current")).unwrap();

        let archive_path = temp.path().join("runtime.tar.gz");
        {
            let file = File::create(&archive_path).unwrap();
            let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
            builder.follow_symlinks(false);
            builder.append_dir_all("Electron.app", &source).unwrap();
            builder.into_inner().unwrap().finish().unwrap();
        }

        let dest = temp.path().join("staging");
        std::fs::create_dir(&dest).unwrap();
        let runner = FakeRunner::succeeding();
        let format = ArchiveExtractor::new(&runner, "unzip")
            .extract(&archive_path, &dest)
            .unwrap();

        assert_eq!(format, ArchiveFormat::TarGz);
        assert!(runner.calls.borrow().is_empty());
        let link = dest.join("Electron.app/Versions/Current");
        assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_link(&link).unwrap(), PathBuf::from("A"));
    }
}
