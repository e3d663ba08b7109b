//! Common test utilities for electron-bundler integration tests

#![allow(dead_code)]

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use flate2::read::GzDecoder;
use tar::{EntryType, Header};
use tempfile::TempDir;

pub const VERSION_DIR: &str = "Contents/Frameworks/Electron Framework.framework/Versions/A";

pub const INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
  <key>CFBundleDisplayName</key>
  <string>Electron</string>
  <key>CFBundleExecutable</key>
  <string>Electron</string>
  <key>CFBundleIdentifier</key>
  <string>com.github.Electron</string>
  <key>CFBundleName</key>
  <string>Electron</string>
</dict>
</plist>
"#;

/// One entry of a fixture runtime tree, paths relative to the archive root
pub enum FixtureEntry {
    File { path: String, content: String, mode: u32 },
    Symlink { path: String, target: String },
}

impl FixtureEntry {
    fn file(path: impl Into<String>, content: &str) -> Self {
        Self::File {
            path: path.into(),
            content: content.to_string(),
            mode: 0o644,
        }
    }

    fn symlink(path: impl Into<String>, target: &str) -> Self {
        Self::Symlink {
            path: path.into(),
            target: target.to_string(),
        }
    }
}

/// Electron runtime layout with every binary stored without the executable bit
pub fn runtime_entries(with_plist: bool) -> Vec<FixtureEntry> {
    let app = "electron-v30.0.0-darwin-arm64/Electron.app";
    let framework = format!("{app}/Contents/Frameworks/Electron Framework.framework");
    let mut entries = vec![
        FixtureEntry::file(format!("{app}/Contents/MacOS/Electron"), "macho"),
        FixtureEntry::file(format!("{app}/{VERSION_DIR}/Electron Framework"), "framework"),
        FixtureEntry::file(
            format!("{app}/{VERSION_DIR}/Helpers/chrome_crashpad_handler"),
            "helper",
        ),
        FixtureEntry::file(format!("{app}/{VERSION_DIR}/Libraries/libffmpeg.dylib"), "lib"),
        FixtureEntry::file(format!("{app}/{VERSION_DIR}/Libraries/vk_swiftshader_icd.json"), "{}"),
        FixtureEntry::file(format!("{app}/Contents/Resources/default_app.asar"), "asar"),
        FixtureEntry::file("electron-v30.0.0-darwin-arm64/LICENSE", "MIT"),
        FixtureEntry::symlink(format!("{framework}/Versions/Current"), "A"),
        FixtureEntry::symlink(
            format!("{framework}/Electron Framework"),
            "Versions/Current/Electron Framework",
        ),
        FixtureEntry::symlink(format!("{framework}/Libraries"), "Versions/Current/Libraries"),
        FixtureEntry::symlink(
            format!("{app}/{VERSION_DIR}/Libraries/libEGL.dylib"),
            "libffmpeg.dylib",
        ),
    ];

    if with_plist {
        entries.push(FixtureEntry::file(format!("{app}/Contents/Info.plist"), INFO_PLIST));
    }

    entries
}

/// Write `entries` as a gzip-compressed tar archive
pub fn write_tar_gz(path: &Path, entries: &[FixtureEntry]) {
    let file = File::create(path).expect("Failed to create fixture archive");
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for entry in entries {
        let mut header = Header::new_gnu();
        header.set_mtime(0);
        match entry {
            FixtureEntry::File {
                path,
                content,
                mode,
            } => {
                header.set_entry_type(EntryType::Regular);
                header.set_mode(*mode);
                header.set_size(content.len() as u64);
                builder
                    .append_data(&mut header, path, content.as_bytes())
                    .expect("Failed to append file");
            }
            FixtureEntry::Symlink { path, target } => {
                header.set_entry_type(EntryType::Symlink);
                header.set_mode(0o777);
                header.set_size(0);
                builder
                    .append_link(&mut header, path, target)
                    .expect("Failed to append symlink");
            }
        }
    }

    builder
        .into_inner()
        .expect("Failed to finish tar")
        .finish()
        .expect("Failed to finish gzip");
}

/// Write `entries` as a zip archive with unix modes and symlinks
pub fn write_zip(path: &Path, entries: &[FixtureEntry]) {
    use zip::write::SimpleFileOptions;

    let file = File::create(path).expect("Failed to create fixture archive");
    let mut zip = zip::ZipWriter::new(file);
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for entry in entries {
        match entry {
            FixtureEntry::File {
                path,
                content,
                mode,
            } => {
                zip.start_file(path.as_str(), stored.unix_permissions(*mode))
                    .expect("Failed to start zip entry");
                zip.write_all(content.as_bytes())
                    .expect("Failed to write zip entry");
            }
            FixtureEntry::Symlink { path, target } => {
                zip.add_symlink(path.as_str(), target.as_str(), stored)
                    .expect("Failed to add zip symlink");
            }
        }
    }

    zip.finish().expect("Failed to finish zip");
}

/// Whether an `unzip` executable is available
pub fn unzip_available() -> bool {
    std::process::Command::new("unzip")
        .arg("-v")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// An entry read back from an output archive
#[derive(Debug, Clone)]
pub struct ArchivedEntry {
    pub path: String,
    pub entry_type: EntryType,
    pub mode: u32,
    pub link: Option<String>,
    pub content: Vec<u8>,
}

impl ArchivedEntry {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Read every entry of a tar or tar.gz archive
pub fn read_archive(path: &Path) -> Vec<ArchivedEntry> {
    let file = File::open(path).expect("Failed to open output archive");
    let name = path.to_string_lossy();
    if name.ends_with(".gz") || name.ends_with(".tgz") {
        collect_entries(tar::Archive::new(GzDecoder::new(file)))
    } else {
        collect_entries(tar::Archive::new(file))
    }
}

fn collect_entries<R: Read>(mut archive: tar::Archive<R>) -> Vec<ArchivedEntry> {
    archive
        .entries()
        .expect("Failed to read entries")
        .map(|entry| {
            let mut entry = entry.expect("Failed to read entry");
            let path = entry
                .path()
                .expect("Invalid entry path")
                .to_string_lossy()
                .trim_end_matches('/')
                .to_string();
            let link = entry
                .link_name()
                .expect("Invalid link name")
                .map(|l| l.to_string_lossy().into_owned());
            let entry_type = entry.header().entry_type();
            let mode = entry.header().mode().expect("Invalid mode") & 0o7777;
            let mut content = Vec::new();
            entry.read_to_end(&mut content).expect("Failed to read entry");
            ArchivedEntry {
                path,
                entry_type,
                mode,
                link,
                content,
            }
        })
        .collect()
}

pub fn find<'a>(entries: &'a [ArchivedEntry], path: &str) -> &'a ArchivedEntry {
    entries
        .iter()
        .find(|e| e.path == path)
        .unwrap_or_else(|| panic!("entry {path} not in archive"))
}

/// A scratch directory holding bundler inputs and outputs
pub struct TestWorkspace {
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Workspace with `main.js`, `index.html` and a tar.gz runtime archive
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let workspace = Self { temp, path };
        workspace.write_file("main.js", "const { app } = require('electron');\n");
        workspace.write_file("index.html", "<!doctype html><title>Foo</title>\n");
        workspace
    }

    pub fn with_runtime(with_plist: bool) -> Self {
        let workspace = Self::new();
        write_tar_gz(&workspace.runtime(), &runtime_entries(with_plist));
        workspace
    }

    pub fn runtime(&self) -> PathBuf {
        self.path.join("electron.tar.gz")
    }

    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// The five positionals for output `output` and application `app`
    pub fn bundle_args(&self, output: &str, app: &str) -> Vec<String> {
        vec![
            output.to_string(),
            app.to_string(),
            "main.js".to_string(),
            "index.html".to_string(),
            self.runtime().to_string_lossy().into_owned(),
        ]
    }

    /// Command for the real binary, run inside the workspace
    pub fn bundler_cmd(&self) -> Command {
        let mut cmd = bundler_cmd();
        cmd.current_dir(&self.path);
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn bundler_cmd() -> Command {
    let mut cmd = Command::cargo_bin("electron-bundler").expect("binary built");
    cmd.env_remove("ELECTRON_BUNDLER_CONFIG");
    cmd
}
