//! Bundler configuration
//!
//! Every value the pipeline treats as "fixed" lives here so that a change in
//! the runtime's bundle layout is a configuration change rather than a code
//! change. The defaults describe an Electron release for macOS:
//!
//! ```text
//! Electron.app/
//! └── Contents/
//!     ├── Info.plist                 <- metadata descriptor
//!     ├── MacOS/Electron             <- main executable
//!     ├── Frameworks/
//!     │   └── Electron Framework.framework/Versions/A/
//!     │       ├── Electron Framework
//!     │       ├── Helpers/*
//!     │       └── Libraries/*.dylib
//!     └── Resources/app/             <- resource directory
//! ```
//!
//! A YAML file can override any field; omitted fields keep their defaults.

pub mod permissions;

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use wax::Glob;

use crate::error::{self, BundlerError, Result};

pub use permissions::{PermissionTarget, TargetKind, default_permission_targets};

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "ELECTRON_BUNDLER_CONFIG";

/// Complete bundler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundlerConfig {
    pub layout: LayoutConfig,
    pub metadata: MetadataConfig,
    pub manifest: ManifestConfig,
    pub permissions: Vec<PermissionTarget>,
    pub extract: ExtractConfig,
    pub archive: ArchiveConfig,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            metadata: MetadataConfig::default(),
            manifest: ManifestConfig::default(),
            permissions: default_permission_targets(),
            extract: ExtractConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

/// Where things live inside the runtime bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Glob matched against directory names to find the bundle root
    pub source_bundle: String,
    /// Extension of the renamed bundle directory, without the dot
    pub bundle_extension: String,
    /// Resource directory, relative to the bundle root
    pub resources_dir: PathBuf,
    /// Metadata descriptor, relative to the bundle root
    pub metadata_file: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            source_bundle: "Electron.app".to_string(),
            bundle_extension: "app".to_string(),
            resources_dir: PathBuf::from("Contents/Resources/app"),
            metadata_file: PathBuf::from("Contents/Info.plist"),
        }
    }
}

impl LayoutConfig {
    /// Directory name of the finished bundle, e.g. `Foo.app`
    pub fn bundle_dir_name(&self, app_name: &str) -> String {
        format!("{app_name}.{}", self.bundle_extension)
    }
}

/// Identifying strings rewritten in the metadata descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    /// Display name shipped by the runtime; only its first occurrence is replaced
    pub display_identifier: String,
    /// Package identifier shipped by the runtime; every occurrence is replaced
    pub package_identifier: String,
    /// Prefix prepended to the application name to build the new package identifier
    pub organization_prefix: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            display_identifier: "Electron".to_string(),
            package_identifier: "com.github.Electron".to_string(),
            organization_prefix: "com.gazel.".to_string(),
        }
    }
}

impl MetadataConfig {
    /// Package identifier derived for an application
    pub fn package_identifier_for(&self, app_name: &str) -> String {
        format!("{}{app_name}", self.organization_prefix)
    }
}

/// Names of the generated files in the resource directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    pub version: String,
    pub entry_file: String,
    pub markup_file: String,
    pub file_name: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            entry_file: "main.js".to_string(),
            markup_file: "index.html".to_string(),
            file_name: "package.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Program used for zip extraction; must understand `-q <zip> -d <dir>`
    pub unzip_program: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            unzip_program: "unzip".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Normalize ownership and timestamps in the output archive
    pub reproducible: bool,
}

impl BundlerConfig {
    /// Load configuration from an optional YAML file
    ///
    /// Without a path the built-in defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.is_file() {
            return Err(BundlerError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| error::fs::read_failed(path, e))?;
        Self::from_yaml(&content, path)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str, origin: &Path) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| error::config::parse_failed(origin, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if self.layout.bundle_extension.is_empty() || self.layout.bundle_extension.contains('/') {
            return Err(error::config::invalid(
                "layout.bundle_extension must be a non-empty name without '/'",
            ));
        }

        Glob::new(&self.layout.source_bundle).map_err(|e| {
            error::config::invalid(format!("layout.source_bundle is not a valid glob: {e}"))
        })?;

        check_relative("layout.resources_dir", &self.layout.resources_dir)?;
        check_relative("layout.metadata_file", &self.layout.metadata_file)?;

        for (field, name) in [
            ("manifest.entry_file", &self.manifest.entry_file),
            ("manifest.markup_file", &self.manifest.markup_file),
            ("manifest.file_name", &self.manifest.file_name),
        ] {
            check_file_name(field, name)?;
        }

        if self.metadata.display_identifier.is_empty()
            || self.metadata.package_identifier.is_empty()
        {
            return Err(error::config::invalid(
                "metadata identifiers must not be empty",
            ));
        }

        for target in &self.permissions {
            check_relative("permissions.path", &target.path)?;
            target.validate()?;
        }

        Ok(())
    }
}

/// Reject absolute paths and paths escaping the bundle
fn check_relative(field: &str, path: &Path) -> Result<()> {
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if path.as_os_str().is_empty() || escapes {
        return Err(error::config::invalid(format!(
            "{field} must be a relative path inside the bundle, got '{}'",
            path.display()
        )));
    }

    Ok(())
}

fn check_file_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(error::config::invalid(format!(
            "{field} must be a plain file name, got '{name}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = BundlerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layout.source_bundle, "Electron.app");
        assert_eq!(config.manifest.version, "1.0.0");
        assert_eq!(config.permissions.len(), 4);
    }

    #[test]
    fn test_resources_dir_is_three_levels() {
        let config = BundlerConfig::default();
        assert_eq!(config.layout.resources_dir.components().count(), 3);
    }

    #[test]
    fn test_bundle_dir_name() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.bundle_dir_name("Foo"), "Foo.app");
    }

    #[test]
    fn test_package_identifier_for() {
        let metadata = MetadataConfig::default();
        assert_eq!(metadata.package_identifier_for("Foo"), "com.gazel.Foo");
    }

    #[test]
    fn test_load_without_path_returns_defaults() {
        let config = BundlerConfig::load(None).unwrap();
        assert_eq!(config, BundlerConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = BundlerConfig::load(Some(&temp.path().join("missing.yaml")));
        assert!(matches!(result, Err(BundlerError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r"
metadata:
  organization_prefix: org.example.
archive:
  reproducible: true
";
        let config = BundlerConfig::from_yaml(yaml, Path::new("bundler.yaml")).unwrap();
        assert_eq!(config.metadata.organization_prefix, "org.example.");
        assert_eq!(config.metadata.display_identifier, "Electron");
        assert!(config.archive.reproducible);
        assert_eq!(config.permissions, default_permission_targets());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "layout:\n  bundle_ext: app\n";
        let result = BundlerConfig::from_yaml(yaml, Path::new("bundler.yaml"));
        assert!(matches!(result, Err(BundlerError::ConfigParseFailed { .. })));
    }

    #[test]
    fn test_absolute_resources_dir_rejected() {
        let yaml = "layout:\n  resources_dir: /etc\n";
        let result = BundlerConfig::from_yaml(yaml, Path::new("bundler.yaml"));
        assert!(matches!(result, Err(BundlerError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_escaping_permission_path_rejected() {
        let yaml = "permissions:\n  - path: ../outside\n";
        let result = BundlerConfig::from_yaml(yaml, Path::new("bundler.yaml"));
        assert!(matches!(result, Err(BundlerError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_empty_extension_rejected() {
        let yaml = "layout:\n  bundle_extension: ''\n";
        let result = BundlerConfig::from_yaml(yaml, Path::new("bundler.yaml"));
        assert!(matches!(result, Err(BundlerError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_manifest_file_name_with_slash_rejected() {
        let yaml = "manifest:\n  entry_file: src/main.js\n";
        let result = BundlerConfig::from_yaml(yaml, Path::new("bundler.yaml"));
        assert!(matches!(result, Err(BundlerError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bundler.yaml");
        fs::write(&path, "layout:\n  bundle_extension: bundle\n").unwrap();

        let config = BundlerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.layout.bundle_dir_name("Foo"), "Foo.bundle");
    }
}
