//! Bundling pipeline
//!
//! Sequences extraction, location, assembly, metadata patching, permission
//! fixing and packing inside one [`StagingWorkspace`]. The first failing
//! stage aborts the run; the workspace is removed on every exit path.

pub mod workspace;

use std::path::{Path, PathBuf};

use crate::archive::{ArchiveExtractor, ArchiveFormat, ArchivePacker, OutputCompression};
use crate::bundle::{
    AssemblyInputs, BundleAssembler, PatchReport, PermissionReport, fix_permissions,
    locate_bundle_root, patch_metadata, validate_app_name,
};
use crate::config::BundlerConfig;
use crate::error::Result;
use crate::runner::CommandRunner;
use crate::ui::{ProgressReporter, Stage};

pub use workspace::StagingWorkspace;

/// Everything one bundling run needs from the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    pub output: PathBuf,
    pub app_name: String,
    pub entry_script: PathBuf,
    pub markup: PathBuf,
    pub runtime_archive: PathBuf,
    pub assets: Vec<PathBuf>,
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct BundleOutcome {
    pub output: PathBuf,
    pub bundle_name: String,
    pub format: ArchiveFormat,
    /// `None` when the bundle had no Info.plist
    pub metadata: Option<PatchReport>,
    pub permissions: PermissionReport,
    pub compression: OutputCompression,
}

pub struct Pipeline<'a, R: CommandRunner> {
    config: &'a BundlerConfig,
    runner: &'a R,
}

impl<'a, R: CommandRunner> Pipeline<'a, R> {
    pub fn new(config: &'a BundlerConfig, runner: &'a R) -> Self {
        Self { config, runner }
    }

    /// Build the output archive described by `request`
    pub fn run(
        &self,
        request: &BundleRequest,
        progress: &mut dyn ProgressReporter,
    ) -> Result<BundleOutcome> {
        validate_app_name(&request.app_name)?;

        let workspace = StagingWorkspace::create()?;
        progress.detail(&format!("staging in {}", workspace.path().display()));

        let result = self.run_stages(workspace.path(), request, progress);
        match &result {
            Ok(_) => progress.finish(),
            Err(_) => progress.abandon(),
        }

        if let Err(e) = workspace.close() {
            progress.warn(&e.to_string());
        }

        result
    }

    fn run_stages(
        &self,
        staging: &Path,
        request: &BundleRequest,
        progress: &mut dyn ProgressReporter,
    ) -> Result<BundleOutcome> {
        progress.stage(Stage::Extract);
        let extractor = ArchiveExtractor::new(self.runner, &self.config.extract.unzip_program);
        let format = extractor.extract(&request.runtime_archive, staging)?;
        progress.detail(&format!("runtime archive format: {format:?}"));

        progress.stage(Stage::Locate);
        let located = locate_bundle_root(staging, &self.config.layout.source_bundle)?;
        progress.detail(&format!("found {}", located.display()));

        progress.stage(Stage::Assemble);
        let inputs = AssemblyInputs {
            app_name: &request.app_name,
            entry_script: &request.entry_script,
            markup: &request.markup,
            assets: &request.assets,
        };
        let descriptor = BundleAssembler::new(self.config).assemble(staging, &located, &inputs)?;
        progress.detail(&format!(
            "populated {}",
            descriptor.resources_dir.display()
        ));

        progress.stage(Stage::Patch);
        let metadata = patch_metadata(&descriptor, &self.config.metadata)?;
        match &metadata {
            Some(report) => progress.detail(&format!(
                "display name replaced: {}, package identifiers replaced: {}",
                report.display_replaced, report.package_replacements
            )),
            None => progress.detail("no Info.plist, skipped"),
        }

        progress.stage(Stage::Permissions);
        let permissions = fix_permissions(&descriptor.root, &self.config.permissions)?;
        for path in &permissions.missing_required {
            progress.warn(&format!("expected executable not found: {}", path.display()));
        }
        progress.detail(&format!(
            "{} files marked executable, {} skipped",
            permissions.updated.len(),
            permissions.skipped.len()
        ));

        progress.stage(Stage::Pack);
        let compression = ArchivePacker::new(self.config.archive.reproducible)
            .pack(&descriptor.root, &request.output)?;

        Ok(BundleOutcome {
            output: request.output.clone(),
            bundle_name: descriptor.dir_name(),
            format,
            metadata,
            permissions,
            compression,
        })
    }
}
