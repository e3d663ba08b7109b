//! Default command: build the application archive

use std::path::Path;

use console::Style;

use crate::config::BundlerConfig;
use crate::error::Result;
use crate::pipeline::{BundleOutcome, BundleRequest, Pipeline};
use crate::runner::SystemRunner;
use crate::ui::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter};

/// Output switches shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub verbose: bool,
    pub quiet: bool,
}

pub fn run(config_path: Option<&Path>, request: &BundleRequest, options: OutputOptions) -> Result<()> {
    let config = BundlerConfig::load(config_path)?;

    let mut reporter: Box<dyn ProgressReporter> = if options.quiet {
        Box::new(SilentProgressReporter)
    } else {
        Box::new(InteractiveProgressReporter::new(options.verbose))
    };

    let outcome = Pipeline::new(&config, &SystemRunner).run(request, reporter.as_mut())?;

    if !options.quiet {
        print_summary(&outcome, options.verbose);
    }

    Ok(())
}

fn print_summary(outcome: &BundleOutcome, verbose: bool) {
    println!(
        "{} {} ({})",
        Style::new().green().bold().apply_to("Created"),
        outcome.output.display(),
        Style::new().bold().apply_to(&outcome.bundle_name)
    );

    if !verbose {
        return;
    }

    println!(
        "  Runtime archive: {:?}, output compression: {:?}",
        outcome.format, outcome.compression
    );

    match &outcome.metadata {
        Some(report) => println!(
            "  Info.plist: display name {}, {} package identifier(s) replaced",
            if report.display_replaced {
                "replaced"
            } else {
                "not found"
            },
            report.package_replacements
        ),
        None => println!("  Info.plist: not present, skipped"),
    }

    println!(
        "  Permissions: {} updated, {} skipped, {} missing",
        outcome.permissions.updated.len(),
        outcome.permissions.skipped.len(),
        outcome.permissions.missing.len()
    );
}
