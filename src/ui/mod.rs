//! UI/Progress presentation layer
//!
//! This module handles:
//! - Progress reporting for the bundling stages
//! - Interactive progress bars using indicatif
//! - Silent progress for quiet mode and tests
//!
//! All progress reporting goes through the ProgressReporter trait, allowing
//! different implementations based on command-line flags (e.g., --quiet, --verbose).

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Locate,
    Assemble,
    Patch,
    Permissions,
    Pack,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Extract,
        Stage::Locate,
        Stage::Assemble,
        Stage::Patch,
        Stage::Permissions,
        Stage::Pack,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Extract => "Extracting runtime archive",
            Stage::Locate => "Locating bundle root",
            Stage::Assemble => "Assembling bundle",
            Stage::Patch => "Patching Info.plist",
            Stage::Permissions => "Fixing permissions",
            Stage::Pack => "Writing output archive",
        }
    }
}

/// Progress reporter trait for the bundling pipeline
///
/// This trait allows different progress reporting strategies:
/// - Interactive progress bars (default)
/// - Silent/no-op progress for quiet mode
/// - Verbose output with per-stage detail lines
pub trait ProgressReporter: Send + Sync {
    /// A stage is starting
    fn stage(&mut self, stage: Stage);

    /// Additional information about the current stage
    fn detail(&mut self, message: &str);

    /// A non-fatal problem worth telling the user about
    fn warn(&mut self, message: &str);

    /// All stages completed
    fn finish(&mut self);

    /// Abandon on error
    fn abandon(&mut self);
}

/// Interactive progress reporter with a stage progress bar
pub struct InteractiveProgressReporter {
    pb: ProgressBar,
    verbose: bool,
    started: bool,
}

impl InteractiveProgressReporter {
    pub fn new(verbose: bool) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(Stage::ALL.len() as u64);
        pb.set_style(style);

        Self {
            pb,
            verbose,
            started: false,
        }
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn stage(&mut self, stage: Stage) {
        if self.started {
            self.pb.inc(1);
        }
        self.started = true;
        self.pb.set_message(stage.label());
    }

    fn detail(&mut self, message: &str) {
        if self.verbose {
            let line = format!("  {}", Style::new().dim().apply_to(message));
            self.pb.suspend(|| eprintln!("{line}"));
        }
    }

    fn warn(&mut self, message: &str) {
        let line = format!("{} {message}", Style::new().yellow().bold().apply_to("warning:"));
        self.pb.suspend(|| eprintln!("{line}"));
    }

    fn finish(&mut self) {
        self.pb.set_position(Stage::ALL.len() as u64);
        self.pb.finish_and_clear();
    }

    fn abandon(&mut self) {
        self.pb.abandon();
    }
}

/// Silent progress reporter for quiet mode
///
/// No-op implementation that does not display anything.
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn stage(&mut self, _stage: Stage) {}

    fn detail(&mut self, _message: &str) {}

    fn warn(&mut self, _message: &str) {}

    fn finish(&mut self) {}

    fn abandon(&mut self) {}
}
