//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use oxispr_core::{PipelineReport, Progress};
use std::path::Path;

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Adapts a [`ProgressBar`] to the pipeline's progress observer.
pub struct BarProgress(pub ProgressBar);

impl Progress for BarProgress {
    fn on_progress(&self, processed: usize, _total: usize) {
        // Workers finish out of order; never move the bar backwards.
        if processed as u64 > self.0.position() {
            self.0.set_position(processed as u64);
        }
    }
}

/// File name of `path` for display.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// Print the failures of a run, one line per slot.
pub fn print_failures(report: &PipelineReport) {
    if report.failures.is_empty() {
        return;
    }

    println!();
    println!("Errors:");
    for failure in &report.failures {
        let kind = if failure.export { "export" } else { "decode" };
        println!(
            "  slot {:>6} @ {:#010x} [{}]: {}",
            failure.slot, failure.offset, kind, failure.message
        );
    }
}
