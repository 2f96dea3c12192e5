//! Extract command implementation.

use crate::export::PngExporter;
use crate::utils::{BarProgress, create_progress_bar, display_name, print_failures};
use oxispr_core::{
    ArchiveLayout, ArchiveSource, DecodeOptions, FailureMode, Pipeline, PipelineConfig,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tracing::info;

/// Flags of the `extract` command.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub layout: ArchiveLayout,
    pub threads: Option<usize>,
    pub strict: bool,
    pub validate_addresses: bool,
    pub from: Option<u32>,
    pub to: Option<u32>,
    pub progress: bool,
    pub verbose: bool,
}

impl ExtractOptions {
    fn pipeline_config(&self) -> PipelineConfig {
        let decode = DecodeOptions {
            layout: self.layout,
            validate_addresses: self.validate_addresses,
            ..DecodeOptions::default()
        };
        let slots = match (self.from, self.to) {
            (None, None) => None,
            (from, to) => Some(from.unwrap_or(1)..=to.unwrap_or(u32::MAX)),
        };

        PipelineConfig {
            decode,
            failure_mode: if self.strict {
                FailureMode::Abort
            } else {
                FailureMode::Continue
            },
            threads: self.threads,
            slots,
        }
    }
}

pub fn cmd_extract(
    archive: &Path,
    output: &Path,
    opts: ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = ArchiveSource::open(archive)?;
    let pipeline = Pipeline::new(&source, opts.pipeline_config())?;
    let exporter = PngExporter::create(output)?;

    let slots = pipeline.slots().len();
    info!(
        archive = %archive.display(),
        output = %output.display(),
        slots,
        "extracting"
    );

    if opts.verbose {
        println!(
            "Extracting {} ({} layout, {} slots) to {}",
            display_name(archive),
            pipeline.header().layout,
            slots,
            output.display()
        );
    }

    let pb = create_progress_bar(slots as u64, opts.progress);
    pb.set_message("Processing sprites");
    let progress = BarProgress(pb);

    let report = pipeline.run(&exporter, &progress, &AtomicBool::new(false));
    progress.0.finish_with_message("Done");
    let report = report?;

    println!("{} images exported successfully", report.exported);
    if opts.verbose {
        println!("  Empty slots: {}", report.absent);
    }

    print_failures(&report);
    if !report.is_clean() {
        println!("{} slots failed", report.failures.len());
        std::process::exit(2);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ExtractOptions {
        ExtractOptions {
            layout: ArchiveLayout::Classic,
            threads: None,
            strict: false,
            validate_addresses: false,
            from: None,
            to: None,
            progress: false,
            verbose: false,
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = opts().pipeline_config();
        assert_eq!(config.failure_mode, FailureMode::Continue);
        assert_eq!(config.slots, None);
        assert!(!config.decode.validate_addresses);
    }

    #[test]
    fn test_config_strict_range() {
        let config = ExtractOptions {
            strict: true,
            validate_addresses: true,
            from: Some(10),
            ..opts()
        }
        .pipeline_config();
        assert_eq!(config.failure_mode, FailureMode::Abort);
        assert_eq!(config.slots, Some(10..=u32::MAX));
        assert!(config.decode.validate_addresses);
    }
}
