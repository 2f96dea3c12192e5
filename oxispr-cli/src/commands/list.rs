//! List command implementation.

use oxispr_core::{ArchiveLayout, ArchiveSource, Pipeline, PipelineConfig, SprError, SpriteInfo};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct SpriteEntry {
    slot: u32,
    offset: Option<usize>,
    block_len: Option<u16>,
    runs: Option<usize>,
    colored_pixels: Option<usize>,
    error: Option<String>,
}

impl SpriteEntry {
    fn from_info(slot: u32, info: SpriteInfo) -> Self {
        Self {
            slot,
            offset: Some(info.offset),
            block_len: Some(info.block_len),
            runs: Some(info.runs),
            colored_pixels: Some(info.colored_pixels),
            error: None,
        }
    }

    fn from_error(slot: u32, err: &SprError) -> Self {
        let offset = match err {
            SprError::Slot { offset, .. } => Some(*offset),
            _ => None,
        };
        Self {
            slot,
            offset,
            block_len: None,
            runs: None,
            colored_pixels: None,
            error: Some(err.to_string()),
        }
    }
}

fn collect(pipeline: &Pipeline<'_>) -> Vec<SpriteEntry> {
    pipeline
        .slots()
        .into_iter()
        .filter_map(|slot| match pipeline.inspect_slot(slot) {
            Ok(Some(info)) => Some(SpriteEntry::from_info(slot, info)),
            Ok(None) => None,
            Err(e) => Some(SpriteEntry::from_error(slot, &e)),
        })
        .collect()
}

pub fn cmd_list(
    archive: &Path,
    layout: ArchiveLayout,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = ArchiveSource::open(archive)?;
    let pipeline = Pipeline::new(&source, PipelineConfig::new(layout))?;
    let entries = collect(&pipeline);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Archive: {} ({} layout)", archive.display(), layout);
    println!();
    println!(
        "{:>6} {:>10} {:>6} {:>5} {:>7}",
        "Slot", "Offset", "Length", "Runs", "Pixels"
    );
    println!("{}", "-".repeat(40));

    let mut total_pixels = 0usize;
    for entry in &entries {
        match (&entry.error, entry.offset) {
            (Some(err), _) if verbose => println!("{:>6} {}", entry.slot, err),
            (Some(_), Some(offset)) => println!("{:>6} {:>#10x} <corrupt>", entry.slot, offset),
            (Some(_), None) => println!("{:>6} {:>10} <corrupt>", entry.slot, "-"),
            (None, offset) => {
                let pixels = entry.colored_pixels.unwrap_or(0);
                total_pixels += pixels;
                println!(
                    "{:>6} {:>#10x} {:>6} {:>5} {:>7}",
                    entry.slot,
                    offset.unwrap_or(0),
                    entry.block_len.unwrap_or(0),
                    entry.runs.unwrap_or(0),
                    pixels
                );
            }
        }
    }

    println!("{}", "-".repeat(40));
    println!("{} sprites, {} colored pixels", entries.len(), total_pixels);

    Ok(())
}
