//! Pack command implementation.

use crate::export::load_sprite;
use oxispr_core::{ArchiveLayout, ArchiveWriter, Compositor, PixelGrid, SprError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Slot id encoded in a `<slot>.png` file name.
fn slot_of(path: &Path) -> Option<u32> {
    let ext = path.extension()?.to_str()?;
    if !ext.eq_ignore_ascii_case("png") {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .parse::<u32>()
        .ok()
        .filter(|slot| *slot >= 1)
}

/// PNG files of `dir` keyed by slot id.
fn scan(dir: &Path) -> std::io::Result<BTreeMap<u32, PathBuf>> {
    let mut found = BTreeMap::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        match slot_of(&path) {
            Some(slot) => {
                found.insert(slot, path);
            }
            None => debug!(path = %path.display(), "skipping file without a slot id"),
        }
    }
    Ok(found)
}

/// Assemble an archive with `count` recorded sprites from `sprites`.
fn build(
    sprites: &BTreeMap<u32, PixelGrid>,
    count: u32,
    layout: ArchiveLayout,
) -> oxispr_core::Result<Vec<u8>> {
    let mut writer = ArchiveWriter::new(layout);
    for slot in 1..count {
        writer.push(sprites.get(&slot));
    }
    writer.finish()
}

pub fn cmd_pack(
    input: &Path,
    archive: &Path,
    layout: ArchiveLayout,
    count: Option<u32>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = scan(input)?;
    let highest = files.keys().next_back().copied().unwrap_or(0);
    let count = count.unwrap_or(highest.saturating_add(1));
    if highest >= count {
        return Err(SprError::invalid_image(format!(
            "slot {highest} does not fit a sprite count of {count}"
        ))
        .into());
    }

    let compositor = Compositor::default();
    let mut sprites = BTreeMap::new();
    for (slot, path) in &files {
        sprites.insert(*slot, load_sprite(path, &compositor)?);
        if verbose {
            println!("  Added: {}", path.display());
        }
    }

    let data = build(&sprites, count, layout)?;
    fs::write(archive, &data)?;

    println!(
        "Packed {} sprites into {} ({} slots, {} bytes)",
        sprites.len(),
        archive.display(),
        count.saturating_sub(1),
        data.len()
    );
    Ok(())
}
