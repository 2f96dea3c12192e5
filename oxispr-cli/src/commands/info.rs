//! Info command implementation.

use oxispr_core::{AddressTable, ArchiveHeader, ArchiveLayout, ArchiveSource, DecodeOptions};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ArchiveInfo {
    file: String,
    size: usize,
    layout: &'static str,
    signature: String,
    sprite_count: u32,
    slots: u32,
    present: usize,
    absent: usize,
    unreadable: usize,
    table_end: usize,
}

fn collect(archive: &Path, data: &[u8], layout: ArchiveLayout) -> oxispr_core::Result<ArchiveInfo> {
    let header = ArchiveHeader::parse(data, layout)?;
    let options = DecodeOptions {
        layout,
        ..DecodeOptions::default()
    };
    let table = AddressTable::new(data, header, &options);

    let (mut present, mut absent, mut unreadable) = (0, 0, 0);
    for (_, entry) in table.entries() {
        match entry {
            Ok(addr) if addr.is_present() => present += 1,
            Ok(_) => absent += 1,
            Err(_) => unreadable += 1,
        }
    }

    Ok(ArchiveInfo {
        file: archive.display().to_string(),
        size: data.len(),
        layout: layout.name(),
        signature: header
            .signature
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" "),
        sprite_count: header.sprite_count,
        slots: header.slot_count(),
        present,
        absent,
        unreadable,
        table_end: header.table_end(),
    })
}

pub fn cmd_info(
    archive: &Path,
    layout: ArchiveLayout,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = ArchiveSource::open(archive)?;
    let info = collect(archive, &source, layout)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Archive Information");
    println!("===================");
    println!("File: {}", info.file);
    println!("Size: {} bytes", info.size);
    println!("Layout: {}", info.layout);
    println!("Signature: {}", info.signature);
    println!("Sprite count: {} ({} addressable slots)", info.sprite_count, info.slots);
    println!("Address table ends at: {:#x}", info.table_end);
    println!();
    println!("Contents:");
    println!("  Sprites: {}", info.present);
    println!("  Empty slots: {}", info.absent);
    if info.unreadable > 0 {
        println!("  Unreadable entries: {}", info.unreadable);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxispr_core::{ArchiveWriter, PixelGrid};

    #[test]
    fn test_collect_counts() {
        let mut writer =
            ArchiveWriter::new(ArchiveLayout::Classic).with_signature([0xDE, 0xAD, 0xBE, 0xEF]);
        writer.push(None).push(Some(&PixelGrid::new())).push(None);
        let data = writer.finish().unwrap();

        let info = collect(Path::new("a.spr"), &data, ArchiveLayout::Classic).unwrap();
        assert_eq!(info.signature, "DE AD BE EF");
        assert_eq!(info.sprite_count, 4);
        assert_eq!(info.slots, 3);
        assert_eq!(info.present, 1);
        assert_eq!(info.absent, 2);
        assert_eq!(info.unreadable, 0);
        assert_eq!(info.table_end, 18);
    }

    #[test]
    fn test_collect_truncated_table() {
        let data = [0, 0, 0, 0, 0x03, 0x00, 0, 0, 0, 0];
        let info = collect(Path::new("b.spr"), &data, ArchiveLayout::Classic).unwrap();
        assert_eq!(info.absent, 1);
        assert_eq!(info.unreadable, 1);
    }
}
