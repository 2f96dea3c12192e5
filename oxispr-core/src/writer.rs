//! Sprite block encoder and archive writer.
//!
//! The encoder produces blocks the decoder reads back bit-exact: alpha 0
//! pixels become skipped spans, every other pixel is stored as RGB and
//! comes back with alpha 255. Trailing transparent pixels are not stored.

use crate::config::ArchiveLayout;
use crate::decoder::{RESERVED_LEN, RunPair};
use crate::error::{Result, SprError};
use crate::grid::PixelGrid;

/// Split `grid` into run pairs, each with the colors of its colored span.
pub fn runs(grid: &PixelGrid) -> Vec<(RunPair, Vec<[u8; 3]>)> {
    let mut out = Vec::new();
    let mut run = RunPair::default();
    let mut colors = Vec::new();

    for pixel in grid.pixels() {
        let transparent = pixel[3] == 0;
        if transparent {
            if run.colored > 0 {
                out.push((run, std::mem::take(&mut colors)));
                run = RunPair::default();
            }
            run.transparent += 1;
        } else {
            run.colored += 1;
            colors.push([pixel[0], pixel[1], pixel[2]]);
        }
    }

    if run.colored > 0 {
        out.push((run, colors));
    }
    out
}

/// Encode one sprite block, including the reserved field and length.
pub fn encode_sprite(grid: &PixelGrid) -> Vec<u8> {
    let mut body = Vec::new();
    for (run, colors) in runs(grid) {
        body.extend_from_slice(&run.transparent.to_le_bytes());
        body.extend_from_slice(&run.colored.to_le_bytes());
        for rgb in colors {
            body.extend_from_slice(&rgb);
        }
    }

    // A 32x32 grid needs at most 512 runs of 7 bytes, well inside u16.
    let mut block = Vec::with_capacity(RESERVED_LEN + 2 + body.len());
    block.extend_from_slice(&[0u8; RESERVED_LEN]);
    block.extend_from_slice(&(body.len() as u16).to_le_bytes());
    block.extend_from_slice(&body);
    block
}

/// Builds a complete sprite archive in memory.
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    layout: ArchiveLayout,
    signature: [u8; 4],
    slots: Vec<Option<Vec<u8>>>,
}

impl ArchiveWriter {
    /// Create an empty writer for `layout`.
    pub fn new(layout: ArchiveLayout) -> Self {
        Self {
            layout,
            signature: [0; 4],
            slots: Vec::new(),
        }
    }

    /// Set the opaque signature bytes.
    pub fn with_signature(mut self, signature: [u8; 4]) -> Self {
        self.signature = signature;
        self
    }

    /// Append the next slot. `None` leaves it empty.
    pub fn push(&mut self, sprite: Option<&PixelGrid>) -> &mut Self {
        self.slots.push(sprite.map(encode_sprite));
        self
    }

    /// Append a pre-encoded block as the next slot.
    pub fn push_raw(&mut self, block: Vec<u8>) -> &mut Self {
        self.slots.push(Some(block));
        self
    }

    /// Number of slots pushed so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot has been pushed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Serialize the archive.
    pub fn finish(&self) -> Result<Vec<u8>> {
        let count = self.slots.len() + 1;
        let table_base = self.layout.table_base();
        let table_end = table_base + self.slots.len() * 4;

        let mut out = Vec::with_capacity(table_end);
        out.extend_from_slice(&self.signature);
        match self.layout {
            ArchiveLayout::Classic => {
                let count = u16::try_from(count).map_err(|_| {
                    SprError::invalid_image(format!(
                        "{count} slots do not fit a classic archive"
                    ))
                })?;
                out.extend_from_slice(&count.to_le_bytes());
            }
            ArchiveLayout::Extended => {
                let count = u32::try_from(count).map_err(|_| {
                    SprError::invalid_image(format!(
                        "{count} slots do not fit an extended archive"
                    ))
                })?;
                out.extend_from_slice(&count.to_le_bytes());
            }
        }
        out.resize(table_end, 0);

        for (i, slot) in self.slots.iter().enumerate() {
            let Some(block) = slot else {
                continue;
            };
            let address = u32::try_from(out.len())
                .map_err(|_| SprError::invalid_image("archive exceeds 4 GiB"))?;
            let entry = table_base + i * 4;
            out[entry..entry + 4].copy_from_slice(&address.to_le_bytes());
            out.extend_from_slice(block);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_sprite;

    #[test]
    fn test_encode_single_pixel() {
        let mut grid = PixelGrid::new();
        grid.set(0, 0, [255, 0, 0, 255]);
        let block = encode_sprite(&grid);
        assert_eq!(block, vec![0, 0, 0, 7, 0, 0, 0, 1, 0, 0xFF, 0x00, 0x00]);
    }

    #[test]
    fn test_encode_empty() {
        let block = encode_sprite(&PixelGrid::new());
        assert_eq!(block, vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_runs_split_on_transparency() {
        let mut grid = PixelGrid::new();
        grid.set(2, 0, [1, 1, 1, 255]);
        grid.set(3, 0, [2, 2, 2, 255]);
        grid.set(0, 1, [3, 3, 3, 255]);
        let runs = runs(&grid);
        assert_eq!(runs.len(), 2);
        assert_eq!(
            runs[0].0,
            RunPair {
                transparent: 2,
                colored: 2
            }
        );
        assert_eq!(
            runs[1].0,
            RunPair {
                transparent: 28,
                colored: 1
            }
        );
    }

    #[test]
    fn test_checkerboard_roundtrip() {
        let mut grid = PixelGrid::new();
        for y in 0..32 {
            for x in 0..32 {
                if (x + y) % 2 == 0 {
                    grid.set(x, y, [x as u8 * 8, y as u8 * 8, 77, 255]);
                }
            }
        }
        let block = encode_sprite(&grid);
        assert_eq!(decode_sprite(&block, 0).unwrap(), grid);
    }

    #[test]
    fn test_archive_layout() {
        let mut grid = PixelGrid::new();
        grid.set(0, 0, [255, 0, 0, 255]);

        let mut writer = ArchiveWriter::new(ArchiveLayout::Classic).with_signature([0xAA; 4]);
        writer.push(None).push(Some(&grid));
        let data = writer.finish().unwrap();

        assert_eq!(&data[..6], &[0xAA, 0xAA, 0xAA, 0xAA, 3, 0]);
        assert_eq!(&data[6..10], &[0, 0, 0, 0]);
        assert_eq!(&data[10..14], &14u32.to_le_bytes());
        assert_eq!(&data[14..], encode_sprite(&grid).as_slice());
    }

    #[test]
    fn test_classic_slot_limit() {
        let mut writer = ArchiveWriter::new(ArchiveLayout::Classic);
        for _ in 0..u16::MAX {
            writer.push(None);
        }
        assert!(matches!(writer.finish(), Err(SprError::InvalidImage { .. })));
    }
}
