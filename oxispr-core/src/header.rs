//! Archive preamble parsing.
//!
//! The preamble is a 4-byte signature followed by the sprite count. The
//! signature is opaque: only its presence is checked. The count includes a
//! reserved slot 0, so an archive with count `N` addresses slots `1..N`.

use crate::config::ArchiveLayout;
use crate::cursor::Cursor;
use crate::error::Result;

/// Parsed archive preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// Raw signature bytes.
    pub signature: [u8; 4],
    /// Sprite count as stored, including reserved slot 0.
    pub sprite_count: u32,
    /// Layout the header was parsed with.
    pub layout: ArchiveLayout,
}

impl ArchiveHeader {
    /// Parse the preamble at the start of `data`.
    ///
    /// Fails with a truncated read if `data` is shorter than the preamble.
    pub fn parse(data: &[u8], layout: ArchiveLayout) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let signature = cursor.read_tag()?;
        let sprite_count = match layout {
            ArchiveLayout::Classic => u32::from(cursor.read_u16()?),
            ArchiveLayout::Extended => cursor.read_u32()?,
        };

        Ok(Self {
            signature,
            sprite_count,
            layout,
        })
    }

    /// Number of addressable slots (`N - 1`).
    pub fn slot_count(&self) -> u32 {
        self.sprite_count.saturating_sub(1)
    }

    /// Addressable slot ids in ascending order.
    pub fn slots(&self) -> std::ops::Range<u32> {
        1..self.sprite_count.max(1)
    }

    /// Whether `slot` is addressable in this archive.
    pub fn contains(&self, slot: u32) -> bool {
        slot >= 1 && slot < self.sprite_count
    }

    /// Byte offset just past the last address table entry.
    pub fn table_end(&self) -> usize {
        self.layout.table_base() + self.slot_count() as usize * 4
    }
}
