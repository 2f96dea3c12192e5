//! Sprite address table.
//!
//! Each slot owns one little-endian `u32` entry at
//! `table_base + (slot - 1) * 4`. A zero entry marks an empty slot; any
//! other value is the absolute offset of the sprite's encoded block.

use crate::config::DecodeOptions;
use crate::cursor::Cursor;
use crate::error::{Result, SprError};
use crate::header::ArchiveHeader;

/// Resolved address table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteAddress {
    /// The slot holds no sprite.
    Absent,
    /// Absolute offset of the sprite block.
    Data(u32),
}

impl SpriteAddress {
    /// Data offset, if present.
    pub fn offset(&self) -> Option<usize> {
        match self {
            SpriteAddress::Absent => None,
            SpriteAddress::Data(addr) => Some(*addr as usize),
        }
    }

    /// Whether the slot holds a sprite.
    pub fn is_present(&self) -> bool {
        matches!(self, SpriteAddress::Data(_))
    }
}

/// Read-only view of the address table of one archive.
#[derive(Debug, Clone, Copy)]
pub struct AddressTable<'a> {
    data: &'a [u8],
    header: ArchiveHeader,
    validate: bool,
}

impl<'a> AddressTable<'a> {
    /// Create a view over `data` using an already parsed header.
    pub fn new(data: &'a [u8], header: ArchiveHeader, options: &DecodeOptions) -> Self {
        Self {
            data,
            header,
            validate: options.validate_addresses,
        }
    }

    /// Header this table belongs to.
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Byte offset of the entry for `slot` (1-based). `None` for slot 0
    /// and for ids past the header's count.
    pub fn entry_offset(&self, slot: u32) -> Option<usize> {
        if !self.header.contains(slot) {
            return None;
        }
        Some(self.header.layout.table_base() + (slot - 1) as usize * 4)
    }

    /// Read and classify the entry for `slot`.
    ///
    /// Fails with [`SprError::SlotOutOfRange`] if the header does not
    /// address `slot`.
    pub fn resolve(&self, slot: u32) -> Result<SpriteAddress> {
        let entry = self
            .entry_offset(slot)
            .ok_or_else(|| SprError::slot_out_of_range(slot, self.header.sprite_count))?;
        let mut cursor = Cursor::at(self.data, entry);
        let address = cursor.read_u32()?;
        if address == 0 {
            return Ok(SpriteAddress::Absent);
        }

        if self.validate && address as usize >= self.data.len() {
            return Err(SprError::malformed_address(slot, address, self.data.len()));
        }

        Ok(SpriteAddress::Data(address))
    }

    /// Every slot paired with its resolved entry, in ascending order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, Result<SpriteAddress>)> + '_ {
        self.header.slots().map(move |slot| (slot, self.resolve(slot)))
    }

    /// Resolve the whole table up front. Index `i` holds slot `i + 1`.
    pub fn offsets(&self) -> Result<Vec<SpriteAddress>> {
        self.header.slots().map(|slot| self.resolve(slot)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArchiveLayout;

    fn table_bytes(entries: &[u32]) -> Vec<u8> {
        let mut data = vec![0xAA, 0xAA, 0xAA, 0xAA];
        data.extend_from_slice(&((entries.len() + 1) as u16).to_le_bytes());
        for entry in entries {
            data.extend_from_slice(&entry.to_le_bytes());
        }
        data
    }

    fn table(data: &[u8], options: DecodeOptions) -> AddressTable<'_> {
        let header = ArchiveHeader::parse(data, options.layout).unwrap();
        AddressTable::new(data, header, &options)
    }

    #[test]
    fn test_entry_offsets() {
        let data = table_bytes(&[0, 0, 0]);
        let t = table(&data, DecodeOptions::default());
        assert_eq!(t.entry_offset(1), Some(6));
        assert_eq!(t.entry_offset(2), Some(10));
        assert_eq!(t.entry_offset(3), Some(14));
        assert_eq!(t.entry_offset(0), None);
        assert_eq!(t.entry_offset(4), None);
    }

    #[test]
    fn test_slot_out_of_range() {
        let data = table_bytes(&[10]);
        let t = table(&data, DecodeOptions::default());
        assert!(matches!(
            t.resolve(0),
            Err(SprError::SlotOutOfRange {
                slot: 0,
                sprite_count: 2
            })
        ));
        assert!(matches!(
            t.resolve(2),
            Err(SprError::SlotOutOfRange {
                slot: 2,
                sprite_count: 2
            })
        ));
        assert_eq!(t.resolve(1).unwrap(), SpriteAddress::Data(10));
    }

    #[test]
    fn test_absent_and_present() {
        let data = table_bytes(&[0, 10]);
        let t = table(&data, DecodeOptions::default());
        assert_eq!(t.resolve(1).unwrap(), SpriteAddress::Absent);
        assert_eq!(t.resolve(2).unwrap(), SpriteAddress::Data(10));
        assert_eq!(t.resolve(2).unwrap().offset(), Some(10));
    }

    #[test]
    fn test_lazy_vs_strict_validation() {
        let data = table_bytes(&[0xFFFF]);
        let lazy = table(&data, DecodeOptions::default());
        assert_eq!(lazy.resolve(1).unwrap(), SpriteAddress::Data(0xFFFF));

        let strict = table(&data, DecodeOptions::default().strict());
        assert!(matches!(
            strict.resolve(1),
            Err(SprError::MalformedAddress {
                slot: 1,
                address: 0xFFFF,
                ..
            })
        ));
    }

    #[test]
    fn test_truncated_table() {
        let mut data = table_bytes(&[0, 0]);
        data.truncate(12);
        let t = table(&data, DecodeOptions::default());
        assert!(t.resolve(1).is_ok());
        assert!(matches!(
            t.resolve(2),
            Err(SprError::TruncatedRead { offset: 10, .. })
        ));
    }

    #[test]
    fn test_offsets_and_entries() {
        let data = table_bytes(&[0, 20, 0, 40]);
        let t = table(&data, DecodeOptions::default());
        let offsets = t.offsets().unwrap();
        assert_eq!(offsets.len(), 4);
        assert_eq!(offsets[1], SpriteAddress::Data(20));
        let present: Vec<u32> = t
            .entries()
            .filter_map(|(slot, addr)| addr.ok().filter(|a| a.is_present()).map(|_| slot))
            .collect();
        assert_eq!(present, vec![2, 4]);
    }

    #[test]
    fn test_extended_layout_base() {
        let mut data = vec![0u8; 4];
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&12u32.to_le_bytes());
        let t = table(&data, DecodeOptions::EXTENDED);
        assert_eq!(t.header().layout, ArchiveLayout::Extended);
        assert_eq!(t.entry_offset(1), Some(8));
        assert_eq!(t.resolve(1).unwrap(), SpriteAddress::Data(12));
    }
}
