//! Bounds-aware sequential reader over an in-memory archive.
//!
//! All multi-byte reads are little-endian. Seeking never fails; moving past
//! the end of the buffer is only reported by the next read.

use crate::error::{Result, SprError};

/// Read cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a cursor positioned at `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes remaining from the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Move to an absolute position.
    pub fn seek(&mut self, offset: usize) {
        self.pos = offset;
    }

    /// Move forward by `n` bytes without reading them.
    pub fn advance(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n);
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let available = self.remaining();
        if available < N {
            return Err(SprError::truncated(self.pos, N, available));
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(bytes)
    }

    /// Read a 4-byte tag.
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        self.take::<4>()
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let [b] = self.take::<1>()?;
        Ok(b)
    }

    /// Read a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take::<2>()?))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take::<4>()?))
    }

    /// Read three bytes as an RGB triplet.
    pub fn read_rgb(&mut self) -> Result<[u8; 3]> {
        self.take::<3>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_reads() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0x12345678);
        assert_eq!(cursor.position(), 7);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_truncated_read_keeps_position() {
        let data = [0xAA, 0xBB, 0xCC];
        let mut cursor = Cursor::new(&data);
        cursor.advance(2);
        let err = cursor.read_u16().unwrap_err();
        assert!(matches!(
            err,
            SprError::TruncatedRead {
                offset: 2,
                needed: 2,
                available: 1
            }
        ));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_seek_past_end_fails_on_read() {
        let data = [0u8; 4];
        let mut cursor = Cursor::new(&data);
        cursor.seek(100);
        assert_eq!(cursor.position(), 100);
        assert_eq!(cursor.remaining(), 0);
        assert!(matches!(
            cursor.read_u8(),
            Err(SprError::TruncatedRead { offset: 100, .. })
        ));
    }

    #[test]
    fn test_seek_backwards() {
        let data = [1, 2, 3, 4];
        let mut cursor = Cursor::at(&data, 3);
        assert_eq!(cursor.read_u8().unwrap(), 4);
        cursor.seek(0);
        assert_eq!(cursor.read_rgb().unwrap(), [1, 2, 3]);
    }
}
