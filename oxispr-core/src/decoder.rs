//! Run-length sprite decoder.
//!
//! A sprite block is laid out as:
//!
//! ```text
//! +----------+--------+---------------------------------------------+
//! | reserved | length | run pairs ...                               |
//! | 3 bytes  | u16 LE | (u16 skip, u16 count, count x RGB) repeated |
//! +----------+--------+---------------------------------------------+
//! ```
//!
//! Decoding stops once the cursor reaches `block_end`, the position just
//! after the length field plus `length`. Only the byte offset ends the
//! loop; the running pixel index has no say in it. A run is always read to
//! completion before the boundary is checked again, so a final run that
//! overshoots `block_end` still yields all of its pixels.

use crate::cursor::Cursor;
use crate::error::Result;
use crate::grid::PixelGrid;

/// Size of the reserved field preceding the block length.
pub const RESERVED_LEN: usize = 3;

/// One `(transparent, colored)` run header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunPair {
    /// Pixels skipped before the colored span.
    pub transparent: u16,
    /// Pixels in the colored span; each is followed by three RGB bytes.
    pub colored: u16,
}

/// Summary of a sprite block, gathered without building a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteInfo {
    /// Absolute offset of the block.
    pub offset: usize,
    /// Declared run data length.
    pub block_len: u16,
    /// Number of run pairs read.
    pub runs: usize,
    /// Total colored pixels across all runs.
    pub colored_pixels: usize,
    /// Total skipped pixels across all runs.
    pub transparent_pixels: usize,
}

/// Decoder for sprite blocks inside one archive buffer.
#[derive(Debug, Clone, Copy)]
pub struct SpriteDecoder<'a> {
    data: &'a [u8],
}

impl<'a> SpriteDecoder<'a> {
    /// Create a decoder over the whole archive buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Decode the block at `offset` into a grid.
    ///
    /// Skipped pixels keep zero alpha; colored pixels get alpha 255.
    pub fn decode(&self, offset: usize) -> Result<PixelGrid> {
        let mut grid = PixelGrid::new();
        self.walk(offset, |index, [r, g, b]| {
            grid.set_linear(index, [r, g, b, 255]);
        })?;
        Ok(grid)
    }

    /// Walk the block at `offset` and report its shape.
    pub fn inspect(&self, offset: usize) -> Result<SpriteInfo> {
        self.walk(offset, |_, _| {})
    }

    fn walk<F>(&self, offset: usize, mut on_pixel: F) -> Result<SpriteInfo>
    where
        F: FnMut(usize, [u8; 3]),
    {
        let mut cursor = Cursor::at(self.data, offset);
        cursor.advance(RESERVED_LEN);

        let block_len = cursor.read_u16()?;
        let block_end = cursor.position() + block_len as usize;

        let mut info = SpriteInfo {
            offset,
            block_len,
            runs: 0,
            colored_pixels: 0,
            transparent_pixels: 0,
        };
        let mut current = 0usize;

        while cursor.position() < block_end {
            let run = RunPair {
                transparent: cursor.read_u16()?,
                colored: cursor.read_u16()?,
            };
            current += run.transparent as usize;

            for _ in 0..run.colored {
                let rgb = cursor.read_rgb()?;
                on_pixel(current, rgb);
                current += 1;
            }

            info.runs += 1;
            info.transparent_pixels += run.transparent as usize;
            info.colored_pixels += run.colored as usize;
        }

        Ok(info)
    }
}

/// Decode the block at `offset` in `data`.
pub fn decode_sprite(data: &[u8], offset: usize) -> Result<PixelGrid> {
    SpriteDecoder::new(data).decode(offset)
}
