//! # OxiSpr Core
//!
//! Decoder for legacy sprite archives: a table of per-slot addresses
//! pointing into run-length encoded 32×32 bitmaps.
//!
//! - [`cursor`]: Bounds-checked little-endian reader
//! - [`header`]: Signature and sprite count
//! - [`address`]: Slot to data offset resolution
//! - [`decoder`]: Run-length block decoding into a [`PixelGrid`]
//! - [`compositor`]: Magenta key substitution for transparent pixels
//! - [`writer`]: Block encoder and archive builder
//! - [`pipeline`]: Parallel batch extraction
//! - [`source`]: File loading
//!
//! ## Archive layout
//!
//! ```text
//! offset 0   4 bytes   signature (opaque)
//! offset 4   2 bytes   sprite count N (u32 in the extended layout)
//! offset 6   4*(N-1)   address table, slots 1..N-1, 0 = empty
//! ...                  sprite blocks
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxispr_core::{ArchiveLayout, ArchiveWriter, KEY_COLOR, Pipeline, PipelineConfig, PixelGrid};
//!
//! let mut sprite = PixelGrid::new();
//! sprite.set(0, 0, [255, 0, 0, 255]);
//!
//! let mut writer = ArchiveWriter::new(ArchiveLayout::Classic);
//! writer.push(Some(&sprite));
//! let data = writer.finish().unwrap();
//!
//! let pipeline = Pipeline::new(&data, PipelineConfig::default()).unwrap();
//! let grid = pipeline.decode_slot(1).unwrap().unwrap();
//! assert_eq!(grid.get(0, 0), [255, 0, 0, 255]);
//! assert_eq!(grid.get(1, 0), KEY_COLOR);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod address;
pub mod compositor;
pub mod config;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod grid;
pub mod header;
pub mod pipeline;
pub mod source;
pub mod writer;

// Re-exports for convenience
pub use address::{AddressTable, SpriteAddress};
pub use compositor::{Compositor, composite};
pub use config::{ArchiveLayout, DecodeOptions, FailureMode, PipelineConfig};
pub use cursor::Cursor;
pub use decoder::{RunPair, SpriteDecoder, SpriteInfo, decode_sprite};
pub use error::{Result, SprError};
pub use grid::{KEY_COLOR, PixelGrid, Rgba, SPRITE_PIXELS, SPRITE_SIZE, TRANSPARENT};
pub use header::ArchiveHeader;
pub use pipeline::{
    Exporter, NoProgress, NullExporter, Pipeline, PipelineReport, Progress, SlotFailure,
};
pub use source::ArchiveSource;
pub use writer::{ArchiveWriter, encode_sprite};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{ArchiveLayout, FailureMode, PipelineConfig};
    pub use crate::error::{Result, SprError};
    pub use crate::grid::{KEY_COLOR, PixelGrid};
    pub use crate::pipeline::{Exporter, Pipeline, Progress};
}
