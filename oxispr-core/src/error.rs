//! Error types for OxiSpr operations.
//!
//! Every failure that can surface while reading a sprite archive is one
//! variant of [`SprError`]. Per-sprite failures are wrapped in
//! [`SprError::Slot`] so the slot id and the sprite's data offset travel
//! with the underlying cause.

use std::io;
use thiserror::Error;

/// The main error type for OxiSpr operations.
#[derive(Debug, Error)]
pub enum SprError {
    /// I/O error from the input provider or an exporter.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A fixed-width read ran past the end of the archive buffer.
    #[error("Truncated read at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedRead {
        /// Cursor position where the read started.
        offset: usize,
        /// Width of the attempted read.
        needed: usize,
        /// Bytes remaining after `offset`.
        available: usize,
    },

    /// An address table entry points outside the archive.
    #[error("Malformed address for slot {slot}: {address:#x} is beyond archive length {archive_len}")]
    MalformedAddress {
        /// Slot whose entry is malformed.
        slot: u32,
        /// Address read from the table.
        address: u32,
        /// Length of the archive buffer.
        archive_len: usize,
    },

    /// A slot id outside `1..sprite_count` was requested.
    #[error("Slot {slot} is out of range: archive addresses slots 1..{sprite_count}")]
    SlotOutOfRange {
        /// Requested slot id.
        slot: u32,
        /// Sprite count from the header, including reserved slot 0.
        sprite_count: u32,
    },

    /// Decoding of a single sprite failed.
    #[error("Slot {slot} (data offset {offset:#x}): {source}")]
    Slot {
        /// Slot id being decoded.
        slot: u32,
        /// Data offset the sprite decode started from.
        offset: usize,
        /// Underlying decode failure.
        #[source]
        source: Box<SprError>,
    },

    /// The exporter could not persist a sprite.
    #[error("Export of '{id}' failed: {message}")]
    Export {
        /// Identifier handed to the exporter.
        id: String,
        /// Description reported by the exporter.
        message: String,
    },

    /// A batch run was cancelled between slots.
    #[error("Cancelled after {processed} of {total} slots")]
    Cancelled {
        /// Slots finished before cancellation was observed.
        processed: usize,
        /// Slots in the run.
        total: usize,
    },

    /// Input handed to the writer cannot be represented in the format.
    #[error("Invalid image: {message}")]
    InvalidImage {
        /// Description of the problem.
        message: String,
    },
}

/// Result type alias for OxiSpr operations.
pub type Result<T> = std::result::Result<T, SprError>;

impl SprError {
    /// Create a truncated read error.
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::TruncatedRead {
            offset,
            needed,
            available,
        }
    }

    /// Create a malformed address error.
    pub fn malformed_address(slot: u32, address: u32, archive_len: usize) -> Self {
        Self::MalformedAddress {
            slot,
            address,
            archive_len,
        }
    }

    /// Create a slot out of range error.
    pub fn slot_out_of_range(slot: u32, sprite_count: u32) -> Self {
        Self::SlotOutOfRange { slot, sprite_count }
    }

    /// Attach a slot id and data offset to a decode failure.
    pub fn in_slot(slot: u32, offset: usize, source: SprError) -> Self {
        Self::Slot {
            slot,
            offset,
            source: Box::new(source),
        }
    }

    /// Create an export error.
    pub fn export(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Export {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create a cancellation error.
    pub fn cancelled(processed: usize, total: usize) -> Self {
        Self::Cancelled { processed, total }
    }

    /// Create an invalid image error.
    pub fn invalid_image(message: impl Into<String>) -> Self {
        Self::InvalidImage {
            message: message.into(),
        }
    }

    /// Slot id this error belongs to, if it was raised while decoding one.
    pub fn slot(&self) -> Option<u32> {
        match self {
            Self::Slot { slot, .. }
            | Self::MalformedAddress { slot, .. }
            | Self::SlotOutOfRange { slot, .. } => Some(*slot),
            _ => None,
        }
    }

    /// Whether this error came from an exporter rather than from parsing.
    pub fn is_export(&self) -> bool {
        match self {
            Self::Export { .. } => true,
            Self::Slot { source, .. } => source.is_export(),
            _ => false,
        }
    }
}
