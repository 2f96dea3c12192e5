//! Decode and pipeline configuration.

use std::ops::RangeInclusive;

/// Header revision of a sprite archive.
///
/// Both revisions share the address table and block encoding; they differ
/// only in the width of the sprite count and so in where the table starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveLayout {
    /// 4-byte signature, `u16` sprite count, table at byte 6.
    #[default]
    Classic,
    /// 4-byte signature, `u32` sprite count, table at byte 8.
    Extended,
}

impl ArchiveLayout {
    /// Width in bytes of the sprite count field.
    pub fn count_width(&self) -> usize {
        match self {
            ArchiveLayout::Classic => 2,
            ArchiveLayout::Extended => 4,
        }
    }

    /// Offset of the first address table entry (slot 1).
    pub fn table_base(&self) -> usize {
        4 + self.count_width()
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ArchiveLayout::Classic => "classic",
            ArchiveLayout::Extended => "extended",
        }
    }
}

impl std::fmt::Display for ArchiveLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Options controlling how a single sprite is located and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Header revision.
    pub layout: ArchiveLayout,
    /// Reject addresses beyond the archive before seeking to them.
    /// When off, a bad address surfaces as a truncated read instead.
    pub validate_addresses: bool,
}

impl DecodeOptions {
    /// Classic layout, lazy address checking.
    pub const CLASSIC: Self = Self {
        layout: ArchiveLayout::Classic,
        validate_addresses: false,
    };

    /// Extended layout, lazy address checking.
    pub const EXTENDED: Self = Self {
        layout: ArchiveLayout::Extended,
        validate_addresses: false,
    };

    /// Same options with eager address validation turned on.
    pub fn strict(self) -> Self {
        Self {
            validate_addresses: true,
            ..self
        }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// What a batch run does when one slot fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Log the failure, record it in the report, keep going.
    #[default]
    Continue,
    /// Stop at the first decode or export failure and return it.
    Abort,
}

/// Configuration for a [`Pipeline`](crate::pipeline::Pipeline) run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineConfig {
    /// Per-sprite decode options.
    pub decode: DecodeOptions,
    /// Failure propagation policy.
    pub failure_mode: FailureMode,
    /// Worker pool size. `None` uses the available parallelism.
    pub threads: Option<usize>,
    /// Restrict the run to these slot ids. Clamped to the archive's range.
    pub slots: Option<RangeInclusive<u32>>,
}

impl PipelineConfig {
    /// Default configuration for the given layout.
    pub fn new(layout: ArchiveLayout) -> Self {
        Self {
            decode: DecodeOptions {
                layout,
                ..DecodeOptions::default()
            },
            ..Self::default()
        }
    }

    /// Set the failure mode.
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Set the worker pool size.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    /// Restrict the run to a range of slot ids.
    pub fn with_slots(mut self, slots: RangeInclusive<u32>) -> Self {
        self.slots = Some(slots);
        self
    }
}
