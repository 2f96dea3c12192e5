//! Batch extraction pipeline.
//!
//! The pipeline parses the header once, then fans the slot ids out over a
//! bounded rayon pool. Each task resolves its own address, decodes into a
//! fresh grid, composites it and hands it to the [`Exporter`]. Tasks share
//! nothing but the read-only archive buffer; counts are aggregated from
//! the collected per-slot outcomes.

use crate::address::{AddressTable, SpriteAddress};
use crate::compositor::Compositor;
use crate::config::{FailureMode, PipelineConfig};
use crate::decoder::{SpriteDecoder, SpriteInfo};
use crate::error::{Result, SprError};
use crate::grid::PixelGrid;
use crate::header::ArchiveHeader;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Sink for decoded sprites.
///
/// Called concurrently from worker threads, once per present slot, with the
/// slot id rendered as a decimal string.
pub trait Exporter: Send + Sync {
    /// Persist one composited sprite.
    fn export(&self, id: &str, grid: &PixelGrid) -> Result<()>;
}

/// Exporter that discards every sprite. Used for validation runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExporter;

impl Exporter for NullExporter {
    fn export(&self, _id: &str, _grid: &PixelGrid) -> Result<()> {
        Ok(())
    }
}

/// Observer notified after each slot finishes.
pub trait Progress: Send + Sync {
    /// `processed` slots out of `total` are done.
    fn on_progress(&self, processed: usize, total: usize);
}

/// Progress observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn on_progress(&self, _processed: usize, _total: usize) {}
}

/// One slot that failed during a [`FailureMode::Continue`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFailure {
    /// Slot id.
    pub slot: u32,
    /// Offset the failing read was anchored at.
    pub offset: usize,
    /// Whether the exporter, rather than the decoder, failed.
    pub export: bool,
    /// Description of the underlying error.
    pub message: String,
}

/// Totals of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Slots visited.
    pub total: usize,
    /// Sprites handed to the exporter successfully.
    pub exported: usize,
    /// Slots with a zero address entry.
    pub absent: usize,
    /// Failed slots in ascending slot order.
    pub failures: Vec<SlotFailure>,
}

impl PipelineReport {
    /// Whether every visited slot was exported or absent.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotOutcome {
    Exported,
    Absent,
    Skipped,
}

/// Decodes every slot of one archive buffer.
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    data: &'a [u8],
    header: ArchiveHeader,
    config: PipelineConfig,
    compositor: Compositor,
}

impl<'a> Pipeline<'a> {
    /// Parse the header of `data` and prepare a run.
    ///
    /// A truncated header aborts here; nothing is decoded yet.
    pub fn new(data: &'a [u8], config: PipelineConfig) -> Result<Self> {
        let header = ArchiveHeader::parse(data, config.decode.layout)?;
        debug!(
            sprite_count = header.sprite_count,
            layout = %header.layout,
            "parsed archive header"
        );
        Ok(Self {
            data,
            header,
            compositor: Compositor::default(),
            config,
        })
    }

    /// Parsed header.
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Run configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Address table of the archive.
    pub fn table(&self) -> AddressTable<'a> {
        AddressTable::new(self.data, self.header, &self.config.decode)
    }

    /// Slot ids this run visits, ascending.
    pub fn slots(&self) -> Vec<u32> {
        let all = self.header.slots();
        match &self.config.slots {
            Some(range) => {
                let start = (*range.start()).max(all.start);
                let end = range.end().saturating_add(1).min(all.end);
                (start..end).collect()
            }
            None => all.collect(),
        }
    }

    fn locate(&self, slot: u32) -> Result<SpriteAddress> {
        let table = self.table();
        let entry = table
            .entry_offset(slot)
            .ok_or_else(|| SprError::slot_out_of_range(slot, self.header.sprite_count))?;
        table.resolve(slot).map_err(|e| SprError::in_slot(slot, entry, e))
    }

    /// Decode `slot` without compositing. `None` if the slot is empty.
    pub fn decode_raw(&self, slot: u32) -> Result<Option<PixelGrid>> {
        let Some(offset) = self.locate(slot)?.offset() else {
            return Ok(None);
        };
        SpriteDecoder::new(self.data)
            .decode(offset)
            .map(Some)
            .map_err(|e| SprError::in_slot(slot, offset, e))
    }

    /// Decode and composite `slot`. `None` if the slot is empty.
    pub fn decode_slot(&self, slot: u32) -> Result<Option<PixelGrid>> {
        let mut grid = self.decode_raw(slot)?;
        if let Some(grid) = grid.as_mut() {
            self.compositor.apply(grid);
        }
        Ok(grid)
    }

    /// Describe the block of `slot` without decoding pixels.
    pub fn inspect_slot(&self, slot: u32) -> Result<Option<SpriteInfo>> {
        let Some(offset) = self.locate(slot)?.offset() else {
            return Ok(None);
        };
        SpriteDecoder::new(self.data)
            .inspect(offset)
            .map(Some)
            .map_err(|e| SprError::in_slot(slot, offset, e))
    }

    fn process(&self, slot: u32, exporter: &dyn Exporter) -> Result<SlotOutcome> {
        let Some(grid) = self.decode_slot(slot)? else {
            debug!(slot, "slot is empty");
            return Ok(SlotOutcome::Absent);
        };

        let id = slot.to_string();
        exporter.export(&id, &grid).map_err(|e| {
            let offset = self.locate(slot).ok().and_then(|a| a.offset()).unwrap_or(0);
            SprError::in_slot(slot, offset, e)
        })?;
        debug!(slot, "exported sprite");
        Ok(SlotOutcome::Exported)
    }

    /// Decode every slot and hand present sprites to `exporter`.
    ///
    /// `cancel` is polled before each slot starts; once set, remaining slots
    /// are skipped and the run returns [`SprError::Cancelled`]. In
    /// [`FailureMode::Abort`] the failure with the lowest slot id is
    /// returned: slots above the lowest failure seen so far are skipped,
    /// every slot below it still runs. In [`FailureMode::Continue`]
    /// failures are logged and collected into the report.
    pub fn run(
        &self,
        exporter: &dyn Exporter,
        progress: &dyn Progress,
        cancel: &AtomicBool,
    ) -> Result<PipelineReport> {
        let slots = self.slots();
        let total = slots.len();
        let threads = self.config.threads.unwrap_or(0);
        let _span = tracing::info_span!("pipeline", slots = total, threads).entered();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SprError::Io(std::io::Error::other(e)))?;

        let abort = self.config.failure_mode == FailureMode::Abort;
        let lowest_failure = AtomicU32::new(u32::MAX);
        let processed = AtomicUsize::new(0);

        let outcomes: Vec<(u32, Result<SlotOutcome>)> = pool.install(|| {
            slots
                .par_iter()
                .map(|&slot| {
                    if cancel.load(Ordering::Relaxed)
                        || (abort && slot > lowest_failure.load(Ordering::Relaxed))
                    {
                        return (slot, Ok(SlotOutcome::Skipped));
                    }
                    let outcome = self.process(slot, exporter);
                    if abort && outcome.is_err() {
                        lowest_failure.fetch_min(slot, Ordering::Relaxed);
                    }
                    let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    progress.on_progress(done, total);
                    (slot, outcome)
                })
                .collect()
        });

        let processed = processed.into_inner();
        let mut report = PipelineReport {
            total,
            ..PipelineReport::default()
        };

        for (slot, outcome) in outcomes {
            match outcome {
                Ok(SlotOutcome::Exported) => report.exported += 1,
                Ok(SlotOutcome::Absent) => report.absent += 1,
                Ok(SlotOutcome::Skipped) => {}
                Err(e) if abort => return Err(e),
                Err(e) => {
                    warn!(slot, error = %e, "slot failed, continuing");
                    report.failures.push(failure(slot, e));
                }
            }
        }

        if cancel.load(Ordering::Relaxed) && processed < total {
            return Err(SprError::cancelled(processed, total));
        }

        info!(
            exported = report.exported,
            absent = report.absent,
            failed = report.failures.len(),
            "pipeline finished"
        );
        Ok(report)
    }
}

fn failure(slot: u32, err: SprError) -> SlotFailure {
    let export = err.is_export();
    match err {
        SprError::Slot { offset, source, .. } => SlotFailure {
            slot,
            offset,
            export,
            message: source.to_string(),
        },
        other => SlotFailure {
            slot,
            offset: 0,
            export,
            message: other.to_string(),
        },
    }
}
