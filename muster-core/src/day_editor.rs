//! Uncommitted per-day editing of a proposal's time blocks.

use chrono::{NaiveDate, NaiveTime};

use crate::error::MusterResult;
use crate::time_block::TimeBlock;

/// Editing session for one calendar day's block sequence.
///
/// All edits are local until the caller commits the resulting sequence with
/// `Scheduler::save_blocks_for_day`; dropping the editor discards them.
#[derive(Debug, Clone)]
pub struct DayEditor {
    day: NaiveDate,
    blocks: Vec<TimeBlock>,
}

impl DayEditor {
    pub fn new(day: NaiveDate) -> Self {
        DayEditor {
            day,
            blocks: Vec::new(),
        }
    }

    /// Start from a day's existing sequence (e.g. loaded from a proposal).
    pub fn with_blocks(day: NaiveDate, mut blocks: Vec<TimeBlock>) -> Self {
        blocks.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        DayEditor { day, blocks }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    /// Add a candidate block anchored to this editor's day.
    ///
    /// Fails with `InvalidRange` when `end <= start`, leaving the sequence
    /// unchanged. On success the block gets a fresh id and is inserted
    /// keeping ascending (start, id) order.
    pub fn add_block(&mut self, start: NaiveTime, end: NaiveTime) -> MusterResult<&TimeBlock> {
        let block = TimeBlock::new(
            self.day.and_time(start).and_utc(),
            self.day.and_time(end).and_utc(),
        )?;
        let idx = self
            .blocks
            .partition_point(|b| (b.start, b.id.as_str()) < (block.start, block.id.as_str()));
        self.blocks.insert(idx, block);
        Ok(&self.blocks[idx])
    }

    /// Remove a block by id; a no-op if the id is absent.
    pub fn remove_block(&mut self, id: &str) {
        self.blocks.retain(|b| b.id != id);
    }

    /// The sequence to hand to `save_blocks_for_day`.
    pub fn into_blocks(self) -> Vec<TimeBlock> {
        self.blocks
    }
}
