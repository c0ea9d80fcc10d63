//! Candidate time blocks for a session.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MusterError, MusterResult};

/// Opaque unique id of a time block within a proposal.
pub type BlockId = String;

/// A single candidate interval proposed for a session.
///
/// The owning calendar day is derived from `start`, not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: BlockId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeBlock {
    /// Create a block with a fresh UUID id.
    ///
    /// Fails with `InvalidRange` unless `end > start` strictly.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> MusterResult<Self> {
        Self::with_id(Uuid::new_v4().to_string(), start, end)
    }

    /// Create a block with a caller-supplied id (same range check).
    pub fn with_id(id: BlockId, start: DateTime<Utc>, end: DateTime<Utc>) -> MusterResult<Self> {
        if end <= start {
            return Err(MusterError::InvalidRange);
        }
        Ok(TimeBlock { id, start, end })
    }

    /// Calendar day this block belongs to, by its start instant.
    pub fn day_key(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 17, h, m, 0).unwrap()
    }

    #[test]
    fn test_new_assigns_distinct_ids() {
        let a = TimeBlock::new(instant(19, 0), instant(21, 0)).unwrap();
        let b = TimeBlock::new(instant(19, 0), instant(21, 0)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_end_must_be_after_start() {
        assert!(matches!(
            TimeBlock::new(instant(21, 0), instant(19, 0)),
            Err(MusterError::InvalidRange)
        ));
        // Zero-length blocks are rejected too
        assert!(matches!(
            TimeBlock::new(instant(19, 0), instant(19, 0)),
            Err(MusterError::InvalidRange)
        ));
    }

    #[test]
    fn test_day_key_derived_from_start() {
        let block = TimeBlock::new(instant(23, 0), instant(23, 59)).unwrap();
        assert_eq!(
            block.day_key(),
            NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()
        );
    }

    #[test]
    fn test_duration() {
        let block = TimeBlock::new(instant(19, 0), instant(21, 30)).unwrap();
        assert_eq!(block.duration(), Duration::minutes(150));
    }
}
