//! Proposals: named batches of candidate time blocks open for voting.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::campaign::UserId;
use crate::error::{MusterError, MusterResult};
use crate::response::{Availability, AvailabilityTally};
use crate::time_block::{BlockId, TimeBlock};

/// Opaque unique id of a proposal.
pub type ProposalId = String;

/// A named collection of candidate time blocks grouped by calendar day, plus
/// every member's availability marks.
///
/// Block sequences are kept ascending by start time (ties broken by id).
/// Responses are keyed `member -> block id -> mark`; entries referencing a
/// block that has since been deleted are tolerated in storage but ignored by
/// all aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub created_by: UserId,
    #[serde(default)]
    pub blocks_by_day: BTreeMap<NaiveDate, Vec<TimeBlock>>,
    #[serde(default)]
    pub responses: BTreeMap<UserId, BTreeMap<BlockId, Availability>>,
}

impl Proposal {
    /// Create an empty proposal.
    ///
    /// Fails with `Validation` when the title is empty after trimming.
    pub fn new(title: &str, created_by: &str) -> MusterResult<Self> {
        let title = validate_title(title)?;
        Ok(Proposal {
            id: Uuid::new_v4().to_string(),
            title,
            created_by: created_by.to_string(),
            blocks_by_day: BTreeMap::new(),
            responses: BTreeMap::new(),
        })
    }

    /// Rename the proposal; same title rules as creation.
    pub fn rename(&mut self, title: &str) -> MusterResult<()> {
        self.title = validate_title(title)?;
        Ok(())
    }

    /// Look up a block by id across all days.
    pub fn block(&self, block_id: &str) -> Option<&TimeBlock> {
        self.blocks_by_day
            .values()
            .flatten()
            .find(|b| b.id == block_id)
    }

    pub fn contains_block(&self, block_id: &str) -> bool {
        self.block(block_id).is_some()
    }

    /// Replace one day's block sequence (last-write-wins).
    ///
    /// An empty sequence removes the day entry. Enforces that every block
    /// belongs to `day` and that block ids stay unique across the whole
    /// proposal. The stored sequence is sorted ascending by (start, id).
    pub fn set_blocks_for_day(
        &mut self,
        day: NaiveDate,
        mut blocks: Vec<TimeBlock>,
    ) -> MusterResult<()> {
        for block in &blocks {
            if block.day_key() != day {
                return Err(MusterError::Validation(format!(
                    "block {} starts on {}, not {}",
                    block.id,
                    block.day_key(),
                    day
                )));
            }
        }

        let mut seen: HashSet<&str> = self
            .blocks_by_day
            .iter()
            .filter(|(d, _)| **d != day)
            .flat_map(|(_, blocks)| blocks.iter().map(|b| b.id.as_str()))
            .collect();
        for block in &blocks {
            if !seen.insert(&block.id) {
                return Err(MusterError::Validation(format!(
                    "duplicate time block id: {}",
                    block.id
                )));
            }
        }

        if blocks.is_empty() {
            self.blocks_by_day.remove(&day);
        } else {
            blocks.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
            self.blocks_by_day.insert(day, blocks);
        }
        Ok(())
    }

    /// Upsert one member's mark for one block.
    ///
    /// Touches only the `(member, block_id)` slot, so concurrent votes from
    /// different members (or for different blocks) commute.
    pub fn set_response(&mut self, member: &str, block_id: &str, value: Availability) {
        self.responses
            .entry(member.to_string())
            .or_default()
            .insert(block_id.to_string(), value);
    }

    pub fn response_of(&self, member: &str, block_id: &str) -> Option<Availability> {
        self.responses.get(member)?.get(block_id).copied()
    }

    /// Number of members marked available (`yes`) for a block.
    ///
    /// Each member counts at most once; unknown or deleted block ids count
    /// zero. Iteration order of the response maps cannot affect the result.
    pub fn count_available(&self, block_id: &str) -> usize {
        self.tally(block_id).yes
    }

    /// Full yes/maybe/no tally for a block.
    pub fn tally(&self, block_id: &str) -> AvailabilityTally {
        let mut tally = AvailabilityTally::default();
        if !self.contains_block(block_id) {
            return tally;
        }
        for marks in self.responses.values() {
            if let Some(value) = marks.get(block_id) {
                tally.record(*value);
            }
        }
        tally
    }

    /// All blocks across all days, ascending by start time.
    ///
    /// Ties are broken by block id so the order is deterministic even when
    /// two blocks share a start instant.
    pub fn all_blocks_sorted(&self) -> Vec<&TimeBlock> {
        let mut blocks: Vec<&TimeBlock> = self.blocks_by_day.values().flatten().collect();
        blocks.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        blocks
    }
}

pub(crate) fn validate_title(title: &str) -> MusterResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(MusterError::Validation(
            "proposal title cannot be empty".into(),
        ));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn instant(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap()
    }

    fn block(d: u32, from: u32, to: u32) -> TimeBlock {
        TimeBlock::new(instant(d, from), instant(d, to)).unwrap()
    }

    #[test]
    fn test_title_validation() {
        assert!(matches!(
            Proposal::new("   ", "dm-1"),
            Err(MusterError::Validation(_))
        ));
        let mut proposal = Proposal::new("  Session 5  ", "dm-1").unwrap();
        assert_eq!(proposal.title, "Session 5");
        assert!(proposal.rename("").is_err());
        proposal.rename("Session 6").unwrap();
        assert_eq!(proposal.title, "Session 6");
    }

    #[test]
    fn test_set_blocks_for_day_sorts_and_replaces() {
        let mut proposal = Proposal::new("Session 5", "dm-1").unwrap();
        let late = block(17, 21, 22);
        let early = block(17, 19, 21);

        proposal
            .set_blocks_for_day(day(17), vec![late.clone(), early.clone()])
            .unwrap();
        let ids: Vec<_> = proposal.blocks_by_day[&day(17)]
            .iter()
            .map(|b| b.id.clone())
            .collect();
        assert_eq!(ids, vec![early.id.clone(), late.id.clone()]);

        // Replacing with an empty list drops the day entirely
        proposal.set_blocks_for_day(day(17), vec![]).unwrap();
        assert!(proposal.blocks_by_day.is_empty());
    }

    #[test]
    fn test_block_day_must_match() {
        let mut proposal = Proposal::new("Session 5", "dm-1").unwrap();
        let err = proposal
            .set_blocks_for_day(day(18), vec![block(17, 19, 21)])
            .unwrap_err();
        assert!(matches!(err, MusterError::Validation(_)));
        assert!(proposal.blocks_by_day.is_empty());
    }

    #[test]
    fn test_block_ids_unique_across_days() {
        let mut proposal = Proposal::new("Session 5", "dm-1").unwrap();
        let monday = block(17, 19, 21);
        proposal
            .set_blocks_for_day(day(17), vec![monday.clone()])
            .unwrap();

        let copied = TimeBlock::with_id(monday.id.clone(), instant(18, 19), instant(18, 21))
            .unwrap();
        let err = proposal
            .set_blocks_for_day(day(18), vec![copied])
            .unwrap_err();
        assert!(matches!(err, MusterError::Validation(_)));
    }

    #[test]
    fn test_all_blocks_sorted_across_days() {
        let mut proposal = Proposal::new("Session 5", "dm-1").unwrap();
        let tue = block(18, 19, 21);
        let mon_late = block(17, 21, 22);
        let mon_early = block(17, 19, 21);
        proposal
            .set_blocks_for_day(day(18), vec![tue.clone()])
            .unwrap();
        proposal
            .set_blocks_for_day(day(17), vec![mon_late.clone(), mon_early.clone()])
            .unwrap();

        let ids: Vec<_> = proposal.all_blocks_sorted().iter().map(|b| &b.id).collect();
        assert_eq!(ids, vec![&mon_early.id, &mon_late.id, &tue.id]);
    }

    #[test]
    fn test_sort_ties_broken_by_id() {
        let mut proposal = Proposal::new("Session 5", "dm-1").unwrap();
        let a = TimeBlock::with_id("aaa".into(), instant(17, 19), instant(17, 21)).unwrap();
        let b = TimeBlock::with_id("bbb".into(), instant(17, 19), instant(17, 20)).unwrap();
        proposal
            .set_blocks_for_day(day(17), vec![b, a])
            .unwrap();
        let ids: Vec<_> = proposal.all_blocks_sorted().iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec!["aaa".to_string(), "bbb".to_string()]);
    }

    #[test]
    fn test_count_available_counts_members_once() {
        let mut proposal = Proposal::new("Session 5", "dm-1").unwrap();
        let mon = block(17, 19, 21);
        proposal
            .set_blocks_for_day(day(17), vec![mon.clone()])
            .unwrap();

        proposal.set_response("alice", &mon.id, Availability::Yes);
        proposal.set_response("alice", &mon.id, Availability::Yes);
        proposal.set_response("bob", &mon.id, Availability::Yes);
        proposal.set_response("carol", &mon.id, Availability::No);

        assert_eq!(proposal.count_available(&mon.id), 2);
        let tally = proposal.tally(&mon.id);
        assert_eq!((tally.yes, tally.maybe, tally.no), (2, 0, 1));
    }

    #[test]
    fn test_stale_responses_ignored_after_block_deleted() {
        let mut proposal = Proposal::new("Session 5", "dm-1").unwrap();
        let mon = block(17, 19, 21);
        proposal
            .set_blocks_for_day(day(17), vec![mon.clone()])
            .unwrap();
        proposal.set_response("alice", &mon.id, Availability::Yes);

        proposal.set_blocks_for_day(day(17), vec![]).unwrap();

        // The orphaned entry stays in storage but no longer counts
        assert!(proposal.responses["alice"].contains_key(&mon.id));
        assert_eq!(proposal.count_available(&mon.id), 0);
        assert!(proposal.all_blocks_sorted().is_empty());
    }

    #[test]
    fn test_set_response_leaves_other_slots_alone() {
        let mut proposal = Proposal::new("Session 5", "dm-1").unwrap();
        let mon = block(17, 19, 21);
        let tue = block(18, 19, 21);
        proposal
            .set_blocks_for_day(day(17), vec![mon.clone()])
            .unwrap();
        proposal
            .set_blocks_for_day(day(18), vec![tue.clone()])
            .unwrap();

        proposal.set_response("alice", &mon.id, Availability::Yes);
        proposal.set_response("alice", &tue.id, Availability::Maybe);
        proposal.set_response("bob", &mon.id, Availability::No);

        proposal.set_response("alice", &mon.id, Availability::No);

        assert_eq!(
            proposal.response_of("alice", &tue.id),
            Some(Availability::Maybe)
        );
        assert_eq!(
            proposal.response_of("bob", &mon.id),
            Some(Availability::No)
        );
    }
}
