//! Persistence for campaigns and their proposals.
//!
//! The trait is deliberately fine-grained where concurrency matters:
//! `set_response` touches only its own `(member, block)` slot so concurrent
//! votes commute, while day-level block saves, renames and finalization are
//! last-write-wins operations performed by a single organizer. Mutations
//! return the updated document so callers never re-read stale state.

pub mod json;
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::campaign::{Campaign, FinalizedSession};
use crate::error::MusterResult;
use crate::proposal::Proposal;
use crate::response::Availability;
use crate::time_block::TimeBlock;

pub use json::JsonStore;
pub use memory::MemoryStore;

/// Storage interface for the scheduling model.
///
/// Implementations report missing documents as `CampaignNotFound` /
/// `ProposalNotFound` on mutation, and must apply each mutation atomically:
/// a failed call leaves the stored document unchanged.
#[async_trait]
pub trait SchedulerStore: Send + Sync {
    // Campaigns

    async fn create_campaign(&self, campaign: &Campaign) -> MusterResult<()>;

    async fn get_campaign(&self, campaign_id: &str) -> MusterResult<Option<Campaign>>;

    /// Append-unique member join (idempotent).
    async fn add_member(&self, campaign_id: &str, user: &str) -> MusterResult<Campaign>;

    /// Set or clear the finalized session (last-write-wins).
    async fn set_finalized_session(
        &self,
        campaign_id: &str,
        session: Option<FinalizedSession>,
    ) -> MusterResult<Campaign>;

    /// Campaigns whose member roster contains `user`.
    async fn campaigns_for_member(&self, user: &str) -> MusterResult<Vec<Campaign>>;

    // Proposals

    async fn create_proposal(&self, campaign_id: &str, proposal: &Proposal) -> MusterResult<()>;

    async fn get_proposal(
        &self,
        campaign_id: &str,
        proposal_id: &str,
    ) -> MusterResult<Option<Proposal>>;

    async fn list_proposals(&self, campaign_id: &str) -> MusterResult<Vec<Proposal>>;

    async fn set_proposal_title(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        title: &str,
    ) -> MusterResult<Proposal>;

    /// Replace one day's block sequence (last-write-wins).
    async fn set_blocks_for_day(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        day: NaiveDate,
        blocks: Vec<TimeBlock>,
    ) -> MusterResult<Proposal>;

    /// Upsert a single member's mark for a single block.
    async fn set_response(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        member: &str,
        block_id: &str,
        value: Availability,
    ) -> MusterResult<Proposal>;

    async fn delete_proposal(&self, campaign_id: &str, proposal_id: &str) -> MusterResult<()>;
}
