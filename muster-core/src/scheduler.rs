//! Scheduling operations: validation, organizer gates and the finalization
//! state machine, generic over the storage backend.

use tracing::{debug, info};

use crate::campaign::{Campaign, FinalizedSession, SchedulingState};
use crate::error::{MusterError, MusterResult};
use crate::proposal::{self, Proposal};
use crate::response::Availability;
use crate::store::SchedulerStore;
use crate::time_block::TimeBlock;

/// Explicit confirmation token for finalization transitions.
///
/// Finalizing or reopening a campaign requires a deliberate gesture from the
/// organizer; callers construct this token only after their own confirm step
/// (a prompt, a second click), so neither transition can happen by accident.
#[derive(Debug, Clone, Copy)]
pub struct Confirmation(());

impl Confirmation {
    pub fn given() -> Self {
        Confirmation(())
    }
}

/// The operation surface of the scheduling model.
///
/// Every mutating operation either fully succeeds, returning the updated
/// document as read back from the store, or fails leaving stored state
/// unchanged. Validation happens before any store call; authorization and
/// state checks read current state first.
pub struct Scheduler<S> {
    store: S,
}

impl<S: SchedulerStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Scheduler { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // Campaigns

    /// Create a campaign; the creator becomes owner and sole member.
    pub async fn create_campaign(&self, name: &str, owner: &str) -> MusterResult<Campaign> {
        let campaign = Campaign::new(name, owner)?;
        self.store.create_campaign(&campaign).await?;
        info!(campaign = %campaign.id, owner, "created campaign");
        Ok(campaign)
    }

    /// Idempotent join: adding an existing member is a no-op.
    pub async fn join_campaign(&self, campaign_id: &str, user: &str) -> MusterResult<Campaign> {
        let campaign = self.store.add_member(campaign_id, user).await?;
        debug!(campaign = %campaign_id, user, "joined campaign");
        Ok(campaign)
    }

    pub async fn campaign(&self, campaign_id: &str) -> MusterResult<Campaign> {
        self.store
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| MusterError::CampaignNotFound(campaign_id.to_string()))
    }

    pub async fn campaigns_for_member(&self, user: &str) -> MusterResult<Vec<Campaign>> {
        self.store.campaigns_for_member(user).await
    }

    // Proposals

    /// Create a proposal with empty blocks and responses (organizer only).
    pub async fn create_proposal(
        &self,
        campaign_id: &str,
        title: &str,
        organizer: &str,
    ) -> MusterResult<Proposal> {
        // Fail fast on the title before touching the store
        let proposal = Proposal::new(title, organizer)?;
        let campaign = self.campaign(campaign_id).await?;
        self.require_organizer(&campaign, organizer)?;
        self.require_open(&campaign)?;
        self.store.create_proposal(campaign_id, &proposal).await?;
        info!(campaign = %campaign_id, proposal = %proposal.id, "created proposal");
        Ok(proposal)
    }

    pub async fn proposal(&self, campaign_id: &str, proposal_id: &str) -> MusterResult<Proposal> {
        self.store
            .get_proposal(campaign_id, proposal_id)
            .await?
            .ok_or_else(|| MusterError::ProposalNotFound(proposal_id.to_string()))
    }

    pub async fn list_proposals(&self, campaign_id: &str) -> MusterResult<Vec<Proposal>> {
        self.store.list_proposals(campaign_id).await
    }

    pub async fn rename_proposal(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        new_title: &str,
        actor: &str,
    ) -> MusterResult<Proposal> {
        // Fail fast on the title before touching the store
        proposal::validate_title(new_title)?;
        let campaign = self.campaign(campaign_id).await?;
        self.require_organizer(&campaign, actor)?;
        self.require_open(&campaign)?;
        self.store
            .set_proposal_title(campaign_id, proposal_id, new_title)
            .await
    }

    /// Delete a proposal, irreversibly (organizer only).
    pub async fn delete_proposal(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        actor: &str,
    ) -> MusterResult<()> {
        let campaign = self.campaign(campaign_id).await?;
        self.require_organizer(&campaign, actor)?;
        self.require_open(&campaign)?;
        self.store.delete_proposal(campaign_id, proposal_id).await?;
        info!(campaign = %campaign_id, proposal = %proposal_id, "deleted proposal");
        Ok(())
    }

    /// Commit one day's edited block sequence (organizer only,
    /// last-write-wins).
    pub async fn save_blocks_for_day(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        day: chrono::NaiveDate,
        blocks: Vec<TimeBlock>,
        actor: &str,
    ) -> MusterResult<Proposal> {
        let campaign = self.campaign(campaign_id).await?;
        self.require_organizer(&campaign, actor)?;
        self.require_open(&campaign)?;
        let proposal = self
            .store
            .set_blocks_for_day(campaign_id, proposal_id, day, blocks)
            .await?;
        debug!(campaign = %campaign_id, proposal = %proposal_id, %day, "saved day blocks");
        Ok(proposal)
    }

    // Responses

    /// Record one member's availability for one block.
    ///
    /// Writes only the `(member, block)` slot; any campaign member may vote
    /// while the campaign is open.
    pub async fn set_response(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        member: &str,
        block_id: &str,
        value: Availability,
    ) -> MusterResult<Proposal> {
        let campaign = self.campaign(campaign_id).await?;
        self.require_member(&campaign, member)?;
        self.require_open(&campaign)?;
        let proposal = self.proposal(campaign_id, proposal_id).await?;
        if !proposal.contains_block(block_id) {
            return Err(MusterError::TimeBlockNotFound(block_id.to_string()));
        }
        self.store
            .set_response(campaign_id, proposal_id, member, block_id, value)
            .await
    }

    /// Flip a member's yes/no mark, returning the updated proposal and the
    /// new value.
    pub async fn toggle_response(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        member: &str,
        block_id: &str,
    ) -> MusterResult<(Proposal, Availability)> {
        let current = self
            .proposal(campaign_id, proposal_id)
            .await?
            .response_of(member, block_id);
        let value = Availability::toggled(current);
        let proposal = self
            .set_response(campaign_id, proposal_id, member, block_id, value)
            .await?;
        Ok((proposal, value))
    }

    // Finalization

    /// Promote a block to the campaign's confirmed session.
    ///
    /// Legal only while the campaign is open, organizer-only, and requires an
    /// explicit `Confirmation`. The source proposal and its other blocks are
    /// left untouched.
    pub async fn finalize(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        block_id: &str,
        actor: &str,
        _confirmation: Confirmation,
    ) -> MusterResult<Campaign> {
        let campaign = self.campaign(campaign_id).await?;
        self.require_organizer(&campaign, actor)?;
        if campaign.state() == SchedulingState::Finalized {
            return Err(MusterError::AlreadyFinalized);
        }
        let proposal = self.proposal(campaign_id, proposal_id).await?;
        let block = proposal
            .block(block_id)
            .ok_or_else(|| MusterError::TimeBlockNotFound(block_id.to_string()))?;
        let session = FinalizedSession::from_block(block);
        let campaign = self
            .store
            .set_finalized_session(campaign_id, Some(session))
            .await?;
        info!(campaign = %campaign_id, block = %block_id, "finalized session");
        Ok(campaign)
    }

    /// Clear the finalized session, reopening the campaign with all prior
    /// proposals intact and immediately editable again.
    pub async fn clear_finalization(
        &self,
        campaign_id: &str,
        actor: &str,
        _confirmation: Confirmation,
    ) -> MusterResult<Campaign> {
        let campaign = self.campaign(campaign_id).await?;
        self.require_organizer(&campaign, actor)?;
        if campaign.state() == SchedulingState::Open {
            return Err(MusterError::NotFinalized);
        }
        let campaign = self.store.set_finalized_session(campaign_id, None).await?;
        info!(campaign = %campaign_id, "cleared finalized session");
        Ok(campaign)
    }

    // Gates

    fn require_organizer(&self, campaign: &Campaign, actor: &str) -> MusterResult<()> {
        if !campaign.is_owner(actor) {
            return Err(MusterError::PermissionDenied(format!(
                "only the organizer of '{}' may do this",
                campaign.name
            )));
        }
        Ok(())
    }

    fn require_member(&self, campaign: &Campaign, actor: &str) -> MusterResult<()> {
        if !campaign.is_member(actor) {
            return Err(MusterError::PermissionDenied(format!(
                "'{}' is not a member of '{}'",
                actor, campaign.name
            )));
        }
        Ok(())
    }

    /// Scheduling is locked while a session is finalized.
    fn require_open(&self, campaign: &Campaign) -> MusterResult<()> {
        match campaign.state() {
            SchedulingState::Open => Ok(()),
            SchedulingState::Finalized => Err(MusterError::AlreadyFinalized),
        }
    }
}
