//! In-memory store, used by tests and as the reference semantics.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::campaign::{Campaign, CampaignId, FinalizedSession};
use crate::error::{MusterError, MusterResult};
use crate::proposal::{Proposal, ProposalId};
use crate::response::Availability;
use crate::time_block::TimeBlock;

use super::SchedulerStore;

/// A campaign document with its proposals nested under it, so deleting the
/// record cascades structurally.
#[derive(Debug, Clone)]
struct CampaignRecord {
    campaign: Campaign,
    proposals: BTreeMap<ProposalId, Proposal>,
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<CampaignId, CampaignRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn with_campaign<T>(
        &self,
        campaign_id: &str,
        apply: impl FnOnce(&mut CampaignRecord) -> MusterResult<T>,
    ) -> MusterResult<T> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(campaign_id)
            .ok_or_else(|| MusterError::CampaignNotFound(campaign_id.to_string()))?;
        apply(record)
    }

    async fn with_proposal<T>(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        apply: impl FnOnce(&mut Proposal) -> MusterResult<T>,
    ) -> MusterResult<T> {
        self.with_campaign(campaign_id, |record| {
            let proposal = record
                .proposals
                .get_mut(proposal_id)
                .ok_or_else(|| MusterError::ProposalNotFound(proposal_id.to_string()))?;
            apply(proposal)
        })
        .await
    }
}

#[async_trait]
impl SchedulerStore for MemoryStore {
    async fn create_campaign(&self, campaign: &Campaign) -> MusterResult<()> {
        let mut records = self.records.write().await;
        records.insert(
            campaign.id.clone(),
            CampaignRecord {
                campaign: campaign.clone(),
                proposals: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn get_campaign(&self, campaign_id: &str) -> MusterResult<Option<Campaign>> {
        let records = self.records.read().await;
        Ok(records.get(campaign_id).map(|r| r.campaign.clone()))
    }

    async fn add_member(&self, campaign_id: &str, user: &str) -> MusterResult<Campaign> {
        self.with_campaign(campaign_id, |record| {
            record.campaign.add_member(user);
            Ok(record.campaign.clone())
        })
        .await
    }

    async fn set_finalized_session(
        &self,
        campaign_id: &str,
        session: Option<FinalizedSession>,
    ) -> MusterResult<Campaign> {
        self.with_campaign(campaign_id, |record| {
            record.campaign.finalized_session = session;
            Ok(record.campaign.clone())
        })
        .await
    }

    async fn campaigns_for_member(&self, user: &str) -> MusterResult<Vec<Campaign>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.campaign.is_member(user))
            .map(|r| r.campaign.clone())
            .collect())
    }

    async fn create_proposal(&self, campaign_id: &str, proposal: &Proposal) -> MusterResult<()> {
        self.with_campaign(campaign_id, |record| {
            record
                .proposals
                .insert(proposal.id.clone(), proposal.clone());
            Ok(())
        })
        .await
    }

    async fn get_proposal(
        &self,
        campaign_id: &str,
        proposal_id: &str,
    ) -> MusterResult<Option<Proposal>> {
        let records = self.records.read().await;
        Ok(records
            .get(campaign_id)
            .and_then(|r| r.proposals.get(proposal_id))
            .cloned())
    }

    async fn list_proposals(&self, campaign_id: &str) -> MusterResult<Vec<Proposal>> {
        let records = self.records.read().await;
        let record = records
            .get(campaign_id)
            .ok_or_else(|| MusterError::CampaignNotFound(campaign_id.to_string()))?;
        Ok(record.proposals.values().cloned().collect())
    }

    async fn set_proposal_title(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        title: &str,
    ) -> MusterResult<Proposal> {
        self.with_proposal(campaign_id, proposal_id, |proposal| {
            proposal.rename(title)?;
            Ok(proposal.clone())
        })
        .await
    }

    async fn set_blocks_for_day(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        day: NaiveDate,
        blocks: Vec<TimeBlock>,
    ) -> MusterResult<Proposal> {
        self.with_proposal(campaign_id, proposal_id, |proposal| {
            proposal.set_blocks_for_day(day, blocks)?;
            Ok(proposal.clone())
        })
        .await
    }

    async fn set_response(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        member: &str,
        block_id: &str,
        value: Availability,
    ) -> MusterResult<Proposal> {
        self.with_proposal(campaign_id, proposal_id, |proposal| {
            proposal.set_response(member, block_id, value);
            Ok(proposal.clone())
        })
        .await
    }

    async fn delete_proposal(&self, campaign_id: &str, proposal_id: &str) -> MusterResult<()> {
        self.with_campaign(campaign_id, |record| {
            record
                .proposals
                .remove(proposal_id)
                .ok_or_else(|| MusterError::ProposalNotFound(proposal_id.to_string()))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_campaign_is_reported_on_mutation() {
        let store = MemoryStore::new();
        let err = store.add_member("nope", "alice").await.unwrap_err();
        assert!(matches!(err, MusterError::CampaignNotFound(_)));
    }

    #[tokio::test]
    async fn test_campaigns_for_member_filters_by_roster() {
        let store = MemoryStore::new();
        let a = Campaign::new("Strahd", "dm-1").unwrap();
        let b = Campaign::new("Avernus", "dm-2").unwrap();
        store.create_campaign(&a).await.unwrap();
        store.create_campaign(&b).await.unwrap();
        store.add_member(&a.id, "alice").await.unwrap();

        let mine = store.campaigns_for_member("alice").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, a.id);

        let dm2 = store.campaigns_for_member("dm-2").await.unwrap();
        assert_eq!(dm2.len(), 1);
        assert_eq!(dm2[0].id, b.id);
    }

    #[tokio::test]
    async fn test_delete_proposal_requires_existence() {
        let store = MemoryStore::new();
        let campaign = Campaign::new("Strahd", "dm-1").unwrap();
        store.create_campaign(&campaign).await.unwrap();
        let err = store
            .delete_proposal(&campaign.id, "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, MusterError::ProposalNotFound(_)));
    }
}
