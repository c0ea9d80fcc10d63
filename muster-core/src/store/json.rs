//! JSON-file store: one document per campaign under a data directory.
//!
//! Each campaign lives in `<id>.json` with its proposals nested inside, so
//! removing the file removes the whole campaign (cascading delete is
//! structural). Writes land in a temp file first and are renamed into place,
//! so an interrupted write never truncates the stored document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::campaign::{Campaign, FinalizedSession};
use crate::error::{MusterError, MusterResult};
use crate::proposal::{Proposal, ProposalId};
use crate::response::Availability;
use crate::time_block::TimeBlock;

use super::SchedulerStore;

/// Persisted shape of one campaign file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CampaignDocument {
    campaign: Campaign,
    #[serde(default)]
    proposals: BTreeMap<ProposalId, Proposal>,
}

/// File-backed store rooted at a data directory.
pub struct JsonStore {
    root: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> MusterResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(JsonStore {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, campaign_id: &str) -> PathBuf {
        self.root.join(format!("{campaign_id}.json"))
    }

    async fn load(&self, campaign_id: &str) -> MusterResult<Option<CampaignDocument>> {
        let path = self.path_for(campaign_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let doc = serde_json::from_slice(&bytes)
            .map_err(|e| MusterError::Serialization(format!("{}: {}", path.display(), e)))?;
        Ok(Some(doc))
    }

    async fn load_required(&self, campaign_id: &str) -> MusterResult<CampaignDocument> {
        self.load(campaign_id)
            .await?
            .ok_or_else(|| MusterError::CampaignNotFound(campaign_id.to_string()))
    }

    async fn save(&self, doc: &CampaignDocument) -> MusterResult<()> {
        let path = self.path_for(&doc.campaign.id);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(|e| MusterError::Serialization(e.to_string()))?;
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Load, mutate and write back one campaign document atomically with
    /// respect to other calls on this store.
    async fn update<T>(
        &self,
        campaign_id: &str,
        apply: impl FnOnce(&mut CampaignDocument) -> MusterResult<T>,
    ) -> MusterResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load_required(campaign_id).await?;
        let out = apply(&mut doc)?;
        self.save(&doc).await?;
        Ok(out)
    }

    fn proposal_mut<'a>(
        doc: &'a mut CampaignDocument,
        proposal_id: &str,
    ) -> MusterResult<&'a mut Proposal> {
        doc.proposals
            .get_mut(proposal_id)
            .ok_or_else(|| MusterError::ProposalNotFound(proposal_id.to_string()))
    }
}

#[async_trait]
impl SchedulerStore for JsonStore {
    async fn create_campaign(&self, campaign: &Campaign) -> MusterResult<()> {
        let _guard = self.write_lock.lock().await;
        self.save(&CampaignDocument {
            campaign: campaign.clone(),
            proposals: BTreeMap::new(),
        })
        .await
    }

    async fn get_campaign(&self, campaign_id: &str) -> MusterResult<Option<Campaign>> {
        Ok(self.load(campaign_id).await?.map(|doc| doc.campaign))
    }

    async fn add_member(&self, campaign_id: &str, user: &str) -> MusterResult<Campaign> {
        self.update(campaign_id, |doc| {
            doc.campaign.add_member(user);
            Ok(doc.campaign.clone())
        })
        .await
    }

    async fn set_finalized_session(
        &self,
        campaign_id: &str,
        session: Option<FinalizedSession>,
    ) -> MusterResult<Campaign> {
        self.update(campaign_id, |doc| {
            doc.campaign.finalized_session = session;
            Ok(doc.campaign.clone())
        })
        .await
    }

    async fn campaigns_for_member(&self, user: &str) -> MusterResult<Vec<Campaign>> {
        let mut campaigns = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            let doc: CampaignDocument = serde_json::from_slice(&bytes)
                .map_err(|e| MusterError::Serialization(format!("{}: {}", path.display(), e)))?;
            if doc.campaign.is_member(user) {
                campaigns.push(doc.campaign);
            }
        }
        campaigns.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(campaigns)
    }

    async fn create_proposal(&self, campaign_id: &str, proposal: &Proposal) -> MusterResult<()> {
        self.update(campaign_id, |doc| {
            doc.proposals.insert(proposal.id.clone(), proposal.clone());
            Ok(())
        })
        .await
    }

    async fn get_proposal(
        &self,
        campaign_id: &str,
        proposal_id: &str,
    ) -> MusterResult<Option<Proposal>> {
        Ok(self
            .load(campaign_id)
            .await?
            .and_then(|doc| doc.proposals.get(proposal_id).cloned()))
    }

    async fn list_proposals(&self, campaign_id: &str) -> MusterResult<Vec<Proposal>> {
        let doc = self.load_required(campaign_id).await?;
        Ok(doc.proposals.into_values().collect())
    }

    async fn set_proposal_title(
        &self,
        campaign_id: &str,
        proposal_id: &str,
        title: &str,
    ) -> MusterResult<Proposal> {
        self.update(campaign_id, |doc| {
            let proposal = Self::proposal_mut(doc, proposal_id)?;
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
        self.update(campaign_id, |doc| {
            let proposal = Self::proposal_mut(doc, proposal_id)?;
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
        self.update(campaign_id, |doc| {
            let proposal = Self::proposal_mut(doc, proposal_id)?;
            proposal.set_response(member, block_id, value);
            Ok(proposal.clone())
        })
        .await
    }

    async fn delete_proposal(&self, campaign_id: &str, proposal_id: &str) -> MusterResult<()> {
        self.update(campaign_id, |doc| {
            doc.proposals
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
    use chrono::{TimeZone, Utc};

    fn sample_block() -> TimeBlock {
        TimeBlock::new(
            Utc.with_ymd_and_hms(2025, 3, 17, 19, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 17, 21, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let campaign = Campaign::new("Strahd", "dm-1").unwrap();
        let proposal = Proposal::new("Session 5", "dm-1").unwrap();
        let block = sample_block();

        {
            let store = JsonStore::open(dir.path()).unwrap();
            store.create_campaign(&campaign).await.unwrap();
            store.create_proposal(&campaign.id, &proposal).await.unwrap();
            store
                .set_blocks_for_day(
                    &campaign.id,
                    &proposal.id,
                    block.day_key(),
                    vec![block.clone()],
                )
                .await
                .unwrap();
            store
                .set_response(&campaign.id, &proposal.id, "alice", &block.id, Availability::Yes)
                .await
                .unwrap();
        }

        let store = JsonStore::open(dir.path()).unwrap();
        let loaded = store
            .get_proposal(&campaign.id, &proposal.id)
            .await
            .unwrap()
            .unwrap();
        let blocks = loaded.all_blocks_sorted();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, block.id);
        assert_eq!(blocks[0].start, block.start);
        assert_eq!(blocks[0].end, block.end);
        assert_eq!(loaded.count_available(&block.id), 1);
    }

    #[tokio::test]
    async fn test_missing_campaign_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        assert!(store.get_campaign("nope").await.unwrap().is_none());
        assert!(matches!(
            store.add_member("nope", "alice").await.unwrap_err(),
            MusterError::CampaignNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_failed_validation_leaves_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let campaign = Campaign::new("Strahd", "dm-1").unwrap();
        let proposal = Proposal::new("Session 5", "dm-1").unwrap();
        store.create_campaign(&campaign).await.unwrap();
        store.create_proposal(&campaign.id, &proposal).await.unwrap();

        let err = store
            .set_proposal_title(&campaign.id, &proposal.id, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, MusterError::Validation(_)));

        let loaded = store
            .get_proposal(&campaign.id, &proposal.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.title, "Session 5");
    }

    #[tokio::test]
    async fn test_campaigns_for_member_scans_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let a = Campaign::new("Avernus", "dm-1").unwrap();
        let b = Campaign::new("Strahd", "dm-2").unwrap();
        store.create_campaign(&a).await.unwrap();
        store.create_campaign(&b).await.unwrap();
        store.add_member(&b.id, "dm-1").await.unwrap();

        let mine = store.campaigns_for_member("dm-1").await.unwrap();
        let names: Vec<_> = mine.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Avernus", "Strahd"]);
    }
}
