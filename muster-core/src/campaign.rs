//! Campaigns: the owning scope for proposals and the finalized session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MusterError, MusterResult};
use crate::time_block::{BlockId, TimeBlock};

/// Identity of a user, as supplied by the external auth collaborator.
pub type UserId = String;

/// Opaque unique id of a campaign.
pub type CampaignId = String;

/// The single confirmed slot for a campaign, chosen from a proposal's block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub source_block_id: BlockId,
}

impl FinalizedSession {
    pub fn from_block(block: &TimeBlock) -> Self {
        FinalizedSession {
            start: block.start,
            end: block.end,
            source_block_id: block.id.clone(),
        }
    }
}

/// Scheduling state derived from `finalized_session`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingState {
    Open,
    Finalized,
}

/// A campaign: an organizer, a member roster, and at most one finalized
/// session at a time.
///
/// Members are only ever added (idempotent join); the roster never shrinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub owner_id: UserId,
    pub members: Vec<UserId>,
    #[serde(default)]
    pub finalized_session: Option<FinalizedSession>,
}

impl Campaign {
    /// Create a campaign; the creator becomes owner and sole initial member.
    ///
    /// Fails with `Validation` when the name is empty after trimming.
    pub fn new(name: &str, owner: &str) -> MusterResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MusterError::Validation(
                "campaign name cannot be empty".into(),
            ));
        }
        Ok(Campaign {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            owner_id: owner.to_string(),
            members: vec![owner.to_string()],
            finalized_session: None,
        })
    }

    pub fn is_owner(&self, user: &str) -> bool {
        self.owner_id == user
    }

    pub fn is_member(&self, user: &str) -> bool {
        self.members.iter().any(|m| m == user)
    }

    /// Append-unique join. Returns whether the roster changed.
    pub fn add_member(&mut self, user: &str) -> bool {
        if self.is_member(user) {
            return false;
        }
        self.members.push(user.to_string());
        true
    }

    pub fn state(&self) -> SchedulingState {
        if self.finalized_session.is_some() {
            SchedulingState::Finalized
        } else {
            SchedulingState::Open
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_creator_is_owner_and_sole_member() {
        let campaign = Campaign::new("Curse of Strahd", "dm-1").unwrap();
        assert!(campaign.is_owner("dm-1"));
        assert_eq!(campaign.members, vec!["dm-1".to_string()]);
        assert_eq!(campaign.state(), SchedulingState::Open);
    }

    #[test]
    fn test_name_is_trimmed_and_required() {
        assert!(matches!(
            Campaign::new("   ", "dm-1"),
            Err(MusterError::Validation(_))
        ));
        let campaign = Campaign::new("  Strahd  ", "dm-1").unwrap();
        assert_eq!(campaign.name, "Strahd");
    }

    #[test]
    fn test_join_is_idempotent() {
        let mut campaign = Campaign::new("Strahd", "dm-1").unwrap();
        assert!(campaign.add_member("player-1"));
        assert!(!campaign.add_member("player-1"));
        assert!(!campaign.add_member("dm-1"));
        assert_eq!(campaign.members.len(), 2);
    }

    #[test]
    fn test_state_follows_finalized_session() {
        let mut campaign = Campaign::new("Strahd", "dm-1").unwrap();
        let block = TimeBlock::new(
            Utc.with_ymd_and_hms(2025, 3, 17, 19, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 17, 21, 0, 0).unwrap(),
        )
        .unwrap();

        campaign.finalized_session = Some(FinalizedSession::from_block(&block));
        assert_eq!(campaign.state(), SchedulingState::Finalized);
        assert_eq!(
            campaign.finalized_session.as_ref().unwrap().source_block_id,
            block.id
        );

        campaign.finalized_session = None;
        assert_eq!(campaign.state(), SchedulingState::Open);
    }
}
