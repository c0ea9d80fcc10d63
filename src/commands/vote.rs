use anyhow::Result;
use clap::ValueEnum;
use muster_core::store::JsonStore;
use muster_core::{Availability, Scheduler};

use crate::render::{render_proposal, Render};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VoteValue {
    Yes,
    Maybe,
    No,
}

impl From<VoteValue> for Availability {
    fn from(value: VoteValue) -> Self {
        match value {
            VoteValue::Yes => Availability::Yes,
            VoteValue::Maybe => Availability::Maybe,
            VoteValue::No => Availability::No,
        }
    }
}

pub async fn run(
    scheduler: &Scheduler<JsonStore>,
    campaign_id: &str,
    proposal_id: &str,
    block_id: &str,
    value: Option<VoteValue>,
    user: &str,
) -> Result<()> {
    let campaign = super::resolve_campaign(scheduler, user, campaign_id).await?;
    let proposal = super::resolve_proposal(scheduler, &campaign.id, proposal_id).await?;
    let block_id = super::resolve_block_id(&proposal, block_id)?;

    // No explicit value means quick-toggle
    let (updated, recorded) = match value {
        Some(v) => {
            let value = Availability::from(v);
            let updated = scheduler
                .set_response(&campaign.id, &proposal.id, user, &block_id, value)
                .await?;
            (updated, value)
        }
        None => {
            scheduler
                .toggle_response(&campaign.id, &proposal.id, user, &block_id)
                .await?
        }
    };

    println!("Recorded {} for {}", recorded.render(), user);
    println!("\n{}", render_proposal(&updated, campaign.state()));
    Ok(())
}
