pub mod blocks;
pub mod campaign;
pub mod finalize;
pub mod proposal;
pub mod vote;

use anyhow::{bail, Result};
use muster_core::store::JsonStore;
use muster_core::{Campaign, Proposal, Scheduler, SchedulerStore};

/// Resolve a campaign by full id or unambiguous id prefix.
pub async fn resolve_campaign(
    scheduler: &Scheduler<JsonStore>,
    user: &str,
    id_or_prefix: &str,
) -> Result<Campaign> {
    if let Some(campaign) = scheduler.store().get_campaign(id_or_prefix).await? {
        return Ok(campaign);
    }
    let mine = scheduler.campaigns_for_member(user).await?;
    let matches: Vec<_> = mine
        .into_iter()
        .filter(|c| c.id.starts_with(id_or_prefix))
        .collect();
    match matches.len() {
        0 => bail!("No campaign matching '{}'", id_or_prefix),
        1 => Ok(matches.into_iter().next().unwrap()),
        n => bail!("'{}' is ambiguous ({} campaigns match)", id_or_prefix, n),
    }
}

/// Resolve a proposal within a campaign by id prefix or exact title.
pub async fn resolve_proposal(
    scheduler: &Scheduler<JsonStore>,
    campaign_id: &str,
    id_or_title: &str,
) -> Result<Proposal> {
    let proposals = scheduler.list_proposals(campaign_id).await?;
    let matches: Vec<_> = proposals
        .into_iter()
        .filter(|p| p.id.starts_with(id_or_title) || p.title == id_or_title)
        .collect();
    match matches.len() {
        0 => bail!("No proposal matching '{}'", id_or_title),
        1 => Ok(matches.into_iter().next().unwrap()),
        n => bail!("'{}' is ambiguous ({} proposals match)", id_or_title, n),
    }
}

/// Resolve a block id within a proposal by full id or prefix.
pub fn resolve_block_id(proposal: &Proposal, id_or_prefix: &str) -> Result<String> {
    let matches: Vec<_> = proposal
        .all_blocks_sorted()
        .into_iter()
        .filter(|b| b.id.starts_with(id_or_prefix))
        .map(|b| b.id.clone())
        .collect();
    match matches.len() {
        0 => bail!("No time block matching '{}'", id_or_prefix),
        1 => Ok(matches.into_iter().next().unwrap()),
        n => bail!("'{}' is ambiguous ({} blocks match)", id_or_prefix, n),
    }
}
