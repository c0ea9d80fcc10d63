use anyhow::Result;
use dialoguer::Confirm;
use muster_core::store::JsonStore;
use muster_core::{Confirmation, Scheduler};
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn finalize(
    scheduler: &Scheduler<JsonStore>,
    campaign_id: &str,
    proposal_id: &str,
    block_id: &str,
    user: &str,
    yes: bool,
) -> Result<()> {
    let campaign = super::resolve_campaign(scheduler, user, campaign_id).await?;
    let proposal = super::resolve_proposal(scheduler, &campaign.id, proposal_id).await?;
    let block_id = super::resolve_block_id(&proposal, block_id)?;
    let block = proposal.block(&block_id).expect("resolved above");

    let tally = proposal.tally(&block_id);
    println!("{}", block.render());
    println!("{} yes, {} maybe, {} no", tally.yes, tally.maybe, tally.no);
    let confirmed = yes
        || Confirm::new()
            .with_prompt("Lock this time as the session? Proposal editing closes until reopened")
            .default(false)
            .interact()?;
    if !confirmed {
        println!("Aborted.");
        return Ok(());
    }

    let campaign = scheduler
        .finalize(
            &campaign.id,
            &proposal.id,
            &block_id,
            user,
            Confirmation::given(),
        )
        .await?;
    println!("\n{}", campaign.render());
    Ok(())
}

pub async fn reopen(
    scheduler: &Scheduler<JsonStore>,
    campaign_id: &str,
    user: &str,
    yes: bool,
) -> Result<()> {
    let campaign = super::resolve_campaign(scheduler, user, campaign_id).await?;

    let confirmed = yes
        || Confirm::new()
            .with_prompt(format!(
                "Clear the locked session for '{}' and reopen scheduling?",
                campaign.name
            ))
            .default(false)
            .interact()?;
    if !confirmed {
        println!("Aborted.");
        return Ok(());
    }

    let campaign = scheduler
        .clear_finalization(&campaign.id, user, Confirmation::given())
        .await?;
    println!("{} is open for scheduling again.", campaign.name.bold());
    Ok(())
}
