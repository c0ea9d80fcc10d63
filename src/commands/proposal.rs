use anyhow::Result;
use dialoguer::Confirm;
use muster_core::store::JsonStore;
use muster_core::Scheduler;
use owo_colors::OwoColorize;

use crate::render::render_proposal;

pub async fn propose(
    scheduler: &Scheduler<JsonStore>,
    campaign_id: &str,
    title: &str,
    user: &str,
) -> Result<()> {
    let campaign = super::resolve_campaign(scheduler, user, campaign_id).await?;
    let proposal = scheduler
        .create_proposal(&campaign.id, title, user)
        .await?;
    println!("Created proposal {} ({})", proposal.title.bold(), proposal.id);
    println!("Add candidate times with: muster blocks {} {} --day <YYYY-MM-DD> --add <HH:MM-HH:MM>",
        campaign.id, proposal.id);
    Ok(())
}

pub async fn rename(
    scheduler: &Scheduler<JsonStore>,
    campaign_id: &str,
    proposal_id: &str,
    title: &str,
    user: &str,
) -> Result<()> {
    let campaign = super::resolve_campaign(scheduler, user, campaign_id).await?;
    let proposal = super::resolve_proposal(scheduler, &campaign.id, proposal_id).await?;
    let proposal = scheduler
        .rename_proposal(&campaign.id, &proposal.id, title, user)
        .await?;
    println!("Renamed to {}", proposal.title.bold());
    Ok(())
}

pub async fn remove(
    scheduler: &Scheduler<JsonStore>,
    campaign_id: &str,
    proposal_id: &str,
    user: &str,
    yes: bool,
) -> Result<()> {
    let campaign = super::resolve_campaign(scheduler, user, campaign_id).await?;
    let proposal = super::resolve_proposal(scheduler, &campaign.id, proposal_id).await?;

    println!("{}", render_proposal(&proposal, campaign.state()));
    let confirmed = yes
        || Confirm::new()
            .with_prompt(format!(
                "Delete '{}' and all of its votes? This cannot be undone",
                proposal.title
            ))
            .default(false)
            .interact()?;
    if !confirmed {
        println!("Aborted.");
        return Ok(());
    }

    scheduler
        .delete_proposal(&campaign.id, &proposal.id, user)
        .await?;
    println!("Deleted {}", proposal.title.bold());
    Ok(())
}
