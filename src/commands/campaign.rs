use anyhow::Result;
use muster_core::store::JsonStore;
use muster_core::Scheduler;
use owo_colors::OwoColorize;

use crate::render::{render_proposal, short_id, Render};

pub async fn new(scheduler: &Scheduler<JsonStore>, name: &str, user: &str) -> Result<()> {
    let campaign = scheduler.create_campaign(name, user).await?;
    println!("{}", campaign.render());
    println!(
        "\nShare the campaign id so others can join:\n  muster join {}",
        campaign.id
    );
    Ok(())
}

pub async fn join(scheduler: &Scheduler<JsonStore>, campaign_id: &str, user: &str) -> Result<()> {
    let campaign = super::resolve_campaign(scheduler, user, campaign_id).await?;
    let campaign = scheduler.join_campaign(&campaign.id, user).await?;
    println!("Joined {}", campaign.name.bold());
    Ok(())
}

pub async fn list(scheduler: &Scheduler<JsonStore>, user: &str) -> Result<()> {
    let campaigns = scheduler.campaigns_for_member(user).await?;
    if campaigns.is_empty() {
        println!("No campaigns yet. Start one with: muster new <name>");
        return Ok(());
    }
    for campaign in campaigns {
        let role = if campaign.is_owner(user) { "organizer" } else { "member" };
        println!(
            "{}  {}  {}",
            short_id(&campaign.id).dimmed(),
            campaign.name.bold(),
            role.dimmed()
        );
    }
    Ok(())
}

pub async fn show(scheduler: &Scheduler<JsonStore>, campaign_id: &str, user: &str) -> Result<()> {
    let campaign = super::resolve_campaign(scheduler, user, campaign_id).await?;
    println!("{}", campaign.render());

    let proposals = scheduler.list_proposals(&campaign.id).await?;
    if proposals.is_empty() {
        println!("\nNo proposals yet.");
        return Ok(());
    }
    for proposal in proposals {
        println!("\n{}", render_proposal(&proposal, campaign.state()));
    }
    Ok(())
}
