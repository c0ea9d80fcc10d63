use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use muster_core::store::JsonStore;
use muster_core::{DayEditor, Scheduler};

use crate::render::render_proposal;

/// Edit one day's candidate blocks: apply removals and additions locally,
/// then commit the whole day in a single save.
pub async fn run(
    scheduler: &Scheduler<JsonStore>,
    campaign_id: &str,
    proposal_id: &str,
    day: &str,
    add: Vec<String>,
    remove: Vec<String>,
    user: &str,
) -> Result<()> {
    let campaign = super::resolve_campaign(scheduler, user, campaign_id).await?;
    let proposal = super::resolve_proposal(scheduler, &campaign.id, proposal_id).await?;
    let day = NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .with_context(|| format!("Invalid day '{}'. Expected YYYY-MM-DD", day))?;

    let existing = proposal
        .blocks_by_day
        .get(&day)
        .cloned()
        .unwrap_or_default();
    let mut editor = DayEditor::with_blocks(day, existing);

    for id_or_prefix in &remove {
        let id = super::resolve_block_id(&proposal, id_or_prefix)?;
        editor.remove_block(&id);
    }
    for range in &add {
        let (start, end) = parse_time_range(range)?;
        editor.add_block(start, end)?;
    }

    let updated = scheduler
        .save_blocks_for_day(&campaign.id, &proposal.id, day, editor.into_blocks(), user)
        .await?;
    println!("{}", render_proposal(&updated, campaign.state()));
    Ok(())
}

/// Parse "HH:MM-HH:MM" into a (start, end) pair of times of day.
fn parse_time_range(s: &str) -> Result<(NaiveTime, NaiveTime)> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| anyhow!("Invalid range '{}'. Expected HH:MM-HH:MM", s))?;
    Ok((parse_time(start.trim())?, parse_time(end.trim())?))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .with_context(|| format!("Invalid time '{}'. Expected HH:MM", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_range() {
        let (start, end) = parse_time_range("19:00-21:30").unwrap();
        assert_eq!(start, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(21, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_time_range_rejects_garbage() {
        assert!(parse_time_range("19:00").is_err());
        assert!(parse_time_range("7pm-9pm").is_err());
    }
}
