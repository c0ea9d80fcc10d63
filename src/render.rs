//! Terminal rendering for muster types.

use muster_core::{Availability, Campaign, Proposal, SchedulingState, TimeBlock};
use owo_colors::OwoColorize;

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Campaign {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {} {}",
            "⚔".yellow(),
            self.name.bold(),
            format!("({})", self.id).dimmed()
        )];
        lines.push(format!(
            "   organizer: {}   members: {}",
            self.owner_id,
            self.members.join(", ")
        ));
        if let Some(session) = &self.finalized_session {
            lines.push(format!(
                "   {} {} – {}",
                "locked:".green().bold(),
                session.start.format("%a %Y-%m-%d %H:%M"),
                session.end.format("%H:%M")
            ));
        }
        lines.join("\n")
    }
}

impl Render for TimeBlock {
    fn render(&self) -> String {
        format!(
            "{} {}–{} {}",
            self.start.format("%a %Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            format!("[{}]", short_id(&self.id)).dimmed()
        )
    }
}

impl Render for Availability {
    fn render(&self) -> String {
        match self {
            Availability::Yes => "yes".green().to_string(),
            Availability::Maybe => "maybe".yellow().to_string(),
            Availability::No => "no".red().to_string(),
        }
    }
}

/// One proposal with a tally line per block.
pub fn render_proposal(proposal: &Proposal, state: SchedulingState) -> String {
    let mut lines = vec![format!(
        "📋 {} {}",
        proposal.title.bold(),
        format!("({})", proposal.id).dimmed()
    )];
    if state == SchedulingState::Finalized {
        lines.push(format!("   {}", "voting closed (session locked)".dimmed()));
    }
    let blocks = proposal.all_blocks_sorted();
    if blocks.is_empty() {
        lines.push(format!("   {}", "no times proposed yet".dimmed()));
    }
    for block in blocks {
        let tally = proposal.tally(&block.id);
        lines.push(format!(
            "   {}  {} yes, {} maybe, {} no",
            block.render(),
            tally.yes.to_string().green(),
            tally.maybe.to_string().yellow(),
            tally.no.to_string().red()
        ));
    }
    lines.join("\n")
}

/// First UUID segment, enough to pass on the command line unambiguously in
/// the common case; full ids are always accepted too.
pub fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}
