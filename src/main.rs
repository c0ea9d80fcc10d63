mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use muster_core::store::JsonStore;
use muster_core::Scheduler;

use crate::commands::vote::VoteValue;
use crate::config::MusterConfig;

#[derive(Parser)]
#[command(name = "muster")]
#[command(about = "Schedule campaign sessions: propose times, vote availability, lock the slot")]
struct Cli {
    /// Act as this user (overrides the config file identity)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new campaign (you become its organizer)
    New { name: String },

    /// Join an existing campaign
    Join { campaign: String },

    /// List your campaigns
    List,

    /// Show a campaign, its proposals and vote tallies
    Show { campaign: String },

    /// Create a proposal for members to vote on (organizer only)
    Propose { campaign: String, title: String },

    /// Rename a proposal (organizer only)
    Rename {
        campaign: String,
        proposal: String,
        title: String,
    },

    /// Delete a proposal and its votes (organizer only)
    Remove {
        campaign: String,
        proposal: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Edit one day's candidate time blocks (organizer only)
    Blocks {
        campaign: String,
        proposal: String,

        /// Day to edit (YYYY-MM-DD)
        #[arg(long)]
        day: String,

        /// Add a block (HH:MM-HH:MM); may be repeated
        #[arg(long)]
        add: Vec<String>,

        /// Remove a block by id or id prefix; may be repeated
        #[arg(long)]
        remove: Vec<String>,
    },

    /// Record your availability for a block (omit the value to toggle yes/no)
    Vote {
        campaign: String,
        proposal: String,
        block: String,
        value: Option<VoteValue>,
    },

    /// Lock a block as the session (organizer only)
    Finalize {
        campaign: String,
        proposal: String,
        block: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Clear the locked session and reopen scheduling (organizer only)
    Reopen {
        campaign: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = MusterConfig::load()?;
    let user = config.resolve_user(cli.user.clone())?;
    let scheduler = Scheduler::new(JsonStore::open(config.data_dir()?)?);

    match cli.command {
        Commands::New { name } => commands::campaign::new(&scheduler, &name, &user).await,
        Commands::Join { campaign } => commands::campaign::join(&scheduler, &campaign, &user).await,
        Commands::List => commands::campaign::list(&scheduler, &user).await,
        Commands::Show { campaign } => commands::campaign::show(&scheduler, &campaign, &user).await,
        Commands::Propose { campaign, title } => {
            commands::proposal::propose(&scheduler, &campaign, &title, &user).await
        }
        Commands::Rename {
            campaign,
            proposal,
            title,
        } => commands::proposal::rename(&scheduler, &campaign, &proposal, &title, &user).await,
        Commands::Remove {
            campaign,
            proposal,
            yes,
        } => commands::proposal::remove(&scheduler, &campaign, &proposal, &user, yes).await,
        Commands::Blocks {
            campaign,
            proposal,
            day,
            add,
            remove,
        } => {
            commands::blocks::run(&scheduler, &campaign, &proposal, &day, add, remove, &user).await
        }
        Commands::Vote {
            campaign,
            proposal,
            block,
            value,
        } => commands::vote::run(&scheduler, &campaign, &proposal, &block, value, &user).await,
        Commands::Finalize {
            campaign,
            proposal,
            block,
            yes,
        } => commands::finalize::finalize(&scheduler, &campaign, &proposal, &block, &user, yes).await,
        Commands::Reopen { campaign, yes } => {
            commands::finalize::reopen(&scheduler, &campaign, &user, yes).await
        }
    }
}
