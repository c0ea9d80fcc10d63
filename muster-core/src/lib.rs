//! Core types for the muster ecosystem.
//!
//! This crate provides the scheduling model shared by the muster CLI and any
//! other frontend:
//! - `Campaign`, `Proposal` and `TimeBlock` for the scheduling data model
//! - `Availability` marks and derived tallies
//! - `DayEditor` for uncommitted per-day block editing
//! - the `SchedulerStore` trait (plus memory and JSON-file implementations)
//! - `Scheduler`, the operation surface with validation and organizer gates

pub mod campaign;
pub mod day_editor;
pub mod error;
pub mod proposal;
pub mod response;
pub mod scheduler;
pub mod store;
pub mod time_block;

pub use campaign::{Campaign, CampaignId, FinalizedSession, SchedulingState, UserId};
pub use day_editor::DayEditor;
pub use error::{MusterError, MusterResult};
pub use proposal::{Proposal, ProposalId};
pub use response::{Availability, AvailabilityTally};
pub use scheduler::{Confirmation, Scheduler};
pub use store::SchedulerStore;
pub use time_block::{BlockId, TimeBlock};
