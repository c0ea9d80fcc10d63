//! Error types for the muster ecosystem.

use thiserror::Error;

/// Errors that can occur in muster operations.
#[derive(Error, Debug)]
pub enum MusterError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Time block must end after it starts")]
    InvalidRange,

    #[error("Campaign not found: {0}")]
    CampaignNotFound(String),

    #[error("Proposal not found: {0}")]
    ProposalNotFound(String),

    #[error("Time block not found: {0}")]
    TimeBlockNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Campaign already has a finalized session")]
    AlreadyFinalized,

    #[error("Campaign has no finalized session to clear")]
    NotFinalized,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for muster operations.
pub type MusterResult<T> = Result<T, MusterError>;
