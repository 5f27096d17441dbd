use std::path::PathBuf;

/// Every failure the orchestration layer can surface to the dispatcher.
///
/// All variants are terminal for the current invocation. A transaction that is
/// mined but reverts is NOT an error: it is reported as a
/// [`crate::models::TransactionOutcome`] with a reverted status.
#[derive(Debug, thiserror::Error)]
pub enum StarportError {
    #[error("config of chain ({0}) not exists")]
    ConfigNotFound(String),

    #[error("interface ({interface}) of dest chain ({chain}) not exists")]
    InterfaceNotFound { chain: String, interface: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load signing key: {0}")]
    Secret(String),

    #[error("failed to load ABI from {}: {reason}", .path.display())]
    AbiLoad { path: PathBuf, reason: String },

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("decoding failed: {0}")]
    DecodingFailed(String),

    #[error("node unavailable: {0}")]
    NodeUnavailable(String),

    #[error("chain id mismatch: configured {configured}, node reports {reported}")]
    ChainMismatch { configured: u64, reported: u64 },

    #[error(
        "transaction rejected before broadcast: {}",
        .reason.as_deref().unwrap_or("no reason given")
    )]
    Rejected { reason: Option<String> },

    #[error("call reverted: {}", .reason.as_deref().unwrap_or("no reason given"))]
    CallReverted { reason: Option<String> },

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("{0}")]
    InvalidArguments(String),
}

impl StarportError {
    /// Process exit code for this failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            StarportError::InvalidArguments(_) => 2,
            StarportError::ConfigNotFound(_)
            | StarportError::InterfaceNotFound { .. }
            | StarportError::InvalidConfig(_)
            | StarportError::Secret(_) => 3,
            StarportError::AbiLoad { .. } => 4,
            StarportError::EncodingFailed(_) | StarportError::DecodingFailed(_) => 5,
            StarportError::NodeUnavailable(_) => 6,
            StarportError::ChainMismatch { .. } => 7,
            StarportError::Rejected { .. } => 8,
            StarportError::CallReverted { .. } => 9,
            StarportError::Signing(_) => 10,
        }
    }
}

pub type StarportResult<T> = std::result::Result<T, StarportError>;
