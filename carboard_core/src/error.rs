use thiserror::Error;

/// Failures at the remote-store boundary. A missing row on a `get` is
/// `Ok(None)` on the trait, never one of these.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("remote fetch failed: {0}")]
    Fetch(String),
    #[error("remote write failed: {0}")]
    Write(String),
}

/// Errors surfaced by `BoardSession` operations. Authorization denials
/// are not errors; they come back as `MutationOutcome::Denied`.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
