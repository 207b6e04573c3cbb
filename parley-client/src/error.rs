//! Error taxonomy for the synchronization core.

use thiserror::Error;

/// A failure talking to an external collaborator (stream or history
/// service). Never fatal: callers log and continue with local state.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request itself failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// A collaborator endpoint URL could not be formed.
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The history service reported an unsuccessful fetch.
    #[error("history service reported failure")]
    HistoryRejected,
}

/// A failure reading or writing the persisted local identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity file could not be read or written.
    #[error("identity storage error: {0}")]
    Io(#[from] std::io::Error),
    /// The persisted identity could not be decoded.
    #[error("corrupt identity record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors surfaced to the user by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A user-supplied value failed validation.
    #[error("validation failed: {0}")]
    Validation(&'static str),
    /// The durable identity store failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}
