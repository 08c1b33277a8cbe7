//! Error types for the synchronization engine.

use meteotree_types::IdError;
use thiserror::Error;

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the sync engine.
///
/// Per the failure taxonomy, none of these are fatal to a host process:
/// fetch failures skip one location for one cycle, and store failures end
/// one per-location or per-subtree operation while the surrounding loop
/// continues.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Fetching a location's snapshot failed; that location is skipped
    /// for this cycle.
    #[error("fetch failed for '{location}': {reason}")]
    Fetch {
        /// Display name of the affected location.
        location: String,
        /// Underlying transport or payload failure.
        reason: FetchError,
    },

    /// The state store rejected an operation.
    #[error("store error: {0}")]
    Store(#[from] meteotree_store::Error),

    /// A computed point identifier was not well-formed.
    #[error("invalid point id: {0}")]
    Id(#[from] IdError),

    /// Timestamp formatting failed.
    #[error("time formatting error: {0}")]
    Format(#[from] time::error::Format),
}

/// Failure reported by a [`SnapshotFetcher`](crate::SnapshotFetcher).
///
/// Carries plain strings so the engine stays independent of any
/// particular HTTP client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The request could not be completed (network, DNS, timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response arrived but could not be decoded into a snapshot.
    #[error("malformed payload: {0}")]
    Payload(String),
}
