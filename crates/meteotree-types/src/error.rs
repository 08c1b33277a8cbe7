//! Error types for identifier validation in meteotree-types.

use thiserror::Error;

/// Errors that can occur when constructing a data-point identifier.
///
/// This error type is platform-agnostic and does not include store or
/// network errors (those belong in meteotree-store and meteotree-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IdError {
    /// The identifier has no segments at all.
    #[error("identifier must contain at least one segment")]
    Empty,
    /// A segment between two dots is empty.
    #[error("empty segment in identifier {0:?}")]
    EmptySegment(String),
    /// A segment contains a character outside the allowed set
    /// (alphanumerics and `_`).
    #[error("invalid character {ch:?} in identifier segment {segment:?}")]
    InvalidCharacter {
        /// The offending segment.
        segment: String,
        /// The first disallowed character found in it.
        ch: char,
    },
}

/// Result type alias using meteotree-types' IdError type.
pub type IdResult<T> = std::result::Result<T, IdError>;
