//! Error types for the rankkit library.
//!
//! ## Key Components
//!
//! - [`IdentifierError`]: Returned by
//!   [`CardinalityRanking::add_member`](crate::ranking::CardinalityRanking::add_member)
//!   when a group or member identifier is empty. Nothing is mutated.
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//! - [`ConfigError`]: Returned when ingestion configuration is invalid
//!   (e.g. empty column name, delimiter equal to the quote character).
//!
//! Ingestion failures (I/O, missing key column) use
//! [`IngestError`](crate::ingest::IngestError).
//!
//! ## Example Usage
//!
//! ```
//! use rankkit::error::{IdentifierError, IdentifierKind};
//! use rankkit::ranking::CardinalityRanking;
//!
//! let mut ranking: CardinalityRanking<String, String> = CardinalityRanking::new();
//! let err = ranking.add_member(String::new(), "x@d.com".to_string()).unwrap_err();
//! assert_eq!(err, IdentifierError::new(IdentifierKind::Group));
//! assert!(ranking.is_empty());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// IdentifierError
// ---------------------------------------------------------------------------

/// Which half of a `(group, member)` pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Group,
    Member,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Group => f.write_str("group"),
            IdentifierKind::Member => f.write_str("member"),
        }
    }
}

/// Error returned when an identifier is not well formed (empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierError {
    kind: IdentifierKind,
}

impl IdentifierError {
    #[inline]
    pub fn new(kind: IdentifierKind) -> Self {
        Self { kind }
    }

    /// Returns which identifier was rejected.
    #[inline]
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid identifier: {} must not be empty", self.kind)
    }
}

impl std::error::Error for IdentifierError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal ranking invariants are violated.
///
/// Produced by
/// [`CardinalityRanking::check_invariants`](crate::ranking::CardinalityRanking::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when configuration parameters are invalid.
///
/// Produced by [`IngestConfigBuilder::try_build`](crate::ingest::IngestConfigBuilder::try_build).
///
/// # Example
///
/// ```
/// use rankkit::ingest::IngestConfig;
///
/// let err = IngestConfig::builder().column("").try_build().unwrap_err();
/// assert!(err.to_string().contains("column"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
