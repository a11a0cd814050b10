//! Tabular ingestion: decode an uploaded address list and rank its domains.
//!
//! ## Architecture
//!
//! ```text
//!   BufRead ──► CsvRecords ──► CsvRow ──► KeyExtractor ──► (group, member)
//!                  │                          │                  │
//!            header lookup             MalformedRecord            ▼
//!           (MissingColumn)             (row skipped)    CardinalityRanking
//!                                                                │
//!                                                                ▼
//!                                                          IngestReport
//! ```
//!
//! Fatal problems (unreadable input, no header, missing key column, invalid
//! configuration) surface as [`IngestError`]. A bad row only skips that row:
//! it is logged at `warn` and counted in [`IngestStats::rows_skipped`].
//!
//! ## Example
//!
//! ```
//! use rankkit::ingest::{ingest, IngestConfig};
//!
//! let data = "name,email\nA,a@x.com\nB,b@x.com\nC,c@y.com\nA,a@x.com\n";
//! let report = ingest(data.as_bytes(), &IngestConfig::default()).unwrap();
//!
//! assert_eq!(report.stats.rows_read, 4);
//! assert_eq!(report.stats.duplicates, 1);
//! assert_eq!(report.ranking[0].group, "x.com");
//! assert_eq!(report.ranking[0].cardinality, 2);
//! ```

pub mod config;
pub mod csv;
pub mod extract;
pub mod pipeline;

use thiserror::Error;

use crate::error::{ConfigError, IdentifierError};

pub use config::{IngestConfig, IngestConfigBuilder};
pub use csv::{CsvRecords, CsvRow};
pub use extract::{EmailDomainExtractor, KeyExtractor};
pub use pipeline::{IngestReport, IngestStats, ingest, ingest_file, ingest_into};

/// Failure that aborts an ingestion run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error during {operation}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        operation: String,
    },

    #[error("key column {column:?} not found in header")]
    MissingColumn { column: String },

    #[error("input has no header row")]
    EmptyInput,

    #[error("malformed header: {source}")]
    Header { source: MalformedRecord },

    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        source: MalformedRecord,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl IngestError {
    /// True for errors confined to a single row; the run continues past them.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, IngestError::Malformed { .. })
    }
}

/// Why a single record could not be ranked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("unterminated quoted field")]
    UnterminatedQuote,

    #[error("stray quote in field {field}")]
    BareQuote { field: usize },

    #[error("invalid email {value:?}: {reason}")]
    InvalidEmail { value: String, reason: &'static str },

    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentifierKind;

    #[test]
    fn only_row_errors_are_recoverable() {
        let row = IngestError::Malformed {
            line: 3,
            source: MalformedRecord::UnterminatedQuote,
        };
        assert!(row.is_recoverable());
        assert!(!IngestError::EmptyInput.is_recoverable());
        assert!(
            !IngestError::MissingColumn {
                column: "email".into()
            }
            .is_recoverable()
        );
    }

    #[test]
    fn display_carries_context() {
        let err = IngestError::Malformed {
            line: 7,
            source: MalformedRecord::FieldCount {
                expected: 2,
                found: 3,
            },
        };
        assert_eq!(err.to_string(), "line 7: expected 2 fields, found 3");

        let err = IngestError::Io {
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            operation: "open users.csv".into(),
        };
        assert_eq!(err.to_string(), "I/O error during open users.csv: gone");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn config_and_identifier_errors_convert() {
        let err: IngestError = ConfigError::new("bad").into();
        assert!(matches!(err, IngestError::Config(_)));

        let rec: MalformedRecord = IdentifierError::new(IdentifierKind::Group).into();
        assert_eq!(rec.to_string(), "invalid identifier: group must not be empty");
    }
}
