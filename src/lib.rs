//! rankkit: incremental grouped cardinality ranking.
//!
//! Counts distinct members per group and keeps groups ordered by that count
//! while pairs stream in, so a ranked snapshot never needs a sort over all
//! groups. The [`ingest`] module applies it to email address lists grouped
//! by domain.
//!
//! ```
//! use rankkit::prelude::*;
//!
//! let mut ranking = CardinalityRanking::new();
//! ranking.add_member("b.com", "x@b.com").unwrap();
//! ranking.add_member("a.com", "x@a.com").unwrap();
//! ranking.add_member("a.com", "y@a.com").unwrap();
//!
//! let top = ranking.snapshot();
//! assert_eq!(top[0], GroupCount { group: "a.com", cardinality: 2 });
//! ```

pub mod ds;
pub mod error;
pub mod ingest;
pub mod ranking;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
