//! Operation counters for [`CardinalityRanking`](crate::ranking::CardinalityRanking).
//!
//! Enabled with the `metrics` feature.

pub mod cell;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::RankingMetrics;
pub use snapshot::RankingMetricsSnapshot;
pub use traits::{MetricsSnapshotProvider, RankingMetricsReadRecorder, RankingMetricsRecorder};
