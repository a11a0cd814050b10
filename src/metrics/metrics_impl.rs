use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{RankingMetricsReadRecorder, RankingMetricsRecorder};

#[derive(Debug, Default)]
pub struct RankingMetrics {
    pub add_calls: u64,
    pub members_added: u64,
    pub duplicate_members: u64,
    pub rejected_identifiers: u64,
    pub groups_created: u64,
    pub buckets_created: u64,
    pub buckets_removed: u64,
    pub clear_calls: u64,
    pub snapshot_calls: MetricsCell,
}

impl RankingMetricsRecorder for RankingMetrics {
    fn record_add_call(&mut self) {
        self.add_calls += 1;
    }

    fn record_member_added(&mut self) {
        self.members_added += 1;
    }

    fn record_duplicate_member(&mut self) {
        self.duplicate_members += 1;
    }

    fn record_rejected_identifier(&mut self) {
        self.rejected_identifiers += 1;
    }

    fn record_group_created(&mut self) {
        self.groups_created += 1;
    }

    fn record_bucket_created(&mut self) {
        self.buckets_created += 1;
    }

    fn record_bucket_removed(&mut self) {
        self.buckets_removed += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl RankingMetricsReadRecorder for RankingMetrics {
    fn record_snapshot_call(&self) {
        self.snapshot_calls.incr();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_metrics_record_counts() {
        let mut metrics = RankingMetrics::default();
        metrics.record_add_call();
        metrics.record_add_call();
        metrics.record_member_added();
        metrics.record_duplicate_member();
        metrics.record_bucket_created();
        metrics.record_snapshot_call();

        assert_eq!(metrics.add_calls, 2);
        assert_eq!(metrics.members_added, 1);
        assert_eq!(metrics.duplicate_members, 1);
        assert_eq!(metrics.buckets_created, 1);
        assert_eq!(metrics.snapshot_calls.get(), 1);
    }
}
