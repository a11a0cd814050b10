#![no_main]

use libfuzzer_sys::fuzz_target;
use rankkit::ingest::{CsvRecords, IngestConfig, IngestError, ingest};

// Fuzz CSV decoding and ingestion with arbitrary bytes
//
// Decoding must never panic; every yielded row matches the header width and
// the report's counters add up.
fuzz_target!(|data: &[u8]| {
    let config = IngestConfig::default();

    if let Ok(records) = CsvRecords::new(data, &config) {
        let width = records.header().len();
        for record in records {
            match record {
                Ok(row) => assert_eq!(row.fields.len(), width),
                Err(err) => assert!(err.is_recoverable() || matches!(err, IngestError::Io { .. })),
            }
        }
    }

    if let Ok(report) = ingest(data, &config) {
        let stats = report.stats;
        assert_eq!(
            stats.rows_read,
            stats.rows_skipped + stats.members_added + stats.duplicates
        );
        let total: usize = report.ranking.iter().map(|e| e.cardinality).sum();
        assert_eq!(total, stats.members_added);
    }
});
