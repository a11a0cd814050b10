//! Ingestion loop: records in, ranked report out.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::ingest::config::IngestConfig;
use crate::ingest::csv::CsvRecords;
use crate::ingest::extract::{EmailDomainExtractor, KeyExtractor};
use crate::ingest::{IngestError, MalformedRecord};
use crate::ranking::{CardinalityRanking, GroupCount, Identifier};

/// Row counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IngestStats {
    /// Data rows decoded, including skipped ones (header and blank lines excluded).
    pub rows_read: usize,
    pub rows_skipped: usize,
    /// Rows that added a new member to its group.
    pub members_added: usize,
    /// Rows whose member was already counted for its group.
    pub duplicates: usize,
}

/// Result of ranking one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IngestReport<G> {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub stats: IngestStats,
    #[cfg_attr(feature = "serde", serde(rename = "elapsed_ms", serialize_with = "as_millis"))]
    pub elapsed: Duration,
    /// Groups ordered by descending cardinality.
    pub ranking: Vec<GroupCount<G>>,
}

#[cfg(feature = "serde")]
fn as_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64() * 1000.0)
}

/// Feeds every row of `records` through `extractor` into `ranking`.
///
/// Malformed rows are logged and skipped. The first fatal error stops the run;
/// rows before it stay applied.
///
/// # Example
///
/// ```
/// use rankkit::ingest::{ingest_into, CsvRecords, EmailDomainExtractor, IngestConfig};
/// use rankkit::ranking::CardinalityRanking;
///
/// let mut ranking = CardinalityRanking::new();
/// let config = IngestConfig::default();
///
/// let first = CsvRecords::new("email\na@x.com\n".as_bytes(), &config).unwrap();
/// let second = CsvRecords::new("email\nb@x.com\na@x.com\n".as_bytes(), &config).unwrap();
/// ingest_into(&mut ranking, first, &EmailDomainExtractor::new()).unwrap();
/// let stats = ingest_into(&mut ranking, second, &EmailDomainExtractor::new()).unwrap();
///
/// assert_eq!(stats.duplicates, 1);
/// assert_eq!(ranking.cardinality_borrowed("x.com"), Some(2));
/// ```
pub fn ingest_into<R, X, G, M>(
    ranking: &mut CardinalityRanking<G, M>,
    records: CsvRecords<R>,
    extractor: &X,
) -> Result<IngestStats, IngestError>
where
    R: BufRead,
    X: KeyExtractor<str, Group = G, Member = M>,
    G: Identifier + Clone,
    M: Identifier,
{
    let column = records.column_index();
    let mut stats = IngestStats::default();

    for record in records {
        let row = match record {
            Ok(row) => row,
            Err(err) if err.is_recoverable() => {
                stats.rows_read += 1;
                stats.rows_skipped += 1;
                warn!("skipping {err}");
                continue;
            }
            Err(err) => return Err(err),
        };
        stats.rows_read += 1;

        let value = row.get(column).unwrap_or_default();
        let outcome = extractor.extract(value).and_then(|(group, member)| {
            ranking
                .add_member(group, member)
                .map_err(MalformedRecord::from)
        });
        match outcome {
            Ok(true) => stats.members_added += 1,
            Ok(false) => {
                stats.duplicates += 1;
                debug!("line {}: duplicate member {value:?} ignored", row.line);
            }
            Err(source) => {
                stats.rows_skipped += 1;
                warn!("skipping line {}: {source}", row.line);
            }
        }
    }

    Ok(stats)
}

/// Ranks the email domains of a delimited upload read from `reader`.
///
/// # Errors
///
/// Returns [`IngestError`] for an invalid configuration, a missing header or
/// key column, or a read failure. Malformed rows are skipped, not errors.
pub fn ingest<R: BufRead>(
    reader: R,
    config: &IngestConfig,
) -> Result<IngestReport<String>, IngestError> {
    let started = Instant::now();
    let records = CsvRecords::new(reader, config)?;
    let extractor = EmailDomainExtractor::new().with_lowercase_domain(config.lowercase_domain);

    let mut ranking: CardinalityRanking<String, String> = CardinalityRanking::new();
    let stats = ingest_into(&mut ranking, records, &extractor)?;
    let ranking = if config.sorted_ties {
        ranking.snapshot_sorted()
    } else {
        ranking.snapshot()
    };
    let elapsed = started.elapsed();

    debug!(
        "ranked {} groups from {} rows ({} added, {} duplicates, {} skipped) in {:?}",
        ranking.len(),
        stats.rows_read,
        stats.members_added,
        stats.duplicates,
        stats.rows_skipped,
        elapsed
    );
    Ok(IngestReport {
        stats,
        elapsed,
        ranking,
    })
}

/// Opens `path` and runs [`ingest`] over it.
pub fn ingest_file(
    path: impl AsRef<Path>,
    config: &IngestConfig,
) -> Result<IngestReport<String>, IngestError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Io {
        source,
        operation: format!("open {}", path.display()),
    })?;
    debug!("ingesting {}", path.display());
    ingest(BufReader::new(file), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_CASE: &str = "\
email
test1@domain1.com
test2@domain1.com
test3@domain1.com
test4@domain1.com
test1@domain2.com
test2@domain2.com
test3@domain2.com
test4@domain2.com
test5@domain2.com
test6@domain2.com
test5@domain1.com
test5@domain1.com
test6@domain1.com
test7@domain1.com
test1@domain3.com
";

    fn pairs(report: &IngestReport<String>) -> Vec<(&str, usize)> {
        report
            .ranking
            .iter()
            .map(|e| (e.group.as_str(), e.cardinality))
            .collect()
    }

    #[test]
    fn base_case_ranks_domains() {
        let report = ingest(BASE_CASE.as_bytes(), &IngestConfig::default()).unwrap();
        assert_eq!(
            pairs(&report),
            vec![("domain1.com", 7), ("domain2.com", 6), ("domain3.com", 1)]
        );
        assert_eq!(report.stats.rows_read, 15);
        assert_eq!(report.stats.members_added, 14);
        assert_eq!(report.stats.duplicates, 1);
        assert_eq!(report.stats.rows_skipped, 0);
    }

    #[test]
    fn bad_rows_are_skipped() {
        let data = "name,email\nA,a@x.com\nB\nC,not-an-email\nD,d@x.com,extra\nE,e@y.com\n";
        let config = IngestConfig::builder().sorted_ties(true).build();
        let report = ingest(data.as_bytes(), &config).unwrap();
        assert_eq!(pairs(&report), vec![("x.com", 1), ("y.com", 1)]);
        assert_eq!(report.stats.rows_read, 5);
        assert_eq!(report.stats.rows_skipped, 3);
        assert_eq!(report.stats.members_added, 2);
    }

    #[test]
    fn sorted_ties_orders_by_name() {
        let data = "email\nb@c.com\na@b.com\nz@a.com\ny@a.com\n";
        let config = IngestConfig::builder().sorted_ties(true).build();
        let report = ingest(data.as_bytes(), &config).unwrap();
        assert_eq!(pairs(&report), vec![("a.com", 2), ("b.com", 1), ("c.com", 1)]);
    }

    #[test]
    fn lowercase_domain_merges_groups() {
        let data = "email\nx@D.com\ny@d.COM\n";
        let config = IngestConfig::builder().lowercase_domain(true).build();
        let report = ingest(data.as_bytes(), &config).unwrap();
        assert_eq!(pairs(&report), vec![("d.com", 2)]);
    }

    #[test]
    fn header_only_yields_empty_report() {
        let report = ingest("email\n".as_bytes(), &IngestConfig::default()).unwrap();
        assert!(report.ranking.is_empty());
        assert_eq!(report.stats, IngestStats::default());
    }

    #[test]
    fn missing_column_aborts() {
        let err = ingest("address\na@b.com\n".as_bytes(), &IngestConfig::default()).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { .. }));
    }

    #[test]
    fn missing_file_reports_operation() {
        let err = ingest_file("/nonexistent/rankkit/users.csv", &IngestConfig::default())
            .unwrap_err();
        match err {
            IngestError::Io { operation, .. } => assert!(operation.starts_with("open ")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
