pub use crate::ds::{SlotArena, SlotId};
pub use crate::error::{ConfigError, IdentifierError, IdentifierKind, InvariantError};
pub use crate::ingest::{
    EmailDomainExtractor, IngestConfig, IngestError, IngestReport, IngestStats, KeyExtractor,
    MalformedRecord, ingest, ingest_file,
};
pub use crate::ranking::{CardinalityRanking, GroupCount, Identifier};

#[cfg(feature = "concurrency")]
pub use crate::ranking::SharedRanking;
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::RankingMetricsSnapshot;
