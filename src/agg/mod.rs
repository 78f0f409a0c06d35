//! Aggregation module - attack-type and perpetrator-group summaries

mod aggregator;
mod groups;

pub use aggregator::{AggregateError, AggregateExport, AttackTypeCounts};
pub use groups::{GroupRankings, RankingError, RANKING_SIZE};
