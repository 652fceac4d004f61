//! @ai:module:intent Per-patch records and batch-level outcome statistics
//! @ai:module:layer application
//! @ai:module:public_api VerificationRecord, BatchSummary, OutcomeStats, MetricsAggregator

pub mod aggregator;
pub mod types;

pub use aggregator::{MetricsAggregator, MetricsAggregatorTrait};
pub use types::{BatchSummary, OutcomeStats, VerificationRecord};
