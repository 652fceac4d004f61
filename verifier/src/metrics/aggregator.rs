//! @ai:module:intent Aggregate verification records into outcome statistics
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator
//! @ai:module:stateless true

use crate::metrics::types::{OutcomeStats, VerificationRecord};
use std::collections::BTreeMap;

/// @ai:intent Trait for record aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Count outcomes by category
    fn aggregate(&self, records: &[VerificationRecord]) -> OutcomeStats;
}

/// @ai:intent Counts outcomes per category and the overall success rate
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:effects pure
    fn aggregate(&self, records: &[VerificationRecord]) -> OutcomeStats {
        let mut by_category = BTreeMap::new();

        for record in records {
            *by_category
                .entry(record.outcome.category().to_string())
                .or_insert(0) += 1;
        }

        let total = records.len();
        let success = records.iter().filter(|r| r.outcome.is_success()).count();
        let success_rate = if total == 0 {
            0.0
        } else {
            (success as f64 / total as f64) * 100.0
        };

        OutcomeStats {
            total,
            success,
            success_rate,
            by_category,
            total_duration_ms: records.iter().map(|r| r.duration_ms).sum(),
        }
    }
}
