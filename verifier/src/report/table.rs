//! @ai:module:intent Live console table of patch outcomes
//! @ai:module:layer presentation
//! @ai:module:public_api header, row, summary_lines
//! @ai:module:stateless true

use crate::metrics::OutcomeStats;

const RULE_WIDTH: usize = 55;

/// @ai:intent Column header followed by the dash rule
/// @ai:effects pure
pub fn header() -> String {
    format!("{:<20} | {:<30}\n{}", "Patch", "Status", "-".repeat(RULE_WIDTH))
}

/// @ai:effects pure
pub fn row(patch: &str, status: &str) -> String {
    format!("{:<20} | {:<30}", patch, status)
}

/// @ai:intent Closing lines with per-category counts
/// @ai:effects pure
pub fn summary_lines(stats: &OutcomeStats) -> Vec<String> {
    let mut lines = vec![
        "-".repeat(RULE_WIDTH),
        format!(
            "{} patch(es), {} succeeded ({:.1}%)",
            stats.total, stats.success, stats.success_rate
        ),
    ];

    for (category, count) in &stats.by_category {
        lines.push(format!("  {:<24} {}", category, count));
    }

    lines
}
