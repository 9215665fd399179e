use crate::core::types::Summary;

/// Placeholder shown for the average when there were no uncertain matches
pub const NO_AVERAGE: &str = "n/a";

/// Render aggregate counts as a short report, one figure per line
#[must_use]
pub fn format_summary(summary: &Summary) -> String {
    let average = summary
        .average_uncertain_distance
        .map_or_else(|| NO_AVERAGE.to_string(), |d| d.to_string());

    format!(
        "Exact matches: {}\nUncertain matches: {}\nAverage distance (uncertain): {}",
        summary.exact_count, summary.uncertain_count, average
    )
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_summary(self))
    }
}
