//! Weekly activity report: aggregate the last 7 days, then render.

pub mod formatter;
pub mod stats;

use rusqlite::Connection;

use crate::processing::topic::TopicEstimator;
use crate::BotResult;

pub use formatter::format_report;
pub use stats::{build_weekly_stats, build_weekly_stats_at, ActiveChannel, TopChatter, WeeklyStats};

/// Compute and render the report in one step.
pub fn weekly_report(
    conn: &Connection,
    estimator: &dyn TopicEstimator,
    excluded_topic_channels: &[String],
) -> BotResult<String> {
    let stats = build_weekly_stats(conn, estimator, excluded_topic_channels)?;
    Ok(format_report(&stats))
}
