use anyhow::Result;

use prolug_bot::report::stats::window_start;
use prolug_bot::storage::chat_log::ChatLog;
use prolug_bot::time_utils;

/// `status`: database location and message counts.
pub fn run(config_path: Option<&str>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let conn = super::open_chat_db(&config)?;

    let total = ChatLog::count(&conn).unwrap_or(0);
    let since = window_start(&time_utils::now());
    let recent = ChatLog::query_since(&conn, &since).map(|m| m.len()).unwrap_or(0);

    println!("ProLUG Bot Status");
    println!("=================");
    println!("Database: {}", config.storage.db_path.display());
    println!();
    println!("Messages:");
    println!("  Total:       {:>7}", total);
    println!("  Last 7 days: {:>7}", recent);
    println!();
    println!("Topic estimator: {}", if config.report.use_generative_topic { "generative" } else { "frequency" });
    if !config.report.excluded_topic_channels.is_empty() {
        println!("Excluded from topic: {}", config.report.excluded_topic_channels.join(", "));
    }
    Ok(())
}
