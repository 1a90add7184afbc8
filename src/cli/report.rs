use anyhow::{bail, Context, Result};
use chrono::Duration;

use prolug_bot::processing::lexical;
use prolug_bot::report;
use prolug_bot::storage::chat_log::ChatLog;
use prolug_bot::time_utils;

/// `report`: print the weekly report.
pub fn run(config_path: Option<&str>, generative: bool) -> Result<()> {
    let config = super::load_config(config_path)?;
    let conn = super::open_chat_db(&config)?;
    let secrets = super::load_secrets()?;
    let estimator = super::topic_estimator(&config, &secrets, generative)?;

    let text = report::weekly_report(&conn, estimator.as_ref(), &config.report.excluded_topic_channels)
        .context("Failed to build weekly report")?;
    println!("{}", text);
    Ok(())
}

/// `words`: word and bigram tables over the last `days` days.
pub fn words(config_path: Option<&str>, days: i64) -> Result<()> {
    if days <= 0 {
        bail!("--days must be positive");
    }
    let config = super::load_config(config_path)?;
    let conn = super::open_chat_db(&config)?;

    let since = time_utils::now() - Duration::days(days);
    let texts: Vec<String> = ChatLog::query_since(&conn, &since)?
        .into_iter()
        .map(|m| m.message_content)
        .collect();
    let stats = lexical::extract_word_stats(&texts);

    println!("Messages: {} (last {} days)", texts.len(), days);
    println!();
    println!("Top words:");
    for (word, count) in &stats.words {
        println!("  {:<24} {:>5}", word, count);
    }
    println!();
    println!("Top bigrams:");
    for (pair, count) in &stats.bigrams {
        println!("  {:<24} {:>5}", pair, count);
    }
    println!();
    println!("Frequency topic: {}", lexical::extract_topic_by_frequency(&texts));
    Ok(())
}
