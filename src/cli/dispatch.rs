use anyhow::{Context, Result};

use prolug_bot::api::PublicApis;
use prolug_bot::commands::{self, Dispatcher, MessageContext};
use prolug_bot::storage::tasks::TaskList;
use prolug_bot::storage::usage_counts::JsonUsageCounter;

/// `dispatch`: log a message as `username` and print every reply part.
pub fn run(config_path: Option<&str>, username: &str, channel_name: &str, content: &str) -> Result<()> {
    let config = super::load_config(config_path)?;
    let secrets = super::load_secrets()?;
    let conn = super::open_chat_db(&config)?;

    let chat = super::groq_client(&config, &secrets)?;
    let apis = PublicApis::new(config.apis.clone());
    let usage = JsonUsageCounter::new(&config.storage.counts_path);
    let tasks = TaskList::new(&config.storage.tasks_path, &config.storage.completions_path);
    let estimator = super::topic_estimator(&config, &secrets, false)?;

    let dispatcher = Dispatcher {
        conn: &conn,
        chat: &chat,
        apis: &apis,
        usage: &usage,
        tasks: &tasks,
        estimator: estimator.as_ref(),
        bot: &config.bot,
        excluded_topic_channels: &config.report.excluded_topic_channels,
    };

    let ctx = MessageContext {
        user_id: format!("cli-{}", username),
        username: username.to_string(),
        channel_id: format!("cli-{}", channel_name),
        channel_name: channel_name.to_string(),
        content: content.to_string(),
        is_bot: false,
    };

    let replies = dispatcher.on_message(&ctx);
    if replies.is_empty() {
        println!("(no reply)");
    }
    for reply in replies {
        println!("{}", reply);
        println!("---");
    }
    Ok(())
}

/// `welcome`: print the join greeting for `mention`.
pub fn welcome(config_path: Option<&str>, mention: &str, member_count: u64) -> Result<()> {
    let config = super::load_config(config_path)?;
    let secrets = super::load_secrets()?;
    let chat = super::groq_client(&config, &secrets)?;
    let usage = JsonUsageCounter::new(&config.storage.counts_path);

    for line in commands::welcome_message(&chat, &usage, mention, member_count) {
        println!("{}", line);
    }
    Ok(())
}

/// `summarize`: summarize a transcript file through the Perplexity endpoint.
pub fn summarize(config_path: Option<&str>, path: &str) -> Result<()> {
    let config = super::load_config(config_path)?;
    let secrets = super::load_secrets()?;
    let client = super::perplexity_client(&config, &secrets)?;

    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let lines: Vec<String> = raw.lines().filter(|l| !l.trim().is_empty()).map(str::to_string).collect();

    let parts = commands::summarize_thread(&client, &lines).context("Failed to generate summary")?;
    println!("Thread Summary for {}:", path);
    for part in parts {
        println!("{}", part);
    }
    Ok(())
}
