pub mod config;
pub mod dispatch;
pub mod log;
pub mod report;
pub mod status;

use anyhow::{Context, Result};
use rusqlite::Connection;

use prolug_bot::config::{BotConfig, Secrets};
use prolug_bot::processing::llm_client::ChatCompletionClient;
use prolug_bot::processing::topic::{self, TopicEstimator};
use prolug_bot::storage::database::{open_connection, ConnectionRole};

/// Load `--config` when given, else the default location.
pub fn load_config(path: Option<&str>) -> Result<BotConfig> {
    let config = match path {
        Some(p) => BotConfig::load(&prolug_bot::storage::path_utils::expand_tilde(p)),
        None => BotConfig::load_default(),
    };
    config.context("Failed to load configuration")
}

pub fn open_chat_db(config: &BotConfig) -> Result<Connection> {
    open_connection(&config.storage.db_path, ConnectionRole::Cli)
        .with_context(|| format!("Failed to open chat database {}", config.storage.db_path.display()))
}

pub fn load_secrets() -> Result<Secrets> {
    Secrets::from_env().context("Failed to load API keys (.env or environment)")
}

pub fn groq_client(config: &BotConfig, secrets: &Secrets) -> Result<ChatCompletionClient> {
    let key = secrets.groq_key().context("The Groq API key is required for this command")?;
    Ok(ChatCompletionClient::groq(config.llm.groq.clone(), key))
}

pub fn perplexity_client(config: &BotConfig, secrets: &Secrets) -> Result<ChatCompletionClient> {
    let key = secrets.perplexity_key().context("The Perplexity API key is required for this command")?;
    Ok(ChatCompletionClient::perplexity(config.llm.perplexity.clone(), key))
}

/// Topic strategy: generative when requested on the command line or in config.
pub fn topic_estimator(config: &BotConfig, secrets: &Secrets, generative: bool) -> Result<Box<dyn TopicEstimator>> {
    topic::select_estimator(config, secrets, generative).context("Failed to set up topic estimator")
}
