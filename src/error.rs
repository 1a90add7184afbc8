use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    /// SQLite failures and malformed rows, mapped at each call site
    #[error("Storage error: {0}")]
    Storage(String),

    /// LLM or public API failure (timeout, HTTP status, malformed body)
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BotResult<T> = Result<T, BotError>;
