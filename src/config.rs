//! Bot configuration: file paths, provider endpoints, report options.
//!
//! Loaded from `{data_dir}/config.json` (or an explicit path). Every section
//! and field has a default, so a missing file or a partial file is valid.
//! Secrets never live in the JSON file: they come from the environment,
//! optionally seeded from a `.env` file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{GROQ_TIMEOUT_SECS, PERPLEXITY_TIMEOUT_SECS, PUBLIC_API_TIMEOUT_SECS};
use crate::storage::path_utils;
use crate::{BotError, BotResult};

// ============================================================================
// SECTIONS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    pub tasks_path: PathBuf,
    pub completions_path: PathBuf,
    pub counts_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: path_utils::default_db_path(),
            tasks_path: path_utils::default_tasks_path(),
            completions_path: path_utils::default_completions_path(),
            counts_path: path_utils::default_counts_path(),
        }
    }
}

/// One OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmEndpoint {
    pub url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub groq: LlmEndpoint,
    pub perplexity: LlmEndpoint,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            groq: LlmEndpoint {
                url: "https://api.groq.com/openai/v1/chat/completions".into(),
                model: "openai/gpt-oss-120b".into(),
                timeout_secs: GROQ_TIMEOUT_SECS,
            },
            perplexity: LlmEndpoint {
                url: "https://api.perplexity.ai/chat/completions".into(),
                model: "llama-3.1-sonar-small-128k-online".into(),
                timeout_secs: PERPLEXITY_TIMEOUT_SECS,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PublicApiConfig {
    pub joke_url: String,
    pub eight_ball_url: String,
    pub timeout_secs: u64,
}

impl Default for PublicApiConfig {
    fn default() -> Self {
        Self {
            joke_url: "https://icanhazdadjoke.com/".into(),
            eight_ball_url: "https://eightballapi.com/api".into(),
            timeout_secs: PUBLIC_API_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Channel names whose messages are left out of topic estimation.
    /// They still count toward totals, top chatter and top channel.
    pub excluded_topic_channels: Vec<String>,
    /// Ask the Groq endpoint for the topic label instead of counting words.
    pub use_generative_topic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BotSection {
    pub bot_username: String,
    /// Usernames allowed to run privileged commands (case-insensitive).
    pub authorized_users: Vec<String>,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            bot_username: "fishermanguybot".into(),
            authorized_users: vec!["fishermanguybro".into(), "het_tanis".into()],
        }
    }
}

impl BotSection {
    pub fn is_authorized(&self, username: &str) -> bool {
        self.authorized_users
            .iter()
            .any(|u| u.eq_ignore_ascii_case(username))
    }
}

// ============================================================================
// ROOT
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BotConfig {
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub apis: PublicApiConfig,
    pub report: ReportConfig,
    pub bot: BotSection,
}

impl BotConfig {
    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> BotResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut cfg: Self = serde_json::from_str(&raw).map_err(|e| {
            BotError::Config(format!("Invalid config {}: {}", path.display(), e))
        })?;
        cfg.expand_paths();
        tracing::info!(path = %path.display(), "Config loaded");
        Ok(cfg)
    }

    /// Load from the default location.
    pub fn load_default() -> BotResult<Self> {
        Self::load(&path_utils::config_path())
    }

    fn expand_paths(&mut self) {
        let expand = |p: &PathBuf| path_utils::expand_tilde(&p.to_string_lossy());
        self.storage.db_path = expand(&self.storage.db_path);
        self.storage.tasks_path = expand(&self.storage.tasks_path);
        self.storage.completions_path = expand(&self.storage.completions_path);
        self.storage.counts_path = expand(&self.storage.counts_path);
    }
}

// ============================================================================
// SECRETS
// ============================================================================

/// API credentials, read from the environment.
///
/// Each key is optional on load; callers ask for the one they use and get a
/// `Config` error naming it when it is absent.
#[derive(Clone, Default)]
pub struct Secrets {
    groq_api_key: Option<String>,
    perplexity_api_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("groq_api_key", &self.groq_api_key.is_some())
            .field("perplexity_api_key", &self.perplexity_api_key.is_some())
            .finish()
    }
}

const GROQ_KEY: &str = "GROQ_API_KEY";
const PERPLEXITY_KEY: &str = "perplexity_api_key";

impl Secrets {
    /// Read credentials after loading `.env` from the working directory, if any.
    pub fn from_env() -> BotResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(BotError::Config(format!("Failed to read .env: {}", e)));
            }
        }
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Build from any key lookup. Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            groq_api_key: read(GROQ_KEY),
            perplexity_api_key: read(PERPLEXITY_KEY),
        }
    }

    pub fn groq_key(&self) -> BotResult<&str> {
        require(&self.groq_api_key, GROQ_KEY)
    }

    pub fn perplexity_key(&self) -> BotResult<&str> {
        require(&self.perplexity_api_key, PERPLEXITY_KEY)
    }
}

fn require<'a>(value: &'a Option<String>, key: &str) -> BotResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| BotError::Config(format!("Required configuration key '{}' not found", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = BotConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg, BotConfig::default());
        assert_eq!(cfg.llm.groq.timeout_secs, 30);
        assert_eq!(cfg.llm.perplexity.timeout_secs, 60);
        assert!(cfg.report.excluded_topic_channels.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"report": {"excluded_topic_channels": ["sandbox"]}, "storage": {"db_path": "/tmp/x.db"}}"#,
        )
        .unwrap();
        let cfg = BotConfig::load(&path).unwrap();
        assert_eq!(cfg.report.excluded_topic_channels, vec!["sandbox".to_string()]);
        assert!(!cfg.report.use_generative_topic);
        assert_eq!(cfg.storage.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(cfg.storage.counts_path, path_utils::default_counts_path());
        assert_eq!(cfg.llm, LlmConfig::default());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(BotConfig::load(&path), Err(BotError::Config(_))));
    }

    #[test]
    fn test_authorized_users_case_insensitive() {
        let section = BotSection::default();
        assert!(section.is_authorized("FishermanGuyBro"));
        assert!(!section.is_authorized("random"));
    }

    #[test]
    fn test_secrets_only_need_the_key_in_use() {
        let groq_only = Secrets::from_lookup(|k| (k == "GROQ_API_KEY").then(|| " g ".to_string()));
        assert_eq!(groq_only.groq_key().unwrap(), "g");
        let err = groq_only.perplexity_key().unwrap_err();
        assert!(err.to_string().contains("perplexity_api_key"));

        let mut env: HashMap<&str, &str> = HashMap::new();
        env.insert("GROQ_API_KEY", "   ");
        env.insert("perplexity_api_key", "p");
        let secrets = Secrets::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert!(secrets.groq_key().is_err());
        assert_eq!(secrets.perplexity_key().unwrap(), "p");
        assert!(!format!("{:?}", secrets).contains("\"p\""));
    }
}
