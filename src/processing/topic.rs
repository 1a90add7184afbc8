//! Topic estimation: reduce a week of message texts to a short label.
//!
//! Two strategies behind one trait, chosen by the caller:
//!   - `FrequencyTopic`: top-3 word formatter, local and infallible
//!   - `GenerativeTopic`: hands the word/bigram tables to an LLM; any
//!     failure degrades to "Various topics"

use crate::config::{BotConfig, Secrets};
use crate::constants::{MAX_TOPIC_CHARS, TOPIC_FALLBACK, TOPIC_NO_MESSAGES_THIS_WEEK};
use crate::provider::{ChatTurn, CompletionClient};
use crate::BotResult;

use super::lexical::{self, WordStats};
use super::llm_client::ChatCompletionClient;

pub trait TopicEstimator {
    fn name(&self) -> &'static str;
    /// Never fails; strategies fall back to a constant label.
    fn estimate(&self, texts: &[String]) -> String;

    /// Like `estimate`, where `texts` may be a filtered subset of
    /// `total_messages` messages in the window.
    fn estimate_with_total(&self, texts: &[String], total_messages: usize) -> String {
        let _ = total_messages;
        self.estimate(texts)
    }
}

/// Generative when requested on the command line or in config. Only the
/// generative strategy needs the Groq key.
pub fn select_estimator(
    config: &BotConfig,
    secrets: &Secrets,
    generative: bool,
) -> BotResult<Box<dyn TopicEstimator>> {
    if generative || config.report.use_generative_topic {
        let client = ChatCompletionClient::groq(config.llm.groq.clone(), secrets.groq_key()?);
        Ok(Box::new(GenerativeTopic::new(client)))
    } else {
        Ok(Box::new(FrequencyTopic))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyTopic;

impl TopicEstimator for FrequencyTopic {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn estimate(&self, texts: &[String]) -> String {
        lexical::extract_topic_by_frequency(texts)
    }
}

const TOPIC_SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes chat conversations and identifies main topics. Respond with only the topic name in 2-5 words.";

pub struct GenerativeTopic<C: CompletionClient> {
    client: C,
}

impl<C: CompletionClient> GenerativeTopic<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    fn request_topic(&self, stats: &WordStats, total_messages: usize) -> BotResult<String> {
        let turns = [
            ChatTurn::system(TOPIC_SYSTEM_PROMPT),
            ChatTurn::user(build_topic_prompt(stats, total_messages)),
        ];
        self.client.complete(&turns)
    }
}

/// Prompt embedding the frequency tables and the message count.
pub fn build_topic_prompt(stats: &WordStats, total_messages: usize) -> String {
    format!(
        "Analyze word frequency statistics from {total} Discord chat messages sent during the past week \
and identify the single most discussed topic or theme in 2-5 words. Be specific and concise.

Most frequent words (word(count)):
{words}

Most frequent two-word phrases (phrase(count)):
{bigrams}

Most discussed topic (2-5 words):",
        total = total_messages,
        words = stats.format_words(),
        bigrams = stats.format_bigrams(),
    )
}

/// Trim whitespace and surrounding quote characters; reject empty or overlong labels.
pub fn clean_topic_reply(reply: &str) -> Option<String> {
    let topic = reply.trim().trim_matches(|c: char| c == '"' || c == '\'');
    if topic.is_empty() || topic.chars().count() >= MAX_TOPIC_CHARS {
        return None;
    }
    Some(topic.to_string())
}

impl<C: CompletionClient> TopicEstimator for GenerativeTopic<C> {
    fn name(&self) -> &'static str {
        "generative"
    }

    fn estimate(&self, texts: &[String]) -> String {
        self.estimate_with_total(texts, texts.len())
    }

    fn estimate_with_total(&self, texts: &[String], total_messages: usize) -> String {
        if texts.is_empty() {
            return TOPIC_NO_MESSAGES_THIS_WEEK.to_string();
        }

        let stats = lexical::extract_word_stats(texts);
        match self.request_topic(&stats, total_messages) {
            Ok(reply) => match clean_topic_reply(&reply) {
                Some(topic) => {
                    tracing::info!(provider = self.client.id(), topic = %topic, "Generative topic estimated");
                    topic
                }
                None => {
                    tracing::warn!(
                        provider = self.client.id(),
                        reply_len = reply.len(),
                        "Generative topic reply unusable, using fallback"
                    );
                    TOPIC_FALLBACK.to_string()
                }
            },
            Err(e) => {
                tracing::warn!(provider = self.client.id(), error = %e, "Generative topic failed, using fallback");
                TOPIC_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BotError;
    use std::sync::Mutex;

    struct StubClient {
        reply: BotResult<String>,
        seen: Mutex<Vec<ChatTurn>>,
    }

    impl StubClient {
        fn ok(reply: &str) -> Self {
            Self { reply: Ok(reply.to_string()), seen: Mutex::new(vec![]) }
        }

        fn failing(msg: &str) -> Self {
            Self { reply: Err(BotError::Provider(msg.to_string())), seen: Mutex::new(vec![]) }
        }
    }

    impl CompletionClient for StubClient {
        fn id(&self) -> &str {
            "stub"
        }

        fn complete(&self, turns: &[ChatTurn]) -> BotResult<String> {
            self.seen.lock().unwrap().extend_from_slice(turns);
            match &self.reply {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(BotError::Provider(e.to_string())),
            }
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_frequency_strategy_delegates_to_lexical() {
        let input = texts(&["linux linux", "docker"]);
        assert_eq!(FrequencyTopic.estimate(&input), "Linux and docker");
    }

    #[test]
    fn test_generative_returns_cleaned_reply() {
        let client = StubClient::ok("  \"Kernel upgrades\"\n");
        let topic = GenerativeTopic::new(&client).estimate(&texts(&["kernel upgrade kernel"]));
        assert_eq!(topic, "Kernel upgrades");
    }

    #[test]
    fn test_generative_prompt_carries_tables() {
        let client = StubClient::ok("Containers");
        GenerativeTopic::new(&client).estimate(&texts(&["docker compose", "docker compose docker"]));

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].role, crate::provider::Role::System);
        assert!(seen[1].content.contains("docker(3)"));
        assert!(seen[1].content.contains("docker compose(2)"));
        assert!(seen[1].content.contains("from 2 Discord chat messages"));
    }

    #[test]
    fn test_generative_error_falls_back() {
        let client = StubClient::failing("timeout");
        let topic = GenerativeTopic::new(&client).estimate(&texts(&["anything at all"]));
        assert_eq!(topic, "Various topics");
    }

    #[test]
    fn test_generative_overlong_reply_falls_back() {
        let client = StubClient::ok(&"x".repeat(100));
        assert_eq!(GenerativeTopic::new(&client).estimate(&texts(&["words"])), "Various topics");

        let client = StubClient::ok(&"y".repeat(99));
        assert_eq!(GenerativeTopic::new(&client).estimate(&texts(&["words"])), "y".repeat(99));
    }

    #[test]
    fn test_generative_blank_reply_falls_back() {
        let client = StubClient::ok(" '' ");
        assert_eq!(GenerativeTopic::new(&client).estimate(&texts(&["words"])), "Various topics");
    }

    #[test]
    fn test_generative_empty_input_skips_call() {
        let client = StubClient::failing("should not be called");
        assert_eq!(GenerativeTopic::new(&client).estimate(&[]), "No messages this week");
        assert_eq!(GenerativeTopic::new(&client).estimate_with_total(&[], 12), "No messages this week");
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_generative_prompt_uses_window_total() {
        let client = StubClient::ok("Storage");
        GenerativeTopic::new(&client).estimate_with_total(&texts(&["zfs pools"]), 40);
        let seen = client.seen.lock().unwrap();
        assert!(seen[1].content.contains("from 40 Discord chat messages"));
    }

    #[test]
    fn test_select_estimator_groq_key_alone_is_enough() {
        let config = BotConfig::default();
        let secrets = Secrets::from_lookup(|k| (k == "GROQ_API_KEY").then(|| "gsk-test".to_string()));
        let estimator = select_estimator(&config, &secrets, true).unwrap();
        assert_eq!(estimator.name(), "generative");
    }

    #[test]
    fn test_select_estimator_frequency_needs_no_keys() {
        let config = BotConfig::default();
        let secrets = Secrets::from_lookup(|_| None);
        assert_eq!(select_estimator(&config, &secrets, false).unwrap().name(), "frequency");

        let err = select_estimator(&config, &secrets, true).err().unwrap();
        assert!(err.to_string().contains("GROQ_API_KEY"));

        let mut config = BotConfig::default();
        config.report.use_generative_topic = true;
        assert!(select_estimator(&config, &secrets, false).is_err());
    }

    #[test]
    fn test_clean_topic_reply_strips_mixed_quotes() {
        assert_eq!(clean_topic_reply("'\"Bash scripting\"'").as_deref(), Some("Bash scripting"));
    }
}
