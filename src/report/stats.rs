//! Weekly aggregation over the message log.
//!
//! Counting is a single pass over the window in query order (newest first).
//! The leader of each tally is the key with the highest count. On equal
//! counts the key whose first occurrence comes earliest in that order wins,
//! i.e. the user or channel with the most recent message, regardless of
//! which key reached the count first.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::constants::{REPORT_WINDOW_DAYS, TOPIC_NO_MESSAGES_THIS_WEEK};
use crate::processing::topic::TopicEstimator;
use crate::storage::chat_log::ChatLog;
use crate::BotResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopChatter {
    pub user_id: String,
    /// Name on the user's most recent message in the window.
    pub username: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveChannel {
    pub channel_name: String,
    pub count: usize,
}

/// Report payload, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub total_messages: usize,
    pub top_chatter: Option<TopChatter>,
    pub most_active_channel: Option<ActiveChannel>,
    pub most_discussed_topic: String,
}

impl WeeklyStats {
    /// Sentinel for a window without messages.
    pub fn empty() -> Self {
        Self {
            total_messages: 0,
            top_chatter: None,
            most_active_channel: None,
            most_discussed_topic: TOPIC_NO_MESSAGES_THIS_WEEK.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_messages == 0
    }
}

/// Insertion-ordered counter.
#[derive(Default)]
struct Tally {
    position: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl Tally {
    /// Returns true when `key` is seen for the first time.
    fn add(&mut self, key: &str) -> bool {
        match self.position.get(key) {
            Some(&idx) => {
                self.entries[idx].1 += 1;
                false
            }
            None => {
                self.position.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
                true
            }
        }
    }

    /// Highest count; earliest-seen key wins ties.
    fn leader(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (key, count) in &self.entries {
            if best.is_none_or(|(_, c)| *count > c) {
                best = Some((key.as_str(), *count));
            }
        }
        best
    }
}

/// Lower bound of the report window ending at `now` (inclusive).
pub fn window_start(now: &DateTime<Utc>) -> DateTime<Utc> {
    *now - Duration::days(REPORT_WINDOW_DAYS)
}

/// Stats for the 7 days ending now.
pub fn build_weekly_stats(
    conn: &Connection,
    estimator: &dyn TopicEstimator,
    excluded_topic_channels: &[String],
) -> BotResult<WeeklyStats> {
    build_weekly_stats_at(conn, estimator, excluded_topic_channels, &Utc::now())
}

/// Stats for the 7 days ending at `now`.
pub fn build_weekly_stats_at(
    conn: &Connection,
    estimator: &dyn TopicEstimator,
    excluded_topic_channels: &[String],
    now: &DateTime<Utc>,
) -> BotResult<WeeklyStats> {
    let since = window_start(now);
    let messages = ChatLog::query_since(conn, &since)?;

    if messages.is_empty() {
        tracing::info!(since = %since, "Weekly stats: no messages in window");
        return Ok(WeeklyStats::empty());
    }

    let mut users = Tally::default();
    let mut display_names: HashMap<&str, &str> = HashMap::new();
    let mut channels = Tally::default();
    let mut topic_texts: Vec<String> = Vec::with_capacity(messages.len());

    for msg in &messages {
        if users.add(&msg.user_id) {
            display_names.insert(&msg.user_id, &msg.username);
        }
        channels.add(&msg.channel_name);
        if !excluded_topic_channels.iter().any(|c| c == &msg.channel_name) {
            topic_texts.push(msg.message_content.clone());
        }
    }

    let top_chatter = users.leader().map(|(user_id, count)| TopChatter {
        user_id: user_id.to_string(),
        username: display_names.get(user_id).copied().unwrap_or_default().to_string(),
        count,
    });
    let most_active_channel = channels.leader().map(|(name, count)| ActiveChannel {
        channel_name: name.to_string(),
        count,
    });

    let most_discussed_topic = estimator.estimate_with_total(&topic_texts, messages.len());

    tracing::info!(
        total = messages.len(),
        users = users.entries.len(),
        channels = channels.entries.len(),
        estimator = estimator.name(),
        topic = %most_discussed_topic,
        "Weekly stats computed"
    );

    Ok(WeeklyStats {
        total_messages: messages.len(),
        top_chatter,
        most_active_channel,
        most_discussed_topic,
    })
}
