//! Shared test utilities: builders, DB setup, time helpers.
//!
//! Available only under `#[cfg(test)]`.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use crate::chat_message::ChatMessage;

// ============================================================================
// ChatMessageBuilder
// ============================================================================

pub struct ChatMessageBuilder {
    msg: ChatMessage,
}

impl ChatMessageBuilder {
    pub fn new() -> Self {
        Self {
            msg: ChatMessage {
                id: None,
                timestamp: Utc::now().trunc_subsecs(6),
                user_id: "100".to_string(),
                username: "tester".to_string(),
                channel_id: "200".to_string(),
                channel_name: "general".to_string(),
                message_content: "Test message content".to_string(),
            },
        }
    }

    pub fn user(mut self, id: &str, name: &str) -> Self {
        self.msg.user_id = id.to_string();
        self.msg.username = name.to_string();
        self
    }

    pub fn channel(mut self, id: &str, name: &str) -> Self {
        self.msg.channel_id = id.to_string();
        self.msg.channel_name = name.to_string();
        self
    }

    pub fn content(mut self, c: &str) -> Self {
        self.msg.message_content = c.to_string();
        self
    }

    pub fn timestamp(mut self, dt: DateTime<Utc>) -> Self {
        self.msg.timestamp = dt.trunc_subsecs(6);
        self
    }

    pub fn build(self) -> ChatMessage {
        self.msg
    }
}

// ============================================================================
// Time helpers
// ============================================================================

pub fn hours_ago(h: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(h)
}

pub fn days_ago(d: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(d)
}

// ============================================================================
// DB setup helpers
// ============================================================================

use rusqlite::Connection;
use crate::storage::migrations;

/// Create an in-memory chat log DB with all migrations applied.
pub fn setup_chat_db() -> Connection {
    let conn = Connection::open(":memory:").unwrap();
    migrations::migrate_chat_db(&conn).unwrap();
    conn
}

/// Insert one message per `(user_id, username, channel_name, content, age_hours)`.
pub fn seed_messages(conn: &Connection, rows: &[(&str, &str, &str, &str, i64)]) {
    for (user_id, username, channel, content, age) in rows {
        let msg = ChatMessageBuilder::new()
            .user(user_id, username)
            .channel(&format!("ch-{}", channel), channel)
            .content(content)
            .timestamp(hours_ago(*age))
            .build();
        crate::storage::chat_log::ChatLog::append(conn, &msg).unwrap();
    }
}
