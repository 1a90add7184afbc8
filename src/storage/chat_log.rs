//! Append-only message log.
//!
//! Rows are written once per observed chat event and never updated or
//! deleted. Range queries return newest first; the report's tie-break rule
//! depends on that order.

use crate::chat_message::ChatMessage;
use crate::time_utils;
use crate::{BotError, BotResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

pub struct ChatLog;

fn chat_message_from_row(row: &Row) -> rusqlite::Result<ChatMessage> {
    let ts_str: String = row.get("timestamp")?;
    let timestamp = time_utils::from_sqlite(&ts_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ChatMessage {
        id: Some(row.get("id")?),
        timestamp,
        user_id: row.get("user_id")?,
        username: row.get("username")?,
        channel_id: row.get("channel_id")?,
        channel_name: row.get("channel_name")?,
        message_content: row.get("message_content")?,
    })
}

impl ChatLog {
    /// Insert a message and return its assigned id.
    pub fn append(conn: &Connection, msg: &ChatMessage) -> BotResult<i64> {
        conn.execute(
            "INSERT INTO chat_messages (timestamp, user_id, username, channel_id, channel_name, message_content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                time_utils::to_sqlite(&msg.timestamp),
                msg.user_id,
                msg.username,
                msg.channel_id,
                msg.channel_name,
                msg.message_content,
            ],
        )
        .map_err(|e| BotError::Storage(format!("Append chat message failed: {}", e)))?;
        Ok(conn.last_insert_rowid())
    }

    /// Ingestion path: a failed write is logged and the event dropped.
    pub fn record(conn: &Connection, msg: &ChatMessage) -> Option<i64> {
        match Self::append(conn, msg) {
            Ok(id) => {
                tracing::debug!(
                    id,
                    user = %msg.username,
                    channel = %msg.channel_name,
                    "Message {:?} logged",
                    msg.message_content
                );
                Some(id)
            }
            Err(e) => {
                tracing::error!(
                    user = %msg.username,
                    channel = %msg.channel_name,
                    error = %e,
                    "Chat message dropped"
                );
                None
            }
        }
    }

    /// All messages with `timestamp >= since`, newest first.
    pub fn query_since(conn: &Connection, since: &DateTime<Utc>) -> BotResult<Vec<ChatMessage>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, timestamp, user_id, username, channel_id, channel_name, message_content
                 FROM chat_messages
                 WHERE timestamp >= ?1
                 ORDER BY timestamp DESC, id DESC",
            )
            .map_err(|e| BotError::Storage(e.to_string()))?;

        let messages = stmt
            .query_map(params![time_utils::to_sqlite(since)], chat_message_from_row)
            .map_err(|e| BotError::Storage(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| BotError::Storage(format!("Read chat messages failed: {}", e)))?;

        Ok(messages)
    }

    pub fn count(conn: &Connection) -> BotResult<u64> {
        conn.query_row("SELECT COUNT(*) FROM chat_messages", [], |r| r.get(0))
            .map_err(|e| BotError::Storage(e.to_string()))
    }
}
