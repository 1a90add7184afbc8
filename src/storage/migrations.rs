use crate::{BotError, BotResult};
use rusqlite::Connection;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Schema version in use (0 if the version table is absent)
pub fn get_schema_version(conn: &Connection) -> BotResult<u32> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |r| r.get(0),
        )
        .map_err(|e| BotError::Storage(e.to_string()))?;

    if !exists {
        return Ok(0);
    }

    let version: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .map_err(|e| BotError::Storage(e.to_string()))?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: u32) -> BotResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        rusqlite::params![version],
    )
    .map_err(|e| BotError::Storage(e.to_string()))?;
    Ok(())
}

// ── Chat log DB ──

// Column layout matches databases written by the legacy logger, which
// created `chat_messages` without a version table.
const CHAT_DB_V1: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS chat_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    user_id TEXT NOT NULL,
    username TEXT NOT NULL,
    channel_id TEXT NOT NULL,
    channel_name TEXT NOT NULL,
    message_content TEXT NOT NULL
);
";

const CHAT_DB_V2: &str = "
CREATE INDEX IF NOT EXISTS idx_chat_messages_timestamp ON chat_messages(timestamp);
";

/// Bring the chat log schema up to date. Safe to call on every start.
pub fn migrate_chat_db(conn: &Connection) -> BotResult<()> {
    let version = get_schema_version(conn)?;
    if version >= CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    tracing::info!(from = version, to = CURRENT_SCHEMA_VERSION, "Migrating chat log schema");

    if version < 1 {
        conn.execute_batch(CHAT_DB_V1)
            .map_err(|e| BotError::Storage(format!("Chat DB V1 migration failed: {}", e)))?;
        set_schema_version(conn, 1)?;
    }
    if version < 2 {
        conn.execute_batch(CHAT_DB_V2)
            .map_err(|e| BotError::Storage(format!("Chat DB V2 migration failed: {}", e)))?;
        set_schema_version(conn, 2)?;
    }

    Ok(())
}
