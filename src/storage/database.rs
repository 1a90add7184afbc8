use crate::constants::SQLITE_BUSY_TIMEOUT_MS;
use crate::{BotError, BotResult};
use rusqlite::Connection;

/// Configuration role: pragmas differ by the kind of caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRole {
    Bot, // long-lived ingestion, wal_autocheckpoint = 1000
    Cli, // one-shot report/command, wal_autocheckpoint = 0
}

/// Open a SQLite connection with the pragmas for `role` and apply migrations.
pub fn open_connection(path: &std::path::Path, role: ConnectionRole) -> BotResult<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)
        .map_err(|e| BotError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), role = ?role, "Database connection opened");

    configure_common(&conn)?;

    let autocheckpoint = match role {
        ConnectionRole::Bot => crate::constants::BOT_WAL_AUTOCHECKPOINT,
        ConnectionRole::Cli => crate::constants::CLI_WAL_AUTOCHECKPOINT,
    };
    conn.execute_batch(&format!("PRAGMA wal_autocheckpoint = {};", autocheckpoint))
        .map_err(|e| BotError::Storage(format!("Failed to configure {:?} pragmas: {}", role, e)))?;

    super::migrations::migrate_chat_db(&conn)?;

    Ok(conn)
}

/// Pragmas shared by every connection:
/// - journal_mode = WAL (readers never block the ingestion writer)
/// - busy_timeout = SQLITE_BUSY_TIMEOUT_MS
/// - synchronous = NORMAL
/// - temp_store = MEMORY
fn configure_common(conn: &Connection) -> BotResult<()> {
    conn.execute_batch(&format!(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = {};
         PRAGMA synchronous = NORMAL;
         PRAGMA temp_store = MEMORY;",
        SQLITE_BUSY_TIMEOUT_MS,
    ))
    .map_err(|e| BotError::Storage(format!("Failed to configure pragmas: {}", e)))?;
    Ok(())
}
