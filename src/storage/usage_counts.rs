//! Command usage counters (welcome messages, answered questions).
//!
//! File layout (counts.json):
//! `{"ask": {"all_time": 12, "weekly": {"2024-39": 3}}}`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::time_utils;
use crate::{BotError, BotResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    Welcome,
    Ask,
}

impl UsageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Ask => "ask",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub all_time: u64,
    #[serde(default)]
    pub weekly: BTreeMap<String, u64>,
}

pub type UsageCounts = BTreeMap<String, UsageEntry>;

/// Snapshot rendered by `!bot_stats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotStats {
    pub welcome_all_time: u64,
    pub welcome_weekly: u64,
    pub ask_all_time: u64,
    pub ask_weekly: u64,
    pub current_week: u32,
}

impl BotStats {
    fn from_counts(counts: &UsageCounts, now: &DateTime<Utc>) -> Self {
        let key = time_utils::week_key(now);
        let all_time = |kind: UsageKind| counts.get(kind.as_str()).map_or(0, |e| e.all_time);
        let weekly = |kind: UsageKind| {
            counts
                .get(kind.as_str())
                .and_then(|e| e.weekly.get(&key).copied())
                .unwrap_or(0)
        };
        Self {
            welcome_all_time: all_time(UsageKind::Welcome),
            welcome_weekly: weekly(UsageKind::Welcome),
            ask_all_time: all_time(UsageKind::Ask),
            ask_weekly: weekly(UsageKind::Ask),
            current_week: now.iso_week().week(),
        }
    }
}

/// Usage counter store, injected into the command dispatcher.
pub trait UsageCounter: Send + Sync {
    fn increment(&self, kind: UsageKind, now: &DateTime<Utc>) -> BotResult<()>;
    /// `None` when nothing has ever been counted.
    fn snapshot(&self, now: &DateTime<Utc>) -> BotResult<Option<BotStats>>;
}

fn bump(counts: &mut UsageCounts, kind: UsageKind, now: &DateTime<Utc>) {
    let entry = counts.entry(kind.as_str().to_string()).or_default();
    entry.all_time += 1;
    *entry.weekly.entry(time_utils::week_key(now)).or_insert(0) += 1;
}

/// Counters persisted to a JSON file.
pub struct JsonUsageCounter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonUsageCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(path: &Path) -> BotResult<Option<UsageCounts>> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl UsageCounter for JsonUsageCounter {
    fn increment(&self, kind: UsageKind, now: &DateTime<Utc>) -> BotResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| BotError::Storage("usage counter lock poisoned".into()))?;
        let mut counts = Self::load(&self.path)?.unwrap_or_default();
        bump(&mut counts, kind, now);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string(&counts)?)?;
        tracing::debug!(kind = kind.as_str(), "Usage counter incremented");
        Ok(())
    }

    fn snapshot(&self, now: &DateTime<Utc>) -> BotResult<Option<BotStats>> {
        Ok(Self::load(&self.path)?.map(|counts| BotStats::from_counts(&counts, now)))
    }
}

/// In-process counters, nothing persisted.
#[derive(Default)]
pub struct MemoryUsageCounter {
    counts: Mutex<Option<UsageCounts>>,
}

impl UsageCounter for MemoryUsageCounter {
    fn increment(&self, kind: UsageKind, now: &DateTime<Utc>) -> BotResult<()> {
        let mut guard = self
            .counts
            .lock()
            .map_err(|_| BotError::Storage("usage counter lock poisoned".into()))?;
        bump(guard.get_or_insert_with(UsageCounts::new), kind, now);
        Ok(())
    }

    fn snapshot(&self, now: &DateTime<Utc>) -> BotResult<Option<BotStats>> {
        let guard = self
            .counts
            .lock()
            .map_err(|_| BotError::Storage("usage counter lock poisoned".into()))?;
        Ok(guard.as_ref().map(|counts| BotStats::from_counts(counts, now)))
    }
}
