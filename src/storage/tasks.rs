//! Per-user task list backed by a flat file of `username|id|description`
//! lines, plus a JSON file of completion counts per user.
//!
//! Lines that do not split into three fields are kept as-is on rewrite.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::BotResult;

pub struct TaskList {
    tasks_path: PathBuf,
    completions_path: PathBuf,
}

struct TaskLine<'a> {
    username: &'a str,
    id: &'a str,
    description: &'a str,
}

fn parse_line(line: &str) -> Option<TaskLine<'_>> {
    let mut parts = line.trim().splitn(3, '|');
    Some(TaskLine {
        username: parts.next()?,
        id: parts.next()?,
        description: parts.next()?,
    })
}

fn read_lines(path: &Path) -> BotResult<Option<Vec<String>>> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw.lines().map(|l| format!("{}\n", l)).collect())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl TaskList {
    pub fn new(tasks_path: impl Into<PathBuf>, completions_path: impl Into<PathBuf>) -> Self {
        Self {
            tasks_path: tasks_path.into(),
            completions_path: completions_path.into(),
        }
    }

    /// Append a task and return its 8-character id.
    pub fn add(&self, username: &str, description: &str) -> BotResult<String> {
        use std::io::Write;

        let id: String = uuid::Uuid::new_v4().to_string().chars().take(8).collect();
        if let Some(parent) = self.tasks_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.tasks_path)?;
        writeln!(file, "{}|{}|{}", username, id, description)?;
        tracing::info!(user = %username, task_id = %id, "Task added");
        Ok(id)
    }

    /// Tasks of `username` (case-insensitive), formatted `ID: {id} - {description}`.
    pub fn list(&self, username: &str) -> BotResult<Vec<String>> {
        let lines = read_lines(&self.tasks_path)?.unwrap_or_default();
        Ok(lines
            .iter()
            .filter_map(|l| parse_line(l))
            .filter(|t| t.username.eq_ignore_ascii_case(username))
            .map(|t| format!("ID: {} - {}", t.id, t.description))
            .collect())
    }

    pub fn remove(&self, username: &str, task_id: &str) -> BotResult<bool> {
        self.take(username, task_id)
    }

    /// Remove the task and bump the user's completion count.
    /// Returns the new total, or `None` when no such task exists.
    pub fn complete(&self, username: &str, task_id: &str) -> BotResult<Option<u32>> {
        if !self.take(username, task_id)? {
            return Ok(None);
        }
        let total = self.increment_completions(username)?;
        tracing::info!(user = %username, task_id = %task_id, total, "Task completed");
        Ok(Some(total))
    }

    fn take(&self, username: &str, task_id: &str) -> BotResult<bool> {
        let Some(lines) = read_lines(&self.tasks_path)? else {
            return Ok(false);
        };

        let before = lines.len();
        let kept: Vec<String> = lines
            .into_iter()
            .filter(|l| match parse_line(l) {
                Some(t) => !(t.username.eq_ignore_ascii_case(username) && t.id == task_id),
                None => true,
            })
            .collect();

        if kept.len() == before {
            return Ok(false);
        }
        std::fs::write(&self.tasks_path, kept.concat())?;
        Ok(true)
    }

    fn increment_completions(&self, username: &str) -> BotResult<u32> {
        let mut completions: BTreeMap<String, u32> =
            match std::fs::read_to_string(&self.completions_path) {
                Ok(raw) => serde_json::from_str(&raw)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
                Err(e) => return Err(e.into()),
            };
        let total = completions.entry(username.to_string()).or_insert(0);
        *total += 1;
        let total = *total;
        if let Some(parent) = self.completions_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.completions_path, serde_json::to_string(&completions)?)?;
        Ok(total)
    }
}
