use std::path::PathBuf;

/// Cross-platform data directory.
/// Linux: ~/.config/prolug-bot/
/// macOS: ~/Library/Application Support/prolug-bot/
/// Windows: %APPDATA%/prolug-bot/
pub fn data_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    base.join("prolug-bot")
}

/// {data_dir}/config.json
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// {data_dir}/bot.log
pub fn log_path() -> PathBuf {
    data_dir().join("bot.log")
}

/// {data_dir}/chat_logs.db
pub fn default_db_path() -> PathBuf {
    data_dir().join("chat_logs.db")
}

/// {data_dir}/user_tasks.txt
pub fn default_tasks_path() -> PathBuf {
    data_dir().join("user_tasks.txt")
}

/// {data_dir}/task_completions.json
pub fn default_completions_path() -> PathBuf {
    data_dir().join("task_completions.json")
}

/// {data_dir}/counts.json
pub fn default_counts_path() -> PathBuf {
    data_dir().join("counts.json")
}

/// Expand ~ to home directory in paths.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/") || path == "~" {
        if let Some(home) = dirs::home_dir() {
            return PathBuf::from(path.replacen('~', &home.to_string_lossy(), 1));
        }
    }
    PathBuf::from(path)
}
