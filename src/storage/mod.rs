pub mod chat_log;
pub mod database;
pub mod migrations;
pub mod path_utils;
pub mod tasks;
pub mod usage_counts;
