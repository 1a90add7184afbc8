use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// One observed chat event, as persisted in the message log.
///
/// Display names are denormalized per message: `username` and
/// `channel_name` are whatever the platform reported at posting time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Assigned by the store on insert.
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub username: String,
    pub channel_id: String,
    pub channel_name: String,
    pub message_content: String,
}

impl ChatMessage {
    /// New unsaved message stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        channel_id: impl Into<String>,
        channel_name: impl Into<String>,
        message_content: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            timestamp: crate::time_utils::now().trunc_subsecs(6),
            user_id: user_id.into(),
            username: username.into(),
            channel_id: channel_id.into(),
            channel_name: channel_name.into(),
            message_content: message_content.into(),
        }
    }

    /// Override the timestamp. Stored precision is microseconds.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp.trunc_subsecs(6);
        self
    }
}
