use anyhow::Result;

use prolug_bot::chat_message::ChatMessage;
use prolug_bot::storage::chat_log::ChatLog;

/// `log`: ingest one message. Storage failures are logged, never fatal.
pub fn run(
    config_path: Option<&str>,
    user_id: &str,
    username: &str,
    channel_id: &str,
    channel_name: &str,
    content: &str,
) -> Result<()> {
    let config = super::load_config(config_path)?;
    let conn = super::open_chat_db(&config)?;

    let msg = ChatMessage::new(user_id, username, channel_id, channel_name, content);
    match ChatLog::record(&conn, &msg) {
        Some(id) => println!("Logged message {}", id),
        None => eprintln!("Message not logged (see bot.log)"),
    }
    Ok(())
}
