//! Chat command layer: parse a message into a `Command`, then route it.

pub mod dispatch;
pub mod thread;
pub mod welcome;

pub use dispatch::{Dispatcher, MessageContext};
pub use thread::summarize_thread;
pub use welcome::welcome_message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    Help,
    /// Description keeps the author's casing; empty means usage reply.
    Add(String),
    List,
    Remove(String),
    Complete(String),
}

/// A routed chat message. Argument strings may be empty, which the
/// dispatcher answers with a usage hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Chat(String),
    Task(TaskCommand),
    Roll,
    CoinFlip,
    EightBall(String),
    Labs,
    Book,
    Commands,
    Joke,
    BotStats,
    WeeklyReport,
    Greeting,
    Farewell,
    /// "rise my minion!", answered only for the bot's owner.
    Summon,
    /// Someone wrote "scott".
    ScootCorrection,
}

/// Lowercased remainder after `prefix`, trimmed.
fn args_after(lowered: &str, prefix: &str) -> String {
    lowered[prefix.len()..].trim().to_string()
}

impl Command {
    /// Route a raw message. `None` means the message is only logged.
    pub fn parse(content: &str, bot_username: &str) -> Option<Command> {
        let lowered = content.to_lowercase();
        let text = lowered.as_str();

        if text.starts_with("!ask ") {
            return Some(Command::Ask(args_after(text, "!ask ")));
        }
        if text.starts_with("!chat ") {
            return Some(Command::Chat(args_after(text, "!chat ")));
        }
        if text.starts_with("!task") {
            return parse_task(content, text).map(Command::Task);
        }
        if text.starts_with("!8ball") {
            return Some(Command::EightBall(args_after(text, "!8ball")));
        }

        let cmd = match text {
            "!roll" => Command::Roll,
            "!coinflip" => Command::CoinFlip,
            "!labs" => Command::Labs,
            "!book" => Command::Book,
            "!commands" => Command::Commands,
            "!joke" => Command::Joke,
            "!bot_stats" => Command::BotStats,
            "!weekly_report" => Command::WeeklyReport,
            "hi" => Command::Greeting,
            "bye" => Command::Farewell,
            "rise my minion!" => Command::Summon,
            _ if text == bot_username.to_lowercase() => Command::Greeting,
            _ if text.contains("scott") => Command::ScootCorrection,
            _ => return None,
        };
        Some(cmd)
    }
}

fn parse_task(original: &str, lowered: &str) -> Option<TaskCommand> {
    const ADD: &str = "!task add ";
    if lowered.starts_with(ADD) {
        let description = original.get(ADD.len()..).unwrap_or_default().trim();
        return Some(TaskCommand::Add(description.to_string()));
    }
    if lowered.starts_with("!task remove ") {
        return Some(TaskCommand::Remove(args_after(lowered, "!task remove ")));
    }
    if lowered.starts_with("!task complete ") {
        return Some(TaskCommand::Complete(args_after(lowered, "!task complete ")));
    }
    match lowered {
        "!task" => Some(TaskCommand::Help),
        "!task list" => Some(TaskCommand::List),
        _ => None,
    }
}

/// Split `text` into parts of at most `limit` characters.
pub fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![];
    }
    chars.chunks(limit.max(1)).map(|c| c.iter().collect()).collect()
}
