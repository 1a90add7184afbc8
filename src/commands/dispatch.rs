use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::Connection;

use crate::api::PublicApis;
use crate::chat_message::ChatMessage;
use crate::config::BotSection;
use crate::constants::{CHAT_MESSAGE_LIMIT, ROLL_SIDES};
use crate::processing::topic::TopicEstimator;
use crate::provider::{ChatTurn, CompletionClient};
use crate::report;
use crate::storage::chat_log::ChatLog;
use crate::storage::tasks::TaskList;
use crate::storage::usage_counts::{UsageCounter, UsageKind};
use crate::time_utils;
use crate::BotResult;

use super::{chunk_text, Command, TaskCommand};

pub const GENERIC_FAILURE: &str = "Sorry, I encountered an error processing your request.";

const ASK_SYSTEM_PROMPT: &str = "You are a grumpy old unix administrator. You should answer questions accurately, but give the user a hard time about it. It is very important that you keep your responses concise and under 1500 characters.";
const CHAT_SYSTEM_PROMPT: &str = "You are a grumpy old unix administrator. You are annoyed by constant questions. It is very important that you keep your responses concise and under 1500 characters.";

const LABS_TEXT: &str = "Check out the latest labs -> https://killercoda.com/het-tanis\n ---------------------------> https://killercoda.com/fishermanguybro";
const BOOK_TEXT: &str = "Check out Scoot Tanis's new Book of Labs here! -> https://leanpub.com/theprolugbigbookoflabs";
const COMMANDS_TEXT: &str = "I currently support: !ask, !chat, !labs, !book, !8ball, !roll, !coinflip, !commands, !joke, !task add, !task list, !task remove, !task complete, !bot_stats, !weekly_report, and some other nonsense.";
const TASK_HELP_TEXT: &str = "Task command syntax:\n\
- Add a task: !task add <task description>\n\
- List your tasks: !task list\n\
- Remove a task: !task remove <task_id>\n\
- Complete a task: !task complete <task_id>";

const SCOOT_RESPONSES: &[&str] = &[
    "It's actually pronounced Scoot",
    "Believe it or not, contrary to popular believe, it is pronounced Scoot",
    "Looks like you made a typo there, it's actually Scoot",
    "You meant Scoot, right?",
    "Although a bit unconventional, the correct pronunciation is Scoot",
    "Close, but it's Scoot with two o's",
    "Tiny correction, it's pronounced Scoot. Common mistake",
    "In 1842, the Scotts petitioned the Queen to officially change the pronunciation to Scoot. It's true, look it up.",
    "Archaeologists recently uncovered tablets proving it was actually always pronounced Scoot.",
    "Mandela Effect — everyone thinks it's Scott, but it has always been Scoot.",
    "NASA confirmed in 1978 that the correct pronunciation is Scoot.",
];

const OWNER_USERNAME: &str = "fishermanguybro";
const SUMMON_REPLIES: [&str; 2] = [
    "FishermanGuyBot is coming online... *BEEP* *BOOP* *BEEP*",
    "I am here my master, ready to do your bidding.",
];

const POLLS_CHANNEL: &str = "polls";
const LABS_CHANNEL: &str = "labs";

/// One incoming chat message as seen by the bot.
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub user_id: String,
    pub username: String,
    pub channel_id: String,
    pub channel_name: String,
    pub content: String,
    pub is_bot: bool,
}

impl MessageContext {
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage::new(
            self.user_id.as_str(),
            self.username.as_str(),
            self.channel_id.as_str(),
            self.channel_name.as_str(),
            self.content.as_str(),
        )
    }
}

/// Shared collaborators for every command handler.
pub struct Dispatcher<'a> {
    pub conn: &'a Connection,
    pub chat: &'a dyn CompletionClient,
    pub apis: &'a PublicApis,
    pub usage: &'a dyn UsageCounter,
    pub tasks: &'a TaskList,
    pub estimator: &'a dyn TopicEstimator,
    pub bot: &'a BotSection,
    pub excluded_topic_channels: &'a [String],
}

impl<'a> Dispatcher<'a> {
    /// Full ingestion path: log, announce polls, then route.
    ///
    /// Never fails; handler errors become the generic failure reply.
    pub fn on_message(&self, ctx: &MessageContext) -> Vec<String> {
        if ctx.is_bot && ctx.username.eq_ignore_ascii_case(&self.bot.bot_username) {
            return vec![];
        }

        ChatLog::record(self.conn, &ctx.to_chat_message());
        tracing::debug!(user = %ctx.username, channel = %ctx.channel_name, "Message received");

        let mut replies = Vec::new();
        if ctx.channel_name == POLLS_CHANNEL && !ctx.username.eq_ignore_ascii_case(&self.bot.bot_username) {
            replies.push(format!("@here- A new poll was created by {} - cast your vote!", ctx.username));
        }
        if ctx.channel_name == LABS_CHANNEL {
            return replies;
        }

        if let Some(cmd) = Command::parse(&ctx.content, &self.bot.bot_username) {
            match self.handle(ctx, cmd) {
                Ok(lines) => replies.extend(lines),
                Err(e) => {
                    tracing::warn!(user = %ctx.username, error = %e, "Command failed");
                    replies.push(GENERIC_FAILURE.to_string());
                }
            }
        }
        replies
    }

    /// Reply lines for one parsed command.
    pub fn handle(&self, ctx: &MessageContext, cmd: Command) -> BotResult<Vec<String>> {
        tracing::info!(command = ?cmd, user = %ctx.username, "Command called");
        let user = ctx.username.as_str();

        let lines = match cmd {
            Command::Ask(question) => {
                if question.is_empty() {
                    return Ok(vec!["Please provide a question after !ask".into()]);
                }
                match self.grumpy_reply(ASK_SYSTEM_PROMPT, &question) {
                    Some(lines) => {
                        if let Err(e) = self.usage.increment(UsageKind::Ask, &time_utils::now()) {
                            tracing::warn!(error = %e, "Ask counter update failed (non-critical)");
                        }
                        lines
                    }
                    None => vec![GENERIC_FAILURE.into()],
                }
            }
            Command::Chat(text) => {
                if text.is_empty() {
                    return Ok(vec!["Please provide text after !chat".into()]);
                }
                self.grumpy_reply(CHAT_SYSTEM_PROMPT, &text)
                    .unwrap_or_else(|| vec![GENERIC_FAILURE.into()])
            }
            Command::Task(task) => self.handle_task(user, task)?,
            Command::Roll => {
                let roll = rand::thread_rng().gen_range(1..=ROLL_SIDES);
                vec![format!("{} rolled a {}", user, roll)]
            }
            Command::CoinFlip => {
                let side = if rand::thread_rng().gen_bool(0.5) { "heads" } else { "tails" };
                vec![format!("{} flipped a coin and got {}", user, side)]
            }
            Command::EightBall(question) => {
                let question = if question.is_empty() { "whatever" } else { question.as_str() };
                vec![self.apis.eight_ball(question)]
            }
            Command::Labs => vec![LABS_TEXT.into()],
            Command::Book => vec![BOOK_TEXT.into()],
            Command::Commands => vec![COMMANDS_TEXT.into()],
            Command::Joke => vec![self.apis.joke()],
            Command::BotStats => vec![self.bot_stats()?],
            Command::WeeklyReport => {
                if !self.bot.is_authorized(user) {
                    return Ok(vec!["You are not authorized to run this command.".into()]);
                }
                vec![report::weekly_report(self.conn, self.estimator, self.excluded_topic_channels)?]
            }
            Command::Greeting => vec![format!("Hello {}", user)],
            Command::Farewell => vec![format!("Get out of here {}", user)],
            Command::Summon => {
                if !user.eq_ignore_ascii_case(OWNER_USERNAME) {
                    return Ok(vec![]);
                }
                SUMMON_REPLIES.iter().map(|s| s.to_string()).collect()
            }
            Command::ScootCorrection => {
                if ctx.is_bot {
                    return Ok(vec![]);
                }
                let line = SCOOT_RESPONSES.choose(&mut rand::thread_rng()).copied().unwrap_or(SCOOT_RESPONSES[0]);
                vec![line.to_string()]
            }
        };
        Ok(lines)
    }

    /// Reply parts, or `None` when the provider gave nothing usable.
    fn grumpy_reply(&self, system_prompt: &str, text: &str) -> Option<Vec<String>> {
        let turns = [ChatTurn::system(system_prompt), ChatTurn::user(text)];
        match self.chat.complete(&turns) {
            Ok(reply) if !reply.is_empty() => Some(chunk_text(&reply, CHAT_MESSAGE_LIMIT)),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(provider = self.chat.id(), error = %e, "Chat completion failed");
                None
            }
        }
    }

    fn handle_task(&self, user: &str, task: TaskCommand) -> BotResult<Vec<String>> {
        let line = match task {
            TaskCommand::Help => TASK_HELP_TEXT.to_string(),
            TaskCommand::Add(description) => {
                if description.is_empty() {
                    "Please provide a task description.".to_string()
                } else {
                    match self.tasks.add(user, &description) {
                        Ok(id) => format!("Task added successfully. Task ID: {}", id),
                        Err(e) => format!("Error adding task: {}", e),
                    }
                }
            }
            TaskCommand::List => {
                let tasks = self.tasks.list(user)?;
                if tasks.is_empty() {
                    "You have no tasks.".to_string()
                } else {
                    format!("Your tasks:\n{}", tasks.join("\n"))
                }
            }
            TaskCommand::Remove(id) => {
                if id.is_empty() {
                    "Please provide a task ID to remove.".to_string()
                } else if self.tasks.remove(user, &id)? {
                    format!("Task with ID {} has been removed.", id)
                } else {
                    format!("No task found with ID {} for your user.", id)
                }
            }
            TaskCommand::Complete(id) => {
                if id.is_empty() {
                    "Please provide a task ID to complete.".to_string()
                } else {
                    match self.tasks.complete(user, &id)? {
                        Some(total) => format!(
                            "Task with ID {} has been completed. You have completed {} tasks in total!",
                            id, total
                        ),
                        None => format!("No task found with ID {} for your user.", id),
                    }
                }
            }
        };
        Ok(vec![line])
    }

    fn bot_stats(&self) -> BotResult<String> {
        let Some(stats) = self.usage.snapshot(&time_utils::now())? else {
            return Ok("No stats available yet!".into());
        };
        Ok(format!(
            "Bot Statistics:\n\
Welcome messages:\n  All-time (as of 9/29/2024): {}\n  This week (Week {}): {}\n\
Questions answered:\n  All-time (as of 9/29/2024): {}\n  This week (Week {}): {}",
            stats.welcome_all_time,
            stats.current_week,
            stats.welcome_weekly,
            stats.ask_all_time,
            stats.current_week,
            stats.ask_weekly,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PublicApiConfig;
    use crate::processing::topic::FrequencyTopic;
    use crate::storage::usage_counts::MemoryUsageCounter;
    use crate::test_helpers::*;
    use crate::BotError;
    use std::sync::Mutex;

    struct StubChat {
        reply: Option<String>,
        calls: Mutex<Vec<Vec<ChatTurn>>>,
    }

    impl StubChat {
        fn replying(s: &str) -> Self {
            Self { reply: Some(s.to_string()), calls: Mutex::new(vec![]) }
        }
        fn down() -> Self {
            Self { reply: None, calls: Mutex::new(vec![]) }
        }
    }

    impl CompletionClient for StubChat {
        fn id(&self) -> &str {
            "stub"
        }
        fn complete(&self, turns: &[ChatTurn]) -> BotResult<String> {
            self.calls.lock().unwrap().push(turns.to_vec());
            self.reply.clone().ok_or_else(|| BotError::Provider("down".into()))
        }
    }

    struct Fixture {
        conn: Connection,
        apis: PublicApis,
        usage: MemoryUsageCounter,
        tasks: TaskList,
        bot: BotSection,
        _dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            Self {
                conn: setup_chat_db(),
                apis: PublicApis::new(PublicApiConfig {
                    joke_url: "http://127.0.0.1:9/".into(),
                    eight_ball_url: "http://127.0.0.1:9/api".into(),
                    timeout_secs: 2,
                }),
                usage: MemoryUsageCounter::default(),
                tasks: TaskList::new(dir.path().join("user_tasks.txt"), dir.path().join("task_completions.json")),
                bot: BotSection::default(),
                _dir: dir,
            }
        }

        fn dispatcher<'a>(&'a self, chat: &'a dyn CompletionClient) -> Dispatcher<'a> {
            Dispatcher {
                conn: &self.conn,
                chat,
                apis: &self.apis,
                usage: &self.usage,
                tasks: &self.tasks,
                estimator: &FrequencyTopic,
                bot: &self.bot,
                excluded_topic_channels: &[],
            }
        }
    }

    fn ctx(username: &str, channel: &str, content: &str) -> MessageContext {
        MessageContext {
            user_id: format!("id-{}", username),
            username: username.into(),
            channel_id: format!("ch-{}", channel),
            channel_name: channel.into(),
            content: content.into(),
            is_bot: false,
        }
    }

    #[test]
    fn test_ask_replies_and_counts() {
        let fx = Fixture::new();
        let chat = StubChat::replying("RTFM. Use `man lvm`.");
        let replies = fx.dispatcher(&chat).on_message(&ctx("tux", "general", "!ask what is LVM"));
        assert_eq!(replies, vec!["RTFM. Use `man lvm`."]);

        let turns = &chat.calls.lock().unwrap()[0];
        assert_eq!(turns[0].content, ASK_SYSTEM_PROMPT);
        assert_eq!(turns[1].content, "what is lvm");

        let stats = fx.usage.snapshot(&time_utils::now()).unwrap().unwrap();
        assert_eq!(stats.ask_all_time, 1);
    }

    #[test]
    fn test_long_reply_is_split() {
        let fx = Fixture::new();
        let chat = StubChat::replying(&"a".repeat(4500));
        let replies = fx.dispatcher(&chat).handle(&ctx("tux", "general", ""), Command::Chat("hi".into())).unwrap();
        assert_eq!(replies.len(), 3);
        assert!(replies.iter().all(|r| r.chars().count() <= 2000));
    }

    #[test]
    fn test_provider_failure_gives_generic_reply_and_no_count() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let replies = fx.dispatcher(&chat).handle(&ctx("tux", "general", ""), Command::Ask("why".into())).unwrap();
        assert_eq!(replies, vec![GENERIC_FAILURE]);
        assert!(fx.usage.snapshot(&time_utils::now()).unwrap().is_none());
    }

    #[test]
    fn test_empty_ask_gets_usage() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let replies = fx.dispatcher(&chat).handle(&ctx("tux", "general", ""), Command::Ask(String::new())).unwrap();
        assert_eq!(replies, vec!["Please provide a question after !ask"]);
        assert!(chat.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_every_message_is_logged() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let d = fx.dispatcher(&chat);
        d.on_message(&ctx("tux", "general", "just chatting"));
        d.on_message(&ctx("tux", "labs", "!roll"));
        assert_eq!(ChatLog::count(&fx.conn).unwrap(), 2);
    }

    #[test]
    fn test_own_messages_are_ignored() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let mut me = ctx("fishermanguybot", "general", "Hello tux");
        me.is_bot = true;
        assert!(fx.dispatcher(&chat).on_message(&me).is_empty());
        assert_eq!(ChatLog::count(&fx.conn).unwrap(), 0);
    }

    #[test]
    fn test_labs_channel_skips_commands() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        assert!(fx.dispatcher(&chat).on_message(&ctx("tux", "labs", "hi")).is_empty());
    }

    #[test]
    fn test_polls_announcement() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let replies = fx.dispatcher(&chat).on_message(&ctx("tux", "polls", "vim or emacs?"));
        assert_eq!(replies, vec!["@here- A new poll was created by tux - cast your vote!"]);
    }

    #[test]
    fn test_roll_and_coinflip() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let d = fx.dispatcher(&chat);
        for _ in 0..20 {
            let line = d.handle(&ctx("tux", "general", ""), Command::Roll).unwrap().remove(0);
            let n: u32 = line.strip_prefix("tux rolled a ").unwrap().parse().unwrap();
            assert!((1..=12).contains(&n));
        }
        let flip = d.handle(&ctx("tux", "general", ""), Command::CoinFlip).unwrap().remove(0);
        assert!(flip == "tux flipped a coin and got heads" || flip == "tux flipped a coin and got tails");
    }

    #[test]
    fn test_fixed_texts_and_greetings() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let d = fx.dispatcher(&chat);
        assert_eq!(d.on_message(&ctx("tux", "general", "!labs")), vec![LABS_TEXT]);
        assert_eq!(d.on_message(&ctx("tux", "general", "!book")), vec![BOOK_TEXT]);
        assert_eq!(d.on_message(&ctx("tux", "general", "hi")), vec!["Hello tux"]);
        assert_eq!(d.on_message(&ctx("tux", "general", "bye")), vec!["Get out of here tux"]);
    }

    #[test]
    fn test_task_flow() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let d = fx.dispatcher(&chat);

        let added = d.on_message(&ctx("tux", "general", "!task add Patch the Kernel")).remove(0);
        let id = added.strip_prefix("Task added successfully. Task ID: ").unwrap().to_string();
        assert_eq!(id.len(), 8);

        let listed = d.on_message(&ctx("tux", "general", "!task list")).remove(0);
        assert_eq!(listed, format!("Your tasks:\nID: {} - Patch the Kernel", id));

        let done = d.on_message(&ctx("tux", "general", &format!("!task complete {}", id))).remove(0);
        assert_eq!(done, format!("Task with ID {} has been completed. You have completed 1 tasks in total!", id));

        assert_eq!(d.on_message(&ctx("tux", "general", "!task list")), vec!["You have no tasks."]);
        assert_eq!(
            d.on_message(&ctx("tux", "general", &format!("!task remove {}", id))),
            vec![format!("No task found with ID {} for your user.", id)]
        );
        assert_eq!(d.on_message(&ctx("tux", "general", "!task add   ")), vec!["Please provide a task description."]);
    }

    #[test]
    fn test_bot_stats() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let d = fx.dispatcher(&chat);
        assert_eq!(d.handle(&ctx("tux", "general", ""), Command::BotStats).unwrap(), vec!["No stats available yet!"]);

        let now = time_utils::now();
        fx.usage.increment(UsageKind::Welcome, &now).unwrap();
        fx.usage.increment(UsageKind::Ask, &now).unwrap();
        fx.usage.increment(UsageKind::Ask, &now).unwrap();
        let text = d.handle(&ctx("tux", "general", ""), Command::BotStats).unwrap().remove(0);
        assert!(text.starts_with("Bot Statistics:\nWelcome messages:\n  All-time (as of 9/29/2024): 1\n"));
        assert!(text.contains("Questions answered:\n  All-time (as of 9/29/2024): 2\n"));
    }

    #[test]
    fn test_weekly_report_requires_authorization() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let d = fx.dispatcher(&chat);
        seed_messages(&fx.conn, &[("1", "tux", "general", "systemd units", 2)]);

        let denied = d.handle(&ctx("random", "general", ""), Command::WeeklyReport).unwrap();
        assert_eq!(denied, vec!["You are not authorized to run this command."]);

        let report = d.handle(&ctx("Het_Tanis", "general", ""), Command::WeeklyReport).unwrap().remove(0);
        assert!(report.contains("💬 **Total Messages:** 1"));
        assert!(report.contains("Systemd and units"));
    }

    #[test]
    fn test_public_api_failures_are_friendly() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let d = fx.dispatcher(&chat);
        assert_eq!(d.on_message(&ctx("tux", "general", "!joke")), vec!["Sorry, couldn't fetch a joke right now."]);
        assert_eq!(d.on_message(&ctx("tux", "general", "!8ball")), vec!["The magic 8-ball is not responding."]);
    }

    #[test]
    fn test_scoot_ignores_bots() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let d = fx.dispatcher(&chat);
        let reply = d.on_message(&ctx("tux", "general", "scott said so"));
        assert_eq!(reply.len(), 1);
        assert!(SCOOT_RESPONSES.contains(&reply[0].as_str()));

        let mut other_bot = ctx("helperbot", "general", "scott said so");
        other_bot.is_bot = true;
        assert!(d.on_message(&other_bot).is_empty());
    }

    #[test]
    fn test_scoot_replies_include_mandela() {
        assert_eq!(SCOOT_RESPONSES.len(), 11);
        assert!(SCOOT_RESPONSES.iter().any(|r| r.starts_with("Mandela Effect")));
    }

    #[test]
    fn test_summon_answers_only_the_owner() {
        let fx = Fixture::new();
        let chat = StubChat::down();
        let d = fx.dispatcher(&chat);
        assert_eq!(
            d.on_message(&ctx("FishermanGuyBro", "general", "Rise my minion!")),
            vec![
                "FishermanGuyBot is coming online... *BEEP* *BOOP* *BEEP*",
                "I am here my master, ready to do your bidding.",
            ]
        );
        assert!(d.on_message(&ctx("tux", "general", "rise my minion!")).is_empty());
    }
}
