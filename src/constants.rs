// === Weekly Report ===
pub const REPORT_WINDOW_DAYS: i64 = 7;
pub const TOP_WORDS_LIMIT: usize = 30;
pub const TOP_BIGRAMS_LIMIT: usize = 20;
pub const TOPIC_WORD_COUNT: usize = 3;
pub const MAX_TOPIC_CHARS: usize = 100;

// === Topic labels ===
pub const TOPIC_NO_MESSAGES: &str = "No messages";
pub const TOPIC_NO_MESSAGES_THIS_WEEK: &str = "No messages this week";
pub const TOPIC_GENERAL: &str = "General discussion";
pub const TOPIC_FALLBACK: &str = "Various topics";

// === SQLite Tuning ===
pub const SQLITE_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const BOT_WAL_AUTOCHECKPOINT: u32 = 1_000;
pub const CLI_WAL_AUTOCHECKPOINT: u32 = 0;

// === Providers ===
pub const GROQ_TIMEOUT_SECS: u64 = 30;
pub const PERPLEXITY_TIMEOUT_SECS: u64 = 60;
pub const PUBLIC_API_TIMEOUT_SECS: u64 = 10;

// === Chat limits ===
pub const CHAT_MESSAGE_LIMIT: usize = 2_000;
pub const CHAT_CHUNK_SIZE: usize = 1_900; // message limit with buffer
pub const MIN_WELCOME_LENGTH: usize = 10;
pub const MEMBER_MILESTONE: u64 = 500;
pub const ROLL_SIDES: u32 = 12;
