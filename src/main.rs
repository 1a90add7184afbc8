mod cli;

use clap::{Parser, Subcommand};

use prolug_bot::storage::path_utils;

#[derive(Parser)]
#[command(name = "prolug-bot", version, about = "ProLUG bot: chat logging and weekly activity reports")]
struct App {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log one chat message
    Log {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        channel_id: String,
        #[arg(long)]
        channel_name: String,
        /// Message text
        content: String,
    },
    /// Print the weekly activity report
    Report {
        /// Ask the Groq endpoint for the topic label
        #[arg(long)]
        generative: bool,
    },
    /// Print word and bigram frequencies for recent messages
    Words {
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
    /// Log a message and print the bot's replies
    Dispatch {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "general")]
        channel_name: String,
        /// Message text
        content: String,
    },
    /// Print the welcome message for a new member
    Welcome {
        /// Mention string, e.g. <@1234>
        mention: String,
        #[arg(long)]
        member_count: u64,
    },
    /// Summarize a thread transcript (one "author: text" line per message)
    Summarize {
        /// Transcript file
        path: String,
    },
    /// Show database status
    Status,
    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display the resolved configuration
    Show,
    /// Get a config value (dot notation: report.excluded_topic_channels)
    Get {
        key: String,
    },
    /// Print the default config path
    Path,
}

fn main() {
    let app = App::parse();
    prolug_bot::tracing_init::init_tracing(&path_utils::log_path());

    let config = app.config.as_deref();
    let result = match app.command {
        Commands::Log { user_id, username, channel_id, channel_name, content } => {
            cli::log::run(config, &user_id, &username, &channel_id, &channel_name, &content)
        }
        Commands::Report { generative } => cli::report::run(config, generative),
        Commands::Words { days } => cli::report::words(config, days),
        Commands::Dispatch { username, channel_name, content } => {
            cli::dispatch::run(config, &username, &channel_name, &content)
        }
        Commands::Welcome { mention, member_count } => cli::dispatch::welcome(config, &mention, member_count),
        Commands::Summarize { path } => cli::dispatch::summarize(config, &path),
        Commands::Status => cli::status::run(config),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::config::run_show(config),
            ConfigAction::Get { key } => cli::config::run_get(config, &key),
            ConfigAction::Path => cli::config::run_path(),
        },
    };
    result.unwrap_or_else(|e| eprintln!("Error: {:#}", e));
}
