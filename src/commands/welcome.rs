use crate::constants::{MEMBER_MILESTONE, MIN_WELCOME_LENGTH};
use crate::provider::{ChatTurn, CompletionClient};
use crate::storage::usage_counts::{UsageCounter, UsageKind};
use crate::time_utils;

const WELCOME_SYSTEM_PROMPT: &str =
    "You are a grumpy unix administrator who welcomes new users to a Linux discord server.";

fn welcome_prompt(mention: &str) -> String {
    format!(
        "Talk like an angry unix administrator and make your response short. Welcome {} to the ProLUG discord \
and encourage them to ask questions about linux. Make sure to state their name in the welcome message. \
Limit the response to two sentences.",
        mention
    )
}

/// Lines to post in the welcome channel when `mention` joins.
///
/// Short or failed completions fall back to a fixed greeting. Every call
/// counts one welcome; a member count on the milestone adds a banner.
pub fn welcome_message(
    client: &dyn CompletionClient,
    usage: &dyn UsageCounter,
    mention: &str,
    member_count: u64,
) -> Vec<String> {
    let turns = [ChatTurn::system(WELCOME_SYSTEM_PROMPT), ChatTurn::user(welcome_prompt(mention))];

    let greeting = match client.complete(&turns) {
        Ok(reply) if reply.chars().count() >= MIN_WELCOME_LENGTH => reply,
        Ok(reply) => {
            tracing::info!(len = reply.len(), "Welcome reply too short, using default");
            default_welcome(mention)
        }
        Err(e) => {
            tracing::warn!(provider = client.id(), error = %e, "Welcome completion failed, using default");
            default_welcome(mention)
        }
    };

    if let Err(e) = usage.increment(UsageKind::Welcome, &time_utils::now()) {
        tracing::warn!(error = %e, "Welcome counter update failed (non-critical)");
    }

    let mut lines = vec![greeting];
    if member_count > 0 && member_count % MEMBER_MILESTONE == 0 {
        lines.push(format!(
            "🎉🎊 @here - Congratulations {}! 🎉🎊 You are member number {}! 🥳🎈",
            mention, member_count
        ));
    }
    lines
}

fn default_welcome(mention: &str) -> String {
    format!("Welcome, {}! Feel free to look around and ask any questions.", mention)
}
