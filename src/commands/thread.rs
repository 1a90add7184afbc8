use crate::constants::CHAT_CHUNK_SIZE;
use crate::provider::{ChatTurn, CompletionClient};
use crate::{BotError, BotResult};

use super::chunk_text;

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes Discord thread conversations. Be precise and concise.";

/// Summarize a thread transcript (`"author: content"` lines, oldest first)
/// into postable parts labelled `Part i/n`.
pub fn summarize_thread(client: &dyn CompletionClient, lines: &[String]) -> BotResult<Vec<String>> {
    if lines.is_empty() {
        return Err(BotError::InvalidInput("thread has no messages".into()));
    }

    let prompt = format!(
        "Summarize the important information and key terms from the following text:\n\n{}\n\nSummary:",
        lines.join("\n")
    );
    let turns = [ChatTurn::system(SUMMARY_SYSTEM_PROMPT), ChatTurn::user(prompt)];
    let summary = client.complete(&turns)?;
    if summary.trim().is_empty() {
        return Err(BotError::Provider("empty summary".into()));
    }

    let chunks = chunk_text(&summary, CHAT_CHUNK_SIZE);
    let total = chunks.len();
    tracing::info!(provider = client.id(), messages = lines.len(), parts = total, "Thread summarized");
    Ok(chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| format!("Part {}/{}:\n\n{}", i + 1, total, chunk))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(String);

    impl CompletionClient for Echo {
        fn id(&self) -> &str {
            "echo"
        }
        fn complete(&self, turns: &[ChatTurn]) -> BotResult<String> {
            assert!(turns[1].content.starts_with("Summarize the important information"));
            Ok(self.0.clone())
        }
    }

    fn transcript() -> Vec<String> {
        vec!["tux: how do I mount nfs?".into(), "het_tanis: check /etc/fstab".into()]
    }

    #[test]
    fn test_single_part() {
        let parts = summarize_thread(&Echo("NFS mounting via fstab.".into()), &transcript()).unwrap();
        assert_eq!(parts, vec!["Part 1/1:\n\nNFS mounting via fstab."]);
    }

    #[test]
    fn test_long_summary_is_split_at_1900() {
        let parts = summarize_thread(&Echo("s".repeat(4000)), &transcript()).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].starts_with("Part 1/3:\n\n"));
        assert!(parts[2].ends_with(&"s".repeat(200)));
    }

    #[test]
    fn test_empty_inputs_are_errors() {
        assert!(summarize_thread(&Echo("x".into()), &[]).is_err());
        assert!(summarize_thread(&Echo("  ".into()), &transcript()).is_err());
    }
}
