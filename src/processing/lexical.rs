//! Lexical analysis of chat history: normalization, stop-word filtering,
//! word and bigram frequency ranking.
//!
//! Pipeline:
//!   1. join all texts with a space, lowercase
//!   2. strip URLs, user mentions, then `!command` tokens
//!   3. keep runs of 3+ ascii letters
//!   4. drop stop words
//!   5. count words; bigrams pair each surviving token with the next
//!      surviving token, so adjacency spans removed words
//!
//! Rankings are by descending count; equal counts keep first-seen order.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{
    TOPIC_GENERAL, TOPIC_NO_MESSAGES, TOPIC_WORD_COUNT, TOP_BIGRAMS_LIMIT, TOP_WORDS_LIMIT,
};

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?\d+>").expect("valid mention regex"));
static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\w+").expect("valid command regex"));
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]{3,}\b").expect("valid token regex"));

/// Function words, pronouns and chat filler with no topical signal.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
    "of", "with", "by", "from", "as", "is", "was", "are", "were", "been",
    "be", "have", "has", "had", "do", "does", "did", "will", "would", "could",
    "should", "may", "might", "must", "can", "this", "that", "these", "those",
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
    "my", "your", "his", "its", "our", "their", "am", "im", "dont", "doesnt",
    "not", "no", "yes", "like", "just", "get", "got", "about", "so", "what",
    "when", "where", "who", "how", "why", "if", "then", "than", "some", "any",
    "all", "both", "each", "few", "more", "most", "other", "such", "only", "own",
    "same", "than", "too", "very", "one", "two", "three", "lol", "lmao", "yeah",
    "ok", "okay", "thanks", "thank", "thats", "its", "youre", "theyre", "ive",
    "haha", "oh", "well", "also", "now", "see", "know", "think", "want", "need",
];

static STOP_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// Ranked word and two-word-phrase frequencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStats {
    /// At most 30 entries.
    pub words: Vec<(String, usize)>,
    /// At most 20 entries, keyed `"first second"`.
    pub bigrams: Vec<(String, usize)>,
}

impl WordStats {
    /// `word(count)` entries joined with `", "`.
    pub fn format_words(&self) -> String {
        format_table(&self.words)
    }

    pub fn format_bigrams(&self) -> String {
        format_table(&self.bigrams)
    }
}

fn format_table(entries: &[(String, usize)]) -> String {
    entries
        .iter()
        .map(|(term, count)| format!("{}({})", term, count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Steps 1-2: joined, lowercased text with URLs, mentions and commands removed.
pub fn normalize<S: AsRef<str>>(texts: &[S]) -> String {
    let joined = texts
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let no_urls = URL_RE.replace_all(&joined, "");
    let no_mentions = MENTION_RE.replace_all(&no_urls, "");
    COMMAND_RE.replace_all(&no_mentions, "").into_owned()
}

/// Steps 3-4: tokens of 3+ letters that are not stop words, in text order.
pub fn meaningful_tokens(normalized: &str) -> Vec<&str> {
    TOKEN_RE
        .find_iter(normalized)
        .map(|m| m.as_str())
        .filter(|w| !STOP_SET.contains(w))
        .collect()
}

/// Count occurrences; result sorted by descending count, ties in first-seen order.
fn rank<I, T>(items: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for item in items {
        let key = item.as_ref();
        match position.get(key) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                position.insert(key.to_string(), counts.len());
                counts.push((key.to_string(), 1));
            }
        }
    }

    // sort_by is stable: equal counts keep insertion order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn bigrams(tokens: &[&str]) -> Vec<String> {
    tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

/// Top 30 words and top 20 bigrams of the given texts.
pub fn extract_word_stats<S: AsRef<str>>(texts: &[S]) -> WordStats {
    let normalized = normalize(texts);
    let tokens = meaningful_tokens(&normalized);

    let mut words = rank(tokens.iter());
    words.truncate(TOP_WORDS_LIMIT);

    let mut pairs = rank(bigrams(&tokens));
    pairs.truncate(TOP_BIGRAMS_LIMIT);

    tracing::debug!(
        tokens = tokens.len(),
        distinct_words = words.len(),
        distinct_bigrams = pairs.len(),
        "Word stats extracted"
    );

    WordStats { words, bigrams: pairs }
}

/// Short topic label built from the three most frequent words.
pub fn extract_topic_by_frequency<S: AsRef<str>>(texts: &[S]) -> String {
    if texts.is_empty() {
        return TOPIC_NO_MESSAGES.to_string();
    }

    let normalized = normalize(texts);
    let mut top = rank(meaningful_tokens(&normalized));
    top.truncate(TOPIC_WORD_COUNT);

    match top.as_slice() {
        [] => TOPIC_GENERAL.to_string(),
        [(first, _)] => capitalize(first),
        [(first, _), (second, _)] => format!("{} and {}", capitalize(first), second),
        [(first, _), (second, _), (third, _), ..] => {
            format!("{}, {}, and {}", capitalize(first), second, third)
        }
    }
}

/// Uppercase the first character, lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
