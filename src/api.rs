//! Public no-key APIs behind `!joke` and `!8ball`.
//!
//! Every failure is turned into a chat-friendly string here; callers
//! always get something to post.

use std::time::Duration;

use serde_json::Value;

use crate::config::PublicApiConfig;

const JOKE_UNAVAILABLE: &str = "Sorry, couldn't fetch a joke right now.";
const EIGHT_BALL_UNAVAILABLE: &str = "The magic 8-ball is not responding.";
const EIGHT_BALL_UNCLEAR: &str = "Magic 8-ball is unclear";

#[derive(Debug)]
enum FetchError {
    Status(u16),
    Transport(String),
}

pub struct PublicApis {
    config: PublicApiConfig,
}

impl PublicApis {
    pub fn new(config: PublicApiConfig) -> Self {
        Self { config }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    fn get_json(&self, url: &str, query: Option<(&str, &str)>) -> Result<Value, FetchError> {
        let mut request = ureq::get(url).header("Accept", "application/json");
        if let Some((key, value)) = query {
            request = request.query(key, value);
        }
        let mut response = request
            .config()
            .timeout_global(Some(self.timeout()))
            .build()
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(code) => FetchError::Status(code),
                other => FetchError::Transport(other.to_string()),
            })?;
        response
            .body_mut()
            .read_json::<Value>()
            .map_err(|e| FetchError::Transport(e.to_string()))
    }

    /// Random dad joke.
    pub fn joke(&self) -> String {
        match self.get_json(&self.config.joke_url, None) {
            Ok(body) => joke_from(&body).unwrap_or_else(|| {
                tracing::warn!("Joke API response has no joke field");
                JOKE_UNAVAILABLE.to_string()
            }),
            Err(FetchError::Status(code)) => {
                tracing::warn!(status = code, "Joke API returned error status");
                format!("Error: Failed to fetch joke. Status code: {}", code)
            }
            Err(FetchError::Transport(e)) => {
                tracing::warn!(error = %e, "Joke API error");
                JOKE_UNAVAILABLE.to_string()
            }
        }
    }

    /// Magic 8-ball reading for `question`.
    pub fn eight_ball(&self, question: &str) -> String {
        match self.get_json(&self.config.eight_ball_url, Some(("question", question))) {
            Ok(body) => reading_from(&body),
            Err(FetchError::Status(code)) => {
                tracing::warn!(status = code, "8-ball API returned error status");
                format!("Error: {}", code)
            }
            Err(FetchError::Transport(e)) => {
                tracing::warn!(error = %e, "8-ball API error");
                EIGHT_BALL_UNAVAILABLE.to_string()
            }
        }
    }
}

fn joke_from(body: &Value) -> Option<String> {
    body.get("joke").and_then(Value::as_str).map(str::to_string)
}

fn reading_from(body: &Value) -> String {
    body.get("reading")
        .and_then(Value::as_str)
        .unwrap_or(EIGHT_BALL_UNCLEAR)
        .to_string()
}
