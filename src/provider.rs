use serde::{Deserialize, Serialize};

use crate::BotResult;

/// Speaker of one turn in a chat-completion request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Role-tagged text turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Generative text backend: ordered turns in, one completion out.
///
/// Timeouts and transport errors surface as `BotError::Provider`.
pub trait CompletionClient: Send + Sync {
    fn id(&self) -> &str;
    fn complete(&self, turns: &[ChatTurn]) -> BotResult<String>;
}

impl<C: CompletionClient + ?Sized> CompletionClient for &C {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn complete(&self, turns: &[ChatTurn]) -> BotResult<String> {
        (**self).complete(turns)
    }
}
