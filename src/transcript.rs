//! Chat transcript
//!
//! An append-only list of messages. The only mutation after append is
//! settling an agent's in-progress "working" message: its text is replaced
//! and the flag cleared, once.

use crate::agents::AgentOutput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who a message is from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sender {
    User,
    /// An agent, with its id and display name
    Agent { id: String, name: String },
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: String },
    Output { output: AgentOutput },
    Error { message: String, hint: Option<String> },
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageContent::Text { text: text.into() }
    }

    /// Plain-text rendering without sender or timestamp
    pub fn render(&self) -> String {
        match self {
            MessageContent::Text { text } => text.clone(),
            MessageContent::Output { output } => output.render(),
            MessageContent::Error { message, hint } => match hint {
                Some(hint) => format!("Error: {message}\n{hint}"),
                None => format!("Error: {message}"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
    /// Set on an agent's working message until its task settles
    pub in_progress: bool,
}

impl ChatMessage {
    pub fn is_error(&self) -> bool {
        matches!(self.content, MessageContent::Error { .. })
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped now
    pub fn append(&mut self, sender: Sender, content: MessageContent) -> Uuid {
        self.append_at(sender, content, Utc::now(), false)
    }

    /// Append an in-progress message for a running task
    pub fn append_working(&mut self, sender: Sender, text: impl Into<String>) -> Uuid {
        self.append_at(sender, MessageContent::text(text), Utc::now(), true)
    }

    /// Append with an explicit timestamp. A timestamp earlier than the last
    /// message's is clamped up to it, so timestamps never decrease.
    pub fn append_at(
        &mut self,
        sender: Sender,
        content: MessageContent,
        timestamp: DateTime<Utc>,
        in_progress: bool,
    ) -> Uuid {
        let timestamp = match self.messages.last() {
            Some(last) if last.timestamp > timestamp => last.timestamp,
            _ => timestamp,
        };

        let id = Uuid::new_v4();
        self.messages.push(ChatMessage {
            id,
            sender,
            content,
            timestamp,
            in_progress,
        });
        id
    }

    /// Replace the text of an in-progress message and clear its flag.
    /// Returns false if `id` is unknown or already settled.
    pub fn settle(&mut self, id: Uuid, text: impl Into<String>) -> bool {
        match self
            .messages
            .iter_mut()
            .find(|message| message.id == id && message.in_progress)
        {
            Some(message) => {
                message.content = MessageContent::text(text);
                message.in_progress = false;
                true
            }
            None => false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages appended after the first `start`
    pub fn since(&self, start: usize) -> &[ChatMessage] {
        self.messages.get(start..).unwrap_or_default()
    }

    pub fn get(&self, id: Uuid) -> Option<&ChatMessage> {
        self.messages.iter().find(|message| message.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
