use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ChatId, MessageId, SenderId};
use super::timestamp;

/// One conversation participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    pub sender_id: SenderId,
    pub display_name: String,
    #[serde(with = "timestamp::flexible")]
    pub last_seen_date: DateTime<Utc>,
    #[serde(rename = "avatarURL", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Sender {
    pub fn new(
        sender_id: impl Into<SenderId>,
        display_name: impl Into<String>,
        last_seen_date: DateTime<Utc>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            display_name: display_name.into(),
            last_seen_date,
            avatar_url: None,
        }
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Identity check used for bubble placement; presence fields may differ between snapshots.
    pub fn same_identity(&self, other: &Sender) -> bool {
        self.sender_id == other.sender_id
    }
}

/// Message payload, discriminated by the `type` field on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: String },
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Returns the payload when it can be shown as a plain-text preview.
    pub fn plain_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
        }
    }
}

/// Core immutable message model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sender: Sender,
    pub message_id: MessageId,
    #[serde(with = "timestamp::flexible")]
    pub sent_date: DateTime<Utc>,
    #[serde(rename = "kind")]
    pub content: MessageContent,
}

impl Message {
    pub fn new(
        sender: Sender,
        message_id: MessageId,
        sent_date: DateTime<Utc>,
        content: MessageContent,
    ) -> Self {
        Self {
            sender,
            message_id,
            sent_date,
            content,
        }
    }
}

/// Last recorded scroll position inside a thread.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// View-only state that rides along with a chat for the lifetime of a screen session.
///
/// It is accepted from fixtures but never serialized, so a durable writer can ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "Option<ScrollOffset>")]
pub struct ChatViewState {
    pub last_offset: Option<ScrollOffset>,
}

impl From<Option<ScrollOffset>> for ChatViewState {
    fn from(last_offset: Option<ScrollOffset>) -> Self {
        Self { last_offset }
    }
}

/// Conversation aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: ChatId,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub is_muted: bool,
    #[serde(rename = "lastOffset", default, skip_serializing)]
    pub view: ChatViewState,
}

impl Chat {
    pub fn new(id: impl Into<ChatId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
            unread_count: 0,
            is_muted: false,
            view: ChatViewState::default(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Latest message by `sent_date`; among equal dates the one appended last wins.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.iter().max_by_key(|message| message.sent_date)
    }

    pub fn last_sent_date(&self) -> Option<DateTime<Utc>> {
        self.last_message().map(|message| message.sent_date)
    }

    pub fn contains_message(&self, message_id: &MessageId) -> bool {
        self.messages
            .iter()
            .any(|message| &message.message_id == message_id)
    }

    /// First message id that appears more than once, if any.
    pub fn duplicate_message_id(&self) -> Option<&MessageId> {
        let mut seen = HashSet::with_capacity(self.messages.len());
        self.messages
            .iter()
            .map(|message| &message.message_id)
            .find(|message_id| !seen.insert(*message_id))
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }

    pub fn last_offset(&self) -> Option<ScrollOffset> {
        self.view.last_offset
    }
}
