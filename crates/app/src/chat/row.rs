use chrono::{FixedOffset, Offset, Utc};
use parlor_model::{Chat, ChatId};

pub const DEFAULT_EMPTY_PREVIEW: &str = "-- empty --";
const TIME_LABEL_FORMAT: &str = "%H:%M";

/// Rendering knobs for list rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowStyle {
    pub empty_preview: String,
    pub utc_offset: FixedOffset,
}

impl Default for RowStyle {
    fn default() -> Self {
        Self {
            empty_preview: DEFAULT_EMPTY_PREVIEW.to_string(),
            utc_offset: Utc.fix(),
        }
    }
}

/// Everything one list row shows, derived from a chat snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRow {
    pub chat_id: ChatId,
    pub title: String,
    pub preview: String,
    pub time_label: Option<String>,
    /// `None` hides the badge.
    pub unread_badge: Option<u32>,
    pub muted: bool,
    pub avatar_url: Option<String>,
}

impl ChatRow {
    pub fn from_chat(chat: &Chat, style: &RowStyle) -> Self {
        let last_message = chat.last_message();

        let preview = last_message
            .and_then(|message| message.content.plain_text())
            .map(str::to_string)
            .unwrap_or_else(|| style.empty_preview.clone());
        let time_label = last_message.map(|message| {
            message
                .sent_date
                .with_timezone(&style.utc_offset)
                .format(TIME_LABEL_FORMAT)
                .to_string()
        });
        let avatar_url = last_message.and_then(|message| message.sender.avatar_url.clone());

        Self {
            chat_id: chat.id.clone(),
            title: chat.title.clone(),
            preview,
            time_label,
            unread_badge: (chat.unread_count > 0).then_some(chat.unread_count),
            muted: chat.is_muted,
            avatar_url,
        }
    }
}

pub fn rows_for(chats: &[Chat], style: &RowStyle) -> Vec<ChatRow> {
    chats
        .iter()
        .map(|chat| ChatRow::from_chat(chat, style))
        .collect()
}
