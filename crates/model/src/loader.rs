use std::cmp::Ordering;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use snafu::ResultExt;

use super::error::{
    DecodeSnafu, DuplicateMessageIdSnafu, LoaderError, LoaderResult, ReadResourceSnafu,
};
use super::types::Chat;

pub const DEFAULT_FIXTURE_NAME: &str = "mock_chats";
const FIXTURE_EXTENSION: &str = "json";

/// Reads bundled chat fixtures from one resource directory.
#[derive(Debug, Clone)]
pub struct ChatLoader {
    resource_root: PathBuf,
}

impl ChatLoader {
    pub fn new(resource_root: impl Into<PathBuf>) -> Self {
        Self {
            resource_root: resource_root.into(),
        }
    }

    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }

    pub fn fixture_path(&self, resource_name: &str) -> PathBuf {
        self.resource_root
            .join(format!("{resource_name}.{FIXTURE_EXTENSION}"))
    }

    /// Loads every chat in the named fixture, newest conversation first.
    pub async fn load_chats(&self, resource_name: &str) -> LoaderResult<Vec<Chat>> {
        let path = self.fixture_path(resource_name);
        tracing::debug!("loading chats from {:?}", path);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Err(LoaderError::ResourceNotFound {
                    stage: "locate-chat-resource",
                    resource_name: resource_name.to_string(),
                    path: display_path(&path),
                });
            }
            Err(error) => {
                return Err(error).context(ReadResourceSnafu {
                    stage: "read-chat-resource",
                    path: display_path(&path),
                });
            }
        };

        let chats = decode_chats(&bytes, resource_name)?;
        tracing::info!("loaded {} chats from '{}'", chats.len(), resource_name);
        Ok(chats)
    }
}

/// Decodes a fixture document and orders it by recency.
///
/// Any malformed record fails the whole document; nothing is skipped. A chat that reuses a
/// message id is malformed too.
pub fn decode_chats(bytes: &[u8], resource_name: &str) -> LoaderResult<Vec<Chat>> {
    let mut chats = serde_json::from_slice::<Vec<Chat>>(bytes).context(DecodeSnafu {
        stage: "decode-chat-resource",
        resource_name: resource_name.to_string(),
    })?;
    for chat in &chats {
        if let Some(message_id) = chat.duplicate_message_id() {
            return DuplicateMessageIdSnafu {
                stage: "validate-message-ids",
                resource_name,
                chat_id: chat.id.clone(),
                message_id: message_id.clone(),
            }
            .fail();
        }
    }
    sort_by_recency(&mut chats);
    Ok(chats)
}

/// Stable sort by last message date, newest first; chats without messages go last.
pub fn sort_by_recency(chats: &mut [Chat]) {
    chats.sort_by(compare_by_recency_desc);
}

fn compare_by_recency_desc(left: &Chat, right: &Chat) -> Ordering {
    // `None < Some(_)`, so reversing the comparison pushes empty chats to the tail.
    right.last_sent_date().cmp(&left.last_sent_date())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
