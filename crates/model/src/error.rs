use snafu::Snafu;

use crate::ids::{ChatId, MessageId};

/// Coarse classification the presentation layer uses to choose an empty or error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    ResourceNotFound,
    Decode,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoaderError {
    #[snafu(display("chat resource '{resource_name}' was not found at {path}"))]
    ResourceNotFound {
        stage: &'static str,
        resource_name: String,
        path: String,
    },
    #[snafu(display("failed to read chat resource from {path}"))]
    ReadResource {
        stage: &'static str,
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("failed to decode chat resource '{resource_name}': {source}"))]
    Decode {
        stage: &'static str,
        resource_name: String,
        source: serde_json::Error,
    },
    #[snafu(display(
        "chat resource '{resource_name}' reuses message id '{message_id}' in chat '{chat_id}'"
    ))]
    DuplicateMessageId {
        stage: &'static str,
        resource_name: String,
        chat_id: ChatId,
        message_id: MessageId,
    },
}

impl LoaderError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            Self::ResourceNotFound { .. } => LoadErrorKind::ResourceNotFound,
            // An unreadable file is as unusable to the screen as a missing one.
            Self::ReadResource { .. } => LoadErrorKind::ResourceNotFound,
            Self::Decode { .. } | Self::DuplicateMessageId { .. } => LoadErrorKind::Decode,
        }
    }

    pub fn is_decode(&self) -> bool {
        self.kind() == LoadErrorKind::Decode
    }
}

pub type LoaderResult<T> = Result<T, LoaderError>;
