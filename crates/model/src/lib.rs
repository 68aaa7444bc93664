//! Chat domain model and the fixture loader that populates it.

pub mod error;
pub mod ids;
pub mod loader;
pub mod timestamp;
pub mod types;

pub use error::{LoadErrorKind, LoaderError, LoaderResult};
pub use ids::{ChatId, MessageId, SenderId};
pub use loader::{ChatLoader, DEFAULT_FIXTURE_NAME, decode_chats, sort_by_recency};
pub use timestamp::{TimestampFormat, format_timestamp, parse_timestamp};
pub use types::{Chat, ChatViewState, Message, MessageContent, ScrollOffset, Sender};
