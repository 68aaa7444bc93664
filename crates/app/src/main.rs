use std::sync::Arc;

use chrono::Utc;
use parlor::chat::{ChatListState, LoadOutcome, ScrollCommand, rows_for};
use parlor::settings::SettingsStore;
use parlor_model::{ChatLoader, MessageContent, ScrollOffset};
use tracing_subscriber::EnvFilter;

/// Loads the bundled conversations and walks one list-to-thread round trip.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = SettingsStore::load();
    let settings = store.settings();
    tracing::info!("using settings from {:?}", store.config_path());

    let loader = Arc::new(ChatLoader::new(settings.resource_dir.clone()));
    let mut list = ChatListState::new();
    match list.load(loader, &settings.fixture_name).await {
        LoadOutcome::Applied { count } => tracing::info!("loaded {count} chats"),
        LoadOutcome::Failed(kind) => {
            tracing::error!("chat list unavailable: {kind:?}");
            return;
        }
        LoadOutcome::Discarded => return,
    }

    for row in rows_for(list.chats(), &settings.row_style()) {
        tracing::info!(
            "{} | {} | {} | unread={:?} muted={}",
            row.title,
            row.preview,
            row.time_label.as_deref().unwrap_or(""),
            row.unread_badge,
            row.muted
        );
    }

    if list.is_empty() {
        return;
    }

    let current_user = settings.current_user.to_sender(Utc::now());
    let mut thread = match list.open(0, current_user) {
        Ok(thread) => thread,
        Err(error) => {
            tracing::error!("{error}");
            return;
        }
    };

    let entry = thread.on_appear();
    tracing::info!("opened {} with {entry:?}", thread.chat().title);

    let sent = thread.append_outgoing_message(MessageContent::text("hello from parlor"), Utc::now());
    tracing::info!("sent message {}", sent.message_id);
    if let Some(ScrollCommand::ScrollToLatest { animated }) = thread.take_pending_scroll() {
        tracing::debug!("following newest message (animated={animated})");
    }

    thread.on_disappear(ScrollOffset::new(0.0, 120.0));
    tracing::info!("saved scroll anchor {:?}", thread.restore_scroll_position());
}
