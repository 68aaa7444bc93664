use std::sync::Arc;

use parlor_model::{Chat, ChatId, ChatLoader, LoaderResult, Sender};
use snafu::Snafu;

use crate::chat::events::{ListChange, RowAction};
use crate::chat::load::{LoadOutcome, LoadPhase, LoadTicket, PendingLoad};
use crate::chat::thread::ChatThread;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ListError {
    #[snafu(display("chat index {index} is out of range for {len} chats on `{stage}`"))]
    IndexOutOfRange {
        stage: &'static str,
        index: usize,
        len: usize,
    },
}

pub type ListResult<T> = Result<T, ListError>;

/// In-memory conversation list for one screen session.
///
/// Rows are addressed by position in the last rendered snapshot. Nothing here re-sorts the
/// list; recency order is established once by the loader.
#[derive(Debug)]
pub struct ChatListState {
    chats: Vec<Chat>,
    phase: LoadPhase,
    active: bool,
    next_ticket: u64,
}

impl Default for ChatListState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatListState {
    pub fn new() -> Self {
        Self {
            chats: Vec::new(),
            phase: LoadPhase::Idle,
            active: true,
            next_ticket: 1,
        }
    }

    /// Builds an already-populated list, bypassing the load lifecycle.
    pub fn with_chats(chats: Vec<Chat>) -> Self {
        Self {
            chats,
            phase: LoadPhase::Loaded,
            ..Self::new()
        }
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn get(&self, index: usize) -> Option<&Chat> {
        self.chats.get(index)
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    pub fn position_of(&self, chat_id: &ChatId) -> Option<usize> {
        self.chats.iter().position(|chat| &chat.id == chat_id)
    }

    pub fn load_phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the screen visible again; a fresh load may follow.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Marks the screen gone; any in-flight load result will be dropped.
    pub fn dismiss(&mut self) {
        self.active = false;
        if let LoadPhase::Loading(ticket) = self.phase {
            tracing::debug!("dismissed chat list while load {ticket:?} was in flight");
            self.phase = LoadPhase::Idle;
        }
    }

    /// Starts a new load attempt, superseding any earlier one.
    pub fn begin_load(&mut self) -> LoadTicket {
        let ticket = LoadTicket::new(self.next_ticket);
        self.next_ticket = self.next_ticket.saturating_add(1);
        self.phase = LoadPhase::Loading(ticket);
        ticket
    }

    /// Applies a finished load if it belongs to the current attempt on an active screen.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: LoaderResult<Vec<Chat>>,
    ) -> LoadOutcome {
        if !self.active || self.phase != LoadPhase::Loading(ticket) {
            tracing::debug!("discarding stale chat load {ticket:?}");
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(chats) => {
                let count = chats.len();
                self.chats = chats;
                self.phase = LoadPhase::Loaded;
                LoadOutcome::Applied { count }
            }
            Err(error) => {
                tracing::error!("failed to load chats: {error}");
                let kind = error.kind();
                self.chats.clear();
                self.phase = LoadPhase::Failed(kind);
                LoadOutcome::Failed(kind)
            }
        }
    }

    /// Runs one complete load on the tokio runtime and applies it.
    pub async fn load(&mut self, loader: Arc<ChatLoader>, resource_name: &str) -> LoadOutcome {
        let ticket = self.begin_load();
        let pending = PendingLoad::spawn(loader, resource_name, ticket);

        match pending.finish().await {
            Some(completion) => self.complete_load(completion.ticket, completion.result),
            None => LoadOutcome::Discarded,
        }
    }

    /// Flips the muted flag and returns the new value.
    pub fn toggle_mute(&mut self, index: usize) -> ListResult<bool> {
        let chat = self.chat_mut(index, "toggle-mute")?;
        chat.is_muted = !chat.is_muted;
        Ok(chat.is_muted)
    }

    /// Removes the chat at `index` and hands it back.
    pub fn delete(&mut self, index: usize) -> ListResult<Chat> {
        self.check_index(index, "delete-chat")?;
        let removed = self.chats.remove(index);
        tracing::debug!("deleted chat {} at {index}", removed.id);
        Ok(removed)
    }

    /// Sets the "has unread" marker; an existing unread count is kept as is.
    pub fn mark_unread(&mut self, index: usize) -> ListResult<u32> {
        let chat = self.chat_mut(index, "mark-unread")?;
        if chat.unread_count == 0 {
            chat.unread_count = 1;
        }
        Ok(chat.unread_count)
    }

    pub fn mark_read(&mut self, index: usize) -> ListResult<()> {
        let chat = self.chat_mut(index, "mark-read")?;
        chat.unread_count = 0;
        Ok(())
    }

    pub fn toggle_read(&mut self, index: usize) -> ListResult<u32> {
        let chat = self.chat_mut(index, "toggle-read")?;
        chat.unread_count = if chat.has_unread() { 0 } else { 1 };
        Ok(chat.unread_count)
    }

    /// Dispatches a row gesture and reports what needs redrawing.
    pub fn apply(&mut self, action: RowAction, index: usize) -> ListResult<ListChange> {
        match action {
            RowAction::ToggleMute => {
                self.toggle_mute(index)?;
            }
            RowAction::Delete => {
                self.delete(index)?;
            }
            RowAction::MarkUnread => {
                self.mark_unread(index)?;
            }
            RowAction::MarkRead => self.mark_read(index)?,
            RowAction::ToggleRead => {
                self.toggle_read(index)?;
            }
        }

        Ok(action.change_at(index))
    }

    /// Positions of chats whose title, last message text or last sender matches `query`.
    ///
    /// Positions refer to the unfiltered list, so they can be fed straight back into mutations.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let normalized_query = query.trim().to_lowercase();

        self.chats
            .iter()
            .enumerate()
            .filter(|(_, chat)| matches_query(chat, &normalized_query))
            .map(|(index, _)| index)
            .collect()
    }

    /// Opens the detail state for one chat, borrowing it until the thread is dropped.
    pub fn open(&mut self, index: usize, current_user: Sender) -> ListResult<ChatThread<'_>> {
        let chat = self.chat_mut(index, "open-chat")?;
        Ok(ChatThread::new(chat, current_user))
    }

    fn check_index(&self, index: usize, stage: &'static str) -> ListResult<()> {
        let len = self.chats.len();
        if index < len {
            return Ok(());
        }

        tracing::warn!("{stage}: chat index {index} is out of range for {len} chats");
        IndexOutOfRangeSnafu { stage, index, len }.fail()
    }

    fn chat_mut(&mut self, index: usize, stage: &'static str) -> ListResult<&mut Chat> {
        self.check_index(index, stage)?;
        Ok(&mut self.chats[index])
    }
}

fn matches_query(chat: &Chat, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    if chat.title.to_lowercase().contains(query) {
        return true;
    }

    chat.last_message().is_some_and(|message| {
        message.sender.display_name.to_lowercase().contains(query)
            || message
                .content
                .plain_text()
                .is_some_and(|text| text.to_lowercase().contains(query))
    })
}
