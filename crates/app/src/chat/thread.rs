use chrono::{DateTime, Utc};
use parlor_model::{Chat, Message, MessageContent, MessageId, ScrollOffset, Sender};

use crate::chat::scroll_manager::{ScrollCommand, ScrollManager};

/// Which side of the thread a message bubble sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BubbleSide {
    Outgoing,
    Incoming,
}

/// Detail state for one open conversation.
///
/// Borrows the chat from the list for as long as the thread screen is presented, so the
/// scroll anchor written here is still there when the same chat is opened again.
pub struct ChatThread<'a> {
    chat: &'a mut Chat,
    current_user: Sender,
    scroll: ScrollManager,
}

impl<'a> ChatThread<'a> {
    pub fn new(chat: &'a mut Chat, current_user: Sender) -> Self {
        Self {
            chat,
            current_user,
            scroll: ScrollManager::new(),
        }
    }

    pub fn chat(&self) -> &Chat {
        &*self.chat
    }

    pub fn messages(&self) -> &[Message] {
        &self.chat.messages
    }

    pub fn current_user(&self) -> &Sender {
        &self.current_user
    }

    pub fn scroll(&self) -> &ScrollManager {
        &self.scroll
    }

    /// Appends a message authored by the local user and asks the view to follow it.
    pub fn append_outgoing_message(
        &mut self,
        content: MessageContent,
        now: DateTime<Utc>,
    ) -> &Message {
        let sender = self.current_user.clone();
        self.append_message(content, sender, now)
    }

    /// Appends in sequence order; the list is never re-sorted by date.
    pub fn append_message(
        &mut self,
        content: MessageContent,
        sender: Sender,
        now: DateTime<Utc>,
    ) -> &Message {
        let message_id = self.fresh_message_id();
        let outgoing = sender.same_identity(&self.current_user);

        tracing::debug!(
            "appending {} message {} to chat {}",
            content.kind_name(),
            message_id,
            self.chat.id
        );
        self.chat
            .messages
            .push(Message::new(sender, message_id, now, content));

        if outgoing {
            self.scroll.request_scroll_to_latest();
        } else {
            self.scroll.request_scroll_to_latest_if_following();
        }

        let last_index = self.chat.messages.len() - 1;
        &self.chat.messages[last_index]
    }

    pub fn capture_scroll_position(&mut self, offset: ScrollOffset) {
        self.chat.view.last_offset = Some(offset);
    }

    pub fn restore_scroll_position(&self) -> Option<ScrollOffset> {
        self.chat.view.last_offset
    }

    /// Entry behavior: restore the saved anchor exactly, otherwise jump to the newest message.
    pub fn on_appear(&mut self) -> ScrollCommand {
        let saved = self.restore_scroll_position();
        let has_messages = !self.chat.messages.is_empty();
        self.scroll.entry_command(saved, has_messages)
    }

    /// Captures unconditionally, replacing any earlier anchor.
    pub fn on_disappear(&mut self, current: ScrollOffset) {
        self.capture_scroll_position(current);
    }

    pub fn observe_scroll(&mut self, offset: ScrollOffset, max_y: f64) {
        self.scroll.record_offset(offset, max_y);
    }

    pub fn take_pending_scroll(&mut self) -> Option<ScrollCommand> {
        self.scroll.take_pending()
    }

    pub fn bubble_side(&self, message: &Message) -> BubbleSide {
        if message.sender.same_identity(&self.current_user) {
            BubbleSide::Outgoing
        } else {
            BubbleSide::Incoming
        }
    }

    fn fresh_message_id(&self) -> MessageId {
        loop {
            let candidate = MessageId::generate();
            if !self.chat.contains_message(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
    }

    fn me() -> Sender {
        Sender::new("self", "me", at(0))
    }

    fn friend() -> Sender {
        Sender::new("friend", "Friend", at(0))
    }

    fn seeded_chat() -> Chat {
        Chat::new("c1", "Friend").with_messages(vec![
            Message::new(friend(), MessageId::from("m1"), at(10), MessageContent::text("hi")),
            Message::new(me(), MessageId::from("m2"), at(9), MessageContent::text("hey")),
        ])
    }

    #[test]
    fn append_is_append_only_with_a_fresh_id() {
        let mut chat = seeded_chat();
        let before = chat.messages.clone();

        let mut thread = ChatThread::new(&mut chat, me());
        let appended = thread
            .append_outgoing_message(MessageContent::text("new"), at(8))
            .clone();

        assert_eq!(thread.messages().len(), before.len() + 1);
        assert_eq!(&thread.messages()[..before.len()], before.as_slice());
        assert_eq!(thread.messages().last(), Some(&appended));
        assert!(before.iter().all(|m| m.message_id != appended.message_id));
        assert_eq!(appended.sent_date, at(8));
        assert_eq!(appended.sender, me());
    }

    #[test]
    fn repeated_appends_never_reuse_ids() {
        let mut chat = seeded_chat();
        let mut thread = ChatThread::new(&mut chat, me());
        for hour in 11..21 {
            thread.append_outgoing_message(MessageContent::text("again"), at(hour));
        }

        let unique = thread
            .messages()
            .iter()
            .map(|message| message.message_id.clone())
            .collect::<HashSet<_>>();
        assert_eq!(unique.len(), thread.messages().len());
    }

    #[test]
    fn outgoing_append_requests_follow_scroll() {
        let mut chat = seeded_chat();
        let mut thread = ChatThread::new(&mut chat, me());
        thread.observe_scroll(ScrollOffset::new(0.0, 400.0), 400.0);
        thread.observe_scroll(ScrollOffset::new(0.0, 50.0), 400.0);

        thread.append_outgoing_message(MessageContent::text("look"), at(12));
        assert_eq!(
            thread.take_pending_scroll(),
            Some(ScrollCommand::ScrollToLatest { animated: true })
        );
    }

    #[test]
    fn scroll_anchor_survives_leaving_and_reentering() {
        let mut chat = seeded_chat();

        {
            let mut thread = ChatThread::new(&mut chat, me());
            assert_eq!(
                thread.on_appear(),
                ScrollCommand::ScrollToLatest { animated: true }
            );
            thread.on_disappear(ScrollOffset::new(0.0, 120.0));
        }

        let mut thread = ChatThread::new(&mut chat, me());
        assert_eq!(
            thread.restore_scroll_position(),
            Some(ScrollOffset::new(0.0, 120.0))
        );
        assert_eq!(
            thread.on_appear(),
            ScrollCommand::RestoreExact(ScrollOffset::new(0.0, 120.0))
        );
    }

    #[test]
    fn disappear_overwrites_previous_anchor() {
        let mut chat = seeded_chat();
        let mut thread = ChatThread::new(&mut chat, me());
        thread.capture_scroll_position(ScrollOffset::new(0.0, 10.0));
        thread.on_disappear(ScrollOffset::new(0.0, 30.0));

        assert_eq!(
            thread.restore_scroll_position(),
            Some(ScrollOffset::new(0.0, 30.0))
        );
    }

    #[test]
    fn empty_chat_has_no_restore_position_and_stays_put() {
        let mut chat = Chat::new("c2", "Empty");
        let mut thread = ChatThread::new(&mut chat, me());

        assert_eq!(thread.restore_scroll_position(), None);
        assert_eq!(thread.on_appear(), ScrollCommand::Stay);
    }

    #[test]
    fn bubble_side_follows_sender_identity() {
        let mut chat = seeded_chat();
        let thread = ChatThread::new(&mut chat, me());

        let sides = thread
            .messages()
            .iter()
            .map(|message| thread.bubble_side(message))
            .collect::<Vec<_>>();
        assert_eq!(sides, vec![BubbleSide::Incoming, BubbleSide::Outgoing]);
    }
}
