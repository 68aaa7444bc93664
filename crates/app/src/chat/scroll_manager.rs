use parlor_model::ScrollOffset;

/// Distance from the tail within which follow mode resumes.
const FOLLOW_RESUME_THRESHOLD: f64 = 24.0;
/// Small delta used to ignore floating-point scroll jitter.
const SCROLL_DELTA_EPSILON: f64 = 1.0;

/// Scroll instruction for the thread view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCommand {
    /// Jump straight to a saved position, without animation.
    RestoreExact(ScrollOffset),
    ScrollToLatest { animated: bool },
    Stay,
}

/// Tracks whether the thread follows its newest message, independent from message content.
///
/// Offsets grow downward: `y == max_y` means the tail is visible.
#[derive(Debug, Clone)]
pub struct ScrollManager {
    pending_scroll_to_latest: bool,
    follow_latest: bool,
    last_offset: ScrollOffset,
    last_max_y: f64,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            pending_scroll_to_latest: false,
            follow_latest: true,
            last_offset: ScrollOffset::default(),
            last_max_y: 0.0,
        }
    }

    pub fn is_following_latest(&self) -> bool {
        self.follow_latest
    }

    pub fn last_offset(&self) -> ScrollOffset {
        self.last_offset
    }

    pub fn request_scroll_to_latest(&mut self) {
        self.pending_scroll_to_latest = true;
        self.follow_latest = true;
    }

    pub fn request_scroll_to_latest_if_following(&mut self) {
        if self.follow_latest || self.was_near_latest() {
            self.pending_scroll_to_latest = true;
        }
    }

    /// Decides where the view lands when it becomes visible.
    pub fn entry_command(&mut self, saved: Option<ScrollOffset>, has_messages: bool) -> ScrollCommand {
        self.pending_scroll_to_latest = false;

        if let Some(offset) = saved {
            self.last_offset = offset;
            return ScrollCommand::RestoreExact(offset);
        }

        self.follow_latest = true;
        if has_messages {
            ScrollCommand::ScrollToLatest { animated: true }
        } else {
            ScrollCommand::Stay
        }
    }

    /// Feeds one observed position; pauses follow mode when the user scrolls away from the tail.
    pub fn record_offset(&mut self, offset: ScrollOffset, max_y: f64) {
        let offset_delta = offset.y - self.last_offset.y;
        let content_size_changed = (max_y - self.last_max_y).abs() > SCROLL_DELTA_EPSILON;
        let user_scrolled_up = offset_delta < -SCROLL_DELTA_EPSILON && !content_size_changed;
        let user_scrolled_down = offset_delta > SCROLL_DELTA_EPSILON && !content_size_changed;

        if self.pending_scroll_to_latest || (content_size_changed && self.was_near_latest()) {
            self.follow_latest = true;
        } else if self.follow_latest {
            if user_scrolled_up {
                self.follow_latest = false;
            }
        } else if user_scrolled_down && is_near_tail(offset.y, max_y) {
            self.follow_latest = true;
        }

        self.last_offset = offset;
        self.last_max_y = max_y;
    }

    /// Consumes a pending follow request, if any.
    pub fn take_pending(&mut self) -> Option<ScrollCommand> {
        if !self.pending_scroll_to_latest {
            return None;
        }

        self.pending_scroll_to_latest = false;
        Some(ScrollCommand::ScrollToLatest { animated: true })
    }

    fn was_near_latest(&self) -> bool {
        is_near_tail(self.last_offset.y, self.last_max_y)
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}

fn is_near_tail(y: f64, max_y: f64) -> bool {
    if max_y <= 0.0 {
        return true;
    }

    (max_y - y).abs() <= FOLLOW_RESUME_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_offset_wins_over_scroll_to_latest() {
        let mut manager = ScrollManager::new();
        let saved = ScrollOffset::new(0.0, 120.0);

        assert_eq!(
            manager.entry_command(Some(saved), true),
            ScrollCommand::RestoreExact(saved)
        );
        assert_eq!(manager.take_pending(), None);
    }

    #[test]
    fn entry_without_saved_offset_scrolls_to_latest_when_messages_exist() {
        let mut manager = ScrollManager::new();

        assert_eq!(
            manager.entry_command(None, true),
            ScrollCommand::ScrollToLatest { animated: true }
        );
        assert_eq!(manager.entry_command(None, false), ScrollCommand::Stay);
    }

    #[test]
    fn scrolling_up_pauses_follow_and_returning_resumes_it() {
        let mut manager = ScrollManager::new();
        manager.record_offset(ScrollOffset::new(0.0, 500.0), 500.0);
        assert!(manager.is_following_latest());

        manager.record_offset(ScrollOffset::new(0.0, 200.0), 500.0);
        assert!(!manager.is_following_latest());

        manager.request_scroll_to_latest_if_following();
        assert_eq!(manager.take_pending(), None);

        manager.record_offset(ScrollOffset::new(0.0, 490.0), 500.0);
        assert!(manager.is_following_latest());
    }

    #[test]
    fn explicit_request_always_produces_one_command() {
        let mut manager = ScrollManager::new();
        manager.record_offset(ScrollOffset::new(0.0, 500.0), 500.0);
        manager.record_offset(ScrollOffset::new(0.0, 100.0), 500.0);

        manager.request_scroll_to_latest();
        assert_eq!(
            manager.take_pending(),
            Some(ScrollCommand::ScrollToLatest { animated: true })
        );
        assert_eq!(manager.take_pending(), None);
        assert!(manager.is_following_latest());
    }
}
