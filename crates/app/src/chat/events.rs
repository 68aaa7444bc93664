/// Row-level gestures the list screen forwards to [`crate::chat::ChatListState::apply`].
///
/// Swipe actions and context-menu entries map onto the same variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    ToggleMute,
    Delete,
    MarkUnread,
    MarkRead,
    ToggleRead,
}

/// What the presentation layer has to redraw after a row action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListChange {
    /// Row content changed in place; reload just that row.
    RowUpdated { index: usize },
    /// Row is gone; rows after it shift up by one.
    RowRemoved { index: usize },
}

impl RowAction {
    pub fn name(self) -> &'static str {
        match self {
            Self::ToggleMute => "toggle-mute",
            Self::Delete => "delete",
            Self::MarkUnread => "mark-unread",
            Self::MarkRead => "mark-read",
            Self::ToggleRead => "toggle-read",
        }
    }

    /// Maps the action to the redraw it causes when it succeeds.
    pub fn change_at(self, index: usize) -> ListChange {
        match self {
            Self::Delete => ListChange::RowRemoved { index },
            Self::ToggleMute | Self::MarkUnread | Self::MarkRead | Self::ToggleRead => {
                ListChange::RowUpdated { index }
            }
        }
    }
}
