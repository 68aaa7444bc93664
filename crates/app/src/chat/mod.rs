/// Row gesture contracts for list wiring.
pub mod events;
/// Conversation list state and row mutations.
pub mod list;
pub mod load;
pub mod row;
pub mod scroll_manager;
/// Detail state for one open conversation.
pub mod thread;

pub use events::{ListChange, RowAction};
pub use list::{ChatListState, ListError, ListResult};
pub use load::{LoadCompletion, LoadOutcome, LoadPhase, LoadTicket, PendingLoad};
pub use row::{ChatRow, DEFAULT_EMPTY_PREVIEW, RowStyle, rows_for};
pub use scroll_manager::{ScrollCommand, ScrollManager};
pub use thread::{BubbleSide, ChatThread};
