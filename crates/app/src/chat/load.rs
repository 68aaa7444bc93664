use std::sync::Arc;

use parlor_model::{Chat, ChatLoader, LoadErrorKind, LoaderResult};
use tokio::task::JoinHandle;

/// Identifier for one load attempt.
///
/// A new ticket is minted on every activation so a late completion from an earlier
/// attempt can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Lifecycle of the initial load for one list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading(LoadTicket),
    Loaded,
    Failed(LoadErrorKind),
}

/// Result of handing a completion back to the list state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    Failed(LoadErrorKind),
    /// Completion belonged to a superseded attempt or a dismissed screen.
    Discarded,
}

/// Single ordered completion delivered back to the state owner.
#[derive(Debug)]
pub struct LoadCompletion {
    pub ticket: LoadTicket,
    pub result: LoaderResult<Vec<Chat>>,
}

/// Fixture read running on the tokio runtime, off the state owner's task.
#[derive(Debug)]
pub struct PendingLoad {
    ticket: LoadTicket,
    handle: JoinHandle<LoaderResult<Vec<Chat>>>,
}

impl PendingLoad {
    /// Starts the load; must be called from within a tokio runtime.
    pub fn spawn(
        loader: Arc<ChatLoader>,
        resource_name: impl Into<String>,
        ticket: LoadTicket,
    ) -> Self {
        let resource_name = resource_name.into();
        let handle = tokio::spawn(async move { loader.load_chats(&resource_name).await });
        Self { ticket, handle }
    }

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Best-effort cancellation; the underlying read may still run to completion.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Waits for the load and packages its result.
    ///
    /// Returns `None` when the task was aborted or panicked; there is nothing to apply then.
    pub async fn finish(self) -> Option<LoadCompletion> {
        match self.handle.await {
            Ok(result) => Some(LoadCompletion {
                ticket: self.ticket,
                result,
            }),
            Err(error) if error.is_cancelled() => {
                tracing::debug!("chat load {:?} was cancelled", self.ticket);
                None
            }
            Err(error) => {
                tracing::error!("chat load {:?} task failed: {error}", self.ticket);
                None
            }
        }
    }
}
