#![deny(unsafe_code)]

/// Conversation list, thread and row state.
pub mod chat;
/// Settings persistence.
pub mod settings;
