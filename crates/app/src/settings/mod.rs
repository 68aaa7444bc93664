pub mod state;

pub use state::{ChatSettings, SettingsError, SettingsStore, UserSettings};
