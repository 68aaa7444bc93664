use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, FixedOffset, Utc};
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use parlor_model::{DEFAULT_FIXTURE_NAME, Sender};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use crate::chat::{DEFAULT_EMPTY_PREVIEW, RowStyle};

pub const DEFAULT_SENDER_ID: &str = "self";
pub const DEFAULT_DISPLAY_NAME: &str = "me";
pub const DEFAULT_AVATAR_URL: &str = "https://placehold.co/100";
pub const SETTINGS_DIRECTORY_NAME: &str = "parlor";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
const BUNDLED_RESOURCE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources");
const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

/// Identity of the person using this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default = "default_sender_id")]
    pub sender_id: String,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            sender_id: default_sender_id(),
            display_name: default_display_name(),
            avatar_url: Some(DEFAULT_AVATAR_URL.to_string()),
        }
    }
}

impl UserSettings {
    /// Builds the sender value handed to a thread; the local user is always "seen now".
    pub fn to_sender(&self, now: DateTime<Utc>) -> Sender {
        let sender = Sender::new(self.sender_id.as_str(), self.display_name.as_str(), now);
        match &self.avatar_url {
            Some(url) => sender.with_avatar_url(url.as_str()),
            None => sender,
        }
    }

    fn normalized(mut self) -> Self {
        self.sender_id = self.sender_id.trim().to_string();
        if self.sender_id.is_empty() {
            self.sender_id = default_sender_id();
        }
        self.display_name = self.display_name.trim().to_string();
        if self.display_name.is_empty() {
            self.display_name = default_display_name();
        }
        self.avatar_url = self
            .avatar_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_resource_dir")]
    pub resource_dir: PathBuf,
    #[serde(default = "default_fixture_name")]
    pub fixture_name: String,
    #[serde(default)]
    pub current_user: UserSettings,
    #[serde(default = "default_empty_preview")]
    pub empty_preview_placeholder: String,
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            resource_dir: default_resource_dir(),
            fixture_name: default_fixture_name(),
            current_user: UserSettings::default(),
            empty_preview_placeholder: default_empty_preview(),
            utc_offset_minutes: 0,
        }
    }
}

impl ChatSettings {
    pub fn normalized(mut self) -> Self {
        if self.resource_dir.as_os_str().is_empty() {
            self.resource_dir = default_resource_dir();
        }
        self.fixture_name = self.fixture_name.trim().to_string();
        if self.fixture_name.is_empty() {
            self.fixture_name = default_fixture_name();
        }
        if self.empty_preview_placeholder.trim().is_empty() {
            self.empty_preview_placeholder = default_empty_preview();
        }
        // Offsets beyond ±18h are not representable.
        if self.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES.unsigned_abs() {
            self.utc_offset_minutes = 0;
        }
        self.current_user = self.current_user.normalized();
        self
    }

    pub fn row_style(&self) -> RowStyle {
        let utc_offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| RowStyle::default().utc_offset);

        RowStyle {
            empty_preview: self.empty_preview_placeholder.clone(),
            utc_offset,
        }
    }
}

pub struct SettingsStore {
    settings: Arc<ArcSwap<ChatSettings>>,
    config_path: PathBuf,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".parlor"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let settings = Self::load_from_disk(&config_path);
        Self {
            settings: Arc::new(ArcSwap::from_pointee(settings)),
            config_path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> Arc<ChatSettings> {
        self.settings.load_full()
    }

    pub fn update(&self, settings: ChatSettings) -> Result<(), SettingsError> {
        let normalized_settings = settings.normalized();
        self.persist(&normalized_settings)?;
        self.settings.store(Arc::new(normalized_settings));
        Ok(())
    }

    fn load_from_disk(path: &Path) -> ChatSettings {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
            return ChatSettings::default();
        }

        let figment =
            Figment::from(Serialized::defaults(ChatSettings::default())).merge(Json::file(path));

        match figment.extract::<ChatSettings>() {
            Ok(settings) => settings.normalized(),
            Err(error) => {
                tracing::warn!(
                    "failed to parse settings from {:?}: {}. using defaults",
                    path,
                    error
                );
                ChatSettings::default()
            }
        }
    }

    fn persist(&self, settings: &ChatSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).context(CreateDirSnafu {
                stage: "create-settings-directory",
                path: parent.to_path_buf(),
            })?;
        }

        let content = serde_json::to_string_pretty(settings).context(SerializeConfigSnafu {
            stage: "serialize-settings-json",
        })?;

        let temp_path = self.config_path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).context(WriteFileSnafu {
            stage: "write-temporary-settings-file",
            path: temp_path.clone(),
        })?;

        std::fs::rename(&temp_path, &self.config_path).context(RenameTempFileSnafu {
            stage: "rename-temporary-settings-file",
            from: temp_path,
            to: self.config_path.clone(),
        })?;

        tracing::info!("saved settings to {:?}", self.config_path);
        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to create settings directory at {path:?} on `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to serialize settings on `{stage}`: {source}"))]
    SerializeConfig {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to write settings file at {path:?} on `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "failed to replace settings file from {from:?} to {to:?} on `{stage}`: {source}"
    ))]
    RenameTempFile {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

fn default_sender_id() -> String {
    DEFAULT_SENDER_ID.to_string()
}

fn default_display_name() -> String {
    DEFAULT_DISPLAY_NAME.to_string()
}

fn default_resource_dir() -> PathBuf {
    PathBuf::from(BUNDLED_RESOURCE_DIR)
}

fn default_fixture_name() -> String {
    DEFAULT_FIXTURE_NAME.to_string()
}

fn default_empty_preview() -> String {
    DEFAULT_EMPTY_PREVIEW.to_string()
}
