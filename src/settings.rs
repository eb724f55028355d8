use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SERVER_URL_ENV: &str = "COURIER_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Base URL of the messaging API
    pub server_url: String,
    /// Per-request timeout in seconds; none by default
    pub request_timeout_secs: Option<u64>,
    /// Where the session token is kept
    pub token_store: TokenStoreSettings,
    pub messages: MessageSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenStoreSettings {
    /// Overrides the platform config directory
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSettings {
    pub cache_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            request_timeout_secs: None,
            token_store: TokenStoreSettings::default(),
            messages: MessageSettings::default(),
        }
    }
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            cache_enabled: true,
        }
    }
}

pub struct SettingsManager {
    settings_path: PathBuf,
    settings: AppSettings,
}

impl SettingsManager {
    pub fn new() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Ok(Self::load_from(settings_path))
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(settings_path: PathBuf) -> Self {
        let mut settings = Self::load_from_file(&settings_path).unwrap_or_else(|e| {
            log::warn!(
                "Could not read settings from {}: {}",
                settings_path.display(),
                e
            );
            AppSettings::default()
        });

        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                log::debug!("Using server URL from {}", SERVER_URL_ENV);
                settings.server_url = url;
            }
        }

        Self {
            settings_path,
            settings,
        }
    }

    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = home::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;

        let config_dir = home_dir.join(".config").join("courier");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(config_dir.join("settings.json"))
    }

    fn load_from_file(path: &Path) -> Result<AppSettings> {
        if !path.exists() {
            return Ok(AppSettings::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: AppSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, content)?;
        log::info!("Settings saved to: {}", self.settings_path.display());
        Ok(())
    }

    pub fn get(&self) -> &AppSettings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut AppSettings {
        &mut self.settings
    }

    pub fn update<F>(&mut self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut AppSettings),
    {
        updater(&mut self.settings);
        self.save()
    }

    pub fn server_url(&self) -> &str {
        &self.settings.server_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.settings.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn token_store_dir(&self) -> Option<&Path> {
        self.settings.token_store.directory.as_deref()
    }

    pub fn cache_enabled(&self) -> bool {
        self.settings.messages.cache_enabled
    }
}
