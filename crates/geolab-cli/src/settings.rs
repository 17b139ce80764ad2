//! Tool settings - persisted in the user's config directory.
//!
//! Values come from, in increasing precedence: built-in defaults, the TOML
//! settings file, then the `GEOLAB_API_URL` / `GEOLAB_CRM_LOGIN_URL`
//! environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use geolab_client::{ClientConfig, DEFAULT_API_URL};
use geolab_forms::DEFAULT_CRM_LOGIN_URL;
use geolab_persistence::DraftConfig;
use serde::{Deserialize, Serialize};

/// Overrides the API base URL.
pub const API_URL_ENV: &str = "GEOLAB_API_URL";
/// Overrides the login page for denied access.
pub const CRM_LOGIN_URL_ENV: &str = "GEOLAB_CRM_LOGIN_URL";

const SETTINGS_FILE: &str = "settings.toml";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("pe", "Geofal", "geolab")
}

// =============================================================================
// ROOT SETTINGS
// =============================================================================

/// Tool settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub session: SessionSettings,
    pub drafts: DraftConfig,
    pub storage: StorageSettings,
}

impl Settings {
    /// Loads `path`, or the default settings file when `path` is `None`,
    /// then applies environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map_or_else(Self::config_path, Path::to_path_buf);
        let mut settings = Self::load_from(&path)?;
        settings.apply_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Reads a settings file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read settings {}", path.display()));
            }
        };
        toml::from_str(&content).with_context(|| format!("invalid settings {}", path.display()))
    }

    /// Writes the settings file, creating its directory.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write settings {}", path.display()))
    }

    /// Applies environment overrides read through `lookup`. Blank values are
    /// ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(url) = present(API_URL_ENV) {
            self.api.url = url.trim().to_string();
        }
        if let Some(url) = present(CRM_LOGIN_URL_ENV) {
            self.session.crm_login_url = url.trim().to_string();
        }
    }

    /// The default settings file path.
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Directory holding drafts and the session token.
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".geolab"))
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.api.url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL, without the `/api` path.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

/// Access and session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Where users are sent when access is denied.
    pub crm_login_url: String,
    /// Treat the tool as running inside a host page.
    pub embedded: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            crm_login_url: DEFAULT_CRM_LOGIN_URL.to_string(),
            embedded: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Overrides the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}
