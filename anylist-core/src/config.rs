//! Client configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnyListError, AnyListResult};

static DEFAULT_BASE_URL: &str = "https://www.anylist.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn is_default_base_url(url: &String) -> bool {
    url == DEFAULT_BASE_URL
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn is_default_timeout_secs(secs: &u64) -> bool {
    *secs == DEFAULT_TIMEOUT_SECS
}

/// Configuration at ~/.config/anylist/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnyListConfig {
    #[serde(default = "default_base_url", skip_serializing_if = "is_default_base_url")]
    pub base_url: String,

    /// Acting user, sent with every operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Calendar that new labels belong to when none is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(
        default = "default_timeout_secs",
        skip_serializing_if = "is_default_timeout_secs"
    )]
    pub timeout_secs: u64,
}

impl Default for AnyListConfig {
    fn default() -> Self {
        AnyListConfig {
            base_url: default_base_url(),
            user_id: None,
            calendar_id: None,
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AnyListConfig {
    pub fn config_path() -> AnyListResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AnyListError::Config("Could not determine config directory".into()))?
            .join("anylist");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config from its default location, falling back to defaults
    /// when no file exists yet.
    pub fn load() -> AnyListResult<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> AnyListResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnyListError::Config(format!("Could not read {}: {e}", path.display()))
        })?;

        toml::from_str(&content)
            .map_err(|e| AnyListError::Config(format!("Invalid {}: {e}", path.display())))
    }

    /// Save the current config to ~/.config/anylist/config.toml
    pub fn save(&self) -> AnyListResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AnyListResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| AnyListError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AnyListError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| AnyListError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// The acting user id, required by every operation.
    pub fn require_user_id(&self) -> AnyListResult<&str> {
        self.user_id
            .as_deref()
            .ok_or_else(|| AnyListError::Config("user_id is not set".into()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AnyListResult<()> {
        let contents = format!(
            "\
# anylist configuration

# API endpoint:
# base_url = \"{DEFAULT_BASE_URL}\"

# Your AnyList user id:
# user_id = \"\"

# Calendar that new labels are created in:
# calendar_id = \"\"

# Bearer token sent with every request:
# access_token = \"\"

# Request timeout in seconds:
# timeout_secs = {DEFAULT_TIMEOUT_SECS}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AnyListError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AnyListError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
