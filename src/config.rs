use crate::auth::StaticCredentials;
use crate::calc::{Thresholds, DEFAULT_ATTENDANCE_THRESHOLD, DEFAULT_PASS_MARK};
use crate::store::DEFAULT_STORAGE_KEY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "mentord.toml";

/// Mentor login accepted by the built-in credential check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        let d = StaticCredentials::default();
        Self {
            username: d.username,
            password: d.password,
            display_name: d.display_name,
        }
    }
}

/// Per-workspace settings read from `mentord.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key the record blob is stored under
    pub storage_key: String,
    /// Artificial delay applied to every store call
    pub latency_ms: u64,
    pub pass_mark: i64,
    pub attendance_threshold: i64,
    pub credentials: CredentialsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            latency_ms: 0,
            pass_mark: DEFAULT_PASS_MARK,
            attendance_threshold: DEFAULT_ATTENDANCE_THRESHOLD,
            credentials: CredentialsConfig::default(),
        }
    }
}

impl Config {
    pub fn path_in(workspace: &Path) -> PathBuf {
        workspace.join(CONFIG_FILE)
    }

    /// Missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.to_string_lossy()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.to_string_lossy()))?;
        Ok(config)
    }

    #[cfg(test)]
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            pass_mark: self.pass_mark,
            attendance: self.attendance_threshold,
        }
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn verifier(&self) -> StaticCredentials {
        StaticCredentials {
            username: self.credentials.username.clone(),
            password: self.credentials.password.clone(),
            display_name: self.credentials.display_name.clone(),
        }
    }
}
