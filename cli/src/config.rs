//! Session file handling for the CLI.
//!
//! Stores the session token and the remembered email in
//! `$XDG_CONFIG_HOME/roster/config.toml` following the XDG Base Directory
//! Specification. [`FileSessionStore`] exposes that file to the business layer
//! as a [`SessionStore`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use roster_business::{SessionCredential, SessionError, SessionStore};
use serde::{Deserialize, Serialize};

/// CLI configuration stored on disk
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Authentication section
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Authentication configuration
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Saved session token
    pub token: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Email pre-filled by `roster login`
    pub remembered_email: Option<String>,
}

impl Config {
    /// Default configuration file path.
    ///
    /// Returns `$XDG_CONFIG_HOME/roster/config.toml` on Linux,
    /// appropriate paths on other platforms.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("dev", "roster", "roster")
            .context("Failed to determine config directory")?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn credential(&self) -> Option<SessionCredential> {
        let token = self.auth.token.clone()?;
        Some(SessionCredential {
            token,
            issued_at: self.auth.issued_at.unwrap_or_else(Utc::now),
            expires_at: self.auth.expires_at,
        })
    }

    pub fn set_credential(&mut self, credential: &SessionCredential) {
        self.auth.token = Some(credential.token.clone());
        self.auth.issued_at = Some(credential.issued_at);
        self.auth.expires_at = credential.expires_at;
    }

    /// Clear session data. The remembered email is kept.
    pub fn clear_credential(&mut self) {
        self.auth.token = None;
        self.auth.issued_at = None;
        self.auth.expires_at = None;
    }
}

/// [`SessionStore`] backed by the TOML config file.
///
/// Every call re-reads the file, so concurrent `roster` invocations see each
/// other's logins.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_config(&self) -> Result<Config, SessionError> {
        Config::load_from(&self.path).map_err(storage_error)
    }

    fn update(&self, f: impl FnOnce(&mut Config)) -> Result<(), SessionError> {
        let mut config = self.read_config()?;
        f(&mut config);
        config.save_to(&self.path).map_err(storage_error)
    }
}

fn storage_error(e: anyhow::Error) -> SessionError {
    SessionError::Storage(format!("{e:#}"))
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionCredential>, SessionError> {
        Ok(self.read_config()?.credential())
    }

    fn save(&self, credential: &SessionCredential) -> Result<(), SessionError> {
        self.update(|config| config.set_credential(credential))
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.update(Config::clear_credential)
    }

    fn remembered_email(&self) -> Result<Option<String>, SessionError> {
        Ok(self.read_config()?.auth.remembered_email)
    }

    fn remember_email(&self, email: Option<&str>) -> Result<(), SessionError> {
        self.update(|config| config.auth.remembered_email = email.map(str::to_owned))
    }
}
