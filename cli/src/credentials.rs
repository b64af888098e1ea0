//! File-based token storage for the CLI
//!
//! `FileTokenStore` persists the session of each DiaSys server in one TOML
//! file with secure file permissions (0600 on Unix). Only tokens and the
//! cached identity are stored, never passwords.
//!
//! # File Location
//!
//! - Windows: `~/.diasys/credentials.toml`
//! - Linux/macOS: `~/.config/diasys/credentials.toml`
//!
//! # File Format
//!
//! ```toml
//! [origins."https://diasys-api.duckdns.org"]
//! access_token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! refresh_token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//!
//! [origins."https://diasys-api.duckdns.org".user]
//! user_id = 42
//! name = "Alice"
//! email = "alice@example.com"
//! ```
//!
//! Every write goes straight to disk, so another `diasys` process sees it on
//! its next [`TokenStore::reload`].

use diasys_link::{DiasysLinkError, Result, TokenPair, TokenStore, UserIdentity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based token store scoped to one server origin.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    /// Path to credentials file
    file_path: PathBuf,

    /// Origin whose session this store reads and writes
    origin: String,

    /// In-memory copy of the whole file (other origins are preserved on write)
    cache: BTreeMap<String, StoredSession>,
}

/// Stored session format for TOML serialization
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserIdentity>,
}

impl StoredSession {
    fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

/// Top-level TOML structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    origins: BTreeMap<String, StoredSession>,
}

impl FileTokenStore {
    /// Default credentials file path
    /// - Windows: `~/.diasys/credentials.toml`
    /// - Linux/macOS: `~/.config/diasys/credentials.toml`
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".diasys").join("credentials.toml")
            } else {
                PathBuf::from(".diasys").join("credentials.toml")
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("diasys").join("credentials.toml")
            } else if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("diasys").join("credentials.toml")
            } else {
                PathBuf::from(".diasys").join("credentials.toml")
            }
        }
    }

    /// Open the store at the default location for `origin`
    pub fn new(origin: impl Into<String>) -> Result<Self> {
        Self::with_path(Self::default_path(), origin)
    }

    /// Open the store at a custom location for `origin`
    pub fn with_path(file_path: PathBuf, origin: impl Into<String>) -> Result<Self> {
        let mut store = Self {
            file_path,
            origin: origin.into().trim_end_matches('/').to_string(),
            cache: BTreeMap::new(),
        };
        store.load_from_disk()?;
        Ok(store)
    }

    /// Get the file path used by this store
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Server origin this store is scoped to
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn entry(&self) -> Option<&StoredSession> {
        self.cache.get(&self.origin)
    }

    /// Apply `f` to this origin's entry and persist the result.
    fn update(&mut self, f: impl FnOnce(&mut StoredSession)) -> Result<()> {
        let entry = self.cache.entry(self.origin.clone()).or_default();
        f(entry);
        if entry.is_empty() {
            self.cache.remove(&self.origin);
        }
        self.save_to_disk()
    }

    /// Load the whole file into the memory cache
    fn load_from_disk(&mut self) -> Result<()> {
        if !self.file_path.exists() {
            self.cache.clear();
            return Ok(());
        }

        let contents = fs::read_to_string(&self.file_path).map_err(|e| {
            DiasysLinkError::StorageError(format!(
                "Cannot read credentials file '{}': {}",
                self.file_path.display(),
                e
            ))
        })?;

        let file: CredentialsFile = toml::from_str(&contents).map_err(|e| {
            let error_msg = e.to_string();
            let simple_error = error_msg
                .lines()
                .find(|line| line.contains("missing field") || line.contains("invalid type"))
                .unwrap_or("Invalid TOML format")
                .trim()
                .to_string();

            DiasysLinkError::ConfigurationError(format!(
                "Corrupted credentials file '{}' ({}). Delete it and run `diasys login` again.",
                self.file_path.display(),
                simple_error
            ))
        })?;

        self.cache = file.origins;
        Ok(())
    }

    /// Write the memory cache to disk with owner-only permissions
    fn save_to_disk(&self) -> Result<()> {
        let file = CredentialsFile {
            origins: self.cache.clone(),
        };

        let contents = toml::to_string_pretty(&file).map_err(|e| {
            DiasysLinkError::StorageError(format!("Failed to serialize credentials: {}", e))
        })?;

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DiasysLinkError::StorageError(format!(
                    "Failed to create credentials directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&self.file_path, contents).map_err(|e| {
            DiasysLinkError::StorageError(format!(
                "Failed to write credentials file at '{}': {}",
                self.file_path.display(),
                e
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.file_path, permissions).map_err(|e| {
                DiasysLinkError::StorageError(format!(
                    "Failed to set file permissions for '{}': {}",
                    self.file_path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn save_tokens(&mut self, tokens: &TokenPair) -> Result<()> {
        let tokens = tokens.clone();
        self.update(move |entry| {
            entry.access_token = Some(tokens.access_token);
            entry.refresh_token = Some(tokens.refresh_token);
        })
    }

    fn save_access_token(&mut self, access_token: &str) -> Result<()> {
        let access_token = access_token.to_string();
        self.update(move |entry| entry.access_token = Some(access_token))
    }

    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.entry().and_then(|e| e.access_token.clone()))
    }

    fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.entry().and_then(|e| e.refresh_token.clone()))
    }

    fn save_identity(&mut self, identity: &UserIdentity) -> Result<()> {
        let identity = identity.clone();
        self.update(move |entry| entry.user = Some(identity))
    }

    fn identity(&self) -> Result<Option<UserIdentity>> {
        Ok(self.entry().and_then(|e| e.user.clone()))
    }

    fn clear(&mut self) -> Result<()> {
        if self.cache.remove(&self.origin).is_none() && !self.file_path.exists() {
            return Ok(());
        }
        self.save_to_disk()
    }

    fn reload(&mut self) -> Result<()> {
        self.load_from_disk()
    }
}
