//! Persistent bearer-token storage.
//!
//! The token is looked up on every request and never cached by the client,
//! so a login or logout elsewhere takes effect on the next call.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::{ClientError, ClientResult};

/// Key the bearer token is stored under.
pub const TOKEN_KEY: &str = "tokenAuth";

/// Key-value storage for the bearer token.
pub trait TokenStore: Send + Sync {
    /// Current token, or `None` when the user is signed out.
    fn token(&self) -> ClientResult<Option<String>>;

    fn store_token(&self, token: &str) -> ClientResult<()>;

    fn clear_token(&self) -> ClientResult<()>;
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

fn poisoned() -> ClientError {
    ClientError::Storage("token lock poisoned".into())
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> ClientResult<Option<String>> {
        Ok(self.token.read().map_err(|_| poisoned())?.clone())
    }

    fn store_token(&self, token: &str) -> ClientResult<()> {
        *self.token.write().map_err(|_| poisoned())? = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> ClientResult<()> {
        *self.token.write().map_err(|_| poisoned())? = None;
        Ok(())
    }
}

/// Token store backed by a JSON object file shared with other keys.
///
/// A missing file reads as "no token". Writes preserve unrelated keys.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, TOKEN_KEY)
    }

    pub fn with_key(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> ClientResult<Map<String, Value>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(ClientError::Storage(format!(
                    "failed to read {:?}: {}",
                    self.path, e
                )));
            }
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(ClientError::Storage(format!(
                "{:?} does not contain a JSON object",
                self.path
            ))),
            Err(e) => Err(ClientError::Storage(format!(
                "failed to parse {:?}: {}",
                self.path, e
            ))),
        }
    }

    /// Writes a sibling temp file, then renames it over the target.
    fn write_entries(&self, entries: &Map<String, Value>) -> ClientResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| {
            ClientError::Storage(format!("failed to create directory {:?}: {}", dir, e))
        })?;

        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| ClientError::Storage(format!("failed to create temp file in {:?}: {}", dir, e)))?;
        tmp.write_all(raw.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| ClientError::Storage(format!("failed to write {:?}: {}", tmp.path(), e)))?;
        tmp.persist(&self.path)
            .map_err(|e| ClientError::Storage(format!("failed to write {:?}: {}", self.path, e.error)))?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> ClientResult<Option<String>> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(&self.key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn store_token(&self, token: &str) -> ClientResult<()> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), Value::String(token.to_string()));
        self.write_entries(&entries)
    }

    fn clear_token(&self) -> ClientResult<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(&self.key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
