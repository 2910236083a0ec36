//! Access token storage.
//!
//! The store holds at most one token. `set` overwrites, last write wins.
//! Expiry is never tracked here; an expired token is discovered when the
//! server rejects a request.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use super::{remove_file_if_exists, write_private_file};

/// Fixed key the access token is stored under.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Injectable access token storage.
pub trait TokenStore: Send + Sync {
    /// Returns the current token, if any.
    fn get(&self) -> Option<String>;

    /// Overwrites the current token. No validation of token shape.
    fn set(&self, token: &str) -> io::Result<()>;

    /// Removes the token.
    fn clear(&self) -> io::Result<()>;
}

/// Token kept in process memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: &str) -> io::Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// On-disk layout of `session.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

/// Token persisted to a JSON file with restricted permissions (0600).
///
/// The file is read once on open; afterwards the in-memory copy is
/// authoritative for this process and every write goes through to disk.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl FileTokenStore {
    /// Opens the store at `path`. A missing file means "no token".
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let token = Self::read_token(&path)?;
        Ok(Self {
            path,
            cached: RwLock::new(token),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_token(path: &Path) -> io::Result<Option<String>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<SessionFile>(&contents) {
            Ok(file) => Ok(file.access_token.filter(|t| !t.is_empty())),
            // An unreadable session is a signed-out one; the next login rewrites it.
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
                Ok(None)
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: &str) -> io::Result<()> {
        let file = SessionFile {
            access_token: Some(token.to_string()),
        };
        let contents = serde_json::to_string_pretty(&file)?;
        write_private_file(&self.path, &contents)?;
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        tracing::debug!(path = %self.path.display(), "access token stored");
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
        if remove_file_if_exists(&self.path)? {
            tracing::debug!(path = %self.path.display(), "access token cleared");
        }
        Ok(())
    }
}
