//! Client-side session state: the access token and the refresh cookie.
//!
//! Tokens and cookie values are never logged or displayed in full.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

mod cookies;
mod token_store;

pub use cookies::PersistentCookieJar;
pub use token_store::{ACCESS_TOKEN_KEY, FileTokenStore, MemoryTokenStore, TokenStore};

/// Authentication state observed by whoever drives the client.
///
/// `LoginRequired` is the "send the user back to the login entry point"
/// signal: it is raised when a 401 could not be recovered by a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    SignedIn,
    LoginRequired,
}

impl SessionState {
    /// Initial state for a client, based on whether a token is already stored.
    pub fn from_store(store: &dyn TokenStore) -> Self {
        if store.get().is_some() {
            SessionState::SignedIn
        } else {
            SessionState::SignedOut
        }
    }
}

/// Masks a token for display: first 12 chars, or `***` for short values.
pub fn mask_token(token: &str) -> String {
    match token.char_indices().nth(12) {
        Some((idx, _)) if token.len() > 16 => format!("{}...", &token[..idx]),
        _ => "***".to_string(),
    }
}

/// Writes `contents` to `path` with owner-only permissions (0600 on unix),
/// creating the parent directory if needed.
///
/// The contents go to a sibling temp file that is renamed over `path`, so a
/// reader sees either the old file or the new one. The rename also replaces
/// any looser permissions an existing file had.
pub(crate) fn write_private_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let written = write_new_private(&tmp_path, contents).and_then(|()| fs::rename(&tmp_path, path));
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

fn write_new_private(path: &Path, contents: &str) -> io::Result<()> {
    #[cfg(unix)]
    let mut file = {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
    };

    #[cfg(not(unix))]
    let mut file = fs::File::create(path)?;

    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

/// Removes a file, treating "already gone" as success.
pub(crate) fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
