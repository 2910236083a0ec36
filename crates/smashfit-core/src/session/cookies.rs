//! Refresh credential storage.
//!
//! The backend hands out its refresh credential as an http-only cookie and
//! reads it back on `POST /auth/refresh`. A browser keeps that cookie in its
//! own jar; here the jar can optionally be persisted so a later process can
//! still refresh. Cookies are keyed by host only; `Path` and `Domain`
//! attributes are ignored.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use reqwest::Url;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;

use super::{remove_file_if_exists, write_private_file};

type HostCookies = HashMap<String, BTreeMap<String, String>>;

/// Cookie jar that remembers `Set-Cookie` values per host.
#[derive(Debug, Default)]
pub struct PersistentCookieJar {
    path: Option<PathBuf>,
    hosts: Mutex<HostCookies>,
}

impl PersistentCookieJar {
    /// In-memory jar, dropped with the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Jar backed by a JSON file (0600). A missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let hosts = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HostCookies::new(),
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt cookie file");
                HostCookies::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => HostCookies::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path: Some(path),
            hosts: Mutex::new(hosts),
        })
    }

    /// Returns the names of cookies held for `host`.
    pub fn cookie_names(&self, host: &str) -> Vec<String> {
        self.hosts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(host)
            .map(|cookies| cookies.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Drops every cookie and removes the backing file.
    pub fn clear(&self) -> io::Result<()> {
        self.hosts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        if let Some(path) = &self.path {
            remove_file_if_exists(path)?;
        }
        Ok(())
    }

    fn persist(&self, hosts: &HostCookies) {
        let Some(path) = &self.path else {
            return;
        };
        let result = serde_json::to_string_pretty(hosts)
            .map_err(io::Error::from)
            .and_then(|contents| write_private_file(path, &contents));
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "failed to persist cookies");
        }
    }
}

/// Parsed `Set-Cookie` header: name, value, and whether it deletes the cookie.
fn parse_set_cookie(raw: &str) -> Option<(String, String, bool)> {
    let mut parts = raw.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');

    let expired = parts.any(|attr| {
        let Some((key, val)) = attr.split_once('=') else {
            return false;
        };
        let key = key.trim();
        let val = val.trim();
        (key.eq_ignore_ascii_case("max-age") && val.parse::<i64>().is_ok_and(|age| age <= 0))
            || (key.eq_ignore_ascii_case("expires") && val.contains("1970"))
    });

    Some((name.to_string(), value.to_string(), expired || value.is_empty()))
}

impl CookieStore for PersistentCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let Some(host) = url.host_str() else {
            return;
        };

        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        let mut changed = false;

        for header in cookie_headers {
            let Some((name, value, removed)) = header.to_str().ok().and_then(parse_set_cookie)
            else {
                continue;
            };
            let cookies = hosts.entry(host.to_string()).or_default();
            if removed {
                changed |= cookies.remove(&name).is_some();
                tracing::debug!(host, cookie = %name, "cookie removed");
            } else {
                cookies.insert(name.clone(), value);
                changed = true;
                tracing::debug!(host, cookie = %name, "cookie stored");
            }
        }

        hosts.retain(|_, cookies| !cookies.is_empty());
        if changed {
            self.persist(&hosts);
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let host = url.host_str()?;
        let hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        let cookies = hosts.get(host)?;
        if cookies.is_empty() {
            return None;
        }
        let header = cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&header).ok()
    }
}
