use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, HeaderMap, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 2;
const CACHE_DIR: &str = "gridiron_terminal";
const CACHE_FILE: &str = "responses.json";
pub const MAX_ENTRIES: usize = 256;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    entries: HashMap<String, Validated>,
}

/// A response body plus the validators the server sent with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Validated {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    stored_at: u64,
}

/// Conditional-GET cache for API reads. Bodies without an ETag or Last-Modified are never kept.
pub struct ResponseCache {
    path: Option<PathBuf>,
    file: Mutex<CacheFile>,
}

impl ResponseCache {
    /// Loads `path` if it holds a cache of the current version; starts empty otherwise. `None`
    /// keeps the cache in memory only.
    pub fn open(path: Option<PathBuf>) -> Self {
        let file = path
            .as_ref()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|raw| serde_json::from_str::<CacheFile>(&raw).ok())
            .filter(|file| file.version == CACHE_VERSION)
            .unwrap_or_else(|| CacheFile {
                version: CACHE_VERSION,
                entries: HashMap::new(),
            });
        Self {
            path,
            file: Mutex::new(file),
        }
    }

    /// `$XDG_CACHE_HOME/gridiron_terminal/responses.json`, else `~/.cache/...`.
    pub fn default_location() -> Option<PathBuf> {
        let base = std::env::var("XDG_CACHE_HOME")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .filter(|v| !v.trim().is_empty())
                    .map(|home| PathBuf::from(home).join(".cache"))
            })?;
        Some(base.join(CACHE_DIR).join(CACHE_FILE))
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// GETs `url`, sending the stored validators. A 304 answers with the stored body.
    pub fn get(&self, client: &Client, url: &str) -> Result<String> {
        let known = self.lock().entries.get(url).cloned();

        let mut req = client.get(url);
        if let Some(entry) = known.as_ref() {
            if let Some(etag) = entry.etag.as_deref() {
                req = req.header(IF_NONE_MATCH, etag);
            }
            if let Some(modified) = entry.last_modified.as_deref() {
                req = req.header(IF_MODIFIED_SINCE, modified);
            }
        }

        let resp = req.send().context("request failed")?;
        let status = resp.status();
        if status == StatusCode::NOT_MODIFIED {
            return known
                .map(|entry| entry.body)
                .ok_or_else(|| anyhow!("304 for {url} with nothing cached"));
        }
        let headers = resp.headers().clone();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status}"));
        }
        self.remember(url, &body, &headers);
        Ok(body)
    }

    fn remember(&self, url: &str, body: &str, headers: &HeaderMap) {
        let header = |name| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let etag = header(ETAG);
        let last_modified = header(LAST_MODIFIED);
        if etag.is_none() && last_modified.is_none() {
            return;
        }
        self.insert(
            url,
            Validated {
                body: body.to_string(),
                etag,
                last_modified,
                stored_at: now_secs(),
            },
        );
    }

    fn insert(&self, url: &str, entry: Validated) {
        let mut file = self.lock();
        file.entries.insert(url.to_string(), entry);
        while file.entries.len() > MAX_ENTRIES {
            let oldest = file
                .entries
                .iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone());
            let Some(key) = oldest else { break };
            file.entries.remove(&key);
        }
        if let Some(path) = self.path.as_ref() {
            // Best effort.
            let _ = persist(path, &file);
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheFile> {
        self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn persist(path: &Path, file: &CacheFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("create cache dir")?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(file).context("serialize response cache")?;
    fs::write(&tmp, json).context("write response cache")?;
    fs::rename(&tmp, path).context("swap response cache")?;
    Ok(())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(stored_at: u64) -> Validated {
        Validated {
            body: "{}".to_string(),
            etag: Some("\"v1\"".to_string()),
            last_modified: None,
            stored_at,
        }
    }

    #[test]
    fn oldest_entries_are_evicted() {
        let cache = ResponseCache::open(None);
        for idx in 0..MAX_ENTRIES + 3 {
            cache.insert(&format!("http://api/{idx}"), entry(idx as u64 + 1));
        }
        assert_eq!(cache.len(), MAX_ENTRIES);
        let file = cache.lock();
        assert!(!file.entries.contains_key("http://api/0"));
        assert!(file.entries.contains_key(&format!("http://api/{}", MAX_ENTRIES + 2)));
    }

    #[test]
    fn missing_file_opens_empty() {
        let cache = ResponseCache::open(Some(PathBuf::from("/nonexistent/gridiron/cache.json")));
        assert!(cache.is_empty());
    }
}
