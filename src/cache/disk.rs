//! Directory-backed cache storage
//!
//! Layout:
//!
//! ```text
//! <root>/<hex(store name)>/<sha256(key)>.entry
//! ```
//!
//! An entry file is one line of JSON metadata, a newline, then the raw
//! response body. Every write goes to a uniquely named temp file that is
//! renamed over the entry, so a reader sees a whole entry or none at all.

use crate::cache::storage::{matchable_key, storable_key, CacheStorage, RequestKey};
use crate::error::{AgentError, AgentResult};
use crate::http::{Request, Response};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use uuid::Uuid;

const ENTRY_EXT: &str = "entry";

/// Metadata line at the head of each entry file (bodies are not serialized)
#[derive(Debug, Deserialize)]
struct StoredEntry {
    key: RequestKey,
    response: Response,
}

/// Borrowed form of [`StoredEntry`] used when writing
#[derive(Serialize)]
struct EntryHeader<'a> {
    key: &'a RequestKey,
    response: &'a Response,
}

/// Cache storage persisted under a root directory
#[derive(Debug, Clone)]
pub struct DiskCacheStorage {
    root: PathBuf,
}

impl DiskCacheStorage {
    /// Create a storage rooted at `root` (created lazily)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this storage
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_dir(&self, name: &str) -> PathBuf {
        self.root.join(hex::encode(name.as_bytes()))
    }

    fn entry_path(&self, name: &str, key: &RequestKey) -> PathBuf {
        self.store_dir(name)
            .join(format!("{}.{}", key.digest(), ENTRY_EXT))
    }

    fn decode_store_name(dir_name: &str) -> Option<String> {
        hex::decode(dir_name)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    fn corrupt(path: &Path, reason: impl Into<String>) -> AgentError {
        AgentError::CacheCorrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    fn encode(key: &RequestKey, response: &Response) -> AgentResult<Vec<u8>> {
        // Compact JSON escapes newlines inside strings, so the first
        // newline always ends the metadata
        let mut bytes = serde_json::to_vec(&EntryHeader { key, response })?;
        bytes.push(b'\n');
        bytes.extend_from_slice(&response.body);
        Ok(bytes)
    }

    fn decode_meta(path: &Path, line: &[u8]) -> AgentResult<StoredEntry> {
        serde_json::from_slice(line).map_err(|e| Self::corrupt(path, e.to_string()))
    }

    /// Read a whole entry; `None` if it does not exist
    async fn read_entry(path: &Path) -> AgentResult<Option<(StoredEntry, Vec<u8>)>> {
        let bytes = match fs::read(path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AgentError::io(
                    format!("reading cache entry {}", path.display()),
                    e,
                ))
            }
        };

        let Some(split) = bytes.iter().position(|b| *b == b'\n') else {
            return Err(Self::corrupt(path, "missing metadata terminator"));
        };
        let entry = Self::decode_meta(path, &bytes[..split])?;
        Ok(Some((entry, bytes[split + 1..].to_vec())))
    }

    /// Read only the metadata line of an entry
    async fn read_key(path: &Path) -> AgentResult<Option<RequestKey>> {
        let file = match fs::File::open(path).await {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AgentError::io(
                    format!("reading cache entry {}", path.display()),
                    e,
                ))
            }
        };

        let mut line = Vec::new();
        BufReader::new(file)
            .read_until(b'\n', &mut line)
            .await
            .map_err(|e| AgentError::io(format!("reading cache entry {}", path.display()), e))?;
        if line.pop() != Some(b'\n') {
            return Err(Self::corrupt(path, "missing metadata terminator"));
        }
        Ok(Some(Self::decode_meta(path, &line)?.key))
    }

    async fn is_dir(path: &Path) -> bool {
        fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
    }
}

#[async_trait]
impl CacheStorage for DiskCacheStorage {
    async fn open(&self, name: &str) -> AgentResult<()> {
        let dir = self.store_dir(name);
        fs::create_dir_all(&dir).await.map_err(|e| AgentError::CacheStore {
            name: name.to_string(),
            reason: format!("creating {}: {}", dir.display(), e),
        })
    }

    async fn has(&self, name: &str) -> AgentResult<bool> {
        Ok(Self::is_dir(&self.store_dir(name)).await)
    }

    async fn keys(&self) -> AgentResult<Vec<String>> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AgentError::io("reading cache storage root", e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| AgentError::io("reading cache storage root", e))?
        {
            let file_name = entry.file_name();
            let Some(dir_name) = file_name.to_str() else {
                continue;
            };
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            match Self::decode_store_name(dir_name) {
                Some(name) if is_dir => names.push(name),
                _ => debug!("Ignoring foreign entry in cache root: {}", dir_name),
            }
        }

        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> AgentResult<bool> {
        let dir = self.store_dir(name);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AgentError::CacheStore {
                name: name.to_string(),
                reason: format!("removing {}: {}", dir.display(), e),
            }),
        }
    }

    async fn put(&self, name: &str, request: &Request, response: &Response) -> AgentResult<()> {
        let key = storable_key(request)?;
        self.open(name).await?;

        let path = self.entry_path(name, &key);
        let bytes = Self::encode(&key, response)?;

        let tmp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp_path, bytes)
            .await
            .map_err(|e| AgentError::io(format!("writing {}", tmp_path.display()), e))?;
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(AgentError::io(format!("renaming {}", tmp_path.display()), e));
        }

        debug!("Stored {} in {}", key, name);
        Ok(())
    }

    async fn match_in(&self, name: &str, request: &Request) -> AgentResult<Option<Response>> {
        let Some(key) = matchable_key(request) else {
            return Ok(None);
        };

        let Some((entry, body)) = Self::read_entry(&self.entry_path(name, &key)).await? else {
            return Ok(None);
        };

        let mut response = entry.response;
        response.body = body;
        Ok(Some(response))
    }

    async fn entries(&self, name: &str) -> AgentResult<Vec<RequestKey>> {
        let store_dir = self.store_dir(name);
        let mut dir = match fs::read_dir(&store_dir).await {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AgentError::CacheNotFound(name.to_string()))
            }
            Err(e) => {
                return Err(AgentError::io(
                    format!("reading {}", store_dir.display()),
                    e,
                ))
            }
        };

        let mut keys = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| AgentError::io(format!("reading {}", store_dir.display()), e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXT) {
                continue;
            }
            if let Some(key) = Self::read_key(&path).await? {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn backend_name(&self) -> &'static str {
        "disk"
    }
}
