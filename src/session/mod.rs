//! Client-held session: the auth token and the cached user record.
//!
//! The session lives in a small key/value area (`token`, `user`) behind the
//! [`KeyValueStore`] trait. [`Session`] is the context object handed to the
//! HTTP client and the auth service; nothing else touches the store.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::ClientError;
use crate::types::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

const SESSION_FILE: &str = "session.json";

/// Persistent string key/value area.
///
/// Multi-entry writes are applied as one operation so readers never observe
/// a token without its user.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), ClientError>;
    fn remove_entries(&self, keys: &[&str]) -> Result<(), ClientError>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), ClientError> {
        let mut map = self.lock();
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), ClientError> {
        let mut map = self.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// JSON object file on disk, reloaded on every read.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by `<dir>/session.json`; the directory is created if missing.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self, ClientError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)
                .map_err(|e| ClientError::storage(format!("create {}: {e}", dir.display())))?;
        }
        Ok(Self {
            path: dir.join(SESSION_FILE),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents; a missing or unreadable file reads as empty.
    fn load(&self) -> BTreeMap<String, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return BTreeMap::new(),
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed session file {}: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    /// Replaced whole through a sibling temp file and a rename. Owner-only on unix.
    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        let content = serde_json::to_string_pretty(entries).map_err(|e| ClientError::storage(e.to_string()))?;
        let tmp = self.path.with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple()));

        let written = write_private(&tmp, content.as_bytes()).and_then(|_| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(ClientError::storage(format!("write {}: {e}", self.path.display())));
        }
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), ClientError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut entries = self.load();
        apply(&mut entries);
        self.save(&entries)
    }
}

fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(content)?;
    file.sync_all()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), ClientError> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert(key.to_string(), value.to_string());
            }
        })
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), ClientError> {
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}

/// Token + cached user, set and cleared together.
///
/// A missing token means "not authenticated" whatever the user entry says.
/// Tokens are trusted until the API rejects one; nothing here tracks expiry.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Session that only lives as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn set_session(&self, token: &str, user: &User) -> Result<(), ClientError> {
        let user_json = serde_json::to_string(user).map_err(|e| ClientError::storage(e.to_string()))?;
        self.store.set_entries(&[(TOKEN_KEY, token), (USER_KEY, &user_json)])
    }

    /// Replace the token, leaving the cached user alone
    pub fn set_token(&self, token: &str) -> Result<(), ClientError> {
        self.store.set_entries(&[(TOKEN_KEY, token)])
    }

    pub fn clear_session(&self) -> Result<(), ClientError> {
        self.store.remove_entries(&[TOKEN_KEY, USER_KEY])
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Cached user; unparseable data is treated as absent.
    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("cached user record is unreadable, ignoring it: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
