//! Local key-value store for the remembered username and queued submissions.
//!
//! [`FileStore`] keeps one JSON object on disk and rewrites it after every
//! mutation. It offers no durability guarantees beyond that.

use crate::error::{HubError, HubResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Store file name under the data directory
pub const STORE_FILE: &str = "store.json";

/// Key holding the logged-in username
pub const USERNAME_KEY: &str = "username";

/// Key holding the array of queued submissions
pub const SUBMISSIONS_KEY: &str = "submissions";

/// Minimal key-value store used by the session and submission layers.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> HubResult<()>;
    /// Returns whether the key existed
    fn remove(&mut self, key: &str) -> HubResult<bool>;
}

// --- Memory Implementation ---

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: HashMap<String, Value>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> HubResult<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> HubResult<bool> {
        Ok(self.data.remove(key).is_some())
    }
}

// --- File Implementation ---

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: Map<String, Value>,
}

impl FileStore {
    /// Open `<dir>/store.json`; a missing file is an empty store.
    pub fn open(dir: &Path) -> HubResult<Self> {
        let path = dir.join(STORE_FILE);
        if !path.exists() {
            debug!("No store at {:?}, starting empty", path);
            return Ok(Self {
                path,
                data: Map::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| HubError::FileRead {
            path: path.clone(),
            source: e,
        })?;

        let data = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(HubError::FileParse {
                    path,
                    message: format!("expected a JSON object, found {}", json_kind(&other)),
                })
            }
            Err(e) => {
                return Err(HubError::FileParse {
                    path,
                    message: e.to_string(),
                })
            }
        };

        debug!("Opened store {:?} with {} key(s)", path, data.len());
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `data` to disk; the in-memory map is only replaced on success
    fn commit(&mut self, data: Map<String, Value>) -> HubResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&data)?;
        fs::write(&self.path, content)?;
        self.data = data;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> HubResult<()> {
        let mut data = self.data.clone();
        data.insert(key.to_string(), value);
        self.commit(data)
    }

    fn remove(&mut self, key: &str) -> HubResult<bool> {
        if !self.data.contains_key(key) {
            return Ok(false);
        }
        let mut data = self.data.clone();
        data.remove(key);
        if let Err(e) = self.commit(data) {
            warn!("Failed to persist removal of '{}': {}", key, e);
            return Err(e);
        }
        Ok(true)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
