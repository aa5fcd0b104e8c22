use crate::error::AppError;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "store.json";
const STORE_ENV_VAR: &str = "MOMENTUM_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntries {
    schema_version: u32,
    #[serde(default)]
    entries: Map<String, Value>,
}

/// Store kept as one pretty-printed JSON file. Writes are buffered in memory
/// until [`JsonFileStore::flush`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("momentum").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("momentum")
            .join(STORE_FILE_NAME))
    }
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let entries = if path.exists() {
            read_entries(path)?
        } else {
            Map::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn flush(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredEntries {
            schema_version: SCHEMA_VERSION,
            entries: self.entries.clone(),
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        std::fs::write(&self.path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)?;
        }

        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Map<String, Value>, AppError> {
    let content = std::fs::read_to_string(path)?;
    let stored: StoredEntries = match serde_json::from_str(&content) {
        Ok(stored) => stored,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "store is not valid JSON, starting empty");
            return Ok(Map::new());
        }
    };

    if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
        tracing::warn!(
            path = %path.display(),
            schema_version = stored.schema_version,
            "unsupported store schema, starting empty"
        );
        return Ok(Map::new());
    }

    Ok(stored.entries)
}

impl KeyValueStore for JsonFileStore {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }
}
