//! Key/value persistence used to carry widget state between runs.

pub mod json_store;

use crate::error::AppError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

pub use json_store::JsonFileStore;

pub trait KeyValueStore {
    fn get_value(&self, key: &str) -> Option<Value>;

    fn set_value(&mut self, key: &str, value: Value);

    /// Reads `key`, falling back to `default` when it is missing or does not
    /// decode as `T`.
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T
    where
        Self: Sized,
    {
        let Some(value) = self.get_value(key) else {
            return default;
        };

        match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring malformed stored value");
                default
            }
        }
    }

    fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), AppError>
    where
        Self: Sized,
    {
        let value =
            serde_json::to_value(value).map_err(|err| AppError::invalid_data(err.to_string()))?;
        self.set_value(key, value);
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl KeyValueStore for MemoryStore {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }
}
