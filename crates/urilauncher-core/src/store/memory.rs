//! In-memory `ConfigStore` for tests.
//!
//! Key paths are case-insensitive like the registry. Writes can be made to
//! fail on demand to exercise error paths.

use std::collections::BTreeMap;

use super::{ConfigStore, StoredValue};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
struct KeyData {
    path: String,
    values: BTreeMap<String, StoredValue>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    keys: BTreeMap<String, KeyData>,
    fail_once_at: Option<String>,
    read_only: bool,
    mutations: usize,
    deleted: Vec<String>,
}

fn normalize(path: &str) -> String {
    path.trim_matches('\\').to_ascii_lowercase()
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('\\').map(|(parent, _)| parent).unwrap_or("")
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next write to `path` fail once.
    pub fn fail_once_at(&mut self, path: &str) {
        self.fail_once_at = Some(normalize(path));
    }

    /// Make every subsequent write fail.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Number of successful writes (creates, sets and deletes).
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    /// Deleted key paths in deletion order.
    pub fn deleted_keys(&self) -> &[String] {
        &self.deleted
    }

    /// Compare keys and values, ignoring counters and failure settings.
    pub fn same_contents(&self, other: &MemoryStore) -> bool {
        self.keys == other.keys
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn check_write(&mut self, path: &str) -> Result<()> {
        if self.read_only {
            return Err(Error::registry(path, "Access is denied."));
        }
        if self.fail_once_at.as_deref() == Some(normalize(path).as_str()) {
            self.fail_once_at = None;
            return Err(Error::registry(path, "injected write failure"));
        }
        Ok(())
    }

    fn wrote(&mut self) {
        self.mutations += 1;
    }

    fn key(&self, path: &str) -> Result<&KeyData> {
        self.keys
            .get(&normalize(path))
            .ok_or_else(|| Error::registry(path, "The system cannot find the file specified."))
    }
}

impl ConfigStore for MemoryStore {
    fn key_exists(&self, path: &str) -> Result<bool> {
        let normalized = normalize(path);
        Ok(normalized.is_empty() || self.keys.contains_key(&normalized))
    }

    fn create_key(&mut self, path: &str) -> Result<()> {
        self.check_write(path)?;
        let trimmed = path.trim_matches('\\');
        if trimmed.is_empty() {
            return Ok(());
        }
        let mut end = 0;
        for segment in trimmed.split('\\') {
            end += segment.len();
            let prefix = &trimmed[..end];
            self.keys
                .entry(prefix.to_ascii_lowercase())
                .or_insert_with(|| KeyData {
                    path: prefix.to_string(),
                    values: BTreeMap::new(),
                });
            end += 1;
        }
        self.wrote();
        Ok(())
    }

    fn set_value(&mut self, path: &str, name: Option<&str>, value: &str) -> Result<()> {
        self.set_stored_value(path, name, &StoredValue::String(value.to_string()))
    }

    fn set_stored_value(
        &mut self,
        path: &str,
        name: Option<&str>,
        value: &StoredValue,
    ) -> Result<()> {
        self.check_write(path)?;
        let key = self
            .keys
            .get_mut(&normalize(path))
            .ok_or_else(|| Error::registry(path, "The system cannot find the file specified."))?;
        key.values
            .insert(name.unwrap_or("").to_string(), value.clone());
        self.wrote();
        Ok(())
    }

    fn get_value(&self, path: &str, name: Option<&str>) -> Result<Option<String>> {
        let Some(key) = self.keys.get(&normalize(path)) else {
            return Ok(None);
        };
        match key.values.get(name.unwrap_or("")) {
            Some(StoredValue::String(value)) => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }

    fn values(&self, path: &str) -> Result<Vec<(String, StoredValue)>> {
        Ok(self
            .key(path)?
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn subkeys(&self, path: &str) -> Result<Vec<String>> {
        let parent = normalize(path);
        if !parent.is_empty() {
            self.key(path)?;
        }
        Ok(self
            .keys
            .iter()
            .filter(|(normalized, _)| parent_of(normalized) == parent)
            .map(|(_, key)| {
                key.path
                    .rsplit_once('\\')
                    .map(|(_, name)| name)
                    .unwrap_or(&key.path)
                    .to_string()
            })
            .collect())
    }

    fn delete_key(&mut self, path: &str) -> Result<()> {
        self.check_write(path)?;
        if !self.subkeys(path)?.is_empty() {
            return Err(Error::registry(path, "key has subkeys"));
        }
        self.keys.remove(&normalize(path));
        self.deleted.push(path.to_string());
        self.wrote();
        Ok(())
    }
}
