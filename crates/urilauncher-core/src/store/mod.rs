//! Hierarchical key/value store abstraction for testability.
//!
//! `ConfigStore` models the small part of the Windows registry the registrar
//! needs, so the install logic runs unchanged against `MemoryStore` in tests.
//! Key paths are relative to the store root and use `\` as separator.

mod memory;
#[cfg(target_os = "windows")]
mod registry;

pub use memory::MemoryStore;
#[cfg(target_os = "windows")]
pub use registry::WindowsRegistry;

use tracing::debug;

use crate::error::Result;

/// Trait for reading and writing registry-like keys.
pub trait ConfigStore {
    /// Check whether `path` exists.
    fn key_exists(&self, path: &str) -> Result<bool>;

    /// Create `path` and any missing ancestors. Existing keys are left as is.
    fn create_key(&mut self, path: &str) -> Result<()>;

    /// Write a string value. `None` addresses the key's default value.
    fn set_value(&mut self, path: &str, name: Option<&str>, value: &str) -> Result<()>;

    /// Write a value of any type, e.g. one captured by [`ConfigStore::values`].
    fn set_stored_value(
        &mut self,
        path: &str,
        name: Option<&str>,
        value: &StoredValue,
    ) -> Result<()>;

    /// Read a string value.
    ///
    /// Returns `Ok(None)` when the key or the value does not exist, or when the
    /// value is not a string.
    fn get_value(&self, path: &str, name: Option<&str>) -> Result<Option<String>>;

    /// All values of a key, of every type. The default value is reported
    /// under `""`. Fails if the key does not exist.
    fn values(&self, path: &str) -> Result<Vec<(String, StoredValue)>>;

    /// Names of the immediate subkeys.
    fn subkeys(&self, path: &str) -> Result<Vec<String>>;

    /// Delete a single key. Fails if it still has subkeys.
    fn delete_key(&mut self, path: &str) -> Result<()>;

    fn set_default_value(&mut self, path: &str, value: &str) -> Result<()> {
        self.set_value(path, None, value)
    }
}

/// A value as stored, typed enough to be written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    String(String),
    /// Any other type (`REG_EXPAND_SZ`, `REG_DWORD`, ...): type code and raw bytes.
    Raw { kind: u32, data: Vec<u8> },
}

pub(crate) fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!(r"{parent}\{child}")
    }
}

/// Delete `path` and everything below it, leaves first.
pub fn delete_tree<S: ConfigStore + ?Sized>(store: &mut S, path: &str) -> Result<()> {
    for child in store.subkeys(path)? {
        delete_tree(store, &join(path, &child))?;
    }
    debug!("Deleting key {path}");
    store.delete_key(path)
}

/// Captured state of a key subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySnapshot {
    pub path: String,
    pub values: Vec<(String, StoredValue)>,
    pub children: Vec<KeySnapshot>,
}

/// Capture `path` and its subtree, `Ok(None)` if the key does not exist.
pub fn snapshot<S: ConfigStore + ?Sized>(store: &S, path: &str) -> Result<Option<KeySnapshot>> {
    if !store.key_exists(path)? {
        return Ok(None);
    }
    let mut children = Vec::new();
    for child in store.subkeys(path)? {
        if let Some(snap) = snapshot(store, &join(path, &child))? {
            children.push(snap);
        }
    }
    Ok(Some(KeySnapshot {
        path: path.to_string(),
        values: store.values(path)?,
        children,
    }))
}

/// Recreate a subtree captured by [`snapshot`], parents first.
pub fn restore<S: ConfigStore + ?Sized>(store: &mut S, snap: &KeySnapshot) -> Result<()> {
    store.create_key(&snap.path)?;
    for (name, value) in &snap.values {
        let name = if name.is_empty() { None } else { Some(name.as_str()) };
        store.set_stored_value(&snap.path, name, value)?;
    }
    for child in &snap.children {
        restore(store, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.create_key(r"proto\shell\open\command").unwrap();
        store.create_key(r"proto\DefaultIcon").unwrap();
        store.set_default_value("proto", "URL:proto Protocol").unwrap();
        store.set_value("proto", Some("URL Protocol"), "").unwrap();
        store
            .set_default_value(r"proto\shell\open\command", "\"a.exe\" \"%1\"")
            .unwrap();
        store
            .set_stored_value(
                r"proto\DefaultIcon",
                None,
                &StoredValue::Raw {
                    kind: 2,
                    data: b"%SystemRoot%\\icon.ico\0".to_vec(),
                },
            )
            .unwrap();
        store
    }

    #[test]
    fn test_delete_tree_removes_subtree_only() {
        let mut store = sample_store();
        store.create_key("other").unwrap();

        delete_tree(&mut store, "proto").unwrap();

        assert!(!store.key_exists("proto").unwrap());
        assert!(!store.key_exists(r"proto\shell").unwrap());
        assert!(store.key_exists("other").unwrap());
    }

    #[test]
    fn test_delete_tree_goes_leaf_first() {
        let mut store = sample_store();
        delete_tree(&mut store, "proto").unwrap();

        let deleted = store.deleted_keys();
        let pos = |p: &str| deleted.iter().position(|d| d == p).unwrap();
        assert!(pos(r"proto\shell\open\command") < pos(r"proto\shell\open"));
        assert!(pos(r"proto\shell\open") < pos(r"proto\shell"));
        assert!(pos(r"proto\shell") < pos("proto"));
        assert_eq!(deleted.last().map(String::as_str), Some("proto"));
    }

    #[test]
    fn test_snapshot_missing_key() {
        let store = MemoryStore::new();
        assert!(snapshot(&store, "proto").unwrap().is_none());
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut store = sample_store();
        let snap = snapshot(&store, "proto").unwrap().unwrap();
        let before = store.clone();

        delete_tree(&mut store, "proto").unwrap();
        restore(&mut store, &snap).unwrap();

        assert!(store.same_contents(&before));
    }

    #[test]
    fn test_snapshot_keeps_non_string_values() {
        let store = sample_store();
        let snap = snapshot(&store, "proto").unwrap().unwrap();
        let icon = snap
            .children
            .iter()
            .find(|c| c.path == r"proto\DefaultIcon")
            .unwrap();
        assert!(matches!(
            icon.values.as_slice(),
            [(name, StoredValue::Raw { kind: 2, .. })] if name.is_empty()
        ));
    }
}
