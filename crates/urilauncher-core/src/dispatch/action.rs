use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use tracing::warn;

use crate::config::ActionEntry;
use crate::error::Result;

/// What a matched URI does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start a program, as double-clicking it would.
    Launch(PathBuf),
    /// Hand a URL or document to its default handler.
    Open(String),
}

impl Action {
    /// The path or URL the action targets.
    pub fn target(&self) -> String {
        match self {
            Action::Launch(path) => path.display().to_string(),
            Action::Open(target) => target.clone(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Launch(path) => write!(f, "launch {}", path.display()),
            Action::Open(target) => write!(f, "open {target}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedAction {
    pub name: String,
    pub action: Action,
}

/// Immutable URI → action table. Keys match byte-for-byte.
#[derive(Debug, Clone, Default)]
pub struct ActionMap {
    entries: HashMap<String, MappedAction>,
}

impl ActionMap {
    /// Build from config entries. A repeated URI replaces the earlier entry.
    pub fn from_entries(entries: &[ActionEntry]) -> Result<Self> {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            let mapped = MappedAction {
                name: entry.name.clone(),
                action: entry.action()?,
            };
            if map.insert(entry.uri.clone(), mapped).is_some() {
                warn!("Duplicate action for '{}', keeping the last one", entry.uri);
            }
        }
        Ok(Self { entries: map })
    }

    pub fn get(&self, uri: &str) -> Option<&MappedAction> {
        self.entries.get(uri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URIs in sorted order.
    pub fn uris(&self) -> Vec<&str> {
        let mut uris: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        uris.sort_unstable();
        uris
    }
}
