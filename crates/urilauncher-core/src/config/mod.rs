//! Launcher configuration.
//!
//! This module contains:
//! - `Scheme` - the validated URI scheme name
//! - `LauncherConfig` - settings loaded from `config.toml`
//! - `ActionEntry` - one row of the URI → action table
//! - Display timing constants

mod scheme;

pub use scheme::*;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::dispatch::Action;
use crate::error::{Error, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "LAUNCHER_CONFIG";

const CONFIG_DIR_NAME: &str = "andrejlauncher";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Console display timing.
pub mod display {
    /// Seconds the console stays open after handling a URI.
    pub const DEFAULT_HOLD_SECONDS: u64 = 5;
}

/// One configured URI and what it does.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionEntry {
    /// Full URI, matched byte-for-byte.
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Program or executable path to start.
    #[serde(default)]
    pub launch: Option<PathBuf>,
    /// URL or document handed to the default handler.
    #[serde(default)]
    pub open: Option<String>,
}

impl ActionEntry {
    pub fn launch(uri: &str, name: &str, program: &str) -> Self {
        Self {
            uri: uri.to_string(),
            name: name.to_string(),
            description: None,
            launch: Some(PathBuf::from(program)),
            open: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Resolve the entry into exactly one action.
    pub fn action(&self) -> Result<Action> {
        match (&self.launch, &self.open) {
            (Some(path), None) => Ok(Action::Launch(path.clone())),
            (None, Some(target)) => Ok(Action::Open(target.clone())),
            (Some(_), Some(_)) => Err(Error::ConfigParseError(format!(
                "action '{}' sets both 'launch' and 'open'",
                self.uri
            ))),
            (None, None) => Err(Error::ConfigParseError(format!(
                "action '{}' needs either 'launch' or 'open'",
                self.uri
            ))),
        }
    }
}

/// Shortcuts available without a config file, under `scheme`.
///
/// Each target is reachable both as `scheme://name/` and as `scheme://name`,
/// the form the dashboard shortcut catalogue links to.
pub fn builtin_actions(scheme: &Scheme) -> Vec<ActionEntry> {
    const SHORTCUTS: [(&str, &str, &str, &str); 3] = [
        ("calculator", "Calculator", "calc.exe", "Launch Windows Calculator"),
        ("explorer", "Windows Explorer", "explorer.exe", "Open File Explorer"),
        ("terminal", "Windows Terminal", "wt.exe", "Launch Windows Terminal"),
    ];

    let prefix = scheme.uri_prefix();
    SHORTCUTS
        .iter()
        .flat_map(|(host, name, program, description)| {
            [format!("{prefix}{host}/"), format!("{prefix}{host}")]
                .map(|uri| ActionEntry::launch(&uri, name, program).with_description(description))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    scheme: Option<String>,
    #[serde(default = "default_force_refresh")]
    force_refresh: bool,
    #[serde(default = "default_hold_seconds")]
    hold_seconds: u64,
    #[serde(default)]
    entry_point: Option<PathBuf>,
    #[serde(default)]
    actions: Option<Vec<ActionEntry>>,
}

fn default_force_refresh() -> bool {
    true
}

fn default_hold_seconds() -> u64 {
    display::DEFAULT_HOLD_SECONDS
}

#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub scheme: Scheme,
    /// Delete and recreate an existing registration instead of leaving it alone.
    pub force_refresh: bool,
    pub hold_seconds: u64,
    /// Script placed between the executable and `"%1"` in the handler command.
    pub entry_point: Option<PathBuf>,
    pub actions: Vec<ActionEntry>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::default(),
            force_refresh: default_force_refresh(),
            hold_seconds: display::DEFAULT_HOLD_SECONDS,
            entry_point: None,
            actions: builtin_actions(&Scheme::default()),
        }
    }
}

impl LauncherConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => {
                info!("Loaded config from {}", path.display());
                Self::parse(&content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load from the default location (see [`default_config_path`]).
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(content).map_err(|e| Error::ConfigParseError(e.to_string()))?;

        let scheme = match raw.scheme.as_deref() {
            Some(name) => Scheme::new(name)?,
            None => Scheme::default(),
        };

        let actions = raw
            .actions
            .unwrap_or_else(|| builtin_actions(&scheme));
        let prefix = scheme.uri_prefix();
        for entry in &actions {
            entry.action()?;
            if !entry.uri.starts_with(&prefix) {
                warn!(
                    "Action '{}' does not use the '{prefix}' scheme and can never be dispatched",
                    entry.uri
                );
            }
        }

        Ok(Self {
            scheme,
            force_refresh: raw.force_refresh,
            hold_seconds: raw.hold_seconds,
            entry_point: raw.entry_point,
            actions,
        })
    }
}

/// `$LAUNCHER_CONFIG`, else `<config dir>/andrejlauncher/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
