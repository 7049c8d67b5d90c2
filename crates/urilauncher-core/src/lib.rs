//! # urilauncher-core
//!
//! Core library for the `andrejlauncher://` URI scheme launcher.
//!
//! This crate provides:
//! - Idempotent registration of the scheme handler (`registrar`)
//! - Exact-match dispatch of received URIs to local actions (`dispatch`)
//! - A registry-like `ConfigStore` abstraction with an in-memory implementation
//! - Fail-safe process elevation checks
//! - TOML configuration of the scheme and the action table

pub mod config;
pub mod dispatch;
pub mod error;
pub mod privilege;
pub mod registrar;
pub mod store;

pub use config::{ActionEntry, LauncherConfig, Scheme, builtin_actions, default_config_path};
pub use dispatch::{
    Action, ActionMap, ConsoleNotifier, DispatchOutcome, Dispatcher, Launcher, Notifier,
    SystemLauncher, default_notifier,
};
pub use error::{Error, Result};
pub use privilege::{FixedProbe, PrivilegeProbe, check_elevated};
pub use registrar::{
    CommandTemplate, RegisterOutcome, Registrar, RegistrationPlan, register_current_platform,
};
pub use store::{ConfigStore, MemoryStore, StoredValue};
