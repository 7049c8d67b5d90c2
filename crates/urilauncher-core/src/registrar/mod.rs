//! URI scheme registration.
//!
//! Writes the handler entries under the classes root:
//!
//! ```text
//! <scheme>                      (default) = "URL:<scheme> Protocol"
//! <scheme>                      "URL Protocol" = ""
//! <scheme>\shell\open\command   (default) = CommandTemplate
//! ```
//!
//! With `force_refresh` an existing registration is deleted leaf-first and
//! recreated so a stale executable path never survives. If the rewrite fails
//! the previous subtree is restored from a snapshot.

mod command;

pub use command::*;

use strum::Display;
use tracing::{debug, info, warn};

use crate::config::{LauncherConfig, Scheme};
use crate::error::{Error, Result};
use crate::privilege::{PrivilegeProbe, check_elevated};
use crate::store::{ConfigStore, KeySnapshot, delete_tree, restore, snapshot};

/// Value name marking a key as a URI handler rather than a file type.
pub const URL_PROTOCOL_VALUE: &str = "URL Protocol";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RegisterOutcome {
    /// No previous registration existed.
    Created,
    /// A previous registration was replaced.
    Refreshed,
    /// Registration existed and `force_refresh` was off; nothing was written.
    AlreadyRegistered,
}

pub struct Registrar<S: ConfigStore, P: PrivilegeProbe> {
    store: S,
    probe: P,
}

impl<S: ConfigStore, P: PrivilegeProbe> Registrar<S, P> {
    pub fn new(store: S, probe: P) -> Self {
        Self { store, probe }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Install or refresh the handler described by `plan`.
    pub fn register(&mut self, plan: &RegistrationPlan) -> Result<RegisterOutcome> {
        self.ensure_elevated(&plan.scheme)?;
        self.install(plan)
    }

    /// Like [`Registrar::register`] for the running executable. Elevation is
    /// checked before any path is resolved.
    pub fn register_current(&mut self, config: &LauncherConfig) -> Result<RegisterOutcome> {
        self.ensure_elevated(&config.scheme)?;
        let plan = RegistrationPlan::current(config)?;
        self.install(&plan)
    }

    fn ensure_elevated(&self, scheme: &Scheme) -> Result<()> {
        if !check_elevated(&self.probe) {
            warn!("Refusing to register '{scheme}': process is not elevated");
            return Err(Error::InsufficientPrivileges);
        }
        Ok(())
    }

    fn install(&mut self, plan: &RegistrationPlan) -> Result<RegisterOutcome> {
        let key = plan.scheme.key_path();
        let previous = snapshot(&self.store, &key)?;

        if previous.is_some() && !plan.force_refresh {
            info!("Scheme '{}' is already registered, leaving it as is", plan.scheme);
            return Ok(RegisterOutcome::AlreadyRegistered);
        }

        if let Err(e) = self.replace(plan, previous.is_some()) {
            self.roll_back(&key, previous.as_ref());
            return Err(e);
        }

        let outcome = if previous.is_some() {
            RegisterOutcome::Refreshed
        } else {
            RegisterOutcome::Created
        };
        info!("Scheme '{}' {}: {}", plan.scheme, outcome, plan.command);
        Ok(outcome)
    }

    fn replace(&mut self, plan: &RegistrationPlan, exists: bool) -> Result<()> {
        let key = plan.scheme.key_path();
        if exists {
            debug!("Removing existing registration under {key}");
            delete_tree(&mut self.store, &key)?;
        }

        self.store.create_key(&key)?;
        self.store
            .set_default_value(&key, &plan.scheme.protocol_label())?;
        self.store.set_value(&key, Some(URL_PROTOCOL_VALUE), "")?;

        let command_key = plan.scheme.command_key_path();
        self.store.create_key(&command_key)?;
        self.store
            .set_default_value(&command_key, plan.command.as_str())?;
        Ok(())
    }

    /// Best-effort: clear whatever was half-written and put the old subtree back.
    fn roll_back(&mut self, key: &str, previous: Option<&KeySnapshot>) {
        if self.store.key_exists(key).unwrap_or(false) {
            if let Err(e) = delete_tree(&mut self.store, key) {
                warn!("Failed to clear partial registration under {key}: {e}");
                return;
            }
        }
        if let Some(snap) = previous {
            match restore(&mut self.store, snap) {
                Ok(()) => info!("Restored previous registration under {key}"),
                Err(e) => warn!("Failed to restore previous registration under {key}: {e}"),
            }
        }
    }
}

/// Register the running executable with the OS, if the OS is supported.
///
/// Non-Windows targets return `UnsupportedPlatform` without touching any store.
#[cfg(target_os = "windows")]
pub fn register_current_platform(config: &LauncherConfig) -> Result<RegisterOutcome> {
    use crate::privilege::TokenElevationProbe;
    use crate::store::WindowsRegistry;

    Registrar::new(WindowsRegistry::classes_root(), TokenElevationProbe).register_current(config)
}

#[cfg(not(target_os = "windows"))]
pub fn register_current_platform(_config: &LauncherConfig) -> Result<RegisterOutcome> {
    Err(Error::UnsupportedPlatform(std::env::consts::OS.to_string()))
}
