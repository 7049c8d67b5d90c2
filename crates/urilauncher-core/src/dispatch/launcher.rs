//! Starting matched actions.

use tracing::debug;

use super::Action;
use crate::error::{Error, Result};

/// Trait for performing an action on the host.
pub trait Launcher {
    fn launch(&self, action: &Action) -> Result<()>;
}

/// Uses the OS shell (`ShellExecute` on Windows) via the `open` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, action: &Action) -> Result<()> {
        debug!("Starting {action}");
        let result = match action {
            Action::Launch(path) => open::that_detached(path),
            Action::Open(target) => open::that_detached(target),
        };
        result.map_err(|e| Error::LaunchFailed {
            target: action.target(),
            message: e.to_string(),
        })
    }
}
