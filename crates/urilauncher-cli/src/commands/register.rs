//! Register the launcher as the handler for its URI scheme.

use anyhow::{Context, Result};
use tracing::info;
use urilauncher_core::{Error, LauncherConfig, RegisterOutcome, register_current_platform};

pub fn run(config: &LauncherConfig) -> Result<()> {
    let scheme = &config.scheme;
    println!("No URI argument detected. Running registration process...");

    match register_current_platform(config) {
        Ok(RegisterOutcome::AlreadyRegistered) => {
            println!("The '{scheme}://' URI scheme is already registered. No action needed.");
            Ok(())
        }
        Ok(outcome) => {
            info!("Registration outcome: {outcome}");
            println!("Successfully registered the '{scheme}://' URI scheme.");
            println!("You can now test it by opening a link like '{scheme}://test-data'");
            Ok(())
        }
        Err(Error::UnsupportedPlatform(os)) => {
            println!("URI scheme registration is designed for Windows (running on {os}).");
            println!(
                "On macOS or Linux you need to configure the handler manually \
                 (e.g. via an Info.plist or a .desktop file)."
            );
            Ok(())
        }
        Err(e @ Error::InsufficientPrivileges) => {
            eprintln!(
                "Please re-run this program as an administrator to register the \
                 '{scheme}' URI scheme."
            );
            Err(e).context("Registration failed")
        }
        Err(e) => Err(e).context("Registration failed"),
    }
}
