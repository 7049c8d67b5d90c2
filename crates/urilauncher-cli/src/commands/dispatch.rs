//! Handle a URI received from the shell.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use urilauncher_core::{
    ActionMap, DispatchOutcome, Dispatcher, LauncherConfig, SystemLauncher, default_notifier,
};

pub fn run(config: &LauncherConfig, uri: &str) -> Result<()> {
    println!("Launched with URI: {uri}");

    let actions = ActionMap::from_entries(&config.actions)?;
    let dispatcher = Dispatcher::new(actions, SystemLauncher, default_notifier());

    match dispatcher.dispatch(uri) {
        DispatchOutcome::Launched(action) => println!("Started: {action}"),
        // Already reported through the notifier
        DispatchOutcome::LaunchFailed(_) | DispatchOutcome::Unmatched => {}
    }

    hold(config.hold_seconds);
    Ok(())
}

/// Keep the console window open long enough to read.
fn hold(seconds: u64) {
    if seconds == 0 {
        return;
    }
    println!("This window will close in {seconds} seconds...");
    thread::sleep(Duration::from_secs(seconds));
}
