mod cli;
mod commands;

use anyhow::Result;
use cli::{Args, Mode};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use urilauncher_core::LauncherConfig;

fn main() -> Result<()> {
    let args = Args::parse_literal(std::env::args_os());

    // Diagnostics are opt-in via RUST_LOG; status output goes to the console
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("urilauncher_cli=warn,urilauncher_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match LauncherConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            LauncherConfig::default()
        }
    };

    match args.mode() {
        Mode::Register => commands::register::run(&config),
        Mode::Dispatch(uri) => commands::dispatch::run(&config, &uri),
    }
}
