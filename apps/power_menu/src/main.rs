use anyhow::Result;
use clap::Parser;
use tracing::info;

mod config;
mod event_loop;
mod host;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "power_menu", about = "Interactive power menu session driver")]
struct Args {
    /// Path to the TOML settings file.
    #[arg(long, default_value = "power_menu.toml")]
    config: String,
    /// Start with the lock screen considered active.
    #[arg(long)]
    keyguard: bool,
    /// Start before device setup has completed.
    #[arg(long)]
    unprovisioned: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let settings = load_settings(&args.config);
    info!(
        config = %args.config,
        actions = settings.action_keys.len(),
        "starting power menu driver"
    );

    event_loop::run(settings, args.keyguard, !args.unprovisioned)
}
