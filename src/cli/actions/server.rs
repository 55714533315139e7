use crate::{
    api::{self, AuthConfig, AuthState},
    cli::globals::GlobalArgs,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub site_url: String,
    pub globals: GlobalArgs,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the provider client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);
    debug!("Global args: {:?}", args.globals);

    let provider = args
        .globals
        .identity_provider()
        .context("Failed to build identity provider client")?;

    let auth_state = Arc::new(AuthState::new(
        AuthConfig::new(args.site_url),
        Arc::new(provider),
    ));

    api::new(args.port, auth_state).await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("site_url", args.site_url.clone()),
        ("provider_url", args.globals.provider_url.clone()),
        (
            "provider_timeout",
            format!("{}s", args.globals.provider_timeout.as_secs()),
        ),
    ];
    info!(
        "{} {} - {}\n\nStartup configuration:\n{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH),
        startup_table(&entries)
    );
}

fn startup_table(entries: &[(&str, String)]) -> String {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|(key, value)| {
            let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
            format!("  {key}:{padding} {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn short_commit(hash: &str) -> String {
    hash.trim().chars().take(7).collect()
}
