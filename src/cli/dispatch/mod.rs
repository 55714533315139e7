//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action to run, currently always the API
//! server with its provider and site configuration.

use crate::cli::{
    actions::{server::Args, Action},
    commands::{provider, ARG_PORT, ARG_SITE_URL},
    globals::GlobalArgs,
};
use anyhow::{Context, Result};
use std::time::Duration;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let site_url = matches
        .get_one::<String>(ARG_SITE_URL)
        .cloned()
        .context("missing required argument: --site-url")?;

    let provider_opts = provider::Options::parse(matches)?;
    let globals = GlobalArgs::new(provider_opts.url, provider_opts.anon_key)
        .with_timeout(Duration::from_secs(provider_opts.timeout_seconds));

    Ok(Action::Server(Args {
        port,
        site_url,
        globals,
    }))
}
