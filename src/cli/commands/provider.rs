//! Identity provider connection arguments.

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use url::Url;

pub const ARG_PROVIDER_URL: &str = "provider-url";
pub const ARG_PROVIDER_ANON_KEY: &str = "provider-anon-key";
pub const ARG_PROVIDER_TIMEOUT_SECONDS: &str = "provider-timeout-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PROVIDER_URL)
                .long(ARG_PROVIDER_URL)
                .help("Identity provider project URL, e.g. https://<project>.supabase.co")
                .env("VESTIBULE_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_ANON_KEY)
                .long(ARG_PROVIDER_ANON_KEY)
                .help("Public (anon) API key sent with every provider request")
                .env("VESTIBULE_PROVIDER_ANON_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_TIMEOUT_SECONDS)
                .long(ARG_PROVIDER_TIMEOUT_SECONDS)
                .help("Timeout in seconds for each provider request")
                .env("VESTIBULE_PROVIDER_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

pub struct Options {
    pub url: String,
    pub anon_key: SecretString,
    pub timeout_seconds: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing or the URL is not an
    /// `http(s)` URL with a host.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<String>(ARG_PROVIDER_URL)
            .cloned()
            .context("missing required argument: --provider-url")?;
        validate_provider_url(&url)?;

        let anon_key = matches
            .get_one::<String>(ARG_PROVIDER_ANON_KEY)
            .map(|key| SecretString::from(key.as_str()))
            .context("missing required argument: --provider-anon-key")?;

        let timeout_seconds = matches
            .get_one::<u64>(ARG_PROVIDER_TIMEOUT_SECONDS)
            .copied()
            .unwrap_or(10);

        Ok(Self {
            url,
            anon_key,
            timeout_seconds,
        })
    }
}

fn validate_provider_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("invalid provider URL: {url}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!("provider URL must use http or https: {url}"));
    }
    if parsed.host_str().is_none() {
        return Err(anyhow!("provider URL must include a host: {url}"));
    }
    Ok(())
}
