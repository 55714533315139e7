//! # Vestibule (Authentication Gateway)
//!
//! `vestibule` is a thin authentication gateway in front of a managed identity
//! provider speaking the `GoTrue` REST API. It validates credentials submitted by
//! clients and forwards them to the provider; it never verifies passwords,
//! issues tokens or stores sessions itself.
//!
//! ## Flows
//!
//! Sign up, sign in, OAuth sign-in, forgot password, reset password, sign out
//! and session retrieval. Each flow is a single linear pass:
//!
//! 1. Validate the payload against its schema. Failures short-circuit with a
//!    field-error map and the provider is never contacted.
//! 2. Call the provider once.
//! 3. Shape the outcome into the response envelope
//!    (`success`, `message`, optional `field_errors` and payload).
//!
//! ## Error normalization
//!
//! Recognized provider auth errors surface their own message. Transport
//! failures, undecodable responses and panics inside the provider client are
//! caught at the handler boundary and replaced by a generic message.

pub mod api;
pub mod cli;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
