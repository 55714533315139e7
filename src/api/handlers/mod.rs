//! API handlers for Vestibule.
//!
//! `auth` holds the credential flows forwarded to the identity provider;
//! `health` reports whether that provider is reachable.

pub mod auth;
pub mod health;
