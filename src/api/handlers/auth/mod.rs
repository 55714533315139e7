//! Auth handlers and supporting modules.
//!
//! Every flow follows the same shape: validate the payload, make exactly one
//! call to the identity provider, and answer with an [`ActionResponse`].
//!
//! ## Status codes
//!
//! - `200` on success.
//! - `400` when validation fails; `field_errors` lists the violated rules.
//! - The provider's own `4xx` status when it rejects the request, with its
//!   message (e.g. `Invalid login credentials`). Anything else it reports is
//!   mapped to `400`.
//! - `502` for transport failures, unreadable provider responses and panics
//!   in the provider client. These carry a generic message only.
//!
//! ## Redirects
//!
//! Confirmation and OAuth callbacks land on `<site>/auth/callback`, password
//! reset links on `<site>/auth/reset-password`. `<site>` is read from
//! `VESTIBULE_SITE_URL` on each request, falling back to the configured value.

mod boundary;
pub mod oauth;
pub mod password;
pub mod schema;
pub mod session;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
mod state;
pub mod types;
mod utils;

pub use state::{AuthConfig, AuthState};
pub use types::ActionResponse;
pub use utils::SITE_URL_ENV;

#[cfg(test)]
pub(crate) mod test_support;
