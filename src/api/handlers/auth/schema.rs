//! Declarative input schemas for the auth flows.
//!
//! Validators are pure: no I/O, no panics. They either return the normalized
//! value handed to the provider or a [`FieldErrors`] map listing every rule a
//! field violated, in rule order.
//!
//! The confirmation check always runs and reports under `confirmPassword`, so
//! a mismatch shows up alongside unrelated field errors.

use super::types::{
    ForgotPasswordRequest, OAuthRequest, ResetPasswordRequest, SignInRequest, SignUpRequest,
};
use super::utils::normalize_email;
use crate::provider::{Credentials, OAuthProvider};
use regex::Regex;
use secrecy::SecretString;
use serde::Serialize;
use std::{collections::BTreeMap, sync::LazyLock};

pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_CONFIRM_PASSWORD: &str = "confirmPassword";
pub const FIELD_PROVIDER: &str = "provider";

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const PASSWORD_SPECIAL_CHARACTERS: &str = "@$!%*?&";

pub const INVALID_EMAIL: &str = "Invalid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORD_NEEDS_UPPERCASE: &str = "Password must contain at least one uppercase letter";
pub const PASSWORD_NEEDS_LOWERCASE: &str = "Password must contain at least one lowercase letter";
pub const PASSWORD_NEEDS_NUMBER: &str = "Password must contain at least one number";
pub const PASSWORD_NEEDS_SPECIAL: &str =
    "Password must contain at least one special character (@$!%*?&)";
pub const PASSWORD_MISMATCH: &str = "Password don't match";
pub const UNSUPPORTED_PROVIDER: &str = "Unsupported OAuth provider";

// Dot-atom local part and a dotted domain ending in an alphabetic TLD.
static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .ok()
});

/// Field name to the ordered list of rule messages it violated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Syntactic email check on already-normalized input.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    EMAIL_REGEX
        .as_ref()
        .is_some_and(|regex| regex.is_match(email))
}

/// Rules for passwords chosen by the user (sign-up, reset), in report order.
#[must_use]
pub fn strong_password_violations(password: &str) -> Vec<&'static str> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(PASSWORD_TOO_SHORT);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(PASSWORD_NEEDS_UPPERCASE);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(PASSWORD_NEEDS_LOWERCASE);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PASSWORD_NEEDS_NUMBER);
    }
    if !password
        .chars()
        .any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c))
    {
        violations.push(PASSWORD_NEEDS_SPECIAL);
    }

    violations
}

fn check_email(raw: &str, errors: &mut FieldErrors) -> String {
    let email = normalize_email(raw);
    if !valid_email(&email) {
        errors.push(FIELD_EMAIL, INVALID_EMAIL);
    }
    email
}

fn check_strong_password(password: &str, errors: &mut FieldErrors) {
    for violation in strong_password_violations(password) {
        errors.push(FIELD_PASSWORD, violation);
    }
}

fn check_confirmation(password: &str, confirmation: &str, errors: &mut FieldErrors) {
    if password != confirmation {
        errors.push(FIELD_CONFIRM_PASSWORD, PASSWORD_MISMATCH);
    }
}

/// Sign-up: valid email, strong password, matching confirmation when sent.
///
/// # Errors
/// Returns every violated rule keyed by field.
pub fn validate_sign_up(request: &SignUpRequest) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = check_email(&request.email, &mut errors);
    check_strong_password(&request.password, &mut errors);
    if let Some(confirmation) = &request.confirm_password {
        check_confirmation(&request.password, confirmation, &mut errors);
    }

    errors.into_result(Credentials {
        email,
        password: SecretString::from(request.password.as_str()),
    })
}

/// Sign-in only checks the password length; the provider decides the rest.
///
/// # Errors
/// Returns every violated rule keyed by field.
pub fn validate_sign_in(request: &SignInRequest) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = check_email(&request.email, &mut errors);
    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(FIELD_PASSWORD, PASSWORD_TOO_SHORT);
    }

    errors.into_result(Credentials {
        email,
        password: SecretString::from(request.password.as_str()),
    })
}

/// # Errors
/// Returns an `email` entry when the address is malformed.
pub fn validate_forgot_password(request: &ForgotPasswordRequest) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = check_email(&request.email, &mut errors);
    errors.into_result(email)
}

/// Reset: strong password plus a confirmation that must match.
///
/// # Errors
/// Returns every violated rule keyed by field.
pub fn validate_reset_password(
    request: &ResetPasswordRequest,
) -> Result<SecretString, FieldErrors> {
    let mut errors = FieldErrors::new();

    check_strong_password(&request.password, &mut errors);
    check_confirmation(&request.password, &request.confirm_password, &mut errors);

    errors.into_result(SecretString::from(request.password.as_str()))
}

/// # Errors
/// Returns a `provider` entry when the provider is not supported.
pub fn validate_oauth(request: &OAuthRequest) -> Result<OAuthProvider, FieldErrors> {
    request.provider.parse::<OAuthProvider>().map_err(|_| {
        let mut errors = FieldErrors::new();
        errors.push(FIELD_PROVIDER, UNSUPPORTED_PROVIDER);
        errors
    })
}
