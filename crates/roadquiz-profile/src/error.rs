//! Profile error types.
//!
//! Store operations return `anyhow::Result`; validation failures are
//! wrapped `ProfileError` values so callers can downcast and show a
//! friendly message instead of a storage error.

use thiserror::Error;

/// Errors from registration, login, and session handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// A required field was left empty.
    #[error("fill in all required fields")]
    MissingFields,

    /// Username outside the allowed length.
    #[error("username must be between {min} and {max} characters, got {len}")]
    UsernameLength { len: usize, min: usize, max: usize },

    /// Password shorter than the minimum.
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// The terms of use were not accepted.
    #[error("you must accept the terms of use")]
    TermsNotAccepted,

    /// Another user already has this name (case-insensitive).
    #[error("user '{0}' already exists")]
    UsernameTaken(String),

    /// Unknown user or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The operation needs a logged-in user.
    #[error("not logged in")]
    NotLoggedIn,
}
