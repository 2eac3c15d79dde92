//! Login form primitives.
//!
//! Only required-field and format checks happen on the client; every
//! business rule (account state, credential matching) stays server-side and
//! surfaces through the API error taxonomy instead.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when the login form values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email lacks the minimal `local@domain` shape.
    MalformedEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email must contain a domain part"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Validated login credentials submitted to a login endpoint.
///
/// ## Invariants
/// - `email` is trimmed and must contain an `@` with text on both sides.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use client::domain::credentials::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" contact@ecole.fr ", "secret").unwrap();
/// assert_eq!(creds.email(), "contact@ecole.fr");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(CredentialsError::EmptyEmail);
        }

        let has_addr_shape = normalized
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !has_addr_shape {
            return Err(CredentialsError::MalformedEmail);
        }

        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string sent as the login identifier.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
