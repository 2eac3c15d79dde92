//! Base URL resolution for the HTTP gateway.
//!
//! Deployments are reached three ways: an explicitly configured URL in
//! development, the serving origin when the app is exposed through a
//! tunnel, and the production host otherwise. Local origins are never
//! used as an API base; they fall through to the production default.

use thiserror::Error;
use url::{Host, Url};

/// API origin used when nothing better is configured.
pub const PRODUCTION_BASE_URL: &str = "https://app.marketplace-edu.fr";

const LOCALHOST: &str = "localhost";

/// Rejection of a configured base URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BaseUrlError {
    #[error("invalid base URL {value:?}: {message}")]
    Invalid { value: String, message: String },
}

impl BaseUrlError {
    fn invalid(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            value: value.into(),
            message: message.into(),
        }
    }
}

/// Resolve the effective API base URL.
///
/// An explicit value always wins and must parse; a misconfiguration
/// should surface rather than silently reach production. The serving
/// origin is used next unless it is local or unparsable. Everything else
/// falls back to [`PRODUCTION_BASE_URL`].
pub fn resolve_base_url(explicit: Option<&str>, origin: Option<&str>) -> Result<Url, BaseUrlError> {
    if let Some(value) = explicit.map(str::trim).filter(|value| !value.is_empty()) {
        return Url::parse(value).map_err(|error| BaseUrlError::invalid(value, error.to_string()));
    }
    if let Some(value) = origin.map(str::trim).filter(|value| !value.is_empty()) {
        match Url::parse(value) {
            Ok(parsed) if !is_local_origin(&parsed) => return Ok(parsed),
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(origin = value, "ignoring unparsable origin: {error}");
            }
        }
    }
    Url::parse(PRODUCTION_BASE_URL)
        .map_err(|error| BaseUrlError::invalid(PRODUCTION_BASE_URL, error.to_string()))
}

fn is_local_origin(origin: &Url) -> bool {
    match origin.host() {
        Some(Host::Domain(host)) => host.eq_ignore_ascii_case(LOCALHOST),
        Some(Host::Ipv4(address)) => address.is_loopback(),
        Some(Host::Ipv6(address)) => address.is_loopback(),
        None => true,
    }
}
