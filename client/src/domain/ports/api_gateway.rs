//! Port for reaching the marketplace HTTP API.
//!
//! Every resource synchroniser and the session controllers talk to the
//! server exclusively through this trait, so status classification and
//! session-cookie handling live in one adapter instead of being repeated
//! per call site.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Failure taxonomy shared by every API call.
    ///
    /// Variants carrying a `message` field hold the server-provided text
    /// verbatim where one was present, so interfaces can surface it
    /// unchanged.
    pub enum ApiError {
        /// 401: the session is missing or expired.
        Auth { message: String } => "authentication rejected: {message}",
        /// 403: signed in but not allowed (e.g. instructor pending moderation).
        Forbidden { message: String } => "access denied: {message}",
        /// 400/422 and other client-side rejections with field-level detail.
        Validation { message: String } => "request rejected by validation: {message}",
        /// 404: the addressed resource does not exist.
        NotFound { message: String } => "resource not found: {message}",
        /// HTTP success but the response envelope reported `success: false`.
        Rejected { message: String } => "server declined the request: {message}",
        /// 5xx family.
        Server { status: u16, message: String } => "server error (status {status}): {message}",
        /// Connection-level failure before any status was received.
        Network { message: String } => "network transport failed: {message}",
        /// The request deadline elapsed.
        Timeout { message: String } => "request timed out: {message}",
        /// The reply body was not the JSON shape the caller expected.
        Decode { message: String } => "response decoding failed: {message}",
    }
}

impl ApiError {
    /// True when retrying the same request later could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::Server { .. }
        )
    }

    /// True when the session must be re-established before anything else.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Server-authored message, for the variants that carry one verbatim.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Auth { message }
            | Self::Forbidden { message }
            | Self::Validation { message }
            | Self::NotFound { message }
            | Self::Rejected { message } => Some(message.as_str()),
            Self::Server { .. } | Self::Network { .. } | Self::Timeout { .. } | Self::Decode { .. } => {
                None
            }
        }
    }
}

/// Port abstraction over the marketplace HTTP API.
///
/// Paths are given relative to the resolved origin (e.g. `"/api/..."`).
/// Implementations own base-URL resolution, the session cookie, and the
/// mapping from transport or status failures to [`ApiError`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Fetch a JSON document.
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    /// Send a JSON document, returning the reply body.
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// Replace a resource with a JSON document.
    async fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// Delete a resource, optionally identifying it through a JSON body.
    ///
    /// The body is taken by value so the trait stays mockable; callers
    /// hand the document over rather than lending it.
    async fn delete(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError>;

    /// Fetch a binary document, such as an invoice PDF.
    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError>;
}

/// Fixture gateway answering every call with an empty success envelope.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureApiGateway;

fn empty_success() -> Value {
    serde_json::json!({ "success": true, "data": null })
}

#[async_trait]
impl ApiGateway for FixtureApiGateway {
    async fn get(&self, _path: &str) -> Result<Value, ApiError> {
        Ok(empty_success())
    }

    async fn post(&self, _path: &str, _body: &Value) -> Result<Value, ApiError> {
        Ok(empty_success())
    }

    async fn put(&self, _path: &str, _body: &Value) -> Result<Value, ApiError> {
        Ok(empty_success())
    }

    async fn delete(&self, _path: &str, _body: Option<Value>) -> Result<Value, ApiError> {
        Ok(empty_success())
    }

    async fn get_bytes(&self, _path: &str) -> Result<Vec<u8>, ApiError> {
        Ok(Vec::new())
    }
}
