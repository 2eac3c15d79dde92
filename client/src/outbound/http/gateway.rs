//! Reqwest-backed API gateway.
//!
//! This adapter owns transport details only: request dispatch and
//! correlation, timeout and HTTP error mapping, JSON decoding, and the
//! 401 interception every session controller relies on.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::{ApiError, ApiGateway};
use crate::domain::session::AuthExpiryHook;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// API gateway performing HTTP requests against one resolved base URL.
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    hooks: RwLock<Vec<AuthExpiryHook>>,
}

impl HttpGateway {
    /// Build a gateway with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        // Admin sessions ride a server cookie.
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url,
            hooks: RwLock::new(Vec::new()),
        })
    }

    /// Register a hook fired on every 401 response.
    pub fn register_auth_expiry_hook(&self, hook: AuthExpiryHook) {
        match self.hooks.write() {
            Ok(mut hooks) => hooks.push(hook),
            Err(poisoned) => poisoned.into_inner().push(hook),
        }
    }

    fn notify_auth_expiry(&self) {
        let hooks = match self.hooks.read() {
            Ok(hooks) => hooks.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        for hook in hooks {
            hook();
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        // Concatenation rather than RFC resolution keeps any base path
        // prefix, matching how deployments mount the API.
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined)
            .map_err(|error| ApiError::validation(format!("invalid request path {path:?}: {error}")))
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(path)?;
        let request_id = Uuid::new_v4();
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(body) = body.filter(|body| !body.is_null()) {
            request = request.json(body);
        }
        tracing::debug!(request_id = %request_id, method = %method, path, "dispatching API request");

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if status == StatusCode::UNAUTHORIZED {
            self.notify_auth_expiry();
        }
        if !status.is_success() {
            return Err(classify_status(status, bytes.as_ref()));
        }
        Ok(bytes.to_vec())
    }

    async fn dispatch_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let bytes = self.dispatch(method, path, body).await?;
        decode_body(&bytes)
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.dispatch_json(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.dispatch_json(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.dispatch_json(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.dispatch_json(Method::DELETE, path, body.as_ref()).await
    }

    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        self.dispatch(Method::GET, path, None).await
    }
}

fn decode_body(bytes: &[u8]) -> Result<Value, ApiError> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|error| ApiError::decode(format!("invalid JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::timeout(error.to_string())
    } else {
        ApiError::network(error.to_string())
    }
}

fn classify_status(status: StatusCode, body: &[u8]) -> ApiError {
    let message = envelope_message(body).unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            preview
        }
    });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::auth(message),
        StatusCode::FORBIDDEN => ApiError::forbidden(message),
        StatusCode::NOT_FOUND => ApiError::not_found(message),
        _ if status.is_client_error() => ApiError::validation(message),
        _ => ApiError::server(status.as_u16(), message),
    }
}

/// Server refusals usually carry `{success: false, message}` even on
/// error statuses; surface that message verbatim when present.
fn envelope_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")?
        .as_str()
        .map(str::to_owned)
        .filter(|message| !message.is_empty())
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
