//! Client configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::http::{BaseUrlError, resolve_base_url};

const DEFAULT_STORAGE_DIR: &str = ".marketplace-session";

/// Configuration values controlling the gateway and identity storage.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct ClientConfig {
    /// Explicit API base URL, overriding origin sniffing.
    pub api_base_url: Option<String>,
    /// Origin the app is served from, consulted when no explicit URL is set.
    pub origin: Option<String>,
    /// Request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Optional directory override for persisted identity records.
    pub storage_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Resolve the effective API base URL from the configured sources.
    ///
    /// # Errors
    ///
    /// Returns an error when an explicitly configured URL does not parse.
    pub fn resolved_base_url(&self) -> Result<Url, BaseUrlError> {
        resolve_base_url(self.api_base_url.as_deref(), self.origin.as_deref())
    }

    /// Return the request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Return the configured storage directory, falling back to the default.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }
}
