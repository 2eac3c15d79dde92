//! HTTP gateway adapter.

mod base_url;
mod gateway;

pub use base_url::{BaseUrlError, PRODUCTION_BASE_URL, resolve_base_url};
pub use gateway::HttpGateway;
