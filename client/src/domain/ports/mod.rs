//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod api_gateway;
mod identity_store;

#[cfg(test)]
pub use api_gateway::MockApiGateway;
pub use api_gateway::{ApiError, ApiGateway, FixtureApiGateway};
#[cfg(test)]
pub use identity_store::MockIdentityStore;
pub use identity_store::{FixtureIdentityStore, IdentityStore, IdentityStoreError};
