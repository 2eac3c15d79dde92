//! Domain logic, free of transport and storage concerns.
//!
//! Everything here talks to the outside world through the traits in
//! [`ports`]; the adapters under [`crate::outbound`] supply the real
//! implementations.

pub mod credentials;
pub mod display;
pub mod envelope;
pub mod identity;
pub mod ports;
pub mod session;
pub mod sync;

pub use credentials::{CredentialsError, LoginCredentials};
pub use identity::{AdminIdentity, InstructorIdentity, Role, SchoolIdentity, StorageKey};
