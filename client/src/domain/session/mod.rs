//! Session lifecycle for the three account families.

mod controller;
mod role_profile;
mod route_intent;

pub use controller::{AuthExpiryHook, SessionController, SessionState};
pub use role_profile::{AdminProfile, InstructorProfile, RoleProfile, SchoolProfile};
pub use route_intent::{RouteIntent, RouteIntents, RouteReason};
