//! Identity module: user management & authentication
//!
//! Contains the `UserService` which orchestrates all user-related
//! use-cases: registration, login, token validation, updates and deletion.

pub mod authenticator;
pub mod service;

pub use authenticator::{Authenticator, RepositoryAuthenticator};
pub use service::{messages, UserService};
