//! # User authentication service
//!
//! Issues, validates and manages the lifetime of credentials for a
//! user-account service: password policy, bcrypt hashing, stateless JWT
//! issuance and verification.
//!
//! ## Architecture
//!
//! - **domain**: user entity, DTOs and the store trait
//! - **shared**: credential policy checks
//! - **application**: `UserService` orchestrating the use-cases
//! - **infrastructure**: crypto (bcrypt, JWT), SeaORM and in-memory stores
//! - **interfaces**: axum HTTP routes and bearer-token middleware
//! - **support**: error types

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;
pub mod support;

pub use config::{default_config_path, AppConfig};

pub use application::UserService;
pub use infrastructure::{init_database, DatabaseConfig, InMemoryUserRepository};
pub use interfaces::http::{create_api_router, AppState};
