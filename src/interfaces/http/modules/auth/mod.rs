//! Authentication module: register, login, token validation, self-service update

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
