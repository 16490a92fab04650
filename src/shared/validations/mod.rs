pub mod credentials;

pub use credentials::{validate_password, validate_username, PASSWORD_SYMBOLS};
