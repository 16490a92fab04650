//! Cryptographic primitives: password hashing and token signing

pub mod jwt;
pub mod password;

pub use jwt::{bearer_token, IssuedToken, JwtConfig, JwtService, TokenClaims};
pub use password::{hash_password, verify_password, PasswordHasher};
