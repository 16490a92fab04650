use thiserror::Error;

/// Errors surfaced by the authentication core.
///
/// Display strings are the human-readable messages returned to HTTP clients,
/// except for `Internal`, which is logged and replaced by a generic message.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidFormat(String),

    #[error("{0}")]
    WeakPassword(String),

    #[error("{0}")]
    DuplicateUsername(String),

    #[error("{entity} not found for this {field}: {value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed token")]
    Malformed,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn user_not_found(id: i64) -> Self {
        DomainError::NotFound {
            entity: "User",
            field: "ID",
            value: id.to_string(),
        }
    }

    pub fn duplicate_username() -> Self {
        DomainError::DuplicateUsername("Username already exists.".into())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
