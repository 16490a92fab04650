pub mod user;

pub use user::{
    CreateUserDto, Credentials, ReplaceUserDto, UpdateUserDto, User, UserRepositoryInterface,
};

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, DomainResult};
