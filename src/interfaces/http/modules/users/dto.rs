//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ReplaceUserDto, User};

/// User API representation. The password hash never leaves the service.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub username: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            username: u.username,
        }
    }
}

/// Administrative create request
#[derive(Debug, Deserialize, ToSchema)]
pub struct InsertUserRequest {
    #[serde(default)]
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Administrative full update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceUserRequest {
    #[serde(default)]
    pub name: String,
    pub username: String,
    pub password: Option<String>,
}

impl From<ReplaceUserRequest> for ReplaceUserDto {
    fn from(r: ReplaceUserRequest) -> Self {
        Self {
            name: r.name,
            username: r.username,
            password: r.password,
        }
    }
}
