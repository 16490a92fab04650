//! HTTP REST API interfaces
//!
//! - `middleware`: bearer-token authentication
//! - `modules`: request handlers grouped by resource
//! - `router`: API router with Swagger documentation

use std::sync::Arc;
use std::time::Instant;

use crate::application::UserService;
use crate::domain::UserRepositoryInterface;

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;

/// State shared by every handler.
pub struct AppState<R: UserRepositoryInterface> {
    pub users: Arc<UserService<R>>,
    pub started_at: Instant,
}

impl<R: UserRepositoryInterface> AppState<R> {
    pub fn new(users: Arc<UserService<R>>) -> Self {
        Self {
            users,
            started_at: Instant::now(),
        }
    }
}

impl<R: UserRepositoryInterface> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            started_at: self.started_at,
        }
    }
}
