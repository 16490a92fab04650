use async_trait::async_trait;

use super::{CreateUserDto, User};
use crate::support::DomainResult;

/// User record store.
///
/// Implementations must enforce username uniqueness themselves and report a
/// collision as `DomainError::DuplicateUsername`; callers' pre-checks can race.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>>;

    async fn save_user(&self, user: User) -> DomainResult<User>;
    async fn delete_user(&self, user: &User) -> DomainResult<()>;
}
