//! In-memory user store

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{CreateUserDto, DomainError, DomainResult, User, UserRepositoryInterface};

/// In-memory user store for development and testing.
///
/// Usernames are claimed through a `DashMap` entry, so two concurrent writers
/// can never both own the same username.
pub struct InMemoryUserRepository {
    users: DashMap<i64, User>,
    usernames: DashMap<String, i64>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            usernames: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Claim `username` for `id`. Re-claiming one's own username is a no-op.
    fn claim_username(&self, username: &str, id: i64) -> DomainResult<()> {
        match self.usernames.entry(username.to_string()) {
            Entry::Occupied(owner) if *owner.get() != id => Err(DomainError::duplicate_username()),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    fn release_username(&self, username: &str, id: i64) {
        self.usernames.remove_if(username, |_, owner| *owner == id);
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.claim_username(&dto.username, id)?;

        let user = User {
            id,
            name: dto.name,
            username: dto.username,
            password_hash: dto.password_hash,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let Some(id) = self.usernames.get(username).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|e| e.value().clone()))
    }

    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|e| e.value().clone()))
    }

    async fn save_user(&self, user: User) -> DomainResult<User> {
        // The row stays locked until the write lands, so a concurrent delete
        // either runs first (NotFound here) or after (the row is gone).
        let Some(mut stored) = self.users.get_mut(&user.id) else {
            return Err(DomainError::user_not_found(user.id));
        };

        if stored.username != user.username {
            self.claim_username(&user.username, user.id)?;
            self.release_username(&stored.username, user.id);
        }

        *stored = user.clone();
        Ok(user)
    }

    async fn delete_user(&self, user: &User) -> DomainResult<()> {
        let Some((_, removed)) = self.users.remove(&user.id) else {
            return Err(DomainError::user_not_found(user.id));
        };
        self.release_username(&removed.username, removed.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn dto(username: &str) -> CreateUserDto {
        CreateUserDto {
            name: "Ann".into(),
            username: username.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create_user(dto("a@x.com")).await.unwrap();
        let b = repo.create_user(dto("b@x.com")).await.unwrap();

        assert!(b.id > a.id);
        assert_eq!(repo.list_users().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(dto("a@x.com")).await.unwrap();

        let err = repo.create_user(dto("a@x.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateUsername(_)));
        assert_eq!(repo.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_registrations_yield_one_winner() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move { repo.create_user(dto("race@x.com")).await }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn renaming_frees_the_old_username() {
        let repo = InMemoryUserRepository::new();
        let mut a = repo.create_user(dto("a@x.com")).await.unwrap();

        a.username = "renamed@x.com".into();
        repo.save_user(a.clone()).await.unwrap();

        assert!(repo.get_user_by_username("a@x.com").await.unwrap().is_none());
        assert_eq!(repo.get_user_by_username("renamed@x.com").await.unwrap(), Some(a));
        repo.create_user(dto("a@x.com")).await.unwrap();
    }

    #[tokio::test]
    async fn renaming_into_taken_username_fails() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(dto("a@x.com")).await.unwrap();
        let mut b = repo.create_user(dto("b@x.com")).await.unwrap();

        b.username = "a@x.com".into();
        let err = repo.save_user(b).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateUsername(_)));
        assert!(repo.get_user_by_username("b@x.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_releases_username() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create_user(dto("a@x.com")).await.unwrap();

        repo.delete_user(&a).await.unwrap();
        assert!(repo.get_user_by_id(a.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_user(&a).await,
            Err(DomainError::NotFound { .. })
        ));
        repo.create_user(dto("a@x.com")).await.unwrap();
    }

    #[tokio::test]
    async fn save_after_delete_does_not_resurrect() {
        let repo = InMemoryUserRepository::new();
        let ann = repo.create_user(dto("ann@x.com")).await.unwrap();
        repo.delete_user(&ann).await.unwrap();

        assert!(matches!(
            repo.save_user(ann.clone()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(repo.get_user_by_id(ann.id).await.unwrap().is_none());
        assert!(repo.get_user_by_username("ann@x.com").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_save_and_delete_leave_nothing_behind() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let mut handles = Vec::new();

        for i in 0..32 {
            let user = repo.create_user(dto(&format!("u{}@x.com", i))).await.unwrap();

            let saver = repo.clone();
            let mut renamed = user.clone();
            renamed.name = "Renamed".into();
            handles.push(tokio::spawn(async move {
                let _ = saver.save_user(renamed).await;
            }));

            let deleter = repo.clone();
            handles.push(tokio::spawn(async move {
                deleter.delete_user(&user).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert!(repo.list_users().await.unwrap().is_empty());
    }
}
