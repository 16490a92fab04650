//! Credential authentication backend

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Credentials, DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::crypto::password::PasswordHasher;

/// Verifies a credential and produces the matching identity.
///
/// Any mismatch (unknown user, wrong password) is `InvalidCredentials`;
/// callers cannot tell the two apart.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> DomainResult<User>;
}

/// Checks credentials against the user store's bcrypt hashes.
pub struct RepositoryAuthenticator<R: UserRepositoryInterface> {
    repo: Arc<R>,
    hasher: PasswordHasher,
}

impl<R: UserRepositoryInterface> RepositoryAuthenticator<R> {
    pub fn new(repo: Arc<R>, hasher: PasswordHasher) -> Self {
        Self { repo, hasher }
    }
}

#[async_trait]
impl<R: UserRepositoryInterface> Authenticator for RepositoryAuthenticator<R> {
    async fn authenticate(&self, credentials: &Credentials) -> DomainResult<User> {
        let Some(user) = self.repo.get_user_by_username(&credentials.username).await? else {
            return Err(DomainError::InvalidCredentials);
        };

        if !self.hasher.verify(&credentials.password, &user.password_hash) {
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CreateUserDto;
    use crate::infrastructure::InMemoryUserRepository;

    async fn setup() -> RepositoryAuthenticator<InMemoryUserRepository> {
        let hasher = PasswordHasher::new(4);
        let repo = Arc::new(InMemoryUserRepository::new());
        repo.create_user(CreateUserDto {
            name: "Ann".into(),
            username: "ann@x.com".into(),
            password_hash: hasher.hash("Abc123!").unwrap(),
        })
        .await
        .unwrap();
        RepositoryAuthenticator::new(repo, hasher)
    }

    #[tokio::test]
    async fn correct_password_yields_identity() {
        let auth = setup().await;
        let user = auth
            .authenticate(&Credentials::new("ann@x.com", "Abc123!"))
            .await
            .unwrap();
        assert_eq!(user.username, "ann@x.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let auth = setup().await;
        let wrong = auth
            .authenticate(&Credentials::new("ann@x.com", "Abc123?"))
            .await
            .unwrap_err();
        let unknown = auth
            .authenticate(&Credentials::new("bob@x.com", "Abc123!"))
            .await
            .unwrap_err();

        assert!(matches!(wrong, DomainError::InvalidCredentials));
        assert!(matches!(unknown, DomainError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }
}
