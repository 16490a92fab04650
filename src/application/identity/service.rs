//! User management service: application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{
    CreateUserDto, Credentials, DomainError, DomainResult, ReplaceUserDto, UpdateUserDto, User,
    UserRepositoryInterface,
};
use crate::infrastructure::crypto::jwt::{bearer_token, IssuedToken, JwtService};
use crate::infrastructure::crypto::password::PasswordHasher;
use crate::shared::validations::{validate_password, validate_username};

use super::authenticator::{Authenticator, RepositoryAuthenticator};

/// Acknowledgement messages returned to callers.
pub mod messages {
    pub const REGISTERED: &str = "User registered successfully.";
    pub const DETAILS_UPDATED: &str = "User details updated successfully.";
    pub const UPDATED: &str = "User updated successfully.";
    pub const DELETED: &str = "User deleted successfully.";
}

/// User service: orchestrates all identity / user-management use-cases.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer.
pub struct UserService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    authenticator: Arc<dyn Authenticator>,
    jwt: Arc<JwtService>,
    hasher: PasswordHasher,
}

impl<R: UserRepositoryInterface + 'static> UserService<R> {
    /// Service whose logins are checked against `repo` itself.
    pub fn new(repo: Arc<R>, jwt: Arc<JwtService>, hasher: PasswordHasher) -> Self {
        let authenticator = Arc::new(RepositoryAuthenticator::new(repo.clone(), hasher));
        Self::with_authenticator(repo, authenticator, jwt, hasher)
    }
}

impl<R: UserRepositoryInterface> UserService<R> {
    pub fn with_authenticator(
        repo: Arc<R>,
        authenticator: Arc<dyn Authenticator>,
        jwt: Arc<JwtService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            repo,
            authenticator,
            jwt,
            hasher,
        }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user.
    ///
    /// Format checks run before the uniqueness check, and both before any
    /// write. The store's unique index still has the last word.
    pub async fn register(
        &self,
        name: &str,
        username: &str,
        password: &str,
    ) -> DomainResult<&'static str> {
        validate_username(username)?;
        validate_password(password)?;

        if self.repo.get_user_by_username(username).await?.is_some() {
            return Err(DomainError::duplicate_username());
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .repo
            .create_user(CreateUserDto {
                name: name.to_string(),
                username: username.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "New user registered");
        Ok(messages::REGISTERED)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username + password and return a fresh token.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<IssuedToken> {
        let credentials = Credentials::new(username, password);
        let user = match self.authenticator.authenticate(&credentials).await {
            Ok(user) => user,
            Err(e) => {
                info!(username, "Login rejected");
                return Err(e);
            }
        };

        let issued = self.jwt.issue(&user.username)?;
        info!(user_id = user.id, "User logged in");
        Ok(issued)
    }

    /// The identity a token speaks for, if the token is currently valid.
    ///
    /// Never fails: malformed, tampered, expired or orphaned tokens all
    /// yield `None`.
    pub async fn authorize(&self, token: &str) -> Option<User> {
        let subject = self.jwt.extract_subject(token).ok()?;

        let user = match self.repo.get_user_by_username(&subject).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!("Token subject no longer exists");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "User lookup failed during token validation");
                return None;
            }
        };

        self.jwt.is_valid(token, &user.username).then_some(user)
    }

    pub async fn validate_request(&self, token: &str) -> bool {
        self.authorize(token).await.is_some()
    }

    /// Validate the raw value of an `Authorization` header.
    pub async fn validate_authorization(&self, header: Option<&str>) -> bool {
        match header.and_then(bearer_token) {
            Some(token) => self.validate_request(token).await,
            None => false,
        }
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Partial update of the caller's own details.
    ///
    /// `caller_id` is the authenticated identity; a request naming any other
    /// user is `Forbidden`.
    pub async fn update(&self, caller_id: i64, request: UpdateUserDto) -> DomainResult<&'static str> {
        let Some(user_id) = request.user_id else {
            return Err(DomainError::InvalidRequest("User ID must not be null".into()));
        };
        if user_id != caller_id {
            warn!(caller_id, user_id, "Rejected update of another user's account");
            return Err(DomainError::Forbidden(
                "You can only update your own account.".into(),
            ));
        }

        let mut user = self
            .repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        if let Some(username) = request.username.as_deref() {
            validate_username(username)?;
        }

        let new_hash = match request.new_password() {
            Some(password) => {
                validate_password(password)?;
                Some(self.hasher.hash(password)?)
            }
            None => None,
        };

        let target_username = request.username.as_deref().unwrap_or(&user.username);
        if let Some(existing) = self.repo.get_user_by_username(target_username).await? {
            if existing.id != user_id {
                return Err(DomainError::duplicate_username());
            }
        }

        if let Some(username) = request.username {
            if user.username != username {
                user.username = username;
            }
        }
        if let Some(name) = request.name {
            if user.name != name {
                user.name = name;
            }
        }
        if let Some(hash) = new_hash {
            user.password_hash = hash;
        }

        let user = self.repo.save_user(user).await?;
        info!(user_id = user.id, "User details updated");
        Ok(messages::DETAILS_UPDATED)
    }

    /// Delete a user by ID.
    pub async fn delete(&self, id: i64) -> DomainResult<&'static str> {
        let user = self
            .repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        self.repo.delete_user(&user).await?;
        info!(user_id = id, "User deleted");
        Ok(messages::DELETED)
    }

    // ── Administration ──────────────────────────────────────────

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repo.list_users().await
    }

    pub async fn get_user(&self, id: i64) -> DomainResult<User> {
        self.repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    /// Administrative insert: hashes the password but applies no policy
    /// checks. The store still rejects duplicate usernames.
    pub async fn insert_user(&self, name: &str, username: &str, password: &str) -> DomainResult<User> {
        let password_hash = self.hasher.hash(password)?;
        let user = self
            .repo
            .create_user(CreateUserDto {
                name: name.to_string(),
                username: username.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "User inserted by administrator");
        Ok(user)
    }

    /// Administrative full update: name and username are overwritten, the
    /// password only when a non-empty one is given.
    pub async fn replace_user(&self, id: i64, dto: ReplaceUserDto) -> DomainResult<&'static str> {
        let mut user = self.get_user(id).await?;

        user.name = dto.name;
        user.username = dto.username;
        if let Some(password) = dto.password.as_deref().filter(|p| !p.is_empty()) {
            user.password_hash = self.hasher.hash(password)?;
        }

        self.repo.save_user(user).await?;
        info!(user_id = id, "User replaced by administrator");
        Ok(messages::UPDATED)
    }
}
