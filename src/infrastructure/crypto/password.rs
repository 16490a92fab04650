//! Password hashing utilities

use bcrypt::{non_truncating_hash, non_truncating_verify, BcryptError};

use crate::support::{DomainError, DomainResult};

/// Salted, adaptive password hashing (bcrypt).
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password; each call uses a fresh salt.
    pub fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password(password, self.cost)
    }

    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        verify_password(password, password_hash)
    }
}

/// Longest password bcrypt hashes whole: it reads 72 bytes, NUL terminator included.
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Hash a password using bcrypt. Input bcrypt would truncate is rejected.
pub fn hash_password(password: &str, cost: u32) -> DomainResult<String> {
    non_truncating_hash(password, cost).map_err(|e| match e {
        BcryptError::Truncation(_) => DomainError::WeakPassword(format!(
            "Password must not be longer than {} bytes.",
            MAX_PASSWORD_BYTES
        )),
        other => DomainError::Internal(format!("Failed to hash password: {}", other)),
    })
}

/// Verify a password against a hash. A malformed hash or an over-long
/// password never matches.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    non_truncating_verify(password, password_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(TEST_COST);
        let password = "Abc123!";
        let hashed = hasher.hash(password).unwrap();

        assert_ne!(hashed, password);
        assert!(hasher.verify(password, &hashed));
        assert!(!hasher.verify("Abc123?", &hashed));
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = PasswordHasher::new(TEST_COST);
        let first = hasher.hash("Abc123!").unwrap();
        let second = hasher.hash("Abc123!").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("Abc123!", &first));
        assert!(hasher.verify("Abc123!", &second));
    }

    #[test]
    fn over_long_password_is_rejected_not_truncated() {
        let hasher = PasswordHasher::new(TEST_COST);
        let long = "A".repeat(MAX_PASSWORD_BYTES + 1);

        assert!(matches!(hasher.hash(&long), Err(DomainError::WeakPassword(_))));
        assert!(hasher.hash(&long[..MAX_PASSWORD_BYTES]).is_ok());

        let hashed = hasher.hash(&long[..MAX_PASSWORD_BYTES]).unwrap();
        assert!(!hasher.verify(&long, &hashed));
    }

    #[test]
    fn invalid_cost_is_internal() {
        let hasher = PasswordHasher::new(40);
        assert!(matches!(hasher.hash("Abc123!"), Err(DomainError::Internal(_))));
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify_password("Abc123!", "not-a-bcrypt-hash"));
        assert!(!verify_password("Abc123!", ""));
    }
}
