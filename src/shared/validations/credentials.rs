//! Credential policy checks
//!
//! Pure functions run before any credential is persisted.

use crate::support::{DomainError, DomainResult};

/// Symbols accepted (and one of which is required) in a password.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

const PASSWORD_MIN_LEN: usize = 6;
const PASSWORD_MAX_LEN: usize = 16;

const USERNAME_RULE: &str = "Email must contain '@' and end with '.com'.";
const PASSWORD_RULE: &str = "Password must be 6-16 characters long, contain at least one uppercase letter, one lowercase letter, one number, and one special character (@, $, !, %, *, ?, &).";

/// Username must contain `@` and end with `.com`.
///
/// This is a narrow heuristic, not email validation: `"@.com"` passes.
pub fn validate_username(username: &str) -> DomainResult<()> {
    if username.contains('@') && username.ends_with(".com") {
        Ok(())
    } else {
        Err(DomainError::InvalidFormat(USERNAME_RULE.into()))
    }
}

/// Password must be 6-16 characters drawn from `[A-Za-z0-9@$!%*?&]` with at
/// least one of each class.
pub fn validate_password(password: &str) -> DomainResult<()> {
    let (mut upper, mut lower, mut digit, mut symbol) = (false, false, false, false);
    let mut len = 0usize;

    for c in password.chars() {
        len += 1;
        match c {
            'A'..='Z' => upper = true,
            'a'..='z' => lower = true,
            '0'..='9' => digit = true,
            c if PASSWORD_SYMBOLS.contains(c) => symbol = true,
            _ => return Err(weak()),
        }
    }

    let length_ok = (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len);
    if length_ok && upper && lower && digit && symbol {
        Ok(())
    } else {
        Err(weak())
    }
}

fn weak() -> DomainError {
    DomainError::WeakPassword(PASSWORD_RULE.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_weak(password: &str) -> bool {
        matches!(validate_password(password), Err(DomainError::WeakPassword(_)))
    }

    fn is_bad_format(username: &str) -> bool {
        matches!(validate_username(username), Err(DomainError::InvalidFormat(_)))
    }

    #[test]
    fn accepts_policy_compliant_passwords() {
        for p in ["Abc123!", "aB3$xy", "Passw0rd?Secure&", "Zz9@Zz9@"] {
            assert!(validate_password(p).is_ok(), "{p} should pass");
        }
    }

    #[test]
    fn rejects_passwords_missing_a_class() {
        assert!(is_weak("abc"));
        assert!(is_weak("ALLCAPS1!"));
        assert!(is_weak("nouppercase1!"));
        assert!(is_weak("NoDigits!!"));
        assert!(is_weak("NoSymbol12"));
    }

    #[test]
    fn enforces_length_bounds() {
        assert!(is_weak("Ab1!x"));
        assert!(validate_password("Ab1!xy").is_ok());
        assert!(validate_password("Ab1!xyzwvutsrqpo").is_ok());
        assert!(is_weak("Ab1!xyzwvutsrqpon"));
        assert!(is_weak(""));
    }

    #[test]
    fn rejects_characters_outside_the_allowed_set() {
        assert!(is_weak("Abc 123!"));
        assert!(is_weak("Abc123!#"));
        assert!(is_weak("Abc123!é"));
        assert!(is_weak("Ａbc123!"));
    }

    #[test]
    fn username_needs_at_sign_and_dot_com_suffix() {
        assert!(validate_username("ann@x.com").is_ok());
        assert!(validate_username("@.com").is_ok());
        assert!(is_bad_format("ann.x.com"));
        assert!(is_bad_format("ann@x.org"));
        assert!(is_bad_format("ann@x.COM"));
        assert!(is_bad_format(""));
    }
}
