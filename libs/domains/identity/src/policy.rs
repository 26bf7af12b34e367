//! Credential rules applied before an identity is created.
//!
//! Passwords need at least [`MIN_PASSWORD_LENGTH`] characters including a
//! digit, a lowercase letter, an uppercase letter and a non-alphanumeric
//! character. User names are restricted to [`ALLOWED_USER_NAME_CHARS`].

use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const ALLOWED_USER_NAME_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-._@+";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Passwords must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    #[error("Passwords must have at least one digit ('0'-'9')")]
    PasswordRequiresDigit,

    #[error("Passwords must have at least one lowercase ('a'-'z')")]
    PasswordRequiresLower,

    #[error("Passwords must have at least one uppercase ('A'-'Z')")]
    PasswordRequiresUpper,

    #[error("Passwords must have at least one non alphanumeric character")]
    PasswordRequiresNonAlphanumeric,

    #[error("User name '{0}' is invalid, can only contain letters or digits")]
    InvalidUserName(String),
}

pub fn check_password(password: &str) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(PolicyViolation::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PolicyViolation::PasswordRequiresDigit);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(PolicyViolation::PasswordRequiresLower);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(PolicyViolation::PasswordRequiresUpper);
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        violations.push(PolicyViolation::PasswordRequiresNonAlphanumeric);
    }

    violations
}

pub fn check_user_name(user_name: &str) -> Vec<PolicyViolation> {
    if user_name.chars().all(|c| ALLOWED_USER_NAME_CHARS.contains(c)) {
        Vec::new()
    } else {
        vec![PolicyViolation::InvalidUserName(user_name.to_string())]
    }
}
