use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use uuid::Uuid;
use validator::Validate;

pub const DUPLICATE_USER_MESSAGE: &str = "User already exist!";
pub const CREATION_FAILED_MESSAGE: &str =
    "User creation failed! Please check user details and try again.";
pub const USER_CREATED_MESSAGE: &str = "User created successfully!";

/// Fixed set of roles known to the store
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub fn all() -> Vec<Role> {
        Role::iter().collect()
    }
}

/// Stored identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Regenerated whenever credentials change
    pub security_stamp: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_name,
            email,
            password_hash,
            security_stamp: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "User Name is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "User Name is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `{status, message}` body used by the registration endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "Error".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expiration: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_names_match_claim_values() {
        assert_eq!(Role::Admin.to_string(), "Admin");
        assert_eq!(Role::Manager.to_string(), "Manager");
        assert_eq!(Role::from_str("User").unwrap(), Role::User);
        assert!(Role::from_str("Moderator").is_err());
    }

    #[test]
    fn test_all_roles() {
        assert_eq!(Role::all(), vec![Role::Admin, Role::Manager, Role::User]);
    }

    #[test]
    fn test_new_user_gets_fresh_ids() {
        let first = User::new("alice".into(), "a@example.com".into(), "hash".into());
        let second = User::new("bob".into(), "b@example.com".into(), "hash".into());

        assert_ne!(first.id, second.id);
        assert_ne!(first.security_stamp, second.security_stamp);
        assert_eq!(first.id.get_version_num(), 7);
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::new("alice".into(), "a@example.com".into(), "secret-hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn test_register_request_requires_username() {
        let request = RegisterRequest {
            username: String::new(),
            email: "a@example.com".into(),
            password: "Passw0rd!".into(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_status_response_shape() {
        let body = serde_json::to_value(StatusResponse::error(DUPLICATE_USER_MESSAGE)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"status": "Error", "message": "User already exist!"})
        );
    }
}
