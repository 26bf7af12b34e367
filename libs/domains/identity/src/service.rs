use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum_helpers::JwtAuth;
use std::sync::Arc;

use crate::error::{AuthError, AuthResult};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, Role, User};
use crate::policy;
use crate::repository::UserRepository;

/// Registration and login on top of a [`UserRepository`] and a [`JwtAuth`] issuer.
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Create an identity with no role memberships.
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateUser(request.username));
        }

        let violations: Vec<String> = policy::check_user_name(&request.username)
            .into_iter()
            .chain(policy::check_password(&request.password))
            .map(|v| v.to_string())
            .collect();
        if !violations.is_empty() {
            return Err(AuthError::CreationFailed(violations.join("; ")));
        }

        let password_hash = self.hash_password(&request.password)?;
        let user = self
            .repository
            .create(User::new(request.username, request.email, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, user_name = %user.user_name, "Registered user");
        Ok(user)
    }

    /// Register, then make sure every role exists. The new identity is not
    /// added to any of them.
    pub async fn register_admin(&self, request: RegisterRequest) -> AuthResult<User> {
        let user = self.register(request).await?;
        self.repository.ensure_roles(&Role::all()).await?;
        Ok(user)
    }

    /// Verify credentials and issue a bearer token carrying the user's roles.
    ///
    /// Unknown user names and wrong passwords fail the same way.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<LoginResponse> {
        let Some(user) = self.repository.find_by_username(&request.username).await? else {
            tracing::debug!(user_name = %request.username, "Login for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(&request.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let roles = self.repository.roles_for_user(user.id).await?;
        let issued = self
            .jwt
            .issue_token(&user.user_name, &roles)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {}", e)))?;

        tracing::info!(user_id = %user.id, roles = ?roles, "Issued token");
        Ok(LoginResponse {
            token: issued.token,
            expiration: issued.expiration,
        })
    }

    /// Add an existing identity to an existing role
    pub async fn add_to_role(&self, user_name: &str, role: Role) -> AuthResult<()> {
        let user = self
            .repository
            .find_by_username(user_name)
            .await?
            .ok_or_else(|| AuthError::Internal(format!("User '{}' not found", user_name)))?;

        self.repository.add_to_role(user.id, role).await
    }

    fn hash_password(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use axum_helpers::JwtConfig;
    use mockall::predicate::eq;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(SECRET))
    }

    fn register_request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
        }
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn stored_user(service: &AuthService<MockUserRepository>, password: &str) -> User {
        let hash = service.hash_password(password).unwrap();
        User::new("alice".into(), "alice@example.com".into(), hash)
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|user| {
                user.user_name == "alice"
                    && user.password_hash.starts_with("$argon2")
                    && !user.password_hash.contains("Passw0rd!")
            })
            .times(1)
            .returning(Ok);

        let service = AuthService::new(repo, jwt());
        let user = service
            .register(register_request("alice", "Passw0rd!"))
            .await
            .unwrap();

        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_register_rejects_existing_user_name() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|name| {
            Ok(Some(User::new(name.to_string(), "x@example.com".into(), "h".into())))
        });
        repo.expect_create().never();

        let service = AuthService::new(repo, jwt());
        let result = service.register(register_request("alice", "Passw0rd!")).await;

        assert!(matches!(result, Err(AuthError::DuplicateUser(name)) if name == "alice"));
    }

    #[tokio::test]
    async fn test_register_enforces_password_policy() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_create().never();

        let service = AuthService::new(repo, jwt());
        let result = service.register(register_request("alice", "password")).await;

        let Err(AuthError::CreationFailed(reason)) = result else {
            panic!("expected CreationFailed");
        };
        assert!(reason.contains("digit"));
        assert!(reason.contains("uppercase"));
    }

    #[tokio::test]
    async fn test_register_admin_ensures_roles_without_membership() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_create().returning(Ok);
        repo.expect_ensure_roles()
            .withf(|roles| roles.to_vec() == vec![Role::Admin, Role::Manager, Role::User])
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_add_to_role().never();

        let service = AuthService::new(repo, jwt());
        service
            .register_admin(register_request("root", "Adm1n!pass"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_register_admin_skips_roles_on_duplicate() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|name| {
            Ok(Some(User::new(name.to_string(), "x@example.com".into(), "h".into())))
        });
        repo.expect_ensure_roles().never();

        let service = AuthService::new(repo, jwt());
        let result = service
            .register_admin(register_request("root", "Adm1n!pass"))
            .await;

        assert!(matches!(result, Err(AuthError::DuplicateUser(_))));
    }

    #[tokio::test]
    async fn test_login_issues_token_with_roles() {
        let service = AuthService::new(MockUserRepository::new(), jwt());
        let user = stored_user(&service, "Passw0rd!");
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_roles_for_user()
            .with(eq(user_id))
            .returning(|_| Ok(vec!["Admin".to_string(), "User".to_string()]));

        let service = AuthService::new(repo, jwt());
        let response = service
            .login(login_request("alice", "Passw0rd!"))
            .await
            .unwrap();

        let claims = jwt().verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, vec!["Admin", "User"]);
        assert_eq!(claims.exp, response.expiration.timestamp());
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_fail_alike() {
        let service = AuthService::new(MockUserRepository::new(), jwt());
        let user = stored_user(&service, "Passw0rd!");

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(move |name| {
            Ok((name == "alice").then(|| user.clone()))
        });
        repo.expect_roles_for_user().never();

        let service = AuthService::new(repo, jwt());
        let wrong_password = service.login(login_request("alice", "Wr0ng!pass")).await;
        let unknown_user = service.login(login_request("mallory", "Passw0rd!")).await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_add_to_role_requires_known_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username().returning(|_| Ok(None));
        repo.expect_add_to_role().never();

        let service = AuthService::new(repo, jwt());
        let result = service.add_to_role("ghost", Role::Admin).await;

        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_verify_password_round_trip() {
        let service = AuthService::new(MockUserRepository::new(), jwt());
        let hash = service.hash_password("Passw0rd!").unwrap();

        assert!(service.verify_password("Passw0rd!", &hash).unwrap());
        assert!(!service.verify_password("passw0rd!", &hash).unwrap());
        assert!(service.verify_password("Passw0rd!", "not-a-phc-string").is_err());
    }
}
