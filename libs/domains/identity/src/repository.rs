use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::models::{Role, User};

/// Credential store: identities, roles and role memberships
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up an identity by user name, ignoring case
    async fn find_by_username(&self, user_name: &str) -> AuthResult<Option<User>>;

    /// Persist a new identity. Fails with `DuplicateUser` if the name is taken.
    async fn create(&self, user: User) -> AuthResult<User>;

    /// Names of the roles the user is a member of, sorted
    async fn roles_for_user(&self, user_id: Uuid) -> AuthResult<Vec<String>>;

    /// Create whichever of `roles` do not exist yet
    async fn ensure_roles(&self, roles: &[Role]) -> AuthResult<()>;

    /// Names of every existing role, sorted
    async fn role_names(&self) -> AuthResult<Vec<String>>;

    /// Add a membership. The role must exist; repeating is a no-op.
    async fn add_to_role(&self, user_id: Uuid, role: Role) -> AuthResult<()>;
}

#[derive(Debug, Default)]
struct Store {
    users: HashMap<Uuid, User>,
    roles: BTreeMap<String, Uuid>,
    memberships: HashSet<(Uuid, Uuid)>,
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, user_name: &str) -> AuthResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store
            .users
            .values()
            .find(|u| u.user_name.eq_ignore_ascii_case(user_name))
            .cloned())
    }

    async fn create(&self, user: User) -> AuthResult<User> {
        let mut store = self.store.write().await;

        let taken = store
            .users
            .values()
            .any(|u| u.user_name.eq_ignore_ascii_case(&user.user_name));
        if taken {
            return Err(AuthError::DuplicateUser(user.user_name));
        }

        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, user_name = %user.user_name, "Created user");
        Ok(user)
    }

    async fn roles_for_user(&self, user_id: Uuid) -> AuthResult<Vec<String>> {
        let store = self.store.read().await;
        Ok(store
            .roles
            .iter()
            .filter(|(_, role_id)| store.memberships.contains(&(user_id, **role_id)))
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn ensure_roles(&self, roles: &[Role]) -> AuthResult<()> {
        let mut store = self.store.write().await;
        for role in roles {
            store
                .roles
                .entry(role.to_string())
                .or_insert_with(Uuid::new_v4);
        }
        Ok(())
    }

    async fn role_names(&self) -> AuthResult<Vec<String>> {
        let store = self.store.read().await;
        Ok(store.roles.keys().cloned().collect())
    }

    async fn add_to_role(&self, user_id: Uuid, role: Role) -> AuthResult<()> {
        let mut store = self.store.write().await;

        let role_id = *store
            .roles
            .get(&role.to_string())
            .ok_or(AuthError::UnknownRole(role))?;
        if !store.users.contains_key(&user_id) {
            return Err(AuthError::Internal(format!("User {} not found", user_id)));
        }

        store.memberships.insert((user_id, role_id));
        Ok(())
    }
}
