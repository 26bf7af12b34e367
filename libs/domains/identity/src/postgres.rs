use async_trait::async_trait;
use sea_orm::sea_query::{Expr, ExprTrait, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, SqlErr,
};
use uuid::Uuid;

use crate::{
    entity::{role, user, user_role},
    error::{AuthError, AuthResult},
    models::{Role, User},
    repository::UserRepository,
};

fn db_error(e: DbErr) -> AuthError {
    AuthError::Internal(format!("Database error: {}", e))
}

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, user_name: &str) -> AuthResult<Option<User>> {
        let model = user::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col((user::Entity, user::Column::UserName))))
                    .eq(user_name.to_lowercase()),
            )
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn create(&self, user: User) -> AuthResult<User> {
        let user_name = user.user_name.clone();
        let active_model: user::ActiveModel = user.into();

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => AuthError::DuplicateUser(user_name),
                _ => AuthError::CreationFailed(format!("Database error: {}", e)),
            }
        })?;

        tracing::info!(user_id = %model.id, user_name = %model.user_name, "Created user");
        Ok(model.into())
    }

    async fn roles_for_user(&self, user_id: Uuid) -> AuthResult<Vec<String>> {
        let roles = role::Entity::find()
            .join(JoinType::InnerJoin, role::Relation::UserRole.def())
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    async fn ensure_roles(&self, roles: &[Role]) -> AuthResult<()> {
        let mut created = 0;
        for wanted in roles {
            let model = role::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(wanted.to_string()),
            };

            created += role::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(role::Column::Name)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
                .map_err(db_error)?;
        }

        if created > 0 {
            tracing::info!(created, "Created missing roles");
        }
        Ok(())
    }

    async fn role_names(&self) -> AuthResult<Vec<String>> {
        let roles = role::Entity::find()
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    async fn add_to_role(&self, user_id: Uuid, role: Role) -> AuthResult<()> {
        let role_model = role::Entity::find()
            .filter(role::Column::Name.eq(role.to_string()))
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(AuthError::UnknownRole(role))?;

        let membership = user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_model.id),
        };

        user_role::Entity::insert(membership)
            .on_conflict(
                OnConflict::columns([user_role::Column::UserId, user_role::Column::RoleId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;

        tracing::info!(user_id = %user_id, role = %role, "Added user to role");
        Ok(())
    }
}
