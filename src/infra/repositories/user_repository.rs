//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use super::entities::user::{self, select_rows, ActiveModel, Entity as UserEntity, UserRow};
use crate::domain::{CreateUser, UpdateUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Username and email lookups are case-insensitive.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user
    async fn create(&self, user: CreateUser) -> AppResult<User>;

    /// Apply a partial update
    async fn update(&self, id: i64, changes: UpdateUser) -> AppResult<User>;

    /// Replace the stored password hash
    async fn update_password(&self, id: i64, password_hash: String) -> AppResult<()>;

    /// Delete user by ID
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// List all users, newest first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Number of stored users
    async fn count(&self) -> AppResult<u64>;

    /// Set or clear the user's photo
    async fn update_photo(&self, id: i64, photo: Option<Vec<u8>>) -> AppResult<()>;

    /// Load the user's photo bytes
    async fn find_photo(&self, id: i64) -> AppResult<Option<Vec<u8>>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one_ci(&self, column: user::Column, value: &str) -> AppResult<Option<User>> {
        let row = select_rows()
            .filter(Expr::expr(Func::lower(Expr::col(column))).eq(value.to_lowercase()))
            .into_model::<UserRow>()
            .one(&self.db)
            .await?;

        row.map(User::try_from).transpose()
    }
}

/// Map a unique-constraint violation to a conflict.
pub(super) fn conflict_on_unique(err: DbErr, entity: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(entity),
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let row = select_rows()
            .filter(user::Column::Id.eq(id))
            .into_model::<UserRow>()
            .one(&self.db)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.find_one_ci(user::Column::Username, username).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one_ci(user::Column::Email, email).await
    }

    async fn create(&self, new_user: CreateUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            name: Set(new_user.name),
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            access_level: Set(new_user.access_level.rank()),
            photo: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "User"))?;
        User::try_from(model)
    }

    async fn update(&self, id: i64, changes: UpdateUser) -> AppResult<User> {
        let mut query = UserEntity::update_many()
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()));

        if let Some(name) = changes.name {
            query = query.col_expr(user::Column::Name, Expr::value(name));
        }
        if let Some(username) = changes.username {
            query = query.col_expr(user::Column::Username, Expr::value(username));
        }
        if let Some(email) = changes.email {
            query = query.col_expr(user::Column::Email, Expr::value(email));
        }
        if let Some(level) = changes.access_level {
            query = query.col_expr(user::Column::AccessLevel, Expr::value(level.rank()));
        }

        let result = query
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "User"))?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User"));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    async fn update_password(&self, id: i64, password_hash: String) -> AppResult<()> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User"));
        }

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let rows = select_rows()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .into_model::<UserRow>()
            .all(&self.db)
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(UserEntity::find().count(&self.db).await?)
    }

    async fn update_photo(&self, id: i64, photo: Option<Vec<u8>>) -> AppResult<()> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::Photo, Expr::value(photo))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    async fn find_photo(&self, id: i64) -> AppResult<Option<Vec<u8>>> {
        let photo: Option<Option<Vec<u8>>> = UserEntity::find_by_id(id)
            .select_only()
            .column(user::Column::Photo)
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(photo.flatten())
    }
}
