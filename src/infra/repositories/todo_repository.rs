//! Todo and todo status repositories.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::entities::todo::{self, select_rows, Entity as TodoEntity, TodoRow};
use super::entities::todo_status::{self, Entity as StatusEntity};
use super::user_repository::conflict_on_unique;
use crate::domain::{Todo, TodoFields, TodoStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Todo status repository. Names are unique per owner.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TodoStatusRepository: Send + Sync {
    async fn create(&self, user_id: i64, name: String) -> AppResult<TodoStatus>;

    async fn rename(&self, id: i64, name: String) -> AppResult<TodoStatus>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<TodoStatus>>;

    /// Case-insensitive lookup within one owner's statuses
    async fn find_by_name(&self, user_id: i64, name: &str) -> AppResult<Option<TodoStatus>>;

    /// Statuses owned by `user_id`, oldest first
    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<TodoStatus>>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Todo repository
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(&self, fields: TodoFields) -> AppResult<Todo>;

    async fn update(&self, id: i64, fields: TodoFields) -> AppResult<Todo>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Todo>>;

    /// All todos, newest first
    async fn list(&self) -> AppResult<Vec<Todo>>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Number of todos referencing a status
    async fn count_by_status(&self, status_id: i64) -> AppResult<u64>;

    /// Set or clear the todo's image
    async fn update_image(&self, id: i64, image: Option<Vec<u8>>) -> AppResult<()>;

    /// Load the todo's image bytes
    async fn find_image(&self, id: i64) -> AppResult<Option<Vec<u8>>>;
}

/// SeaORM-backed todo status repository
pub struct TodoStatusStore {
    db: DatabaseConnection,
}

impl TodoStatusStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStatusRepository for TodoStatusStore {
    async fn create(&self, user_id: i64, name: String) -> AppResult<TodoStatus> {
        let now = Utc::now();
        let active_model = todo_status::ActiveModel {
            name: Set(name),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "Status"))?;
        Ok(TodoStatus::from(model))
    }

    async fn rename(&self, id: i64, name: String) -> AppResult<TodoStatus> {
        let status = StatusEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Status"))?;

        let mut active: todo_status::ActiveModel = status.into();
        active.name = Set(name);
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "Status"))?;
        Ok(TodoStatus::from(model))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<TodoStatus>> {
        let result = StatusEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(TodoStatus::from))
    }

    async fn find_by_name(&self, user_id: i64, name: &str) -> AppResult<Option<TodoStatus>> {
        let result = StatusEntity::find()
            .filter(todo_status::Column::UserId.eq(user_id))
            .filter(
                Expr::expr(Func::lower(Expr::col(todo_status::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(&self.db)
            .await?;

        Ok(result.map(TodoStatus::from))
    }

    async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<TodoStatus>> {
        let models = StatusEntity::find()
            .filter(todo_status::Column::UserId.eq(user_id))
            .order_by_asc(todo_status::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(TodoStatus::from).collect())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = StatusEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Status"));
        }
        Ok(())
    }
}

/// SeaORM-backed todo repository
pub struct TodoStore {
    db: DatabaseConnection,
}

impl TodoStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepository for TodoStore {
    async fn create(&self, fields: TodoFields) -> AppResult<Todo> {
        let now = Utc::now();
        let active_model = todo::ActiveModel {
            title: Set(fields.title),
            description: Set(fields.description),
            status_id: Set(fields.status_id),
            image: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Todo::from(model))
    }

    async fn update(&self, id: i64, fields: TodoFields) -> AppResult<Todo> {
        let result = TodoEntity::update_many()
            .col_expr(todo::Column::Title, Expr::value(fields.title))
            .col_expr(todo::Column::Description, Expr::value(fields.description))
            .col_expr(todo::Column::StatusId, Expr::value(fields.status_id))
            .col_expr(todo::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(todo::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Todo"));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Todo"))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Todo>> {
        let row = select_rows()
            .filter(todo::Column::Id.eq(id))
            .into_model::<TodoRow>()
            .one(&self.db)
            .await?;

        Ok(row.map(Todo::from))
    }

    async fn list(&self) -> AppResult<Vec<Todo>> {
        let rows = select_rows()
            .order_by_desc(todo::Column::CreatedAt)
            .order_by_desc(todo::Column::Id)
            .into_model::<TodoRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = TodoEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Todo"));
        }
        Ok(())
    }

    async fn count_by_status(&self, status_id: i64) -> AppResult<u64> {
        let count = TodoEntity::find()
            .filter(todo::Column::StatusId.eq(status_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn update_image(&self, id: i64, image: Option<Vec<u8>>) -> AppResult<()> {
        let result = TodoEntity::update_many()
            .col_expr(todo::Column::Image, Expr::value(image))
            .col_expr(todo::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(todo::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Todo"));
        }
        Ok(())
    }

    async fn find_image(&self, id: i64) -> AppResult<Option<Vec<u8>>> {
        let image: Option<Option<Vec<u8>>> = TodoEntity::find_by_id(id)
            .select_only()
            .column(todo::Column::Image)
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(image.flatten())
    }
}
