//! Todo service - Todo items, per-user statuses and todo images.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{MAX_TEXT_LENGTH, MIN_NAME_LENGTH};
use crate::domain::{Image, Todo, TodoFields, TodoStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Todo service trait for dependency injection.
///
/// Statuses are scoped to the calling user; a status owned by someone else
/// is reported as not found.
#[async_trait]
pub trait TodoService: Send + Sync {
    async fn create_status(&self, user_id: i64, name: String) -> AppResult<TodoStatus>;

    async fn update_status(&self, user_id: i64, id: i64, name: String) -> AppResult<TodoStatus>;

    async fn get_status(&self, user_id: i64, id: i64) -> AppResult<TodoStatus>;

    async fn list_statuses(&self, user_id: i64) -> AppResult<Vec<TodoStatus>>;

    /// Refused while any todo still uses the status
    async fn delete_status(&self, user_id: i64, id: i64) -> AppResult<()>;

    async fn create_todo(&self, user_id: i64, fields: TodoFields) -> AppResult<Todo>;

    async fn update_todo(&self, user_id: i64, id: i64, fields: TodoFields) -> AppResult<Todo>;

    async fn get_todo(&self, id: i64) -> AppResult<Todo>;

    async fn list_todos(&self) -> AppResult<Vec<Todo>>;

    async fn delete_todo(&self, id: i64) -> AppResult<()>;

    async fn update_image(&self, id: i64, image: Vec<u8>) -> AppResult<()>;

    async fn get_image(&self, id: i64) -> AppResult<Image>;

    async fn delete_image(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of TodoService using Unit of Work.
pub struct TodoManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TodoManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Load a status and check it belongs to `user_id`.
    async fn owned_status(&self, user_id: i64, id: i64) -> AppResult<TodoStatus> {
        self.uow
            .statuses()
            .find_by_id(id)
            .await?
            .filter(|status| status.is_owned_by(user_id))
            .ok_or_not_found("Status")
    }

    async fn ensure_status_name_free(
        &self,
        user_id: i64,
        name: &str,
        current: Option<i64>,
    ) -> AppResult<()> {
        match self.uow.statuses().find_by_name(user_id, name).await? {
            Some(existing) if Some(existing.id) != current => Err(AppError::conflict("Status")),
            _ => Ok(()),
        }
    }
}

fn normalize_status_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    let len = name.chars().count();
    if len < MIN_NAME_LENGTH || len > MAX_TEXT_LENGTH {
        return Err(AppError::validation(format!(
            "Status name must be between {} and {} characters",
            MIN_NAME_LENGTH, MAX_TEXT_LENGTH
        )));
    }
    Ok(name.to_string())
}

fn normalize_fields(fields: TodoFields) -> AppResult<TodoFields> {
    let title = fields.title.trim().to_string();
    let description = fields.description.trim().to_string();

    if title.is_empty() {
        return Err(AppError::validation("Missing title"));
    }
    if title.chars().count() > MAX_TEXT_LENGTH {
        return Err(AppError::validation(format!(
            "Title must be at most {} characters",
            MAX_TEXT_LENGTH
        )));
    }
    if description.is_empty() {
        return Err(AppError::validation("Missing description"));
    }

    Ok(TodoFields {
        title,
        description,
        status_id: fields.status_id,
    })
}

#[async_trait]
impl<U: UnitOfWork> TodoService for TodoManager<U> {
    async fn create_status(&self, user_id: i64, name: String) -> AppResult<TodoStatus> {
        let name = normalize_status_name(&name)?;
        self.ensure_status_name_free(user_id, &name, None).await?;
        self.uow.statuses().create(user_id, name).await
    }

    async fn update_status(&self, user_id: i64, id: i64, name: String) -> AppResult<TodoStatus> {
        let name = normalize_status_name(&name)?;
        self.owned_status(user_id, id).await?;
        self.ensure_status_name_free(user_id, &name, Some(id)).await?;
        self.uow.statuses().rename(id, name).await
    }

    async fn get_status(&self, user_id: i64, id: i64) -> AppResult<TodoStatus> {
        self.owned_status(user_id, id).await
    }

    async fn list_statuses(&self, user_id: i64) -> AppResult<Vec<TodoStatus>> {
        self.uow.statuses().list_by_user(user_id).await
    }

    async fn delete_status(&self, user_id: i64, id: i64) -> AppResult<()> {
        self.owned_status(user_id, id).await?;

        let in_use = self.uow.todos().count_by_status(id).await?;
        if in_use > 0 {
            return Err(AppError::validation(format!(
                "Status is used by {} todo(s) and cannot be deleted",
                in_use
            )));
        }

        self.uow.statuses().delete(id).await
    }

    async fn create_todo(&self, user_id: i64, fields: TodoFields) -> AppResult<Todo> {
        let fields = normalize_fields(fields)?;
        self.owned_status(user_id, fields.status_id).await?;

        let todo = self.uow.todos().create(fields).await?;
        tracing::debug!(todo_id = todo.id, user_id, "Todo created");
        Ok(todo)
    }

    async fn update_todo(&self, user_id: i64, id: i64, fields: TodoFields) -> AppResult<Todo> {
        let fields = normalize_fields(fields)?;
        self.owned_status(user_id, fields.status_id).await?;
        self.uow.todos().update(id, fields).await
    }

    async fn get_todo(&self, id: i64) -> AppResult<Todo> {
        self.uow.todos().find_by_id(id).await?.ok_or_not_found("Todo")
    }

    async fn list_todos(&self) -> AppResult<Vec<Todo>> {
        self.uow.todos().list().await
    }

    async fn delete_todo(&self, id: i64) -> AppResult<()> {
        self.uow.todos().delete(id).await
    }

    async fn update_image(&self, id: i64, image: Vec<u8>) -> AppResult<()> {
        let image = Image::from_upload(image)?;
        self.uow.todos().update_image(id, Some(image.bytes)).await
    }

    async fn get_image(&self, id: i64) -> AppResult<Image> {
        self.get_todo(id).await?;
        self.uow
            .todos()
            .find_image(id)
            .await?
            .map(Image::new)
            .ok_or_not_found("Image")
    }

    async fn delete_image(&self, id: i64) -> AppResult<()> {
        self.uow.todos().update_image(id, None).await
    }
}
