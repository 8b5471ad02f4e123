//! Todo handlers: todo CRUD and todo images.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{read_image_field, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{IMAGE_FIELD, UPLOAD_BODY_LIMIT};
use crate::domain::{TodoFields, TodoResponse};
use crate::errors::AppResult;
use crate::types::{Created, ImageBody, NoContent};

/// Body for creating or replacing a todo
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[validate(length(min = 1, message = "Missing description"))]
    #[schema(example = "Two litres, semi-skimmed")]
    pub description: String,
    /// One of the caller's statuses
    #[schema(example = 1)]
    pub status_id: i64,
}

impl From<TodoRequest> for TodoFields {
    fn from(request: TodoRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            status_id: request.status_id,
        }
    }
}

/// Routes mounted under `/todos`.
pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/:id", get(get_todo).put(update_todo).delete(delete_todo))
        .route(
            "/image/:id",
            get(get_image)
                .patch(update_image)
                .delete(delete_image)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}

/// Create a todo
#[utoipa::path(
    post,
    path = "/todos",
    tag = "Todos",
    security(("bearer_auth" = [])),
    request_body = TodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Status not found")
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<TodoRequest>,
) -> AppResult<Created<TodoResponse>> {
    let todo = state
        .todo_service
        .create_todo(user.id(), payload.into())
        .await?;

    Ok(Created(TodoResponse::from(todo)))
}

/// List all todos
#[utoipa::path(
    get,
    path = "/todos",
    tag = "Todos",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of todos", body = Vec<TodoResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_todos(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<TodoResponse>>> {
    let todos = state.todo_service.list_todos().await?;
    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

/// Get a todo by ID
#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = "Todos",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = TodoResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Todo not found")
    )
)]
pub async fn get_todo(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<TodoResponse>> {
    let todo = state.todo_service.get_todo(id).await?;
    Ok(Json(TodoResponse::from(todo)))
}

/// Replace a todo's fields
#[utoipa::path(
    put,
    path = "/todos/{id}",
    tag = "Todos",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = TodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Todo or status not found")
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<TodoRequest>,
) -> AppResult<Json<TodoResponse>> {
    let todo = state
        .todo_service
        .update_todo(user.id(), id, payload.into())
        .await?;

    Ok(Json(TodoResponse::from(todo)))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = "Todos",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Todo not found")
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.todo_service.delete_todo(id).await?;
    Ok(NoContent)
}

/// Upload or replace a todo's image (multipart field `image`)
#[utoipa::path(
    patch,
    path = "/todos/image/{id}",
    tag = "Todos",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Todo ID")),
    request_body(content_type = "multipart/form-data", description = "Field `image`, at most 5MB"),
    responses(
        (status = 204, description = "Image stored"),
        (status = 400, description = "Missing, empty or oversized image"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Todo not found")
    )
)]
pub async fn update_image(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<NoContent> {
    let image = read_image_field(multipart, IMAGE_FIELD).await?;
    state.todo_service.update_image(id, image).await?;
    Ok(NoContent)
}

/// Download a todo's image
#[utoipa::path(
    get,
    path = "/todos/image/{id}",
    tag = "Todos",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Todo or image not found")
    )
)]
pub async fn get_image(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ImageBody> {
    let image = state.todo_service.get_image(id).await?;
    Ok(ImageBody(image))
}

/// Remove a todo's image
#[utoipa::path(
    delete,
    path = "/todos/image/{id}",
    tag = "Todos",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Image removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Todo not found")
    )
)]
pub async fn delete_image(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.todo_service.delete_image(id).await?;
    Ok(NoContent)
}
