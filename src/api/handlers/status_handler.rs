//! Todo status handlers. Every status belongs to the caller.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::TodoStatus;
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Body for creating or renaming a status
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StatusRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be between 2 and 255 characters"))]
    #[schema(example = "doing")]
    pub name: String,
}

/// Routes mounted under `/todos`, next to [`super::todo_routes`].
pub fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(list_statuses).post(create_status))
        .route(
            "/status/:id",
            get(get_status).put(update_status).delete(delete_status),
        )
}

/// Create a status
#[utoipa::path(
    post,
    path = "/todos/status",
    tag = "Statuses",
    security(("bearer_auth" = [])),
    request_body = StatusRequest,
    responses(
        (status = 201, description = "Status created", body = TodoStatus),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "You already have a status with this name")
    )
)]
pub async fn create_status(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<StatusRequest>,
) -> AppResult<Created<TodoStatus>> {
    let status = state
        .todo_service
        .create_status(user.id(), payload.name)
        .await?;

    Ok(Created(status))
}

/// List your statuses
#[utoipa::path(
    get,
    path = "/todos/status",
    tag = "Statuses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Your statuses", body = Vec<TodoStatus>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_statuses(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<TodoStatus>>> {
    let statuses = state.todo_service.list_statuses(user.id()).await?;
    Ok(Json(statuses))
}

/// Get one of your statuses
#[utoipa::path(
    get,
    path = "/todos/status/{id}",
    tag = "Statuses",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Status ID")),
    responses(
        (status = 200, description = "Status found", body = TodoStatus),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Status not found")
    )
)]
pub async fn get_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<TodoStatus>> {
    let status = state.todo_service.get_status(user.id(), id).await?;
    Ok(Json(status))
}

/// Rename one of your statuses
#[utoipa::path(
    put,
    path = "/todos/status/{id}",
    tag = "Statuses",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Status ID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status renamed", body = TodoStatus),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Status not found"),
        (status = 409, description = "You already have a status with this name")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<StatusRequest>,
) -> AppResult<Json<TodoStatus>> {
    let status = state
        .todo_service
        .update_status(user.id(), id, payload.name)
        .await?;

    Ok(Json(status))
}

/// Delete one of your statuses; refused while todos still use it
#[utoipa::path(
    delete,
    path = "/todos/status/{id}",
    tag = "Statuses",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Status ID")),
    responses(
        (status = 204, description = "Status deleted"),
        (status = 400, description = "Status still in use"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Status not found")
    )
)]
pub async fn delete_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.todo_service.delete_status(user.id(), id).await?;
    Ok(NoContent)
}
