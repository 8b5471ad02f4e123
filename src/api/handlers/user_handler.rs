//! User handlers: profile management, password changes and photos.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{read_image_field, ValidatedJson};
use crate::api::middleware::{require_level, require_self_or_level, CurrentUser};
use crate::api::AppState;
use crate::config::{PHOTO_FIELD, UPLOAD_BODY_LIMIT};
use crate::domain::{AccessLevel, UpdateUser, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::services::PasswordChange;
use crate::types::{ImageBody, NoContent};

/// Partial profile update; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be between 2 and 255 characters"))]
    #[schema(example = "Alice Liddell")]
    pub name: Option<String>,
    #[validate(length(
        min = 2,
        max = 255,
        message = "Username must be between 2 and 255 characters"
    ))]
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    /// Only admins may change access levels
    #[schema(value_type = Option<i16>, example = 2)]
    pub access_level: Option<AccessLevel>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            username: request.username,
            email: request.email,
            access_level: request.access_level,
        }
    }
}

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Missing old password"))]
    pub old_password: String,
    #[schema(min_length = 6)]
    pub new_password: String,
    pub new_password_confirmation: String,
}

/// Bearer-protected routes mounted under `/users`.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/change_password/:id", post(change_password))
        .route(
            "/photo/:id",
            get(get_photo)
                .patch(update_photo)
                .delete(delete_photo)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}

/// List all users, newest first
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager level required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_level(&user, AccessLevel::Manager)?;

    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(user.id()).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only yourself, or manager level"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    require_self_or_level(&user, id, AccessLevel::Manager)?;

    let found = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(found)))
}

/// Update a user's profile
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only yourself, or admin level"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already in use")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_self_or_level(&user, id, AccessLevel::Admin)?;
    if payload.access_level.is_some() {
        require_level(&user, AccessLevel::Admin)?;
    }

    let updated = state.user_service.update_user(id, payload.into()).await?;
    Ok(Json(UserResponse::from(updated)))
}

/// Delete a user (admin only, never yourself)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Attempted to delete yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin level required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    require_level(&user, AccessLevel::Admin)?;
    if user.id() == id {
        return Err(AppError::validation("You cannot delete your own account"));
    }

    state.user_service.delete_user(id).await?;
    Ok(NoContent)
}

/// Change your own password
#[utoipa::path(
    post,
    path = "/users/change_password/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID, must be your own")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Old password wrong or new password rejected"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your account")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<NoContent> {
    if user.id() != id {
        return Err(AppError::Forbidden);
    }

    state
        .user_service
        .change_password(
            id,
            PasswordChange {
                old_password: payload.old_password,
                new_password: payload.new_password,
                new_password_confirmation: payload.new_password_confirmation,
            },
        )
        .await?;

    Ok(NoContent)
}

/// Upload or replace a user's photo (multipart field `photo`)
#[utoipa::path(
    patch,
    path = "/users/photo/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    request_body(content_type = "multipart/form-data", description = "Field `photo`, at most 5MB"),
    responses(
        (status = 204, description = "Photo stored"),
        (status = 400, description = "Missing, empty or oversized photo"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only yourself, or admin level"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_photo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<NoContent> {
    require_self_or_level(&user, id, AccessLevel::Admin)?;

    let photo = read_image_field(multipart, PHOTO_FIELD).await?;
    state.user_service.update_photo(id, photo).await?;
    Ok(NoContent)
}

/// Download a user's photo
#[utoipa::path(
    get,
    path = "/users/photo/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Photo bytes", content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User or photo not found")
    )
)]
pub async fn get_photo(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<ImageBody> {
    let photo = state.user_service.get_photo(id).await?;
    Ok(ImageBody(photo))
}

/// Remove a user's photo
#[utoipa::path(
    delete,
    path = "/users/photo/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Photo removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only yourself, or admin level"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_photo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    require_self_or_level(&user, id, AccessLevel::Admin)?;

    state.user_service.delete_photo(id).await?;
    Ok(NoContent)
}
