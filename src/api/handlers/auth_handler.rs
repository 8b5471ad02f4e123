//! Authentication handlers: self-registration and login.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::{LoginResponse, Registration};
use crate::types::Created;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 2, max = 255, message = "Name must be between 2 and 255 characters"))]
    #[schema(example = "Alice Liddell")]
    pub name: String,
    /// Unique login name
    #[validate(length(
        min = 2,
        max = 255,
        message = "Username must be between 2 and 255 characters"
    ))]
    #[schema(example = "alice")]
    pub username: String,
    /// Unique email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (6 to 255 characters)
    #[schema(example = "hunter22", min_length = 6)]
    pub password: String,
    /// Must equal `password`
    #[schema(example = "hunter22")]
    pub password_confirmation: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Missing username"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, message = "Missing password"))]
    #[schema(example = "hunter22")]
    pub password: String,
}

/// Public routes mounted under `/users`.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/login", post(login))
}

/// Register a new basic user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already in use")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .user_service
        .register(Registration {
            name: payload.name,
            username: payload.username,
            email: payload.email,
            password: payload.password,
            password_confirmation: payload.password_confirmation,
        })
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Exchange username and password for a session token
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(response))
}
