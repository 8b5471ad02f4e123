//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, status_handler, todo_handler, user_handler};
use crate::domain::{TodoResponse, TodoStatus, UserResponse};
use crate::services::LoginResponse;

/// OpenAPI documentation for the Todo API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "Todo lists with per-user statuses and tiered access control",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        user_handler::list_users,
        user_handler::get_current_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::change_password,
        user_handler::update_photo,
        user_handler::get_photo,
        user_handler::delete_photo,
        todo_handler::create_todo,
        todo_handler::list_todos,
        todo_handler::get_todo,
        todo_handler::update_todo,
        todo_handler::delete_todo,
        todo_handler::update_image,
        todo_handler::get_image,
        todo_handler::delete_image,
        status_handler::create_status,
        status_handler::list_statuses,
        status_handler::get_status,
        status_handler::update_status,
        status_handler::delete_status,
    ),
    components(
        schemas(
            UserResponse,
            TodoResponse,
            TodoStatus,
            LoginResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            user_handler::UpdateUserRequest,
            user_handler::ChangePasswordRequest,
            todo_handler::TodoRequest,
            status_handler::StatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "User management, passwords and photos"),
        (name = "Todos", description = "Todo items and their images"),
        (name = "Statuses", description = "Per-user todo statuses")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for bearer session tokens
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token obtained from /users/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_protected_and_public_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/users",
            "/users/login",
            "/users/me",
            "/users/{id}",
            "/users/change_password/{id}",
            "/users/photo/{id}",
            "/todos",
            "/todos/{id}",
            "/todos/image/{id}",
            "/todos/status",
            "/todos/status/{id}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }

        let schemes = doc.components.as_ref().map(|c| &c.security_schemes);
        assert!(schemes.is_some_and(|s| s.contains_key("bearer_auth")));
    }
}
