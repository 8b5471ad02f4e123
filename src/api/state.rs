//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{
    AuthService, ServiceContainer, Services, TodoService, TokenManager, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Todo service
    pub todo_service: Arc<dyn TodoService>,
    /// Session token issuance and verification
    pub tokens: Arc<TokenManager>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state backed by the database.
    pub fn from_database(database: Arc<Database>, tokens: Arc<TokenManager>) -> Self {
        let container = Services::from_connection(database.get_connection(), tokens);
        Self::from_services(&container, database)
    }

    /// Create application state from any service container.
    pub fn from_services<C: ServiceContainer>(container: &C, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            todo_service: container.todos(),
            tokens: container.tokens(),
            database,
        }
    }
}
