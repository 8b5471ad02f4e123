//! Service Container - Centralized service wiring.
//!
//! Builds every application service over one [`Persistence`] unit of work,
//! one credential hasher and one token manager.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, TodoManager, TodoService, TokenManager, UserManager, UserService,
};
use crate::domain::{Argon2Hasher, CredentialHasher};
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get todo service
    fn todos(&self) -> Arc<dyn TodoService>;

    /// Get token manager
    fn tokens(&self) -> Arc<TokenManager>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    todo_service: Arc<dyn TodoService>,
    token_manager: Arc<TokenManager>,
}

impl Services {
    /// Create a service container from already-built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        todo_service: Arc<dyn TodoService>,
        token_manager: Arc<TokenManager>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            todo_service,
            token_manager,
        }
    }

    /// Create service container from database connection and token manager
    pub fn from_connection(db: sea_orm::DatabaseConnection, token_manager: Arc<TokenManager>) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::new());

        Self {
            auth_service: Arc::new(Authenticator::new(
                uow.clone(),
                hasher.clone(),
                token_manager.clone(),
            )),
            user_service: Arc::new(UserManager::new(uow.clone(), hasher)),
            todo_service: Arc::new(TodoManager::new(uow)),
            token_manager,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn todos(&self) -> Arc<dyn TodoService> {
        self.todo_service.clone()
    }

    fn tokens(&self) -> Arc<TokenManager> {
        self.token_manager.clone()
    }
}
