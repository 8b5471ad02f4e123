//! Unit of Work - single access point to all repositories.
//!
//! Services depend on [`UnitOfWork`] rather than on individual stores so a
//! test can swap the whole persistence layer for in-memory fakes.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    TodoRepository, TodoStatusRepository, TodoStatusStore, TodoStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get todo repository
    fn todos(&self) -> Arc<dyn TodoRepository>;

    /// Get todo status repository
    fn statuses(&self) -> Arc<dyn TodoStatusRepository>;
}

/// Concrete implementation of UnitOfWork backed by one connection pool
pub struct Persistence {
    user_repo: Arc<UserStore>,
    todo_repo: Arc<TodoStore>,
    status_repo: Arc<TodoStatusStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            todo_repo: Arc::new(TodoStore::new(db.clone())),
            status_repo: Arc::new(TodoStatusStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn todos(&self) -> Arc<dyn TodoRepository> {
        self.todo_repo.clone()
    }

    fn statuses(&self) -> Arc<dyn TodoStatusRepository> {
        self.status_repo.clone()
    }
}
