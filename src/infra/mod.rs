//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Session token signing (JWT)
//! - Unit of Work giving services access to every repository

pub mod db;
pub mod repositories;
pub mod token;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    TodoRepository, TodoStatusRepository, TodoStatusStore, TodoStore, UserRepository, UserStore,
};
pub use token::{JwtCodec, TokenCodec};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockTodoRepository, MockTodoStatusRepository, MockUserRepository};
