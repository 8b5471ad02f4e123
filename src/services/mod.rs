//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All persistence goes through the Unit of Work for centralized
//! repository access.

mod auth_service;
pub mod container;
mod todo_service;
mod token_manager;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, LoginResponse};
pub use todo_service::{TodoManager, TodoService};
pub use token_manager::TokenManager;
pub use user_service::{PasswordChange, Registration, UserManager, UserService};
