//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns:
//! access levels, token payloads, credential hashing, users and todos.

pub mod access_level;
pub mod password;
pub mod todo;
pub mod token;
pub mod user;

pub use access_level::{authorize, AccessLevel, Decision, InvalidAccessLevel};
pub use password::{ensure_confirmed, validate_password, Argon2Hasher, CredentialHasher};
pub use todo::{Image, Todo, TodoFields, TodoResponse, TodoStatus};
pub use token::{TokenError, TokenPayload};
pub use user::{CreateUser, UpdateUser, User, UserResponse};
