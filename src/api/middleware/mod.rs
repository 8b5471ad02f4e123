//! API middleware.

mod auth;

pub use auth::{auth_middleware, require_level, require_self_or_level, CurrentUser};
