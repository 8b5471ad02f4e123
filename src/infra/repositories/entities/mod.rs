//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod todo;
pub mod todo_status;
pub mod user;
