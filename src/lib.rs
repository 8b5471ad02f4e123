//! Todo API - todo lists with per-user statuses and tiered access control
//!
//! Users authenticate with username and password and receive a signed
//! session token carrying their access level (basic, manager or admin).
//! Every protected route checks that level before doing any work.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities, access levels, tokens and password rules
//! - **services**: Application use cases and business logic
//! - **infra**: Database, repositories and token signing
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response helpers
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{AccessLevel, TokenPayload, User};
pub use errors::{AppError, AppResult};
