//! Market Server - grocery marketplace backend
//!
//! # Architecture overview
//!
//! - **Catalog** (`catalog`): partner feed adapters and the reconciliation
//!   engine that folds external feeds into the canonical catalog
//! - **Orders** (`orders`): order placement and the delivery status
//!   state machine
//! - **Database** (`db`): embedded SurrealDB storage and repositories
//! - **Auth** (`auth`): JWT + Argon2 authentication, role middleware
//! - **HTTP API** (`api`): RESTful routes for customers, drivers and admins
//!
//! # Module structure
//!
//! ```text
//! market-server/src/
//! ├── core/          # Config, state, server startup
//! ├── auth/          # JWT, password hashing, middleware
//! ├── catalog/       # Feed adapters, reconciliation, catalog views
//! ├── orders/        # Placement, status transitions
//! ├── api/           # HTTP routes and handlers
//! ├── services/      # Mailer
//! ├── db/            # Models, repositories, schema, seed
//! └── utils/         # Logger, time
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, Role};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Set up the process environment: dotenv, working directory, logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/market".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
