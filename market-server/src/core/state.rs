use std::fmt;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db;
use crate::services::{LogMailer, Mailer};

/// Shared server state
///
/// Cloned into every handler; `Arc` fields make the clone shallow.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// Embedded SurrealDB handle
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub mailer: Arc<dyn Mailer>,
}

impl fmt::Debug for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            mailer,
        }
    }

    /// Initialize the state against the on-disk database
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)
            .map_err(|e| ServerError::Config(format!("Cannot create {}: {}", db_dir.display(), e)))?;

        let database = db::connect(&db_dir.join("market.db")).await?;

        if config.seed_demo_data {
            db::seed::seed_demo_data(&database).await?;
        }

        Ok(Self::new(
            config.clone(),
            database,
            Arc::new(JwtService::with_config(config.jwt.clone())),
            Arc::new(LogMailer),
        ))
    }

    /// In-memory state for tests, same wiring as production
    pub async fn for_tests() -> Result<Self> {
        let database = db::connect_memory().await?;
        let mut config = Config::with_overrides("/tmp/market-test", 0);
        config.jwt.secret = "test-secret-test-secret-test-secret!".to_string();
        Ok(Self::new(
            config.clone(),
            database,
            Arc::new(JwtService::with_config(config.jwt)),
            Arc::new(LogMailer),
        ))
    }

    pub fn db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
