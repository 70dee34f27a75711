//! Startup integration tests: on-disk database wiring and the demo seed

use market_server::core::{Config, ServerState};
use market_server::db;
use market_server::db::repository::{StoreRepository, UserRepository};
use shared::Role;

#[tokio::test]
async fn test_initialize_opens_database_and_seeds() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.seed_demo_data = true;
    config.jwt.secret = "test-secret-test-secret-test-secret!".to_string();

    let state = ServerState::initialize(&config).await.unwrap();
    assert!(config.database_dir().exists());

    let users = UserRepository::new(state.db()).find_all().await.unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().any(|u| u.role == Role::Admin));

    let stores = StoreRepository::new(state.db()).find_all().await.unwrap();
    assert_eq!(stores.len(), 2);
    assert!(stores.iter().any(|s| s.is_syncable()));
    assert!(stores.iter().any(|s| !s.is_syncable()));
}

#[tokio::test]
async fn test_seed_runs_once() {
    let conn = db::connect_memory().await.unwrap();
    db::seed::seed_demo_data(&conn).await.unwrap();
    db::seed::seed_demo_data(&conn).await.unwrap();

    let users = UserRepository::new(conn).find_all().await.unwrap();
    assert_eq!(users.len(), 3);
}
