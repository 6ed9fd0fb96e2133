#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use configs::AppConfig;
use models::db::connect_with_config;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Database tests run only against an explicitly provided server.
pub fn db_tests_enabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_err() && std::env::var("DATABASE_URL").is_ok()
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let mut cfg = AppConfig::load_and_validate()?;
    cfg.database.min_connections = 1;

    MIGRATED
        .get_or_init(|| async {
            let db = connect_with_config(&cfg.database).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            let _ = db.close().await;
        })
        .await;

    // A fresh pool for the current test's runtime
    connect_with_config(&cfg.database).await
}
