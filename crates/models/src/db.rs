use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Pool options derived from configuration.
pub fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(cfg.connection_url());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    opt
}

/// Build the shared pool and prove it can reach the server.
/// The returned handle is cheap to clone; every clone shares one pool.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(connect_options(cfg)).await?;
    if let Err(e) = db.ping().await {
        let _ = db.close().await;
        return Err(e.into());
    }
    info!(url = %cfg.redacted_url(), max_connections = cfg.max_connections, "database pool ready");
    Ok(db)
}

/// Connect using `config.toml` + environment, the same sources the server uses.
pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let cfg = configs::AppConfig::load_and_validate()?;
    connect_with_config(&cfg.database).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_options_follow_config() {
        let cfg = DatabaseConfig {
            host: "db".into(),
            user: "user".into(),
            password: "password".into(),
            max_connections: 7,
            min_connections: 3,
            connect_timeout_secs: 4,
            acquire_timeout_secs: 6,
            ..Default::default()
        };
        let opt = connect_options(&cfg);
        assert_eq!(opt.get_url(), "postgres://user:password@db:5432/subscriptions_db?sslmode=disable");
        assert_eq!(opt.get_max_connections(), Some(7));
        assert_eq!(opt.get_min_connections(), Some(3));
        assert_eq!(opt.get_connect_timeout(), Some(Duration::from_secs(4)));
        assert_eq!(opt.get_acquire_timeout(), Some(Duration::from_secs(6)));
    }
}
