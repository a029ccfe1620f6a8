//! Database layer for folio.

pub mod entities;
pub mod migrations;
pub mod repositories;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use folio_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Initialize the public database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
}

/// Initialize the privileged service connection.
///
/// Sized small: it only serves admin-side lookups.
pub async fn init_service(config: &Config) -> Result<DatabaseConnection, AppError> {
    connect(
        config.database.service_url(),
        config.database.max_connections.clamp(1, 4),
        1,
    )
    .await
}

async fn connect(url: &str, max: u32, min: u32) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(url);

    opt.max_connections(max)
        .min_connections(min.min(max))
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Map a write error, turning unique violations into [`AppError::Conflict`].
pub(crate) fn write_error(err: DbErr, conflict: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(detail = %detail, "Unique constraint violation");
            AppError::Conflict(conflict.to_string())
        }
        _ => AppError::Database(err.to_string()),
    }
}
