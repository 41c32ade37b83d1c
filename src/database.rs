// src/database.rs
use std::{future::Future, time::Duration};

use sqlx::{
    migrate::{MigrateDatabase, Migrator},
    postgres::PgPoolOptions,
    PgPool, Postgres,
};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::startup::StartupError;

/// SQL files under `migrations/`, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLSTATE `invalid_catalog_name`: the database named in the URL does not exist.
const INVALID_CATALOG_NAME: &str = "3D000";

pub async fn create_pool(settings: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(&settings.url)
        .await
}

/// One startup attempt: open the pool (creating the database if missing), apply pending migrations.
pub async fn connect_and_migrate(settings: &DatabaseConfig) -> Result<PgPool, StartupError> {
    let db_pool = connect_creating_if_missing(
        || create_pool(settings),
        || Postgres::create_database(&settings.url),
    )
    .await?;
    MIGRATOR.run(&db_pool).await?;
    info!("Migrations applied");
    Ok(db_pool)
}

/// Connects to the configured database. Only when the server reports it
/// missing is `create` run (through the maintenance database) and the
/// connection retried once.
async fn connect_creating_if_missing<T, C, CFut, M, MFut>(
    mut connect: C,
    create: M,
) -> Result<T, sqlx::Error>
where
    C: FnMut() -> CFut,
    CFut: Future<Output = Result<T, sqlx::Error>>,
    M: FnOnce() -> MFut,
    MFut: Future<Output = Result<(), sqlx::Error>>,
{
    match connect().await {
        Err(e) if is_missing_database(&e) => {
            info!("Database does not exist, creating it");
            create().await?;
            connect().await
        }
        other => other,
    }
}

fn is_missing_database(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(INVALID_CATALOG_NAME),
        _ => false,
    }
}
