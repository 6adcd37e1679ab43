pub mod models;
pub mod schema;

use diesel::{pg::PgConnection, Connection};
use diesel_async::{
    pg::AsyncPgConnection,
    pooled_connection::{
        deadpool::{BuildError, Pool},
        AsyncDieselConnectionManager,
    },
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::error::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub async fn build_db_pool(db_url: &str) -> Result<Pool<AsyncPgConnection>, BuildError> {
    let pool_config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);
    let pool = Pool::builder(pool_config).build()?;

    Ok(pool)
}

/// Applies pending schema migrations over a short-lived blocking connection.
pub fn run_migrations(db_url: &str) -> Result<usize, Box<dyn Error + Send + Sync>> {
    let mut conn = PgConnection::establish(db_url)?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    Ok(applied.len())
}
