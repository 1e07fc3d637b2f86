use std::env;

use common::error::PortalResult;
use log::info;
use sqlx::{postgres::PgConnectOptions, Executor, PgPool};

/// Statements that create the users table when it does not exist yet
const SCHEMA: &str = include_str!("schema.sql");

/// Return database connect options
/// # Errors
/// This function will return an error if any of the `PORTAL_DB_*` variables are missing or the
/// port is not an integer
pub fn db_options() -> PortalResult<PgConnectOptions> {
    options_with_prefix("PORTAL_DB")
}

/// Return test database connect options
/// # Errors
/// This function will return an error if any of the `PORTAL_TEST_DB_*` variables are missing or
/// the port is not an integer
pub fn test_db_options() -> PortalResult<PgConnectOptions> {
    options_with_prefix("PORTAL_TEST_DB")
}

/// Build connect options from the `{prefix}_HOST`, `{prefix}_PORT`, `{prefix}_NAME`,
/// `{prefix}_USER` and `{prefix}_PASSWORD` environment variables
fn options_with_prefix(prefix: &str) -> PortalResult<PgConnectOptions> {
    let port = env::var(format!("{prefix}_PORT"))?.parse()?;
    let options = PgConnectOptions::new()
        .host(&env::var(format!("{prefix}_HOST"))?)
        .port(port)
        .database(&env::var(format!("{prefix}_NAME"))?)
        .username(&env::var(format!("{prefix}_USER"))?)
        .password(&env::var(format!("{prefix}_PASSWORD"))?);
    Ok(options)
}

/// Create the tables required by the users service if they are missing
/// # Errors
/// This function will return an error if the schema statements fail
pub async fn ensure_schema(pool: &PgPool) -> PortalResult<()> {
    pool.execute(SCHEMA).await?;
    info!("Users schema is up to date");
    Ok(())
}
