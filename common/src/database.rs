use sqlx::{Connection, Database, Pool};

use crate::error::PortalResult;

pub mod postgres;

/// Implementors are able to provide connection pools specific to the specified [Database] type
pub trait ConnectionBuilder<D: Database> {
    /// Return a new pool of database connections. Requires the connection `options` and min/max
    /// number of connections to hold.
    async fn create_pool(
        options: <D::Connection as Connection>::Options,
        max_connections: u32,
        min_connection: u32,
    ) -> PortalResult<Pool<D>>;
    /// Return a new pool of database connection with connections not explicitly created. Requires
    /// the connection `options` and min/max number of connections to hold.
    fn create_pool_lazy(
        options: <D::Connection as Connection>::Options,
        max_connections: u32,
        min_connection: u32,
    ) -> Pool<D>;
}

/// Returns true if the `error` was raised by the database because a unique constraint was violated
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error.code().as_deref() == Some("23505"),
        _ => false,
    }
}
