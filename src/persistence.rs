//! `PostgreSQL` connection pooling shared by the Diesel adapters.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool type used by every Diesel adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool for `database_url` with at most `max_size`
/// connections.
///
/// Pool construction opens connections eagerly, so call this from a
/// blocking context.
///
/// # Errors
///
/// Returns the pool error when no connection can be established.
pub fn connect(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size.max(1)).build(manager)
}
