//! `PostgreSQL` user directory.

use super::{models::UserRow, schema::users};
use crate::identity::{
    domain::{Role, UserId, UserProfile},
    ports::{UserDirectory, UserDirectoryError, UserDirectoryResult},
};
use crate::persistence::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed user directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Creates a directory from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserDirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserDirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserDirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserDirectoryError::persistence)?
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> UserDirectoryResult<Option<UserProfile>> {
        let lookup = id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserDirectoryError::persistence)?;
            row.map(row_to_profile).transpose()
        })
        .await
    }
}

fn row_to_profile(row: UserRow) -> UserDirectoryResult<UserProfile> {
    let UserRow {
        id: raw_id,
        first_name,
        last_name,
        email,
        phone,
        role: role_name,
    } = row;

    let id = UserId::new(raw_id).map_err(UserDirectoryError::persistence)?;
    let role = Role::try_from(role_name.as_str()).map_err(UserDirectoryError::persistence)?;
    let profile = UserProfile::new(id, first_name, last_name, email, role);
    Ok(match phone {
        Some(number) => profile.with_phone(number),
        None => profile,
    })
}
