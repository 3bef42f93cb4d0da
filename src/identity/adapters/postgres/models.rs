//! Diesel row models for user profiles.

use super::schema::users;
use diesel::prelude::*;

/// Query result row for user profiles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Opaque user identifier.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// Role name.
    pub role: String,
}
