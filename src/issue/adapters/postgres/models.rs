//! Diesel row models for issue persistence.

use super::schema::issues;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for issue records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueRow {
    /// Issue identifier.
    pub id: uuid::Uuid,
    /// Reporter identifier.
    pub reporter_id: Option<String>,
    /// Assigned technician identifier.
    pub technician_id: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Full issue document.
    pub document: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for issue records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = issues)]
#[diesel(treat_none_as_null = true)]
pub struct NewIssueRow {
    /// Issue identifier.
    pub id: uuid::Uuid,
    /// Reporter identifier.
    pub reporter_id: Option<String>,
    /// Assigned technician identifier.
    pub technician_id: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Full issue document.
    pub document: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
