//! `PostgreSQL` repository implementation for issues.

use super::{
    models::{IssueRow, NewIssueRow},
    schema::issues,
};
use crate::identity::domain::UserId;
use crate::issue::{
    domain::{Issue, IssueId, IssueStatus},
    ports::{
        IssueFilter, IssueListing, IssueRepository, IssueRepositoryError, IssueRepositoryResult,
    },
};
use crate::pagination::Pagination;
use crate::persistence::PgPool;
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use uuid::Uuid;

/// Disagreement between the indexed columns and the stored document.
#[derive(Debug, Error)]
enum RowMismatch {
    #[error("document id {document} does not match row id {row}")]
    Id { row: Uuid, document: Uuid },
    #[error("status column {column} does not match document status {document}")]
    Status {
        column: IssueStatus,
        document: IssueStatus,
    },
}

/// `PostgreSQL`-backed issue repository.
#[derive(Debug, Clone)]
pub struct PostgresIssueRepository {
    pool: PgPool,
}

impl PostgresIssueRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> IssueRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IssueRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IssueRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IssueRepositoryError::persistence)?
    }
}

#[async_trait]
impl IssueRepository for PostgresIssueRepository {
    async fn store(&self, issue: &Issue) -> IssueRepositoryResult<()> {
        let issue_id = issue.id();
        let new_row = to_new_row(issue)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(issues::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        IssueRepositoryError::DuplicateIssue(issue_id)
                    }
                    _ => IssueRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, issue: &Issue) -> IssueRepositoryResult<()> {
        let issue_id = issue.id();
        let row = to_new_row(issue)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(issues::table.filter(issues::id.eq(issue_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(IssueRepositoryError::persistence)?;
            if updated == 0 {
                return Err(IssueRepositoryError::NotFound(issue_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: IssueId) -> IssueRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(issues::table.filter(issues::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(IssueRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        self.run_blocking(move |connection| {
            let row = issues::table
                .filter(issues::id.eq(id.into_inner()))
                .select(IssueRow::as_select())
                .first::<IssueRow>(connection)
                .optional()
                .map_err(IssueRepositoryError::persistence)?;
            row.map(row_to_issue).transpose()
        })
        .await
    }

    async fn list(
        &self,
        filter: &IssueFilter,
        page: Pagination,
    ) -> IssueRepositoryResult<IssueListing> {
        let criteria = filter.clone();
        let offset = i64::try_from(page.skip()).map_err(IssueRepositoryError::persistence)?;
        let limit = i64::from(page.limit());

        self.run_blocking(move |connection| {
            let total: i64 = filtered(&criteria)
                .count()
                .get_result(connection)
                .map_err(IssueRepositoryError::persistence)?;
            let rows = filtered(&criteria)
                .order((issues::created_at.desc(), issues::id.asc()))
                .offset(offset)
                .limit(limit)
                .select(IssueRow::as_select())
                .load::<IssueRow>(connection)
                .map_err(IssueRepositoryError::persistence)?;
            Ok(IssueListing {
                items: rows
                    .into_iter()
                    .map(row_to_issue)
                    .collect::<IssueRepositoryResult<Vec<_>>>()?,
                total: u64::try_from(total).map_err(IssueRepositoryError::persistence)?,
            })
        })
        .await
    }

    async fn find_by_reporter(&self, reporter: &UserId) -> IssueRepositoryResult<Vec<Issue>> {
        let reporter_id = reporter.as_str().to_owned();
        self.run_blocking(move |connection| {
            issues::table
                .filter(issues::reporter_id.eq(reporter_id))
                .order((issues::created_at.desc(), issues::id.asc()))
                .select(IssueRow::as_select())
                .load::<IssueRow>(connection)
                .map_err(IssueRepositoryError::persistence)?
                .into_iter()
                .map(row_to_issue)
                .collect()
        })
        .await
    }
}

fn filtered(filter: &IssueFilter) -> issues::BoxedQuery<'static, Pg> {
    let mut query = issues::table.into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(issues::status.eq(status.as_str()));
    }
    if let Some(technician) = &filter.technician {
        query = query.filter(issues::technician_id.eq(technician.as_str().to_owned()));
    }
    if let Some(reporter) = &filter.reporter {
        query = query.filter(issues::reporter_id.eq(reporter.as_str().to_owned()));
    }
    query
}

fn to_new_row(issue: &Issue) -> IssueRepositoryResult<NewIssueRow> {
    let document = serde_json::to_value(issue).map_err(IssueRepositoryError::persistence)?;

    Ok(NewIssueRow {
        id: issue.id().into_inner(),
        reporter_id: issue.reporter().map(|id| id.as_str().to_owned()),
        technician_id: issue.assigned_technician().map(|id| id.as_str().to_owned()),
        status: issue.status().as_str().to_owned(),
        document,
        created_at: issue.created_at(),
        updated_at: issue.updated_at(),
    })
}

fn row_to_issue(row: IssueRow) -> IssueRepositoryResult<Issue> {
    let IssueRow {
        id,
        status,
        document,
        ..
    } = row;

    let issue = serde_json::from_value::<Issue>(document).map_err(IssueRepositoryError::persistence)?;
    let indexed_status =
        IssueStatus::try_from(status.as_str()).map_err(IssueRepositoryError::persistence)?;
    if issue.id().into_inner() != id {
        return Err(IssueRepositoryError::persistence(RowMismatch::Id {
            row: id,
            document: issue.id().into_inner(),
        }));
    }
    if issue.status() != indexed_status {
        return Err(IssueRepositoryError::persistence(RowMismatch::Status {
            column: indexed_status,
            document: issue.status(),
        }));
    }
    issue.validate().map_err(IssueRepositoryError::persistence)?;
    Ok(issue)
}
