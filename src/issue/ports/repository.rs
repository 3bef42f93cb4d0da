//! Repository port for issue persistence and filtered listing.

use crate::identity::domain::UserId;
use crate::issue::domain::{Issue, IssueId, IssueStatus};
use crate::pagination::Pagination;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue repository operations.
pub type IssueRepositoryResult<T> = Result<T, IssueRepositoryError>;

/// Optional criteria for listing issues; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// Only issues in this status.
    pub status: Option<IssueStatus>,
    /// Only issues assigned to this technician.
    pub technician: Option<UserId>,
    /// Only issues reported by this user.
    pub reporter: Option<UserId>,
}

impl IssueFilter {
    /// Returns whether `issue` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        self.status.is_none_or(|status| issue.status() == status)
            && self
                .technician
                .as_ref()
                .is_none_or(|technician| issue.assigned_technician() == Some(technician))
            && self
                .reporter
                .as_ref()
                .is_none_or(|reporter| issue.reporter() == Some(reporter))
    }
}

/// One page of issues plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueListing {
    /// Issues on the requested page, newest first.
    pub items: Vec<Issue>,
    /// Number of issues matching the filter.
    pub total: u64,
}

/// Issue persistence contract.
///
/// Writes replace the whole document, so concurrent updates of one issue
/// are last-write-wins.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Stores a new issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::DuplicateIssue`] when the identifier
    /// already exists.
    async fn store(&self, issue: &Issue) -> IssueRepositoryResult<()>;

    /// Replaces an existing issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NotFound`] when the issue does not
    /// exist.
    async fn update(&self, issue: &Issue) -> IssueRepositoryResult<()>;

    /// Removes an issue; returns `false` when it did not exist.
    async fn delete(&self, id: IssueId) -> IssueRepositoryResult<bool>;

    /// Finds an issue by identifier.
    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>>;

    /// Lists issues matching `filter`, newest first, within `page`.
    async fn list(
        &self,
        filter: &IssueFilter,
        page: Pagination,
    ) -> IssueRepositoryResult<IssueListing>;

    /// Returns every issue reported by `reporter`, newest first.
    async fn find_by_reporter(&self, reporter: &UserId) -> IssueRepositoryResult<Vec<Issue>>;
}

/// Errors returned by issue repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueRepositoryError {
    /// An issue with the same identifier already exists.
    #[error("duplicate issue identifier: {0}")]
    DuplicateIssue(IssueId),

    /// The issue was not found.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
