//! In-memory repository for issues.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::domain::UserId;
use crate::issue::{
    domain::{Issue, IssueId},
    ports::{
        IssueFilter, IssueListing, IssueRepository, IssueRepositoryError, IssueRepositoryResult,
    },
};
use crate::pagination::Pagination;

/// Thread-safe in-memory issue repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueRepository {
    state: Arc<RwLock<HashMap<IssueId, Issue>>>,
}

impl InMemoryIssueRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> IssueRepositoryResult<RwLockReadGuard<'_, HashMap<IssueId, Issue>>> {
        self.state.read().map_err(|err| {
            IssueRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> IssueRepositoryResult<RwLockWriteGuard<'_, HashMap<IssueId, Issue>>> {
        self.state.write().map_err(|err| {
            IssueRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn newest_first(mut issues: Vec<Issue>) -> Vec<Issue> {
    issues.sort_by_key(|issue| (Reverse(issue.created_at()), issue.id().into_inner()));
    issues
}

#[async_trait]
impl IssueRepository for InMemoryIssueRepository {
    async fn store(&self, issue: &Issue) -> IssueRepositoryResult<()> {
        let mut issues = self.write()?;
        if issues.contains_key(&issue.id()) {
            return Err(IssueRepositoryError::DuplicateIssue(issue.id()));
        }
        issues.insert(issue.id(), issue.clone());
        Ok(())
    }

    async fn update(&self, issue: &Issue) -> IssueRepositoryResult<()> {
        let mut issues = self.write()?;
        let slot = issues
            .get_mut(&issue.id())
            .ok_or(IssueRepositoryError::NotFound(issue.id()))?;
        *slot = issue.clone();
        Ok(())
    }

    async fn delete(&self, id: IssueId) -> IssueRepositoryResult<bool> {
        Ok(self.write()?.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &IssueFilter,
        page: Pagination,
    ) -> IssueRepositoryResult<IssueListing> {
        let matching = newest_first(
            self.read()?
                .values()
                .filter(|issue| filter.matches(issue))
                .cloned()
                .collect(),
        );
        let total = u64::try_from(matching.len()).map_err(IssueRepositoryError::persistence)?;
        let skip = usize::try_from(page.skip()).map_err(IssueRepositoryError::persistence)?;
        let limit = usize::try_from(page.limit()).map_err(IssueRepositoryError::persistence)?;
        Ok(IssueListing {
            items: matching.into_iter().skip(skip).take(limit).collect(),
            total,
        })
    }

    async fn find_by_reporter(&self, reporter: &UserId) -> IssueRepositoryResult<Vec<Issue>> {
        Ok(newest_first(
            self.read()?
                .values()
                .filter(|issue| issue.is_reported_by(reporter))
                .cloned()
                .collect(),
        ))
    }
}
