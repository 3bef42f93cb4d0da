//! Issue lifecycle orchestration: authorization, transitions, messaging and
//! image cascades.

use super::IssueNotifications;
use crate::error::ErrorKind;
use crate::identity::domain::{Principal, UserId};
use crate::identity::ports::UserDirectory;
use crate::issue::{
    domain::{Issue, IssueContent, IssueDomainError, IssueId, IssuePatch, IssueStatus, ReporterContact},
    ports::{IssueFilter, IssueRepository, IssueRepositoryError},
};
use crate::media::domain::StoredImage;
use crate::media::ports::MediaStore;
use crate::media::services::purge_images;
use crate::notification::ports::Notifier;
use crate::pagination::{Page, Pagination};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for reporting an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueRequest {
    /// Issue title.
    pub title: String,
    /// Issue description.
    pub description: String,
    /// Authenticated reporter, if any.
    pub reporter: Option<UserId>,
    /// Contact details for notifications.
    pub contact: Option<ReporterContact>,
    /// Images uploaded before the issue is created.
    pub images: Vec<StoredImage>,
}

impl CreateIssueRequest {
    /// Creates an anonymous request without images.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            reporter: None,
            contact: None,
            images: Vec::new(),
        }
    }

    /// Sets the reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: UserId) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Sets the contact details.
    #[must_use]
    pub fn with_contact(mut self, contact: ReporterContact) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Sets the uploaded images.
    #[must_use]
    pub fn with_images(mut self, images: Vec<StoredImage>) -> Self {
        self.images = images;
        self
    }
}

/// Request payload for editing an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditIssueRequest {
    /// Title and description changes.
    pub patch: IssuePatch,
    /// Images to append.
    pub images: Vec<StoredImage>,
}

impl EditIssueRequest {
    /// Creates an edit request from a patch.
    #[must_use]
    pub fn new(patch: IssuePatch) -> Self {
        Self {
            patch,
            images: Vec::new(),
        }
    }

    /// Sets the images to append.
    #[must_use]
    pub fn with_images(mut self, images: Vec<StoredImage>) -> Self {
        self.images = images;
        self
    }
}

/// Request payload for listing every issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListIssuesRequest {
    /// Filter criteria.
    pub filter: IssueFilter,
    /// Page window.
    pub page: Pagination,
}

/// Outcome of deleting an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDeletion {
    /// Deleted issue.
    pub issue_id: IssueId,
    /// Media identifiers whose deletion failed.
    pub failed_media: Vec<String>,
}

/// Service-level errors for issue lifecycle operations.
#[derive(Debug, Error)]
pub enum IssueLifecycleError {
    /// Domain validation or transition rule failed.
    #[error(transparent)]
    Domain(#[from] IssueDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IssueRepositoryError),
    /// No issue exists with the given identifier.
    #[error("issue {0} not found")]
    NotFound(IssueId),
    /// The requester lacks the role or ownership the operation requires.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
}

impl IssueLifecycleError {
    /// Classifies the error for the transport layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) if err.is_transition_error() => ErrorKind::InvalidTransition,
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(IssueRepositoryError::NotFound(_)) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Repository(_) => ErrorKind::Internal,
            Self::Forbidden(_) => ErrorKind::Forbidden,
        }
    }
}

/// Result type for issue lifecycle operations.
pub type IssueLifecycleResult<T> = Result<T, IssueLifecycleError>;

/// Issue lifecycle orchestration service.
pub struct IssueLifecycleService<R, M, N, D, C>
where
    R: IssueRepository + ?Sized,
    M: MediaStore + ?Sized,
    N: Notifier + ?Sized,
    D: UserDirectory + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    media: Arc<M>,
    notifications: IssueNotifications<N, D>,
    clock: Arc<C>,
}

impl<R, M, N, D, C> IssueLifecycleService<R, M, N, D, C>
where
    R: IssueRepository + ?Sized,
    M: MediaStore + ?Sized,
    N: Notifier + ?Sized,
    D: UserDirectory + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        media: Arc<M>,
        notifications: IssueNotifications<N, D>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            media,
            notifications,
            clock,
        }
    }

    async fn find_issue_or_error(&self, issue_id: IssueId) -> IssueLifecycleResult<Issue> {
        self.repository
            .find_by_id(issue_id)
            .await?
            .ok_or(IssueLifecycleError::NotFound(issue_id))
    }

    fn ensure_owner_or_staff(issue: &Issue, requester: &Principal) -> IssueLifecycleResult<()> {
        if requester.is_staff() || issue.is_reported_by(requester.id()) {
            Ok(())
        } else {
            Err(IssueLifecycleError::Forbidden(
                "only the reporter or staff may do this",
            ))
        }
    }

    const fn ensure_staff(requester: &Principal) -> IssueLifecycleResult<()> {
        if requester.is_staff() {
            Ok(())
        } else {
            Err(IssueLifecycleError::Forbidden("staff role required"))
        }
    }

    const fn ensure_admin(requester: &Principal) -> IssueLifecycleResult<()> {
        if requester.is_admin() {
            Ok(())
        } else {
            Err(IssueLifecycleError::Forbidden("admin role required"))
        }
    }

    /// Reports a new issue in the `Open` status.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::Domain`] when the title or description
    /// is blank, or repository errors.
    pub async fn create(&self, request: CreateIssueRequest) -> IssueLifecycleResult<Issue> {
        let CreateIssueRequest {
            title,
            description,
            reporter,
            contact,
            images,
        } = request;
        let content = IssueContent::new(&title, &description)?;
        let issue = Issue::open(reporter, contact, content, images, &*self.clock);
        self.repository.store(&issue).await?;
        info!(issue_id = %issue.id(), reporter = ?issue.reporter(), "issue reported");
        Ok(issue)
    }

    /// Returns one issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::NotFound`] when the issue does not
    /// exist, or repository errors.
    pub async fn get_by_id(
        &self,
        issue_id: IssueId,
        requester: &Principal,
    ) -> IssueLifecycleResult<Issue> {
        debug!(%issue_id, requester = %requester.id(), "fetching issue");
        self.find_issue_or_error(issue_id).await
    }

    /// Lists every issue, newest first. Staff only.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::Forbidden`] for non-staff requesters,
    /// or repository errors.
    pub async fn list_all(
        &self,
        request: &ListIssuesRequest,
        requester: &Principal,
    ) -> IssueLifecycleResult<Page<Issue>> {
        Self::ensure_staff(requester)?;
        let listing = self.repository.list(&request.filter, request.page).await?;
        Ok(Page {
            items: listing.items,
            pagination: request.page.info(listing.total),
        })
    }

    /// Lists the issues reported by `requester`, newest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_mine(&self, requester: &UserId) -> IssueLifecycleResult<Vec<Issue>> {
        Ok(self.repository.find_by_reporter(requester).await?)
    }

    /// Moves an issue to a new status and notifies the reporter.
    ///
    /// Staff may move issues forward; only admins may reopen them.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::Forbidden`] when the requester may not
    /// take this edge, [`IssueLifecycleError::NotFound`] when the issue does
    /// not exist, domain transition errors, or repository errors.
    pub async fn update_status(
        &self,
        issue_id: IssueId,
        target: IssueStatus,
        requester: &Principal,
    ) -> IssueLifecycleResult<Issue> {
        Self::ensure_staff(requester)?;
        let mut issue = self.find_issue_or_error(issue_id).await?;
        let previous = issue.status();
        if previous.is_reopen(target) {
            Self::ensure_admin(requester)?;
        }
        issue.transition_to(target, &*self.clock)?;
        self.repository.update(&issue).await?;
        info!(%issue_id, from = %previous, to = %target, by = %requester.id(), "issue status changed");
        self.notifications.status_changed(&issue).await;
        Ok(issue)
    }

    /// Appends a message to the thread.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::NotFound`] when the issue does not
    /// exist, [`IssueLifecycleError::Forbidden`] when the author is neither
    /// the reporter nor staff, domain errors for a blank body, or repository
    /// errors.
    pub async fn add_message(
        &self,
        issue_id: IssueId,
        body: &str,
        author: &Principal,
    ) -> IssueLifecycleResult<Issue> {
        let mut issue = self.find_issue_or_error(issue_id).await?;
        Self::ensure_owner_or_staff(&issue, author)?;
        let message_id = issue.add_message(author.id().clone(), body, &*self.clock)?;
        self.repository.update(&issue).await?;
        debug!(%issue_id, %message_id, author = %author.id(), "message added");
        Ok(issue)
    }

    /// Marks every message as read by `reader`.
    ///
    /// Repeating the call changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::NotFound`] when the issue does not
    /// exist, [`IssueLifecycleError::Forbidden`] when the reader is neither
    /// the reporter nor staff, or repository errors.
    pub async fn mark_messages_read(
        &self,
        issue_id: IssueId,
        reader: &Principal,
    ) -> IssueLifecycleResult<Issue> {
        let mut issue = self.find_issue_or_error(issue_id).await?;
        Self::ensure_owner_or_staff(&issue, reader)?;
        let marked = issue.mark_messages_read(reader.id(), &*self.clock);
        if marked > 0 {
            self.repository.update(&issue).await?;
        }
        debug!(%issue_id, reader = %reader.id(), marked, "messages marked read");
        Ok(issue)
    }

    /// Assigns a technician and notifies them. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::Forbidden`] for non-admin requesters,
    /// [`IssueLifecycleError::NotFound`] when the issue does not exist, or
    /// repository errors.
    pub async fn assign_technician(
        &self,
        issue_id: IssueId,
        technician: UserId,
        requester: &Principal,
    ) -> IssueLifecycleResult<Issue> {
        Self::ensure_admin(requester)?;
        let mut issue = self.find_issue_or_error(issue_id).await?;
        issue.assign_technician(technician.clone(), &*self.clock);
        self.repository.update(&issue).await?;
        info!(%issue_id, %technician, "technician assigned");
        self.notifications
            .technician_assigned(&issue, &technician)
            .await;
        Ok(issue)
    }

    /// Removes the technician, reopening the issue if work was in progress.
    /// Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::Forbidden`] for non-admin requesters,
    /// [`IssueLifecycleError::NotFound`] when the issue does not exist, or
    /// repository errors.
    pub async fn remove_technician(
        &self,
        issue_id: IssueId,
        requester: &Principal,
    ) -> IssueLifecycleResult<Issue> {
        Self::ensure_admin(requester)?;
        let mut issue = self.find_issue_or_error(issue_id).await?;
        let previous = issue.remove_technician(&*self.clock);
        self.repository.update(&issue).await?;
        info!(%issue_id, technician = ?previous, status = %issue.status(), "technician removed");
        Ok(issue)
    }

    /// Appends already-uploaded images.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::NotFound`] when the issue does not
    /// exist, [`IssueDomainError::NoImages`] when `images` is empty, or
    /// repository errors.
    pub async fn add_images(
        &self,
        issue_id: IssueId,
        images: Vec<StoredImage>,
    ) -> IssueLifecycleResult<Issue> {
        let mut issue = self.find_issue_or_error(issue_id).await?;
        let count = images.len();
        issue.attach_images(images, &*self.clock)?;
        self.repository.update(&issue).await?;
        debug!(%issue_id, count, "images attached");
        Ok(issue)
    }

    /// Deletes an issue after requesting deletion of all its images.
    /// Admin only.
    ///
    /// Image deletion failures are logged and reported, and never stop the
    /// record from being removed.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::Forbidden`] for non-admin requesters,
    /// [`IssueLifecycleError::NotFound`] when the issue does not exist, or
    /// repository errors.
    pub async fn delete_issue(
        &self,
        issue_id: IssueId,
        requester: &Principal,
    ) -> IssueLifecycleResult<IssueDeletion> {
        Self::ensure_admin(requester)?;
        let issue = self.find_issue_or_error(issue_id).await?;
        let failed_media = purge_images(&*self.media, issue.images()).await;
        if !failed_media.is_empty() {
            warn!(%issue_id, ?failed_media, "some issue images could not be deleted");
        }
        if !self.repository.delete(issue_id).await? {
            return Err(IssueLifecycleError::NotFound(issue_id));
        }
        info!(%issue_id, by = %requester.id(), "issue deleted");
        Ok(IssueDeletion {
            issue_id,
            failed_media,
        })
    }

    /// Edits title and description and appends images.
    ///
    /// # Errors
    ///
    /// Returns [`IssueLifecycleError::NotFound`] when the issue does not
    /// exist, [`IssueLifecycleError::Forbidden`] when the requester is
    /// neither the reporter nor staff, domain errors for blank fields, or
    /// repository errors.
    pub async fn edit_issue(
        &self,
        issue_id: IssueId,
        request: EditIssueRequest,
        requester: &Principal,
    ) -> IssueLifecycleResult<Issue> {
        let mut issue = self.find_issue_or_error(issue_id).await?;
        Self::ensure_owner_or_staff(&issue, requester)?;
        let EditIssueRequest { patch, images } = request;
        issue.apply_patch(patch, &*self.clock)?;
        if !images.is_empty() {
            issue.attach_images(images, &*self.clock)?;
        }
        self.repository.update(&issue).await?;
        debug!(%issue_id, by = %requester.id(), "issue edited");
        Ok(issue)
    }
}
