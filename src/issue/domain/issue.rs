//! Issue aggregate root.

use super::{IssueDomainError, IssueId, IssueStatus, Message, MessageId};
use crate::identity::domain::UserId;
use crate::media::domain::StoredImage;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated title and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueContent {
    title: String,
    description: String,
}

impl IssueContent {
    /// Trims and validates title and description.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyTitle`] or
    /// [`IssueDomainError::EmptyDescription`] for blank values.
    pub fn new(title: &str, description: &str) -> Result<Self, IssueDomainError> {
        Ok(Self {
            title: validated_title(title)?,
            description: validated_description(description)?,
        })
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

fn validated_title(raw: &str) -> Result<String, IssueDomainError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(IssueDomainError::EmptyTitle);
    }
    Ok(title.to_owned())
}

fn validated_description(raw: &str) -> Result<String, IssueDomainError> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(IssueDomainError::EmptyDescription);
    }
    Ok(description.to_owned())
}

/// Contact details supplied by a reporter, typically an anonymous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterContact {
    name: String,
    phone: String,
}

impl ReporterContact {
    /// Creates a contact; both fields are trimmed and required.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InvalidContact`] when either field is blank.
    pub fn new(name: &str, phone: &str) -> Result<Self, IssueDomainError> {
        let trimmed_name = name.trim();
        let trimmed_phone = phone.trim();
        if trimmed_name.is_empty() {
            return Err(IssueDomainError::InvalidContact("name is required".to_owned()));
        }
        if trimmed_phone.is_empty() {
            return Err(IssueDomainError::InvalidContact("phone is required".to_owned()));
        }
        Ok(Self {
            name: trimmed_name.to_owned(),
            phone: trimmed_phone.to_owned(),
        })
    }

    /// Returns the contact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact phone as supplied.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

/// Partial update of the editable issue fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    title: Option<String>,
    description: Option<String>,
}

impl IssuePatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Issue aggregate root.
///
/// Every mutator refreshes `updated_at` from the supplied clock, and no
/// mutator can leave the issue `InProgress` without a technician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    id: IssueId,
    reporter: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contact: Option<ReporterContact>,
    title: String,
    description: String,
    images: Vec<StoredImage>,
    status: IssueStatus,
    assigned_technician: Option<UserId>,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Issue {
    /// Opens a new issue with no technician and an empty thread.
    #[must_use]
    pub fn open(
        reporter: Option<UserId>,
        contact: Option<ReporterContact>,
        content: IssueContent,
        images: Vec<StoredImage>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let IssueContent { title, description } = content;
        Self {
            id: IssueId::new(),
            reporter,
            contact,
            title,
            description,
            images,
            status: IssueStatus::Open,
            assigned_technician: None,
            messages: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the reporter, if the issue was not reported anonymously.
    #[must_use]
    pub const fn reporter(&self) -> Option<&UserId> {
        self.reporter.as_ref()
    }

    /// Returns the reporter contact details, if given.
    #[must_use]
    pub const fn contact(&self) -> Option<&ReporterContact> {
        self.contact.as_ref()
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the attached images in upload order.
    #[must_use]
    pub fn images(&self) -> &[StoredImage] {
        &self.images
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        self.status
    }

    /// Returns the assigned technician.
    #[must_use]
    pub const fn assigned_technician(&self) -> Option<&UserId> {
        self.assigned_technician.as_ref()
    }

    /// Returns the message thread in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user` reported this issue.
    #[must_use]
    pub fn is_reported_by(&self, user: &UserId) -> bool {
        self.reporter.as_ref() == Some(user)
    }

    /// Checks the invariants every stored issue must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::TechnicianRequired`] for an `InProgress`
    /// issue without a technician.
    pub const fn validate(&self) -> Result<(), IssueDomainError> {
        if matches!(self.status, IssueStatus::InProgress) && self.assigned_technician.is_none() {
            return Err(IssueDomainError::TechnicianRequired);
        }
        Ok(())
    }

    /// Moves the issue to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InvalidStatusTransition`] when the pair is
    /// not an edge of the state machine and
    /// [`IssueDomainError::TechnicianRequired`] when starting work without a
    /// technician.
    pub fn transition_to(
        &mut self,
        target: IssueStatus,
        clock: &impl Clock,
    ) -> Result<(), IssueDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(IssueDomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        if target == IssueStatus::InProgress && self.assigned_technician.is_none() {
            return Err(IssueDomainError::TechnicianRequired);
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Assigns (or replaces) the technician.
    pub fn assign_technician(&mut self, technician: UserId, clock: &impl Clock) {
        self.assigned_technician = Some(technician);
        self.touch(clock);
    }

    /// Clears the technician, reopening the issue if work was in progress.
    ///
    /// Returns the previously assigned technician.
    pub fn remove_technician(&mut self, clock: &impl Clock) -> Option<UserId> {
        let previous = self.assigned_technician.take();
        if self.status == IssueStatus::InProgress {
            self.status = IssueStatus::Open;
        }
        self.touch(clock);
        previous
    }

    /// Appends a message to the thread and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyMessageBody`] when the body is blank.
    pub fn add_message(
        &mut self,
        author: UserId,
        body: &str,
        clock: &impl Clock,
    ) -> Result<MessageId, IssueDomainError> {
        let message = Message::new(author, body, clock)?;
        let id = message.id();
        self.messages.push(message);
        self.touch(clock);
        Ok(id)
    }

    /// Records `reader` on every message of the thread.
    ///
    /// Returns how many messages were newly marked; the timestamp is only
    /// refreshed when that number is non-zero.
    pub fn mark_messages_read(&mut self, reader: &UserId, clock: &impl Clock) -> usize {
        let marked = self
            .messages
            .iter_mut()
            .map(|message| message.mark_read_by(reader))
            .filter(|newly_marked| *newly_marked)
            .count();
        if marked > 0 {
            self.touch(clock);
        }
        marked
    }

    /// Appends images in order.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::NoImages`] when `images` is empty.
    pub fn attach_images(
        &mut self,
        images: Vec<StoredImage>,
        clock: &impl Clock,
    ) -> Result<(), IssueDomainError> {
        if images.is_empty() {
            return Err(IssueDomainError::NoImages);
        }
        self.images.extend(images);
        self.touch(clock);
        Ok(())
    }

    /// Applies a title/description patch; nothing changes if any field is
    /// invalid.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyTitle`] or
    /// [`IssueDomainError::EmptyDescription`] for blank replacements.
    pub fn apply_patch(
        &mut self,
        patch: IssuePatch,
        clock: &impl Clock,
    ) -> Result<(), IssueDomainError> {
        let new_title = patch.title.as_deref().map(validated_title).transpose()?;
        let new_description = patch
            .description
            .as_deref()
            .map(validated_description)
            .transpose()?;
        if let Some(value) = new_title {
            self.title = value;
        }
        if let Some(value) = new_description {
            self.description = value;
        }
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
