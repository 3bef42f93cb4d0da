//! Best-effort SMS notifications for issue events.

use crate::identity::domain::UserId;
use crate::identity::ports::UserDirectory;
use crate::issue::domain::Issue;
use crate::notification::domain::{PhoneNumber, SmsMessage};
use crate::notification::ports::Notifier;
use crate::notification::templates::NotificationTemplates;
use std::sync::Arc;
use tracing::{debug, warn};

const FALLBACK_NAME: &str = "customer";

/// Resolves recipients and sends lifecycle notifications.
///
/// Every failure (unknown user, missing phone, template or gateway error) is
/// logged and swallowed.
pub struct IssueNotifications<N, D>
where
    N: Notifier + ?Sized,
    D: UserDirectory + ?Sized,
{
    notifier: Arc<N>,
    directory: Arc<D>,
    templates: NotificationTemplates,
}

struct Recipient {
    name: String,
    phone: PhoneNumber,
}

impl<N, D> IssueNotifications<N, D>
where
    N: Notifier + ?Sized,
    D: UserDirectory + ?Sized,
{
    /// Creates the notification helper.
    ///
    /// # Errors
    ///
    /// Returns the template error when the built-in templates fail to load.
    pub fn new(notifier: Arc<N>, directory: Arc<D>) -> Result<Self, minijinja::Error> {
        Ok(Self {
            notifier,
            directory,
            templates: NotificationTemplates::new()?,
        })
    }

    /// Tells the reporter that the issue status changed.
    pub async fn status_changed(&self, issue: &Issue) {
        let Some(recipient) = self.reporter_recipient(issue).await else {
            debug!(issue_id = %issue.id(), "no phone for reporter, skipping status sms");
            return;
        };
        let body = self.templates.status_changed(
            &recipient.name,
            issue.title(),
            issue.status().label(),
        );
        self.deliver(issue, recipient.phone, body).await;
    }

    /// Tells the technician about a new assignment.
    pub async fn technician_assigned(&self, issue: &Issue, technician: &UserId) {
        let Some(recipient) = self.user_recipient(technician).await else {
            debug!(issue_id = %issue.id(), %technician, "no phone for technician, skipping sms");
            return;
        };
        let body = self
            .templates
            .technician_assigned(&recipient.name, issue.title());
        self.deliver(issue, recipient.phone, body).await;
    }

    async fn deliver(
        &self,
        issue: &Issue,
        phone: PhoneNumber,
        body: Result<String, minijinja::Error>,
    ) {
        let text = match body {
            Ok(text) => text,
            Err(err) => {
                warn!(issue_id = %issue.id(), error = %err, "notification template failed");
                return;
            }
        };
        let report = self.notifier.send(&SmsMessage::new(phone, text)).await;
        if report.delivered {
            debug!(issue_id = %issue.id(), "notification delivered");
        } else {
            warn!(issue_id = %issue.id(), detail = %report.detail, "notification not delivered");
        }
    }

    async fn reporter_recipient(&self, issue: &Issue) -> Option<Recipient> {
        if let Some(contact) = issue.contact() {
            match PhoneNumber::parse(contact.phone()) {
                Ok(phone) => {
                    return Some(Recipient {
                        name: contact.name().to_owned(),
                        phone,
                    });
                }
                Err(err) => {
                    warn!(issue_id = %issue.id(), error = %err, "unusable contact phone");
                }
            }
        }
        match issue.reporter() {
            Some(reporter) => self.user_recipient(reporter).await,
            None => None,
        }
    }

    async fn user_recipient(&self, user: &UserId) -> Option<Recipient> {
        let profile = match self.directory.find_by_id(user).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return None,
            Err(err) => {
                warn!(%user, error = %err, "user lookup failed");
                return None;
            }
        };
        let phone = PhoneNumber::parse(profile.phone.as_deref()?)
            .inspect_err(|err| warn!(%user, error = %err, "unusable profile phone"))
            .ok()?;
        let display_name = profile.display_name();
        Some(Recipient {
            name: if display_name.is_empty() {
                FALLBACK_NAME.to_owned()
            } else {
                display_name
            },
            phone,
        })
    }
}
