//! Orchestration services for the issue lifecycle.

mod lifecycle;
mod notifications;

pub use lifecycle::{
    CreateIssueRequest, EditIssueRequest, IssueDeletion, IssueLifecycleError,
    IssueLifecycleResult, IssueLifecycleService, ListIssuesRequest,
};
pub use notifications::IssueNotifications;
