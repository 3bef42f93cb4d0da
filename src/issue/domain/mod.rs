//! Domain model for issues and their message threads.

mod error;
mod ids;
mod issue;
mod message;
mod status;

pub use error::{IssueDomainError, ParseIssueStatusError};
pub use ids::{IssueId, MessageId};
pub use issue::{Issue, IssueContent, IssuePatch, ReporterContact};
pub use message::Message;
pub use status::IssueStatus;
