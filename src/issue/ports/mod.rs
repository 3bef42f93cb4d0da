//! Port contracts for issue persistence.

mod repository;

pub use repository::{
    IssueFilter, IssueListing, IssueRepository, IssueRepositoryError, IssueRepositoryResult,
};
