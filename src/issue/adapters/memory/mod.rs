//! In-memory adapters for issue persistence.

mod issue;

pub use issue::InMemoryIssueRepository;
