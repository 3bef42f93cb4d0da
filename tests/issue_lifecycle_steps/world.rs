//! Shared world state for issue lifecycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use servicedesk::identity::adapters::memory::InMemoryUserDirectory;
use servicedesk::identity::domain::{Principal, Role, UserId};
use servicedesk::issue::adapters::memory::InMemoryIssueRepository;
use servicedesk::issue::domain::{Issue, IssueId};
use servicedesk::issue::services::{
    IssueDeletion, IssueLifecycleError, IssueLifecycleService, IssueNotifications,
};
use servicedesk::media::adapters::memory::InMemoryMediaStore;
use servicedesk::notification::adapters::recording::RecordingNotifier;

/// Service type used by the BDD world.
pub type TestIssueService = IssueLifecycleService<
    InMemoryIssueRepository,
    InMemoryMediaStore,
    RecordingNotifier,
    InMemoryUserDirectory,
    DefaultClock,
>;

/// Scenario world for issue lifecycle behaviour tests.
pub struct IssueLifecycleWorld {
    pub service: TestIssueService,
    pub media: Arc<InMemoryMediaStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub directory: Arc<InMemoryUserDirectory>,
    pub issue_id: Option<IssueId>,
    pub last_issue_result: Option<Result<Issue, IssueLifecycleError>>,
    pub last_delete_result: Option<Result<IssueDeletion, IssueLifecycleError>>,
}

impl IssueLifecycleWorld {
    /// Creates a world backed by in-memory adapters.
    ///
    /// # Panics
    ///
    /// Panics if the built-in notification templates fail to load.
    #[must_use]
    pub fn new() -> Self {
        let media = Arc::new(InMemoryMediaStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let notifications = IssueNotifications::new(Arc::clone(&notifier), Arc::clone(&directory))
            .expect("built-in templates load");
        let service = IssueLifecycleService::new(
            Arc::new(InMemoryIssueRepository::new()),
            Arc::clone(&media),
            notifications,
            Arc::new(DefaultClock),
        );
        Self {
            service,
            media,
            notifier,
            directory,
            issue_id: None,
            last_issue_result: None,
            last_delete_result: None,
        }
    }

    /// Returns the issue created by an earlier step.
    pub fn issue_id(&self) -> Result<IssueId, eyre::Report> {
        self.issue_id
            .ok_or_else(|| eyre::eyre!("no issue has been raised in this scenario"))
    }
}

impl Default for IssueLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> IssueLifecycleWorld {
    IssueLifecycleWorld::default()
}

/// Builds a principal from a raw identifier.
pub fn principal(raw: &str, role: Role) -> Result<Principal, eyre::Report> {
    Ok(Principal::new(UserId::new(raw)?, role))
}

/// Identifier of the reporter used across scenarios.
pub const REPORTER: &str = "reporter-1";

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
