//! Shared fixtures for issue lifecycle tests.

use std::sync::Arc;

use crate::identity::{
    adapters::memory::InMemoryUserDirectory,
    domain::{Principal, Role, UserId, UserProfile},
};
use crate::issue::{
    adapters::memory::InMemoryIssueRepository,
    services::{CreateIssueRequest, IssueLifecycleService, IssueNotifications},
};
use crate::media::adapters::memory::InMemoryMediaStore;
use crate::notification::adapters::recording::RecordingNotifier;
use mockable::DefaultClock;
use rstest::fixture;

pub type TestService = IssueLifecycleService<
    InMemoryIssueRepository,
    InMemoryMediaStore,
    RecordingNotifier,
    InMemoryUserDirectory,
    DefaultClock,
>;

pub struct Harness {
    pub service: TestService,
    pub repository: Arc<InMemoryIssueRepository>,
    pub media: Arc<InMemoryMediaStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub directory: Arc<InMemoryUserDirectory>,
}

pub fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

pub fn principal(raw: &str, role: Role) -> Principal {
    Principal::new(user_id(raw), role)
}

pub fn reporter() -> Principal {
    principal("reporter-1", Role::User)
}

pub fn staff() -> Principal {
    principal("staff-1", Role::Staff)
}

pub fn admin() -> Principal {
    principal("admin-1", Role::Admin)
}

pub fn technician() -> UserId {
    user_id("tech-1")
}

pub fn ac_broken() -> CreateIssueRequest {
    CreateIssueRequest::new("AC broken", "Unit 4 blows warm air").with_reporter(reporter().id().clone())
}

#[fixture]
pub fn harness() -> Harness {
    let repository = Arc::new(InMemoryIssueRepository::new());
    let media = Arc::new(InMemoryMediaStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let directory = Arc::new(InMemoryUserDirectory::new());
    directory
        .insert(
            UserProfile::new(reporter().id().clone(), "Nimal", "Perera", "nimal@example.com", Role::User)
                .with_phone("0771234567"),
        )
        .expect("profile insert");
    directory
        .insert(
            UserProfile::new(technician(), "Kamal", "Silva", "kamal@example.com", Role::Staff)
                .with_phone("0712223333"),
        )
        .expect("profile insert");
    let notifications = IssueNotifications::new(Arc::clone(&notifier), Arc::clone(&directory))
        .expect("templates should load");
    let service = IssueLifecycleService::new(
        Arc::clone(&repository),
        Arc::clone(&media),
        notifications,
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        repository,
        media,
        notifier,
        directory,
    }
}
