//! Behaviour tests for the issue lifecycle workflow.

mod issue_lifecycle_steps;

use issue_lifecycle_steps::world::{IssueLifecycleWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/issue_lifecycle.feature",
    name = "Reported issue is worked through to closure"
)]
#[tokio::test(flavor = "multi_thread")]
async fn issue_worked_to_closure(world: IssueLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/issue_lifecycle.feature",
    name = "A stranger cannot post on another user's issue"
)]
#[tokio::test(flavor = "multi_thread")]
async fn stranger_cannot_post_message(world: IssueLifecycleWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/issue_lifecycle.feature",
    name = "Deleting an issue survives a failing image deletion"
)]
#[tokio::test(flavor = "multi_thread")]
async fn delete_survives_media_failure(world: IssueLifecycleWorld) {
    let _ = world;
}
