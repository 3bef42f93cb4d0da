//! Role and ownership checks enforced by the lifecycle service.

use super::support::{Harness, ac_broken, admin, harness, principal, reporter, staff, technician};
use crate::error::ErrorKind;
use crate::identity::domain::Role;
use crate::issue::{
    domain::{IssuePatch, IssueStatus},
    services::{EditIssueRequest, IssueLifecycleError, ListIssuesRequest},
};
use rstest::rstest;

fn assert_forbidden<T: std::fmt::Debug>(result: Result<T, IssueLifecycleError>) {
    let err = result.expect_err("operation should be forbidden");
    assert_eq!(err.kind(), ErrorKind::Forbidden, "unexpected error: {err}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_owner_cannot_add_message(harness: Harness) {
    let issue = harness.service.create(ac_broken()).await.expect("create");
    let stranger = principal("stranger-1", Role::User);

    let result = harness
        .service
        .add_message(issue.id(), "hello", &stranger)
        .await;

    assert_forbidden(result);
    let unchanged = harness
        .service
        .get_by_id(issue.id(), &staff())
        .await
        .expect("lookup");
    assert!(unchanged.messages().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_and_staff_can_add_messages(harness: Harness) {
    let issue = harness.service.create(ac_broken()).await.expect("create");

    harness
        .service
        .add_message(issue.id(), "from owner", &reporter())
        .await
        .expect("owner message");
    let updated = harness
        .service
        .add_message(issue.id(), "from staff", &staff())
        .await
        .expect("staff message");

    assert_eq!(updated.messages().len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn regular_user_cannot_list_all(harness: Harness) {
    let result = harness
        .service
        .list_all(&ListIssuesRequest::default(), &reporter())
        .await;

    assert_forbidden(result);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn regular_user_cannot_change_status(harness: Harness) {
    let issue = harness.service.create(ac_broken()).await.expect("create");
    harness
        .service
        .assign_technician(issue.id(), technician(), &admin())
        .await
        .expect("assign");

    let result = harness
        .service
        .update_status(issue.id(), IssueStatus::InProgress, &reporter())
        .await;

    assert_forbidden(result);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_admin_can_reopen(harness: Harness) {
    let issue = harness.service.create(ac_broken()).await.expect("create");
    harness
        .service
        .assign_technician(issue.id(), technician(), &admin())
        .await
        .expect("assign");
    for target in [IssueStatus::InProgress, IssueStatus::Resolved, IssueStatus::Closed] {
        harness
            .service
            .update_status(issue.id(), target, &staff())
            .await
            .expect("forward transition");
    }

    assert_forbidden(
        harness
            .service
            .update_status(issue.id(), IssueStatus::Open, &staff())
            .await,
    );
    let reopened = harness
        .service
        .update_status(issue.id(), IssueStatus::Open, &admin())
        .await
        .expect("admin reopen");
    assert_eq!(reopened.status(), IssueStatus::Open);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn staff_cannot_manage_technicians(harness: Harness) {
    let issue = harness.service.create(ac_broken()).await.expect("create");

    assert_forbidden(
        harness
            .service
            .assign_technician(issue.id(), technician(), &staff())
            .await,
    );
    assert_forbidden(harness.service.remove_technician(issue.id(), &staff()).await);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn staff_cannot_delete(harness: Harness) {
    let issue = harness.service.create(ac_broken()).await.expect("create");

    assert_forbidden(harness.service.delete_issue(issue.id(), &staff()).await);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stranger_cannot_edit_or_mark_read(harness: Harness) {
    let issue = harness.service.create(ac_broken()).await.expect("create");
    let stranger = principal("stranger-1", Role::User);

    assert_forbidden(
        harness
            .service
            .edit_issue(
                issue.id(),
                EditIssueRequest::new(IssuePatch::new().with_title("hijacked")),
                &stranger,
            )
            .await,
    );
    assert_forbidden(harness.service.mark_messages_read(issue.id(), &stranger).await);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_issue_is_staff_only_for_messages(harness: Harness) {
    let issue = harness
        .service
        .create(crate::issue::services::CreateIssueRequest::new("Anon", "details"))
        .await
        .expect("create");

    assert_forbidden(
        harness
            .service
            .add_message(issue.id(), "me too", &reporter())
            .await,
    );
    harness
        .service
        .add_message(issue.id(), "looking into it", &staff())
        .await
        .expect("staff message");
}
