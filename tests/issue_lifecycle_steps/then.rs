//! Then steps for issue lifecycle BDD scenarios.

use super::world::{IssueLifecycleWorld, principal, run_async};
use rstest_bdd_macros::then;
use servicedesk::identity::domain::Role;
use servicedesk::issue::services::IssueLifecycleError;

fn current_issue(
    world: &IssueLifecycleWorld,
) -> Result<servicedesk::issue::domain::Issue, eyre::Report> {
    let issue_id = world.issue_id()?;
    let admin = principal("admin-1", Role::Admin)?;
    run_async(world.service.get_by_id(issue_id, &admin))
        .map_err(|err| eyre::eyre!("load issue: {err}"))
}

#[then(r#"the issue status is "{status}""#)]
fn issue_status_is(world: &IssueLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let issue = current_issue(world)?;
    if issue.status().as_str() != status {
        return Err(eyre::eyre!(
            "expected status {status}, found {}",
            issue.status()
        ));
    }
    Ok(())
}

#[then(r#"{count:usize} SMS messages were sent to "{recipient}""#)]
fn sms_sent_to(
    world: &IssueLifecycleWorld,
    count: usize,
    recipient: String,
) -> Result<(), eyre::Report> {
    let sent = world
        .notifier
        .sent()
        .into_iter()
        .filter(|sms| sms.recipient.as_str() == recipient)
        .count();
    if sent != count {
        return Err(eyre::eyre!("expected {count} SMS to {recipient}, found {sent}"));
    }
    Ok(())
}

#[then("the request is rejected as forbidden")]
fn request_forbidden(world: &IssueLifecycleWorld) -> Result<(), eyre::Report> {
    match world.last_issue_result.as_ref() {
        Some(Err(IssueLifecycleError::Forbidden(_))) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected forbidden, got error: {err}")),
        Some(Ok(_)) => Err(eyre::eyre!("expected forbidden, but the request succeeded")),
        None => Err(eyre::eyre!("no request was made")),
    }
}

#[then("the issue has {count:usize} messages")]
fn issue_message_count(world: &IssueLifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let found = current_issue(world)?.messages().len();
    if found != count {
        return Err(eyre::eyre!("expected {count} messages, found {found}"));
    }
    Ok(())
}

#[then("the deletion succeeds reporting {count:usize} failed image")]
fn deletion_reports_failures(world: &IssueLifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let deletion = world
        .last_delete_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no deletion was attempted"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("deletion failed: {err}"))?;
    if deletion.failed_media.len() != count {
        return Err(eyre::eyre!(
            "expected {count} failed images, found {:?}",
            deletion.failed_media
        ));
    }
    Ok(())
}

#[then("the issue no longer exists")]
fn issue_gone(world: &IssueLifecycleWorld) -> Result<(), eyre::Report> {
    match current_issue(world) {
        Err(_) => Ok(()),
        Ok(issue) => Err(eyre::eyre!("issue {} still exists", issue.id())),
    }
}
