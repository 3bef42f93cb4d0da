//! When steps for issue lifecycle BDD scenarios.

use super::world::{IssueLifecycleWorld, principal, run_async};
use rstest_bdd_macros::when;
use servicedesk::identity::domain::{Role, UserId};
use servicedesk::issue::domain::IssueStatus;

#[when(r#"an admin assigns technician "{technician}""#)]
fn admin_assigns_technician(
    world: &mut IssueLifecycleWorld,
    technician: String,
) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    let admin = principal("admin-1", Role::Admin)?;
    let result = run_async(world.service.assign_technician(
        issue_id,
        UserId::new(technician)?,
        &admin,
    ));
    world.last_issue_result = Some(result);
    Ok(())
}

#[when(r#"staff move the issue to "{status}""#)]
fn staff_move_issue(world: &mut IssueLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    let staff = principal("staff-1", Role::Staff)?;
    let target = IssueStatus::try_from(status.as_str())?;
    let result = run_async(world.service.update_status(issue_id, target, &staff));
    world.last_issue_result = Some(result);
    Ok(())
}

#[when(r#"user "{user}" posts the message "{body}""#)]
fn user_posts_message(
    world: &mut IssueLifecycleWorld,
    user: String,
    body: String,
) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    let author = principal(&user, Role::User)?;
    let result = run_async(world.service.add_message(issue_id, &body, &author));
    world.last_issue_result = Some(result);
    Ok(())
}

#[when("an admin deletes the issue")]
fn admin_deletes_issue(world: &mut IssueLifecycleWorld) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    let admin = principal("admin-1", Role::Admin)?;
    world.last_delete_result = Some(run_async(world.service.delete_issue(issue_id, &admin)));
    Ok(())
}
