//! Given steps for issue lifecycle BDD scenarios.

use super::world::{IssueLifecycleWorld, REPORTER, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use servicedesk::identity::domain::{Role, UserId, UserProfile};
use servicedesk::issue::services::CreateIssueRequest;
use servicedesk::media::domain::{ISSUE_IMAGE_FOLDER, UploadedFile};
use servicedesk::media::ports::MediaStore;

#[given(r#"a reporter with phone "{phone}""#)]
fn reporter_with_phone(world: &mut IssueLifecycleWorld, phone: String) -> Result<(), eyre::Report> {
    let profile = UserProfile::new(
        UserId::new(REPORTER)?,
        "Nimal",
        "Perera",
        "nimal@example.com",
        Role::User,
    )
    .with_phone(phone);
    world
        .directory
        .insert(profile)
        .map_err(|err| eyre::eyre!("insert reporter profile: {err}"))?;
    Ok(())
}

fn raise(world: &mut IssueLifecycleWorld, request: CreateIssueRequest) -> Result<(), eyre::Report> {
    let issue = run_async(
        world
            .service
            .create(request.with_reporter(UserId::new(REPORTER)?)),
    )
    .wrap_err("raise issue")?;
    world.issue_id = Some(issue.id());
    Ok(())
}

#[given(r#"the reporter has raised an issue titled "{title}""#)]
fn reporter_raised_issue(world: &mut IssueLifecycleWorld, title: String) -> Result<(), eyre::Report> {
    raise(world, CreateIssueRequest::new(title, "Reported from the front desk"))
}

#[given("the reporter has raised an issue with {count:usize} images")]
fn reporter_raised_issue_with_images(
    world: &mut IssueLifecycleWorld,
    count: usize,
) -> Result<(), eyre::Report> {
    let mut images = Vec::with_capacity(count);
    for index in 0..count {
        let file = UploadedFile::new(
            &format!("photo-{index}.jpg"),
            Some("image/jpeg".to_owned()),
            vec![1, 2, 3],
        );
        images.push(
            run_async(world.media.upload(&file, ISSUE_IMAGE_FOLDER)).wrap_err("upload image")?,
        );
    }
    raise(
        world,
        CreateIssueRequest::new("Leaking roof", "Water in the server room").with_images(images),
    )
}

#[given("the media store fails to delete the first image")]
fn media_fails_first_delete(world: &mut IssueLifecycleWorld) -> Result<(), eyre::Report> {
    let issue_id = world.issue_id()?;
    let issue = run_async(world.service.get_by_id(
        issue_id,
        &super::world::principal("admin-1", Role::Admin)?,
    ))
    .wrap_err("load issue")?;
    let first = issue
        .images()
        .first()
        .ok_or_else(|| eyre::eyre!("issue has no images"))?;
    world.media.fail_deletes_for(&first.media_id);
    Ok(())
}
