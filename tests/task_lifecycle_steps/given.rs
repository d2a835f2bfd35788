//! Given steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use stackflow::{
    actor::Actor,
    project::{
        domain::{NewProject, ProjectStatus},
        ports::ProjectRepository,
    },
    task::{
        domain::{NewTask, TaskTransition},
        ports::TaskRepository,
    },
    user::{
        domain::{NewUser, UserRole},
        ports::UserRepository,
    },
};

#[given(r#"a project "{name}" owned by "{username}""#)]
fn project_owned_by(
    world: &mut TaskLifecycleWorld,
    name: String,
    username: String,
) -> Result<(), eyre::Report> {
    let draft = NewUser::new(
        username.as_str(),
        format!("{username}@example.com"),
        UserRole::User,
        &DefaultClock,
    )?;
    let user = run_async(world.users.create(&draft)).wrap_err("store scenario user")?;
    let project_draft =
        NewProject::new(name.as_str(), "", ProjectStatus::Active, user.id(), &DefaultClock)?;
    let project =
        run_async(world.projects.create(&project_draft)).wrap_err("store scenario project")?;
    world.actors.insert(username, Actor::User(user.id()));
    world.project = Some(project);
    Ok(())
}

#[given(r#"a task "{title}" in that project"#)]
fn task_in_project(world: &mut TaskLifecycleWorld, title: String) -> Result<(), eyre::Report> {
    let project = world
        .project
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?;
    let creator = Actor::User(project.created_by());
    let draft = NewTask::new(project.id(), title.as_str(), "", creator, &DefaultClock)?;
    let task = run_async(world.tasks.create(&draft)).wrap_err("store scenario task")?;
    world.task = Some(task);
    Ok(())
}

fn setup_transition(
    world: &mut TaskLifecycleWorld,
    username: &str,
    transition: TaskTransition,
) -> Result<(), eyre::Report> {
    world.apply(username, transition)?;
    match world.last_result.take() {
        Some(Ok(_)) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("scenario setup transition failed: {err}")),
        None => Err(eyre::eyre!("missing transition result")),
    }
}

#[given(r#""{username}" has started the task"#)]
fn has_started(world: &mut TaskLifecycleWorld, username: String) -> Result<(), eyre::Report> {
    setup_transition(world, &username, TaskTransition::Start)
}

#[given(r#""{username}" has completed the task"#)]
fn has_completed(world: &mut TaskLifecycleWorld, username: String) -> Result<(), eyre::Report> {
    setup_transition(world, &username, TaskTransition::Complete)
}
