//! Then steps for assignment dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use rstest_bdd_macros::then;
use stackflow::{
    execution_plan::{
        domain::AssignmentStatus,
        services::{DispatchError, NO_PENDING_TASKS_MESSAGE},
    },
    task::{domain::TaskStatus, ports::TaskRepository},
};

#[then(r#"it receives "{title}""#)]
fn receives(world: &DispatchWorld, title: String) -> Result<(), eyre::Report> {
    let next = world
        .last_next
        .as_ref()
        .ok_or_else(|| eyre::eyre!("the agent never asked for work"))?;
    let details = next
        .assignment
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no assignment was handed out"))?;
    eyre::ensure!(
        details.task_title.as_deref() == Some(title.as_str()),
        "expected {title}, received {:?}",
        details.task_title
    );
    eyre::ensure!(next.context.is_some(), "plan context is missing");
    Ok(())
}

#[then("it is told there is nothing pending")]
fn nothing_pending(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let next = world
        .last_next
        .as_ref()
        .ok_or_else(|| eyre::eyre!("the agent never asked for work"))?;
    eyre::ensure!(next.assignment.is_none(), "unexpected assignment");
    eyre::ensure!(next.context.is_none(), "unexpected context");
    eyre::ensure!(next.message == NO_PENDING_TASKS_MESSAGE, "message was {}", next.message);
    Ok(())
}

#[then("completion is rejected for lack of an assignment")]
fn completion_rejected(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_completion
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing completion result"))?;
    eyre::ensure!(
        matches!(result, Err(DispatchError::AssignmentNotFound { .. })),
        "expected AssignmentNotFound, got {result:?}"
    );
    Ok(())
}

#[then(r#"the assignment is "{status}""#)]
fn assignment_is(world: &DispatchWorld, status: String) -> Result<(), eyre::Report> {
    let expected = AssignmentStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let assignment = world
        .assignment
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no assignment recorded"))?;
    eyre::ensure!(
        assignment.status() == expected,
        "expected assignment {expected}, found {}",
        assignment.status()
    );
    Ok(())
}

#[then(r#"the task "{title}" is "{status}""#)]
fn task_is(world: &DispatchWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.task_titled(&title)?.id();
    let stored = run_async(world.tasks.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task {title} disappeared"))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected {expected}, found {}",
        stored.status()
    );
    Ok(())
}
