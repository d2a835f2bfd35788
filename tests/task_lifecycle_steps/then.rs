//! Then steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use rstest_bdd_macros::then;
use stackflow::task::{
    domain::{ActivityAction, TaskDomainError, TaskStatus},
    ports::TaskActivityLog,
    services::TaskLifecycleError,
};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let actual = world.task()?.status();
    eyre::ensure!(actual == expected, "expected status {expected}, found {actual}");
    Ok(())
}

#[then("the transition is rejected as invalid")]
fn transition_rejected(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))?;
    eyre::ensure!(
        matches!(
            result,
            Err(TaskLifecycleError::Domain(TaskDomainError::InvalidTransition { .. }))
        ),
        "expected InvalidTransition, got {result:?}"
    );
    Ok(())
}

#[then(r#"the latest activity moves the task from "{from}" to "{to}""#)]
fn latest_activity_moves(
    world: &TaskLifecycleWorld,
    from: String,
    to: String,
) -> Result<(), eyre::Report> {
    let activities = run_async(world.tasks.list_for_task(world.task()?.id()))?;
    let latest = activities
        .first()
        .ok_or_else(|| eyre::eyre!("no activity recorded"))?;
    eyre::ensure!(
        latest.action() == ActivityAction::StatusChanged,
        "latest activity is {}",
        latest.action()
    );
    eyre::ensure!(latest.old_value() == Some(from.as_str()), "old value mismatch");
    eyre::ensure!(latest.new_value() == Some(to.as_str()), "new value mismatch");
    eyre::ensure!(!latest.message().is_empty(), "activity message is empty");
    Ok(())
}

#[then("the task has {count:usize} status change activities read newest first")]
fn status_changes_newest_first(
    world: &TaskLifecycleWorld,
    count: usize,
) -> Result<(), eyre::Report> {
    let activities = run_async(world.tasks.list_for_task(world.task()?.id()))?;
    let moves: Vec<_> = activities
        .iter()
        .filter(|activity| activity.action() == ActivityAction::StatusChanged)
        .map(|activity| (activity.old_value(), activity.new_value()))
        .collect();
    eyre::ensure!(moves.len() == count, "expected {count} moves, found {}", moves.len());
    eyre::ensure!(
        moves
            == vec![
                (Some("closed"), Some("open")),
                (Some("done"), Some("closed")),
                (Some("in_progress"), Some("done")),
                (Some("open"), Some("in_progress")),
            ],
        "unexpected order: {moves:?}"
    );
    Ok(())
}
