//! Status transitions and the activity trail against `PostgreSQL`.

use crate::postgres::helpers::{team, temporary_schema};
use stackflow::task::{
    domain::{ActivityAction, TaskDomainError, TaskStatus, TaskTransition},
    services::{CreateTaskRequest, TaskLifecycleError},
};

#[tokio::test(flavor = "multi_thread")]
async fn transitions_are_persisted_with_their_activities() -> Result<(), eyre::Report> {
    let Some(schema) = temporary_schema().await? else {
        return Ok(());
    };
    let state = schema.state();
    let team = team(&state, "ada").await?;
    let task = state
        .board
        .create(CreateTaskRequest::new(team.project.id(), "Persisted"), team.actor())
        .await?;

    state
        .lifecycle
        .transition(task.id(), TaskTransition::Start, team.actor(), Some("on it"))
        .await?;
    let done = state
        .lifecycle
        .transition(task.id(), TaskTransition::Complete, team.actor(), None)
        .await?;

    eyre::ensure!(done.status() == TaskStatus::Done, "task not done");
    let stored = state.board.get(task.id()).await?;
    eyre::ensure!(stored.status() == TaskStatus::Done, "status not persisted");

    let trail = state.lifecycle.list_activities(task.id()).await?;
    let actions: Vec<_> = trail.iter().map(|activity| activity.action()).collect();
    eyre::ensure!(
        actions
            == vec![
                ActivityAction::StatusChanged,
                ActivityAction::StatusChanged,
                ActivityAction::Created,
            ],
        "unexpected trail {actions:?}"
    );
    let started = trail
        .get(1)
        .ok_or_else(|| eyre::eyre!("missing start activity"))?;
    eyre::ensure!(started.message() == "on it", "message not kept");
    eyre::ensure!(started.old_value() == Some("open"), "old value");
    eyre::ensure!(started.new_value() == Some("in_progress"), "new value");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_transition_leaves_row_untouched() -> Result<(), eyre::Report> {
    let Some(schema) = temporary_schema().await? else {
        return Ok(());
    };
    let state = schema.state();
    let team = team(&state, "ada").await?;
    let task = state
        .board
        .create(CreateTaskRequest::new(team.project.id(), "Untouched"), team.actor())
        .await?;

    let result = state
        .lifecycle
        .transition(task.id(), TaskTransition::Close, team.actor(), None)
        .await;

    eyre::ensure!(
        matches!(
            result,
            Err(TaskLifecycleError::Domain(TaskDomainError::InvalidTransition { .. }))
        ),
        "expected invalid transition, got {result:?}"
    );
    let stored = state.board.get(task.id()).await?;
    eyre::ensure!(stored.status() == TaskStatus::Open, "status changed");
    eyre::ensure!(stored.updated_at() == task.updated_at(), "row was rewritten");
    Ok(())
}
