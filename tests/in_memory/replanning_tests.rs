//! Superseding plans and retiring deleted tasks.

use crate::in_memory::helpers::{agent, plan_for, state, task, team};
use rstest::rstest;
use stackflow::{
    api::AppState,
    execution_plan::domain::{AssignmentStatus, PlanStatus},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_plan_supersedes_the_active_one(state: AppState) -> Result<(), eyre::Report> {
    let team = team(&state, "Apollo").await?;
    let builder = agent(&state, &team, "builder").await?;
    let old_work = task(&state, &team, "Old priority").await?;
    let new_work = task(&state, &team, "New priority").await?;
    let first = plan_for(&state, &team, &builder, &[&old_work]).await?;
    let second = plan_for(&state, &team, &builder, &[&new_work]).await?;

    let superseded = state.planning.get_plan(first.id()).await?;
    eyre::ensure!(superseded.status() == PlanStatus::Cancelled, "old plan still {}", superseded.status());
    let active = state.planning.active_plan(team.project.id()).await?;
    eyre::ensure!(active.id() == second.id(), "wrong active plan");

    let old_assignments = state.planning.list_assignments(first.id()).await?;
    eyre::ensure!(
        old_assignments
            .iter()
            .all(|details| details.assignment.status() == AssignmentStatus::Skipped),
        "old queue still live"
    );

    let next = state.dispatcher.next_task(builder.id()).await?;
    let claimed = next
        .assignment
        .ok_or_else(|| eyre::eyre!("expected an assignment"))?;
    eyre::ensure!(claimed.assignment.task_id() == new_work.id(), "dispatched superseded work");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_leaves_the_queue(state: AppState) -> Result<(), eyre::Report> {
    let team = team(&state, "Apollo").await?;
    let builder = agent(&state, &team, "builder").await?;
    let doomed = task(&state, &team, "Soon deleted").await?;
    plan_for(&state, &team, &builder, &[&doomed]).await?;

    state.board.delete(doomed.id()).await?;
    let retired = state.dispatcher.retire_task(doomed.id()).await?;

    eyre::ensure!(retired == 1, "expected one retired assignment, got {retired}");
    let next = state.dispatcher.next_task(builder.id()).await?;
    eyre::ensure!(next.assignment.is_none(), "deleted task was dispatched");
    Ok(())
}
