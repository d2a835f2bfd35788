//! End-to-end flow from planning through dispatch to completion.

use crate::in_memory::helpers::{agent, plan_for, state, task, team};
use rstest::rstest;
use stackflow::{
    actor::Actor,
    api::AppState,
    document::Document,
    execution_plan::{domain::AssignmentStatus, services::CompleteTaskRequest},
    task::domain::{ActivityAction, TaskStatus, TaskTransition},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn planned_work_flows_to_completion(state: AppState) -> Result<(), eyre::Report> {
    let team = team(&state, "Apollo").await?;
    let builder = agent(&state, &team, "builder").await?;
    let schema = task(&state, &team, "Design schema").await?;
    let api = task(&state, &team, "Expose API").await?;
    let plan = plan_for(&state, &team, &builder, &[&schema, &api]).await?;

    let next = state.dispatcher.next_task(builder.id()).await?;
    let claimed = next
        .assignment
        .ok_or_else(|| eyre::eyre!("expected an assignment"))?;
    eyre::ensure!(claimed.assignment.task_id() == schema.id(), "plan order not honoured");
    let context = next
        .context
        .ok_or_else(|| eyre::eyre!("expected plan context"))?;
    eyre::ensure!(context.plan_id == plan.id(), "context names another plan");

    state
        .lifecycle
        .transition(schema.id(), TaskTransition::Start, Actor::Agent(builder.id()), None)
        .await?;
    let report = Document::map([("summary", Document::text("tables created"))]);
    let completed = state
        .dispatcher
        .complete_task(
            builder.id(),
            CompleteTaskRequest::new(schema.id()).with_report(report.clone()),
        )
        .await?;

    eyre::ensure!(completed.status() == AssignmentStatus::Completed, "assignment not completed");
    eyre::ensure!(completed.report() == Some(&report), "report not stored");
    let finished = state.board.get(schema.id()).await?;
    eyre::ensure!(finished.status() == TaskStatus::Done, "task not done");

    let trail = state.lifecycle.list_activities(schema.id()).await?;
    let latest = trail
        .first()
        .ok_or_else(|| eyre::eyre!("missing completion activity"))?;
    eyre::ensure!(latest.action() == ActivityAction::StatusChanged, "unexpected action");
    eyre::ensure!(latest.actor() == Actor::Agent(builder.id()), "completion not attributed to agent");

    let assignments = state.planning.list_assignments(plan.id()).await?;
    let statuses: Vec<_> = assignments
        .iter()
        .map(|details| details.assignment.status())
        .collect();
    eyre::ensure!(
        statuses.contains(&AssignmentStatus::Completed)
            && statuses.contains(&AssignmentStatus::Pending),
        "unexpected assignment statuses {statuses:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn queues_are_isolated_per_agent(state: AppState) -> Result<(), eyre::Report> {
    let team = team(&state, "Apollo").await?;
    let builder = agent(&state, &team, "builder").await?;
    let tester = agent(&state, &team, "tester").await?;
    let work = task(&state, &team, "Build feature").await?;
    plan_for(&state, &team, &builder, &[&work]).await?;

    let idle = state.dispatcher.next_task(tester.id()).await?;
    eyre::ensure!(idle.assignment.is_none(), "tester received the builder's work");

    let busy = state.dispatcher.next_task(builder.id()).await?;
    eyre::ensure!(busy.assignment.is_some(), "builder received nothing");
    let drained = state.dispatcher.next_task(builder.id()).await?;
    eyre::ensure!(drained.assignment.is_none(), "assignment dispatched twice");
    Ok(())
}
