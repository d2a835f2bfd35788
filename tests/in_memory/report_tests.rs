//! Report snapshots and project statistics.

use crate::in_memory::helpers::{agent, plan_for, state, task, team};
use rstest::rstest;
use stackflow::{
    api::AppState,
    document::Document,
    execution_plan::domain::ReportType,
    task::domain::TaskTransition,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn snapshot_reflects_tasks_and_queue(state: AppState) -> Result<(), eyre::Report> {
    let team = team(&state, "Apollo").await?;
    let builder = agent(&state, &team, "builder").await?;
    let first = task(&state, &team, "First").await?;
    let second = task(&state, &team, "Second").await?;
    plan_for(&state, &team, &builder, &[&first, &second]).await?;
    state.dispatcher.next_task(builder.id()).await?;
    state
        .lifecycle
        .transition(first.id(), TaskTransition::Start, team.actor(), None)
        .await?;

    let report = state
        .planning
        .generate_report(team.project.id(), ReportType::Daily, None, team.actor())
        .await?;

    let body = report.report();
    let tasks = body
        .get("tasks")
        .ok_or_else(|| eyre::eyre!("snapshot lacks task counts"))?;
    eyre::ensure!(tasks.get("open").and_then(Document::as_i64) == Some(1), "open count");
    eyre::ensure!(
        tasks.get("in_progress").and_then(Document::as_i64) == Some(1),
        "in progress count"
    );
    let queue = body
        .get("assignments")
        .ok_or_else(|| eyre::eyre!("snapshot lacks assignment progress"))?;
    eyre::ensure!(queue.get("pending").and_then(Document::as_i64) == Some(1), "pending count");
    eyre::ensure!(
        queue.get("in_progress").and_then(Document::as_i64) == Some(1),
        "claimed count"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reports_are_listed_by_type_newest_first(state: AppState) -> Result<(), eyre::Report> {
    let team = team(&state, "Apollo").await?;
    let project_id = team.project.id();
    let daily = state
        .planning
        .generate_report(project_id, ReportType::Daily, None, team.actor())
        .await?;
    let weekly = state
        .planning
        .generate_report(
            project_id,
            ReportType::Weekly,
            Some(Document::map([("notes", Document::text("quiet week"))])),
            team.actor(),
        )
        .await?;
    let later_daily = state
        .planning
        .generate_report(project_id, ReportType::Daily, None, team.actor())
        .await?;

    let dailies = state
        .planning
        .list_reports(project_id, Some(ReportType::Daily))
        .await?;
    let ids: Vec<_> = dailies.iter().map(|report| report.id()).collect();
    eyre::ensure!(ids == vec![later_daily.id(), daily.id()], "unexpected order {ids:?}");

    let all = state.planning.list_reports(project_id, None).await?;
    eyre::ensure!(all.len() == 3, "expected three reports");
    eyre::ensure!(
        weekly.report().get("notes").and_then(Document::as_str) == Some("quiet week"),
        "custom body not kept"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_count_agents_and_task_statuses(state: AppState) -> Result<(), eyre::Report> {
    let team = team(&state, "Apollo").await?;
    agent(&state, &team, "builder").await?;
    agent(&state, &team, "tester").await?;
    let done = task(&state, &team, "Shipped").await?;
    task(&state, &team, "Backlog").await?;
    for transition in [TaskTransition::Start, TaskTransition::Complete] {
        state
            .lifecycle
            .transition(done.id(), transition, team.actor(), None)
            .await?;
    }

    let stats = state.projects.stats(team.project.id()).await?;

    eyre::ensure!(stats.total_agents == 2, "agent total");
    eyre::ensure!(stats.total_tasks == 2, "task total");
    eyre::ensure!(stats.completed_tasks == 1, "completed total");
    eyre::ensure!(stats.pending_tasks == 1, "pending total");
    eyre::ensure!(stats.tasks_by_status.done == 1, "done bucket");
    Ok(())
}
