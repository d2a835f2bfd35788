//! Plans, dispatch, and reports against `PostgreSQL`.

use crate::postgres::helpers::{Team, team, temporary_schema};
use stackflow::{
    agent::{
        domain::{Agent, AgentLevel, AgentRole},
        services::RegisterAgentRequest,
    },
    api::AppState,
    document::Document,
    execution_plan::{
        domain::{AssignmentStatus, ExecutionPlan, PlanData, PlanStatus, ReportType, TaskPriorityItem},
        services::{CompleteTaskRequest, CreatePlanRequest},
    },
    task::{domain::Task, services::CreateTaskRequest},
};

async fn staffed(state: &AppState, team: &Team) -> Result<(Agent, Vec<Task>), eyre::Report> {
    let agent = state
        .agents
        .register(RegisterAgentRequest::new(
            "builder",
            team.project.id(),
            team.owner.id(),
            AgentRole::BackendDeveloper,
            AgentLevel::Senior,
            "openai",
            "gpt-4o",
        ))
        .await?;
    let mut tasks = Vec::new();
    for title in ["First", "Second"] {
        tasks.push(
            state
                .board
                .create(CreateTaskRequest::new(team.project.id(), title), team.actor())
                .await?,
        );
    }
    Ok((agent, tasks))
}

async fn plan(
    state: &AppState,
    team: &Team,
    agent: &Agent,
    tasks: &[Task],
) -> Result<ExecutionPlan, eyre::Report> {
    let plan_data = PlanData {
        priority_order: tasks
            .iter()
            .map(|task| TaskPriorityItem::new(task.id(), task.title()).with_agent(agent.id()))
            .collect(),
        notes: "ship it".to_owned(),
        ..PlanData::default()
    };
    Ok(state
        .planning
        .create_plan(
            CreatePlanRequest::new(team.project.id(), plan_data),
            team.actor(),
        )
        .await?)
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_data_round_trips_through_jsonb() -> Result<(), eyre::Report> {
    let Some(schema) = temporary_schema().await? else {
        return Ok(());
    };
    let state = schema.state();
    let team = team(&state, "ada").await?;
    let (agent, tasks) = staffed(&state, &team).await?;
    let created = plan(&state, &team, &agent, &tasks).await?;

    let fetched = state.planning.get_plan(created.id()).await?;

    eyre::ensure!(fetched.plan_data() == created.plan_data(), "plan data changed in storage");
    eyre::ensure!(fetched.status() == PlanStatus::Active, "plan not active");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn dispatch_claims_in_order_and_completes_with_report() -> Result<(), eyre::Report> {
    let Some(schema) = temporary_schema().await? else {
        return Ok(());
    };
    let state = schema.state();
    let team = team(&state, "ada").await?;
    let (agent, tasks) = staffed(&state, &team).await?;
    plan(&state, &team, &agent, &tasks).await?;
    let first = tasks
        .first()
        .ok_or_else(|| eyre::eyre!("missing first task"))?;

    let next = state.dispatcher.next_task(agent.id()).await?;
    let claimed = next
        .assignment
        .ok_or_else(|| eyre::eyre!("nothing dispatched"))?;
    eyre::ensure!(claimed.assignment.task_id() == first.id(), "plan order not honoured");
    eyre::ensure!(
        claimed.assignment.status() == AssignmentStatus::InProgress,
        "claim did not start the assignment"
    );
    eyre::ensure!(claimed.assignment.started_at().is_some(), "started_at not stamped");

    let report = Document::map([("coverage", Document::from(88_i64))]);
    let completed = state
        .dispatcher
        .complete_task(
            agent.id(),
            CompleteTaskRequest::new(first.id()).with_report(report.clone()),
        )
        .await?;
    eyre::ensure!(completed.status() == AssignmentStatus::Completed, "not completed");
    eyre::ensure!(completed.report() == Some(&report), "report lost");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn replanning_cancels_previous_active_plan() -> Result<(), eyre::Report> {
    let Some(schema) = temporary_schema().await? else {
        return Ok(());
    };
    let state = schema.state();
    let team = team(&state, "ada").await?;
    let (agent, tasks) = staffed(&state, &team).await?;
    let first = plan(&state, &team, &agent, &tasks).await?;
    let second = plan(&state, &team, &agent, &tasks).await?;

    let plans = state.planning.list_plans(team.project.id()).await?;
    let active: Vec<_> = plans
        .iter()
        .filter(|candidate| candidate.status() == PlanStatus::Active)
        .map(ExecutionPlan::id)
        .collect();
    eyre::ensure!(active == vec![second.id()], "active plans {active:?}");
    let cancelled = state.planning.get_plan(first.id()).await?;
    eyre::ensure!(cancelled.status() == PlanStatus::Cancelled, "first plan not cancelled");

    let live = state.planning.list_assignments(second.id()).await?;
    eyre::ensure!(live.len() == 2, "second plan materialised {} assignments", live.len());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn snapshot_report_is_stored_as_jsonb() -> Result<(), eyre::Report> {
    let Some(schema) = temporary_schema().await? else {
        return Ok(());
    };
    let state = schema.state();
    let team = team(&state, "ada").await?;
    staffed(&state, &team).await?;

    let generated = state
        .planning
        .generate_report(team.project.id(), ReportType::Weekly, None, team.actor())
        .await?;
    let listed = state
        .planning
        .list_reports(team.project.id(), Some(ReportType::Weekly))
        .await?;

    eyre::ensure!(listed == vec![generated.clone()], "listing mismatch");
    let total = generated
        .report()
        .get("tasks")
        .and_then(|counts| counts.get("total"))
        .and_then(Document::as_i64);
    eyre::ensure!(total == Some(2), "snapshot total {total:?}");
    Ok(())
}
