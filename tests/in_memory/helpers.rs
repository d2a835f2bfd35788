//! Shared test helpers for in-memory integration tests.

use stackflow::{
    actor::Actor,
    agent::{
        domain::{Agent, AgentLevel, AgentRole},
        services::RegisterAgentRequest,
    },
    api::AppState,
    execution_plan::{
        domain::{ExecutionPlan, PlanData, TaskPriorityItem},
        services::CreatePlanRequest,
    },
    project::{domain::Project, services::CreateProjectRequest},
    provider::ProviderCatalog,
    task::{domain::Task, services::CreateTaskRequest},
    user::{domain::User, services::CreateUserRequest},
};
use rstest::fixture;

/// Provides application state over fresh in-memory stores.
#[fixture]
pub fn state() -> AppState {
    AppState::in_memory(ProviderCatalog::builtin())
}

/// A user with one project, ready for agents and tasks.
pub struct Team {
    /// Project owner.
    pub owner: User,
    /// The team's project.
    pub project: Project,
}

impl Team {
    /// Returns the owner as an acting user.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::User(self.owner.id())
    }
}

/// Creates a user and a project they own.
///
/// # Errors
///
/// Returns an error if either record cannot be stored.
pub async fn team(state: &AppState, project_name: &str) -> Result<Team, eyre::Report> {
    let owner = state
        .users
        .create(CreateUserRequest::new("owner", "owner@example.com"))
        .await?;
    let project = state
        .projects
        .create(CreateProjectRequest::new(project_name, owner.id()))
        .await?;
    Ok(Team { owner, project })
}

/// Registers an agent in the team's project.
///
/// # Errors
///
/// Returns an error if registration fails.
pub async fn agent(state: &AppState, team: &Team, name: &str) -> Result<Agent, eyre::Report> {
    let request = RegisterAgentRequest::new(
        name,
        team.project.id(),
        team.owner.id(),
        AgentRole::BackendDeveloper,
        AgentLevel::Senior,
        "openai",
        "gpt-4o",
    );
    Ok(state.agents.register(request).await?)
}

/// Creates an open task in the team's project.
///
/// # Errors
///
/// Returns an error if the task cannot be created.
pub async fn task(state: &AppState, team: &Team, title: &str) -> Result<Task, eyre::Report> {
    Ok(state
        .board
        .create(CreateTaskRequest::new(team.project.id(), title), team.actor())
        .await?)
}

/// Creates an active plan handing `tasks` to `agent` in order.
///
/// # Errors
///
/// Returns an error if the plan is rejected.
pub async fn plan_for(
    state: &AppState,
    team: &Team,
    agent: &Agent,
    tasks: &[&Task],
) -> Result<ExecutionPlan, eyre::Report> {
    let plan_data = PlanData {
        priority_order: tasks
            .iter()
            .map(|task| TaskPriorityItem::new(task.id(), task.title()).with_agent(agent.id()))
            .collect(),
        focus_areas: vec!["correctness".to_owned()],
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
