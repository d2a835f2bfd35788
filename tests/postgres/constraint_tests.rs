//! Unique and cascading constraints enforced by the schema.

use crate::postgres::helpers::{team, temporary_schema};
use stackflow::{
    agent::{
        domain::{AgentLevel, AgentRole},
        services::RegisterAgentRequest,
    },
    task::{
        ports::TaskRepositoryError,
        services::{CreateTaskRequest, TaskBoardError},
    },
    user::{
        ports::UserRepositoryError,
        services::{CreateUserRequest, UserDirectoryError},
    },
};

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_username_maps_to_domain_error() -> Result<(), eyre::Report> {
    let Some(schema) = temporary_schema().await? else {
        return Ok(());
    };
    let state = schema.state();
    team(&state, "ada").await?;

    let result = state
        .users
        .create(CreateUserRequest::new("ada", "other@example.com"))
        .await;

    eyre::ensure!(
        matches!(
            result,
            Err(UserDirectoryError::Repository(UserRepositoryError::DuplicateUsername(ref name)))
                if name == "ada"
        ),
        "expected duplicate username, got {result:?}"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_email_maps_to_domain_error() -> Result<(), eyre::Report> {
    let Some(schema) = temporary_schema().await? else {
        return Ok(());
    };
    let state = schema.state();
    team(&state, "ada").await?;

    let result = state
        .users
        .create(CreateUserRequest::new("grace", "ada@example.com"))
        .await;

    eyre::ensure!(
        matches!(
            result,
            Err(UserDirectoryError::Repository(UserRepositoryError::DuplicateEmail(_)))
        ),
        "expected duplicate email, got {result:?}"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_removes_its_tasks_and_agents() -> Result<(), eyre::Report> {
    let Some(schema) = temporary_schema().await? else {
        return Ok(());
    };
    let state = schema.state();
    let team = team(&state, "ada").await?;
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
    let task = state
        .board
        .create(CreateTaskRequest::new(team.project.id(), "Doomed"), team.actor())
        .await?;

    state.projects.delete(team.project.id()).await?;

    eyre::ensure!(
        matches!(
            state.board.get(task.id()).await,
            Err(TaskBoardError::Repository(TaskRepositoryError::NotFound(_)))
        ),
        "task survived its project"
    );
    eyre::ensure!(
        state.agents.find_by_id(agent.id()).await?.is_none(),
        "agent survived its project"
    );
    Ok(())
}
