//! Unit tests for agent registry service orchestration.

use std::sync::Arc;

use crate::{
    agent::{
        adapters::memory::InMemoryAgentRegistry,
        domain::{AgentConfig, AgentDomainError, AgentLevel, AgentPatch, AgentRole, AgentStatus},
        ports::AgentRepositoryError,
        services::{AgentRegistryService, AgentRegistryServiceError, RegisterAgentRequest},
    },
    project::{
        adapters::memory::InMemoryProjectRepository,
        domain::{NewProject, ProjectId, ProjectStatus},
        ports::ProjectRepository,
    },
    user::domain::UserId,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService =
    AgentRegistryService<InMemoryAgentRegistry, InMemoryProjectRepository, DefaultClock>;

const OWNER: UserId = UserId::new(1);

struct Harness {
    projects: Arc<InMemoryProjectRepository>,
    service: TestService,
}

#[fixture]
fn harness() -> Harness {
    let projects = Arc::new(InMemoryProjectRepository::new());
    let service = AgentRegistryService::new(
        Arc::new(InMemoryAgentRegistry::new()),
        projects.clone(),
        Arc::new(DefaultClock),
    );
    Harness { projects, service }
}

async fn seed_project(harness: &Harness, name: &str) -> ProjectId {
    let draft = NewProject::new(name, "", ProjectStatus::Active, OWNER, &DefaultClock)
        .expect("valid project");
    harness
        .projects
        .create(&draft)
        .await
        .expect("project stored")
        .id()
}

fn request(name: &str, project_id: ProjectId) -> RegisterAgentRequest {
    RegisterAgentRequest::new(
        name,
        project_id,
        OWNER,
        AgentRole::Tester,
        AgentLevel::Mid,
        "anthropic",
        "claude-sonnet",
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_applies_defaults(harness: Harness) {
    let project_id = seed_project(&harness, "Apollo").await;

    let agent = harness
        .service
        .register(request("qa-bot", project_id).with_description("Runs the suite"))
        .await
        .expect("registration should succeed");

    assert_eq!(agent.name().as_str(), "qa-bot");
    assert_eq!(agent.status(), AgentStatus::Idle);
    assert!(agent.is_active());
    assert_eq!(agent.config(), &AgentConfig::default());
    let found = harness
        .service
        .find_by_id(agent.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(found, Some(agent));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_in_missing_project_fails(harness: Harness) {
    let missing = ProjectId::new(42);
    let result = harness.service.register(request("qa-bot", missing)).await;
    assert!(matches!(
        result,
        Err(AgentRegistryServiceError::ProjectNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_blank_model(harness: Harness) {
    let project_id = seed_project(&harness, "Apollo").await;
    let blank = RegisterAgentRequest::new(
        "qa-bot",
        project_id,
        OWNER,
        AgentRole::Tester,
        AgentLevel::Mid,
        "anthropic",
        "   ",
    );

    let result = harness.service.register(blank).await;

    assert!(matches!(
        result,
        Err(AgentRegistryServiceError::Domain(AgentDomainError::EmptyModel))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_by_project_scopes_agents(harness: Harness) {
    let apollo = seed_project(&harness, "Apollo").await;
    let gemini = seed_project(&harness, "Gemini").await;
    let first = harness
        .service
        .register(request("first-bot", apollo))
        .await
        .expect("registration should succeed");
    let second = harness
        .service
        .register(request("second-bot", apollo))
        .await
        .expect("registration should succeed");
    harness
        .service
        .register(request("other-bot", gemini))
        .await
        .expect("registration should succeed");

    let agents = harness
        .service
        .list_by_project(apollo)
        .await
        .expect("listing should succeed");

    assert_eq!(agents, vec![second, first]);
    assert_eq!(harness.service.list().await.expect("listing").len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_applies_patch(harness: Harness) {
    let project_id = seed_project(&harness, "Apollo").await;
    let agent = harness
        .service
        .register(request("qa-bot", project_id))
        .await
        .expect("registration should succeed");

    let updated = harness
        .service
        .update(
            agent.id(),
            AgentPatch {
                status: Some(AgentStatus::Busy),
                level: Some(AgentLevel::Senior),
                ..AgentPatch::default()
            },
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.status(), AgentStatus::Busy);
    assert_eq!(updated.level(), AgentLevel::Senior);
    assert_eq!(updated.role(), AgentRole::Tester);
    let stored = harness.service.get(agent.id()).await.expect("agent exists");
    assert_eq!(stored, updated);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_then_get_is_not_found(harness: Harness) {
    let project_id = seed_project(&harness, "Apollo").await;
    let agent = harness
        .service
        .register(request("qa-bot", project_id))
        .await
        .expect("registration should succeed");

    harness
        .service
        .delete(agent.id())
        .await
        .expect("delete should succeed");

    assert!(matches!(
        harness.service.get(agent.id()).await,
        Err(AgentRegistryServiceError::Repository(AgentRepositoryError::NotFound(_)))
    ));
}
