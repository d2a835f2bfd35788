//! Shared in-memory world for plan and dispatch service tests.

use std::sync::Arc;

use crate::{
    actor::Actor,
    agent::{
        adapters::memory::InMemoryAgentRegistry,
        domain::{Agent, AgentConfig, AgentLevel, AgentName, AgentRole, NewAgent},
        ports::AgentRepository,
    },
    execution_plan::{
        adapters::memory::InMemoryExecutionStore,
        domain::{ExecutionPlan, PlanData, TaskPriorityItem},
        services::{AssignmentDispatcher, CreatePlanRequest, ExecutionPlanService},
    },
    project::{
        adapters::memory::InMemoryProjectRepository,
        domain::{NewProject, Project, ProjectStatus},
        ports::ProjectRepository,
    },
    task::{
        adapters::memory::InMemoryTaskStore,
        domain::{NewTask, Task},
        ports::TaskRepository,
    },
    user::{adapters::memory::InMemoryUserRepository, domain::UserId},
};
use mockable::{Clock, DefaultClock};
use rstest::fixture;

pub(super) type TestPlanning = ExecutionPlanService<
    InMemoryExecutionStore,
    InMemoryExecutionStore,
    InMemoryExecutionStore,
    InMemoryProjectRepository,
    InMemoryTaskStore,
    InMemoryAgentRegistry,
    InMemoryUserRepository,
    DefaultClock,
>;

pub(super) type TestDispatcher = AssignmentDispatcher<
    InMemoryExecutionStore,
    InMemoryExecutionStore,
    InMemoryAgentRegistry,
    InMemoryTaskStore,
    InMemoryTaskStore,
    DefaultClock,
>;

pub(super) const OWNER: UserId = UserId::new(1);

pub(super) struct World {
    pub planning: TestPlanning,
    pub dispatcher: TestDispatcher,
    pub store: Arc<InMemoryExecutionStore>,
    pub tasks: Arc<InMemoryTaskStore>,
    projects: Arc<InMemoryProjectRepository>,
    agents: Arc<InMemoryAgentRegistry>,
}

#[fixture]
pub(super) fn world() -> World {
    let store = Arc::new(InMemoryExecutionStore::new());
    let tasks = Arc::new(InMemoryTaskStore::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    let agents = Arc::new(InMemoryAgentRegistry::new());
    let clock = Arc::new(DefaultClock);
    let planning = ExecutionPlanService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        projects.clone(),
        tasks.clone(),
        agents.clone(),
        Arc::new(InMemoryUserRepository::new()),
        clock.clone(),
    );
    let dispatcher = AssignmentDispatcher::new(
        store.clone(),
        store.clone(),
        agents.clone(),
        tasks.clone(),
        tasks.clone(),
        clock,
    );
    World {
        planning,
        dispatcher,
        store,
        tasks,
        projects,
        agents,
    }
}

impl World {
    pub async fn project(&self, name: &str) -> Project {
        let draft = NewProject::new(name, "", ProjectStatus::Active, OWNER, &DefaultClock)
            .expect("valid project");
        self.projects.create(&draft).await.expect("project stored")
    }

    pub async fn agent(&self, name: &str, project: &Project) -> Agent {
        let draft = NewAgent {
            name: AgentName::new(name).expect("valid agent name"),
            description: String::new(),
            project_id: project.id(),
            created_by: OWNER,
            role: AgentRole::FullstackDeveloper,
            level: AgentLevel::Mid,
            provider: "anthropic".to_owned(),
            model: "claude-sonnet".to_owned(),
            config: AgentConfig::default(),
            created_at: DefaultClock.utc(),
        };
        self.agents.create(&draft).await.expect("agent stored")
    }

    pub async fn task(&self, title: &str, project: &Project) -> Task {
        let draft = NewTask::new(project.id(), title, "", Actor::User(OWNER), &DefaultClock)
            .expect("valid task");
        self.tasks.create(&draft).await.expect("task stored")
    }

    /// Creates an active plan staffing each `(agent, task)` pair in order.
    pub async fn staffed_plan(&self, project: &Project, items: &[(&Agent, &Task)]) -> ExecutionPlan {
        let plan_data = PlanData {
            priority_order: items
                .iter()
                .map(|(agent, task)| {
                    TaskPriorityItem::new(task.id(), task.title()).with_agent(agent.id())
                })
                .collect(),
            ..PlanData::default()
        };
        self.planning
            .create_plan(CreatePlanRequest::new(project.id(), plan_data), Actor::User(OWNER))
            .await
            .expect("plan created")
    }
}
