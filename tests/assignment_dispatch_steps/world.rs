//! Shared world state for assignment dispatch BDD scenarios.

use std::{collections::HashMap, sync::Arc};

use mockable::DefaultClock;
use rstest::fixture;
use stackflow::{
    agent::{adapters::memory::InMemoryAgentRegistry, domain::Agent},
    execution_plan::{
        adapters::memory::InMemoryExecutionStore,
        domain::AgentAssignment,
        services::{AssignmentDispatcher, DispatchError, ExecutionPlanService, NextTask},
    },
    project::{adapters::memory::InMemoryProjectRepository, domain::Project},
    task::{
        adapters::memory::InMemoryTaskStore,
        domain::Task,
        services::TaskLifecycleService,
    },
    user::{adapters::memory::InMemoryUserRepository, domain::UserId},
};

/// Planning service type used by the BDD world.
pub type TestPlanning = ExecutionPlanService<
    InMemoryExecutionStore,
    InMemoryExecutionStore,
    InMemoryExecutionStore,
    InMemoryProjectRepository,
    InMemoryTaskStore,
    InMemoryAgentRegistry,
    InMemoryUserRepository,
    DefaultClock,
>;

/// Dispatcher type used by the BDD world.
pub type TestDispatcher = AssignmentDispatcher<
    InMemoryExecutionStore,
    InMemoryExecutionStore,
    InMemoryAgentRegistry,
    InMemoryTaskStore,
    InMemoryTaskStore,
    DefaultClock,
>;

/// Lifecycle service used for manual task changes.
pub type TestLifecycle = TaskLifecycleService<InMemoryTaskStore, InMemoryTaskStore, DefaultClock>;

/// Owner of every scenario project.
pub const OWNER: UserId = UserId::new(1);

/// Scenario world for assignment dispatch behaviour tests.
pub struct DispatchWorld {
    pub planning: TestPlanning,
    pub dispatcher: TestDispatcher,
    pub lifecycle: TestLifecycle,
    pub tasks: Arc<InMemoryTaskStore>,
    pub projects: Arc<InMemoryProjectRepository>,
    pub agents: Arc<InMemoryAgentRegistry>,
    pub project: Option<Project>,
    pub agent: Option<Agent>,
    pub tasks_by_title: HashMap<String, Task>,
    pub last_next: Option<NextTask>,
    pub assignment: Option<AgentAssignment>,
    pub last_completion: Option<Result<AgentAssignment, DispatchError>>,
}

impl DispatchWorld {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
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
            store,
            agents.clone(),
            tasks.clone(),
            tasks.clone(),
            clock.clone(),
        );
        let lifecycle = TaskLifecycleService::new(tasks.clone(), tasks.clone(), clock);
        Self {
            planning,
            dispatcher,
            lifecycle,
            tasks,
            projects,
            agents,
            project: None,
            agent: None,
            tasks_by_title: HashMap::new(),
            last_next: None,
            assignment: None,
            last_completion: None,
        }
    }

    /// Returns the scenario's project.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the scenario's agent.
    pub fn agent(&self) -> Result<&Agent, eyre::Report> {
        self.agent
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing agent in scenario world"))
    }

    /// Returns a task created earlier in the scenario.
    pub fn task_titled(&self, title: &str) -> Result<&Task, eyre::Report> {
        self.tasks_by_title
            .get(title)
            .ok_or_else(|| eyre::eyre!("unknown task in scenario: {title}"))
    }

    /// Claims the agent's next assignment and records the outcome.
    pub fn claim_next(&mut self) -> Result<(), eyre::Report> {
        let agent_id = self.agent()?.id();
        let next = run_async(self.dispatcher.next_task(agent_id))?;
        if let Some(details) = &next.assignment {
            self.assignment = Some(details.assignment.clone());
        }
        self.last_next = Some(next);
        Ok(())
    }
}

impl Default for DispatchWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DispatchWorld {
    DispatchWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
