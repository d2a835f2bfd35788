//! Shared handler state.
//!
//! Services are built over trait objects so the same router serves both the
//! in-memory and the `PostgreSQL` adapters.

use crate::{
    agent::{
        adapters::{memory::InMemoryAgentRegistry, postgres::PostgresAgentRegistry},
        ports::AgentRepository,
        services::AgentRegistryService,
    },
    execution_plan::{
        adapters::{memory::InMemoryExecutionStore, postgres::PostgresExecutionStore},
        ports::{AssignmentRepository, ExecutionPlanRepository, ExecutionReportRepository},
        services::{AssignmentDispatcher, ExecutionPlanService},
    },
    project::{
        adapters::{memory::InMemoryProjectRepository, postgres::PostgresProjectRepository},
        ports::ProjectRepository,
        services::ProjectCatalogService,
    },
    provider::ProviderCatalog,
    task::{
        adapters::{memory::InMemoryTaskStore, postgres::PostgresTaskStore},
        ports::{TaskActivityLog, TaskRepository},
        services::{TaskBoardService, TaskLifecycleService},
    },
    user::{
        adapters::{memory::InMemoryUserRepository, postgres::PostgresUserRepository},
        ports::UserRepository,
        services::UserDirectoryService,
    },
};
use diesel::{
    PgConnection,
    r2d2::{ConnectionManager, Pool},
};
use mockable::DefaultClock;
use std::sync::Arc;

/// Connection pool shared by every `PostgreSQL` adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// User directory over dynamic storage.
pub type UserDirectory = UserDirectoryService<dyn UserRepository, DefaultClock>;

/// Project catalog over dynamic storage.
pub type ProjectCatalog =
    ProjectCatalogService<dyn ProjectRepository, dyn TaskRepository, dyn AgentRepository, DefaultClock>;

/// Agent registry over dynamic storage.
pub type AgentRegistry =
    AgentRegistryService<dyn AgentRepository, dyn ProjectRepository, DefaultClock>;

/// Task board over dynamic storage.
pub type TaskBoard = TaskBoardService<
    dyn TaskRepository,
    dyn TaskActivityLog,
    dyn ProjectRepository,
    dyn AgentRepository,
    dyn UserRepository,
    DefaultClock,
>;

/// Task lifecycle over dynamic storage.
pub type TaskLifecycle = TaskLifecycleService<dyn TaskRepository, dyn TaskActivityLog, DefaultClock>;

/// Execution planning over dynamic storage.
pub type Planning = ExecutionPlanService<
    dyn ExecutionPlanRepository,
    dyn AssignmentRepository,
    dyn ExecutionReportRepository,
    dyn ProjectRepository,
    dyn TaskRepository,
    dyn AgentRepository,
    dyn UserRepository,
    DefaultClock,
>;

/// Assignment dispatch over dynamic storage.
pub type Dispatcher = AssignmentDispatcher<
    dyn ExecutionPlanRepository,
    dyn AssignmentRepository,
    dyn AgentRepository,
    dyn TaskRepository,
    dyn TaskActivityLog,
    DefaultClock,
>;

/// One handle per storage port.
#[derive(Clone)]
pub struct Stores {
    /// User storage.
    pub users: Arc<dyn UserRepository>,
    /// Project storage.
    pub projects: Arc<dyn ProjectRepository>,
    /// Agent storage.
    pub agents: Arc<dyn AgentRepository>,
    /// Task storage.
    pub tasks: Arc<dyn TaskRepository>,
    /// Task activity trail.
    pub activities: Arc<dyn TaskActivityLog>,
    /// Execution plan storage.
    pub plans: Arc<dyn ExecutionPlanRepository>,
    /// Assignment storage.
    pub assignments: Arc<dyn AssignmentRepository>,
    /// Report storage.
    pub reports: Arc<dyn ExecutionReportRepository>,
}

impl Stores {
    /// Process-local stores.
    #[must_use]
    pub fn in_memory() -> Self {
        let tasks = Arc::new(InMemoryTaskStore::new());
        let execution = Arc::new(InMemoryExecutionStore::new());
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            projects: Arc::new(InMemoryProjectRepository::new()),
            agents: Arc::new(InMemoryAgentRegistry::new()),
            tasks: tasks.clone(),
            activities: tasks,
            plans: execution.clone(),
            assignments: execution.clone(),
            reports: execution,
        }
    }

    /// `PostgreSQL` stores sharing one pool.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        let tasks = Arc::new(PostgresTaskStore::new(pool.clone()));
        let execution = Arc::new(PostgresExecutionStore::new(pool.clone()));
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            projects: Arc::new(PostgresProjectRepository::new(pool.clone())),
            agents: Arc::new(PostgresAgentRegistry::new(pool.clone())),
            tasks: tasks.clone(),
            activities: tasks,
            plans: execution.clone(),
            assignments: execution.clone(),
            reports: execution,
        }
    }
}

/// Services shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User CRUD.
    pub users: Arc<UserDirectory>,
    /// Project CRUD and statistics.
    pub projects: Arc<ProjectCatalog>,
    /// Agent CRUD.
    pub agents: Arc<AgentRegistry>,
    /// Task CRUD, assignment, and review.
    pub board: Arc<TaskBoard>,
    /// Task status transitions and the activity trail.
    pub lifecycle: Arc<TaskLifecycle>,
    /// Execution plans and reports.
    pub planning: Arc<Planning>,
    /// Agent work queue.
    pub dispatcher: Arc<Dispatcher>,
    /// Provider catalog.
    pub providers: Arc<ProviderCatalog>,
}

impl AppState {
    /// Wires every service over the given stores.
    #[must_use]
    pub fn new(stores: Stores, providers: ProviderCatalog) -> Self {
        let clock = Arc::new(DefaultClock);
        let Stores {
            users,
            projects,
            agents,
            tasks,
            activities,
            plans,
            assignments,
            reports,
        } = stores;

        Self {
            users: Arc::new(UserDirectoryService::new(users.clone(), clock.clone())),
            projects: Arc::new(ProjectCatalogService::new(
                projects.clone(),
                tasks.clone(),
                agents.clone(),
                clock.clone(),
            )),
            agents: Arc::new(AgentRegistryService::new(
                agents.clone(),
                projects.clone(),
                clock.clone(),
            )),
            board: Arc::new(TaskBoardService::new(
                tasks.clone(),
                activities.clone(),
                projects.clone(),
                agents.clone(),
                users.clone(),
                clock.clone(),
            )),
            lifecycle: Arc::new(TaskLifecycleService::new(
                tasks.clone(),
                activities.clone(),
                clock.clone(),
            )),
            planning: Arc::new(ExecutionPlanService::new(
                plans.clone(),
                assignments.clone(),
                reports,
                projects,
                tasks.clone(),
                agents.clone(),
                users,
                clock.clone(),
            )),
            dispatcher: Arc::new(AssignmentDispatcher::new(
                plans,
                assignments,
                agents,
                tasks,
                activities,
                clock,
            )),
            providers: Arc::new(providers),
        }
    }

    /// Wires every service over process-local stores.
    #[must_use]
    pub fn in_memory(providers: ProviderCatalog) -> Self {
        Self::new(Stores::in_memory(), providers)
    }
}
