//! Shared world state for task lifecycle BDD scenarios.

use std::{collections::HashMap, sync::Arc};

use mockable::DefaultClock;
use rstest::fixture;
use stackflow::{
    actor::Actor,
    project::{adapters::memory::InMemoryProjectRepository, domain::Project},
    task::{
        adapters::memory::InMemoryTaskStore,
        domain::{Task, TaskTransition},
        services::{TaskLifecycleError, TaskLifecycleService},
    },
    user::adapters::memory::InMemoryUserRepository,
};

/// Lifecycle service type used by the BDD world.
pub type TestLifecycle = TaskLifecycleService<InMemoryTaskStore, InMemoryTaskStore, DefaultClock>;

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskLifecycleWorld {
    pub lifecycle: TestLifecycle,
    pub tasks: Arc<InMemoryTaskStore>,
    pub projects: Arc<InMemoryProjectRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub actors: HashMap<String, Actor>,
    pub project: Option<Project>,
    pub task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskLifecycleWorld {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskStore::new());
        let lifecycle =
            TaskLifecycleService::new(tasks.clone(), tasks.clone(), Arc::new(DefaultClock));
        Self {
            lifecycle,
            tasks,
            projects: Arc::new(InMemoryProjectRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            actors: HashMap::new(),
            project: None,
            task: None,
            last_result: None,
        }
    }

    /// Returns the scenario's task.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the actor registered under `username`.
    pub fn actor_named(&self, username: &str) -> Result<Actor, eyre::Report> {
        self.actors
            .get(username)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown user in scenario: {username}"))
    }

    /// Applies a transition on behalf of `username` and records its outcome.
    pub fn apply(&mut self, username: &str, transition: TaskTransition) -> Result<(), eyre::Report> {
        let task_id = self.task()?.id();
        let actor = self.actor_named(username)?;
        let result = run_async(self.lifecycle.transition(task_id, transition, actor, None));
        if let Ok(updated) = &result {
            self.task = Some(updated.clone());
        }
        self.last_result = Some(result);
        Ok(())
    }
}

impl Default for TaskLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLifecycleWorld {
    TaskLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a transition name used in scenario text.
pub fn transition_named(name: &str) -> Result<TaskTransition, eyre::Report> {
    match name {
        "start" => Ok(TaskTransition::Start),
        "complete" => Ok(TaskTransition::Complete),
        "close" => Ok(TaskTransition::Close),
        "reopen" => Ok(TaskTransition::Reopen),
        "wont_do" => Ok(TaskTransition::WontDo),
        other => Err(eyre::eyre!("unknown transition in scenario: {other}")),
    }
}
