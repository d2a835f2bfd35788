//! Service tests for task creation, lookup, editing, and staffing.

use std::sync::Arc;

use crate::{
    actor::Actor,
    agent::{
        adapters::memory::InMemoryAgentRegistry,
        domain::{Agent, AgentConfig, AgentLevel, AgentName, AgentRole, NewAgent},
        ports::AgentRepository,
    },
    project::{
        adapters::memory::InMemoryProjectRepository,
        domain::{NewProject, Project, ProjectStatus},
        ports::ProjectRepository,
    },
    task::{
        adapters::memory::InMemoryTaskStore,
        domain::{ActivityAction, TaskFilter, TaskPatch, TaskPriority, TaskStatus},
        ports::{TaskActivityLog, TaskRepositoryError},
        services::{CreateTaskRequest, TaskBoardError, TaskBoardService},
    },
    user::{
        adapters::memory::InMemoryUserRepository,
        domain::{NewUser, User, UserId, UserRole},
        ports::UserRepository,
    },
};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

type TestBoard = TaskBoardService<
    InMemoryTaskStore,
    InMemoryTaskStore,
    InMemoryProjectRepository,
    InMemoryAgentRegistry,
    InMemoryUserRepository,
    DefaultClock,
>;

struct World {
    board: TestBoard,
    tasks: Arc<InMemoryTaskStore>,
    projects: Arc<InMemoryProjectRepository>,
    agents: Arc<InMemoryAgentRegistry>,
    users: Arc<InMemoryUserRepository>,
}

#[fixture]
fn world() -> World {
    let tasks = Arc::new(InMemoryTaskStore::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    let agents = Arc::new(InMemoryAgentRegistry::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let board = TaskBoardService::new(
        tasks.clone(),
        tasks.clone(),
        projects.clone(),
        agents.clone(),
        users.clone(),
        Arc::new(DefaultClock),
    );
    World {
        board,
        tasks,
        projects,
        agents,
        users,
    }
}

impl World {
    async fn user(&self, username: &str) -> User {
        let draft = NewUser::new(
            username,
            format!("{username}@example.com"),
            UserRole::User,
            &DefaultClock,
        )
        .expect("valid user");
        self.users.create(&draft).await.expect("user stored")
    }

    async fn project(&self, name: &str, owner: UserId) -> Project {
        let draft = NewProject::new(name, "", ProjectStatus::Active, owner, &DefaultClock)
            .expect("valid project");
        self.projects.create(&draft).await.expect("project stored")
    }

    async fn agent(&self, name: &str, project: &Project, owner: UserId) -> Agent {
        let draft = NewAgent {
            name: AgentName::new(name).expect("valid agent name"),
            description: String::new(),
            project_id: project.id(),
            created_by: owner,
            role: AgentRole::BackendDeveloper,
            level: AgentLevel::Senior,
            provider: "openai".to_owned(),
            model: "gpt-4o".to_owned(),
            config: AgentConfig::default(),
            created_at: DefaultClock.utc(),
        };
        self.agents.create(&draft).await.expect("agent stored")
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_records_created_activity(world: World) {
    let owner = world.user("owner").await;
    let project = world.project("Apollo", owner.id()).await;

    let task = world
        .board
        .create(
            CreateTaskRequest::new(project.id(), "Design schema")
                .with_priority(TaskPriority::High)
                .with_tags(vec!["db".to_owned()]),
            Actor::User(owner.id()),
        )
        .await
        .expect("creation should succeed");

    assert_eq!(task.status(), TaskStatus::Open);
    assert_eq!(task.priority(), TaskPriority::High);
    let activities = world
        .tasks
        .list_for_task(task.id())
        .await
        .expect("listing should succeed");
    let created = activities.first().expect("created activity");
    assert_eq!(created.action(), ActivityAction::Created);
    assert_eq!(created.message(), "Task 'Design schema' created");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_in_missing_project_fails(world: World) {
    let owner = world.user("owner").await;
    let missing = crate::project::domain::ProjectId::new(77);

    let result = world
        .board
        .create(
            CreateTaskRequest::new(missing, "Orphan task"),
            Actor::User(owner.id()),
        )
        .await;

    assert!(matches!(result, Err(TaskBoardError::ProjectNotFound(id)) if id == missing));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_agent_from_other_project(world: World) {
    let owner = world.user("owner").await;
    let home = world.project("Home", owner.id()).await;
    let away = world.project("Away", owner.id()).await;
    let stranger = world.agent("stranger", &away, owner.id()).await;

    let result = world
        .board
        .create(
            CreateTaskRequest::new(home.id(), "Cross project")
                .with_assigned_agent(stranger.id()),
            Actor::User(owner.id()),
        )
        .await;

    assert!(matches!(result, Err(TaskBoardError::AgentNotFound(id)) if id == stranger.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_unknown_reviewer(world: World) {
    let owner = world.user("owner").await;
    let project = world.project("Apollo", owner.id()).await;

    let result = world
        .board
        .create(
            CreateTaskRequest::new(project.id(), "Needs review").with_reviewer(UserId::new(500)),
            Actor::User(owner.id()),
        )
        .await;

    assert!(matches!(result, Err(TaskBoardError::ReviewerNotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assign_records_agent_name(world: World) {
    let owner = world.user("owner").await;
    let project = world.project("Apollo", owner.id()).await;
    let builder = world.agent("builder", &project, owner.id()).await;
    let task = world
        .board
        .create(
            CreateTaskRequest::new(project.id(), "Assignable"),
            Actor::User(owner.id()),
        )
        .await
        .expect("creation should succeed");

    let assigned = world
        .board
        .assign(task.id(), builder.id(), Actor::User(owner.id()))
        .await
        .expect("assignment should succeed");

    assert_eq!(assigned.assigned_agent_id(), Some(builder.id()));
    let activities = world
        .tasks
        .list_for_task(task.id())
        .await
        .expect("listing should succeed");
    let latest = activities.first().expect("assigned activity");
    assert_eq!(latest.action(), ActivityAction::Assigned);
    assert_eq!(latest.new_value(), Some("builder"));
    assert_eq!(latest.message(), "Agent 'builder' assigned to task");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn set_reviewer_records_username(world: World) {
    let owner = world.user("owner").await;
    let grace = world.user("grace").await;
    let project = world.project("Apollo", owner.id()).await;
    let task = world
        .board
        .create(
            CreateTaskRequest::new(project.id(), "Reviewable"),
            Actor::User(owner.id()),
        )
        .await
        .expect("creation should succeed");

    let updated = world
        .board
        .set_reviewer(task.id(), grace.id(), Actor::User(owner.id()))
        .await
        .expect("reviewer should be set");

    assert_eq!(updated.reviewer_id(), Some(grace.id()));
    let details = world
        .board
        .details(task.id())
        .await
        .expect("details should load");
    assert_eq!(details.reviewer_name.as_deref(), Some("grace"));
    assert_eq!(details.creator_name.as_deref(), Some("owner"));
    assert_eq!(details.project_name.as_deref(), Some("Apollo"));
    assert_eq!(details.assigned_agent_name, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_changes_descriptive_fields_only(world: World) {
    let owner = world.user("owner").await;
    let project = world.project("Apollo", owner.id()).await;
    let task = world
        .board
        .create(
            CreateTaskRequest::new(project.id(), "Draft title"),
            Actor::User(owner.id()),
        )
        .await
        .expect("creation should succeed");

    let updated = world
        .board
        .update(
            task.id(),
            TaskPatch {
                title: Some("Final title".to_owned()),
                tags: Some(vec!["docs".to_owned()]),
                ..TaskPatch::default()
            },
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.title(), "Final title");
    assert_eq!(updated.tags(), ["docs".to_owned()]);
    assert_eq!(updated.status(), TaskStatus::Open);
    let stored = world.board.get(task.id()).await.expect("task exists");
    assert_eq!(stored, updated);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_and_orders_newest_first(world: World) {
    let owner = world.user("owner").await;
    let project = world.project("Apollo", owner.id()).await;
    let creator = Actor::User(owner.id());
    let first = world
        .board
        .create(CreateTaskRequest::new(project.id(), "First task"), creator)
        .await
        .expect("creation should succeed");
    let second = world
        .board
        .create(
            CreateTaskRequest::new(project.id(), "Second task")
                .with_priority(TaskPriority::Critical),
            creator,
        )
        .await
        .expect("creation should succeed");

    let all = world
        .board
        .list_by_project(project.id())
        .await
        .expect("listing should succeed");
    let ids: Vec<_> = all.iter().map(|task| task.id()).collect();
    assert_eq!(ids, vec![second.id(), first.id()]);

    let critical = world
        .board
        .list(TaskFilter {
            priority: Some(TaskPriority::Critical),
            ..TaskFilter::default()
        })
        .await
        .expect("listing should succeed");
    assert_eq!(critical, vec![second]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_task_and_activities(world: World) {
    let owner = world.user("owner").await;
    let project = world.project("Apollo", owner.id()).await;
    let task = world
        .board
        .create(
            CreateTaskRequest::new(project.id(), "Short lived"),
            Actor::User(owner.id()),
        )
        .await
        .expect("creation should succeed");

    world.board.delete(task.id()).await.expect("delete should succeed");

    assert!(matches!(
        world.board.get(task.id()).await,
        Err(TaskBoardError::Repository(TaskRepositoryError::NotFound(_)))
    ));
    let activities = world
        .tasks
        .list_for_task(task.id())
        .await
        .expect("listing should succeed");
    assert!(activities.is_empty());
}
