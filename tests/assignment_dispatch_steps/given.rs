//! Given steps for assignment dispatch BDD scenarios.

use super::world::{DispatchWorld, OWNER, run_async};
use eyre::WrapErr;
use mockable::{Clock, DefaultClock};
use rstest_bdd_macros::given;
use stackflow::{
    actor::Actor,
    agent::{
        domain::{AgentConfig, AgentLevel, AgentName, AgentRole, NewAgent},
        ports::AgentRepository,
    },
    execution_plan::{
        domain::{PlanData, TaskPriorityItem},
        services::CreatePlanRequest,
    },
    project::{
        domain::{NewProject, ProjectStatus},
        ports::ProjectRepository,
    },
    task::{
        domain::{NewTask, TaskTransition},
        ports::TaskRepository,
    },
};

fn create_task(world: &mut DispatchWorld, title: &str) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let draft = NewTask::new(project_id, title, "", Actor::User(OWNER), &DefaultClock)?;
    let task = run_async(world.tasks.create(&draft)).wrap_err("store scenario task")?;
    world.tasks_by_title.insert(title.to_owned(), task);
    Ok(())
}

fn transition_by_hand(
    world: &DispatchWorld,
    title: &str,
    transition: TaskTransition,
) -> Result<(), eyre::Report> {
    let task_id = world.task_titled(title)?.id();
    run_async(
        world
            .lifecycle
            .transition(task_id, transition, Actor::User(OWNER), None),
    )
    .wrap_err_with(|| format!("apply {transition} to {title}"))?;
    Ok(())
}

#[given(r#"a project "{name}" with an agent "{agent_name}""#)]
fn project_with_agent(
    world: &mut DispatchWorld,
    name: String,
    agent_name: String,
) -> Result<(), eyre::Report> {
    let project_draft =
        NewProject::new(name.as_str(), "", ProjectStatus::Active, OWNER, &DefaultClock)?;
    let project =
        run_async(world.projects.create(&project_draft)).wrap_err("store scenario project")?;
    let agent_draft = NewAgent {
        name: AgentName::new(agent_name.as_str())?,
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
    let agent = run_async(world.agents.create(&agent_draft)).wrap_err("store scenario agent")?;
    world.project = Some(project);
    world.agent = Some(agent);
    Ok(())
}

#[given(r#"tasks "{first}" and "{second}" planned for the agent"#)]
fn tasks_planned(
    world: &mut DispatchWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    create_task(world, &first)?;
    create_task(world, &second)?;
    let agent_id = world.agent()?.id();
    let mut priority_order = Vec::new();
    for title in [&first, &second] {
        let task = world.task_titled(title)?;
        priority_order.push(TaskPriorityItem::new(task.id(), task.title()).with_agent(agent_id));
    }
    let plan_data = PlanData {
        priority_order,
        ..PlanData::default()
    };
    let project_id = world.project()?.id();
    run_async(world.planning.create_plan(
        CreatePlanRequest::new(project_id, plan_data),
        Actor::User(OWNER),
    ))
    .wrap_err("create scenario plan")?;
    Ok(())
}

#[given(r#"an unplanned task "{title}""#)]
fn unplanned_task(world: &mut DispatchWorld, title: String) -> Result<(), eyre::Report> {
    create_task(world, &title)
}

#[given("the agent has claimed its next task")]
fn agent_has_claimed(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    world.claim_next()?;
    eyre::ensure!(world.assignment.is_some(), "nothing was claimed");
    Ok(())
}

#[given(r#"work on "{title}" has started"#)]
fn work_started(world: &mut DispatchWorld, title: String) -> Result<(), eyre::Report> {
    transition_by_hand(world, &title, TaskTransition::Start)
}

#[given(r#""{title}" was finished and closed by hand"#)]
fn finished_by_hand(world: &mut DispatchWorld, title: String) -> Result<(), eyre::Report> {
    transition_by_hand(world, &title, TaskTransition::Complete)?;
    transition_by_hand(world, &title, TaskTransition::Close)
}
