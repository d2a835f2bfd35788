//! When steps for assignment dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use rstest_bdd_macros::when;
use stackflow::execution_plan::services::CompleteTaskRequest;

#[when("the agent asks for its next task")]
fn asks_for_next(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    world.claim_next()
}

#[when(r#"the agent reports "{title}" complete"#)]
fn reports_complete(world: &mut DispatchWorld, title: String) -> Result<(), eyre::Report> {
    let agent_id = world.agent()?.id();
    let task_id = world.task_titled(&title)?.id();
    let result = run_async(
        world
            .dispatcher
            .complete_task(agent_id, CompleteTaskRequest::new(task_id)),
    );
    if let Ok(assignment) = &result {
        world.assignment = Some(assignment.clone());
    }
    world.last_completion = Some(result);
    Ok(())
}
