//! When steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, transition_named};
use rstest_bdd_macros::when;

#[when(r#""{username}" starts the task"#)]
fn starts(world: &mut TaskLifecycleWorld, username: String) -> Result<(), eyre::Report> {
    world.apply(&username, transition_named("start")?)
}

#[when(r#""{username}" completes the task"#)]
fn completes(world: &mut TaskLifecycleWorld, username: String) -> Result<(), eyre::Report> {
    world.apply(&username, transition_named("complete")?)
}

#[when(r#""{username}" closes the task"#)]
fn closes(world: &mut TaskLifecycleWorld, username: String) -> Result<(), eyre::Report> {
    world.apply(&username, transition_named("close")?)
}

#[when(r#""{username}" reopens the task"#)]
fn reopens(world: &mut TaskLifecycleWorld, username: String) -> Result<(), eyre::Report> {
    world.apply(&username, transition_named("reopen")?)
}

#[when(r#""{username}" marks the task as won't do"#)]
fn marks_wont_do(world: &mut TaskLifecycleWorld, username: String) -> Result<(), eyre::Report> {
    world.apply(&username, transition_named("wont_do")?)
}
