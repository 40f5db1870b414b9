//! When steps for task state transition BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use rstest_bdd_macros::when;

#[when("the task is started")]
fn start_task(world: &mut TaskTransitionWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.service.start(task_id));
    world.record(result);
    Ok(())
}

#[when(r#"the task is completed with note "{note}""#)]
fn complete_task(world: &mut TaskTransitionWorld, note: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.service.complete(task_id, Some(&note)));
    world.record(result);
    Ok(())
}

#[when(r#"the task is blocked because "{reason}""#)]
fn block_task(world: &mut TaskTransitionWorld, reason: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.service.block(task_id, &reason));
    world.record(result);
    Ok(())
}

#[when("the task is unblocked")]
fn unblock_task(world: &mut TaskTransitionWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.service.unblock(task_id));
    world.record(result);
    Ok(())
}

#[when("the task is assigned to the other worker")]
fn assign_to_other_worker(world: &mut TaskTransitionWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let other = world
        .other_worker
        .ok_or_else(|| eyre::eyre!("missing second worker in scenario world"))?;
    let result = run_async(world.service.assign(task_id, other));
    world.record(result);
    Ok(())
}

#[when("the task is unassigned")]
fn unassign_task(world: &mut TaskTransitionWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.service.unassign(task_id));
    world.record(result);
    Ok(())
}
