//! Given steps for task state transition BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use eyre::WrapErr;
use homestead::{task::services::CreateTaskRequest, worker::services::CreateWorkerRequest};
use rstest_bdd_macros::given;

#[given(r#"an active worker "{name}""#)]
fn active_worker(world: &mut TaskTransitionWorld, name: String) -> Result<(), eyre::Report> {
    let worker = run_async(world.directory.create(CreateWorkerRequest::new(name)))
        .wrap_err("register worker for transition scenario")?;
    world.owner = Some(worker.id());
    Ok(())
}

#[given(r#"another active worker "{name}""#)]
fn another_active_worker(
    world: &mut TaskTransitionWorld,
    name: String,
) -> Result<(), eyre::Report> {
    let worker = run_async(world.directory.create(CreateWorkerRequest::new(name)))
        .wrap_err("register second worker for transition scenario")?;
    world.other_worker = Some(worker.id());
    Ok(())
}

#[given(r#"a task "{title}" assigned to that worker"#)]
fn task_assigned_to_worker(
    world: &mut TaskTransitionWorld,
    title: String,
) -> Result<(), eyre::Report> {
    let owner = world
        .owner
        .ok_or_else(|| eyre::eyre!("missing worker in scenario world"))?;
    let created = run_async(
        world
            .service
            .create(CreateTaskRequest::new(title).with_assignee(owner)),
    )
    .wrap_err("create task for transition scenario")?;
    world.last_task = Some(created);
    Ok(())
}

#[given("the task has been started")]
fn task_has_been_started(world: &mut TaskTransitionWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let started = run_async(world.service.start(task_id)).wrap_err("start task in setup")?;
    world.last_task = Some(started);
    Ok(())
}
