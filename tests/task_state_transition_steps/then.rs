//! Then steps for task state transition BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use homestead::{error::ErrorKind, task::domain::TaskState};
use rstest_bdd_macros::then;

#[then(r#"the task state is "{state}""#)]
fn task_state_is(world: &TaskTransitionWorld, state: String) -> Result<(), eyre::Report> {
    let expected_state = TaskState::try_from(state.as_str())
        .map_err(|err| eyre::eyre!("invalid expected state in scenario: {err}"))?;
    let task_id = world.task()?.id();
    let stored = run_async(world.service.find(task_id))?;

    if stored.state() != expected_state {
        return Err(eyre::eyre!(
            "expected state {}, found {}",
            expected_state.as_str(),
            stored.state().as_str()
        ));
    }

    Ok(())
}

#[then("the task is neither blocked nor in progress")]
fn task_neither_blocked_nor_in_progress(
    world: &TaskTransitionWorld,
) -> Result<(), eyre::Report> {
    let progress = world.task()?.progress();
    eyre::ensure!(
        progress.is_completed() && !progress.is_blocked(),
        "expected a completed task, found {progress:?}"
    );
    Ok(())
}

#[then("the transition fails with a conflict")]
fn transition_fails_with_conflict(world: &TaskTransitionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_transition_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))?;

    let Err(err) = result else {
        return Err(eyre::eyre!("expected a conflict, got {result:?}"));
    };
    if err.kind() != ErrorKind::Conflict {
        return Err(eyre::eyre!("expected a conflict, got {err:?}"));
    }

    Ok(())
}

#[then("the task belongs to the other worker")]
fn task_belongs_to_other_worker(world: &TaskTransitionWorld) -> Result<(), eyre::Report> {
    let other = world
        .other_worker
        .ok_or_else(|| eyre::eyre!("missing second worker in scenario world"))?;
    let owner = world.task()?.assignee();
    eyre::ensure!(owner == Some(other), "expected owner {other}, found {owner:?}");
    Ok(())
}
