//! Then steps for dev item workflow scenarios.

use super::world::{DevWorkflowWorld, run_async};
use homestead::dev_tracker::domain::{DevPriority, DevStatus};
use homestead::error::ErrorKind;
use rstest_bdd_macros::then;

#[then(r#"the item status is "{status}""#)]
fn item_status_is(world: &DevWorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let expected = DevStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let item_id = world.item()?.id();
    let stored = run_async(world.items.find(item_id))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then("the item has {count:usize} recorded failure")]
fn item_has_failures(world: &DevWorkflowWorld, count: usize) -> Result<(), eyre::Report> {
    let history = world.item()?.fail_note_history();
    eyre::ensure!(
        history.len() == count,
        "expected {count} failures, found {}",
        history.len()
    );
    Ok(())
}

#[then(r#"the current fail note is "{note}""#)]
fn current_fail_note_is(world: &DevWorkflowWorld, note: String) -> Result<(), eyre::Report> {
    let current = world.item()?.fail_note();
    eyre::ensure!(
        current == Some(note.as_str()),
        "expected fail note {note:?}, found {current:?}"
    );
    Ok(())
}

#[then("the item has a completion stamp")]
fn item_has_completion_stamp(world: &DevWorkflowWorld) -> Result<(), eyre::Report> {
    let item = world.item()?;
    eyre::ensure!(
        item.completed_at() == Some(item.updated_at()),
        "completion should be stamped at the verifying update"
    );
    Ok(())
}

#[then("the action is refused as a conflict")]
fn action_refused_as_conflict(world: &DevWorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action result"))?;
    let Err(err) = result else {
        return Err(eyre::eyre!("expected a refusal, got {result:?}"));
    };
    eyre::ensure!(
        err.kind() == ErrorKind::Conflict,
        "expected a conflict, got {}",
        err.kind()
    );
    Ok(())
}

#[then(r#"a dev item titled "{title}" is pending at priority "{priority}""#)]
fn dev_item_pending_at_priority(
    world: &DevWorkflowWorld,
    title: String,
    priority: String,
) -> Result<(), eyre::Report> {
    let expected = DevPriority::try_from(priority.as_str())
        .map_err(|err| eyre::eyre!("invalid expected priority in scenario: {err}"))?;
    let items = run_async(world.items.list_all())?;
    let found = items
        .iter()
        .find(|item| item.title().as_str() == title)
        .ok_or_else(|| eyre::eyre!("no dev item titled {title:?}"))?;
    eyre::ensure!(found.status() == DevStatus::Pending, "item should be pending");
    eyre::ensure!(found.priority() == expected, "priority should be {expected}");
    Ok(())
}

#[then("no feedback is waiting for review")]
fn no_feedback_waiting(world: &DevWorkflowWorld) -> Result<(), eyre::Report> {
    let pending = run_async(world.intake.list_pending())?;
    eyre::ensure!(pending.is_empty(), "expected no pending feedback, found {}", pending.len());
    Ok(())
}
