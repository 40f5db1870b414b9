//! When steps for dev item workflow scenarios.

use super::world::{DevWorkflowWorld, run_async};
use eyre::WrapErr;
use homestead::dev_tracker::{
    domain::{DevItem, DevPriority},
    services::DevItemError,
};
use rstest_bdd_macros::when;

fn record(world: &mut DevWorkflowWorld, result: Result<DevItem, DevItemError>) {
    if let Ok(ref updated) = result {
        world.current_item = Some(updated.clone());
    }
    world.last_result = Some(result);
}

#[when(r#"the tester fails the item with note "{note}""#)]
fn tester_fails_item(world: &mut DevWorkflowWorld, note: String) -> Result<(), eyre::Report> {
    let item_id = world.item()?.id();
    let result = run_async(world.items.fail(item_id, &note, None));
    record(world, result);
    Ok(())
}

#[when("the tester verifies the item")]
fn tester_verifies_item(world: &mut DevWorkflowWorld) -> Result<(), eyre::Report> {
    let item_id = world.item()?.id();
    let result = run_async(world.items.verify(item_id));
    record(world, result);
    Ok(())
}

#[when(r#"the feedback is approved at priority "{priority}""#)]
fn feedback_approved(world: &mut DevWorkflowWorld, priority: String) -> Result<(), eyre::Report> {
    let parsed = DevPriority::try_from(priority.as_str())
        .map_err(|err| eyre::eyre!("invalid priority in scenario: {err}"))?;
    let feedback_id = world
        .pending_feedback
        .ok_or_else(|| eyre::eyre!("missing feedback in scenario world"))?;
    let created = run_async(world.intake.approve(feedback_id, parsed))
        .wrap_err("approve production feedback")?;
    world.current_item = created;
    Ok(())
}
