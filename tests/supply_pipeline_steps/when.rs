//! When steps for supply pipeline scenarios.

use super::world::{SupplyPipelineWorld, run_async};
use homestead::supply::{domain::Quantity, services::CreateSupplyRequest};
use rstest_bdd_macros::when;

#[when(r#"the request is approved with note "{note}""#)]
fn request_approved(world: &mut SupplyPipelineWorld, note: String) -> Result<(), eyre::Report> {
    let request_id = world.request()?.id();
    let result = run_async(world.supplies.approve(request_id, Some(&note)));
    world.record(result);
    Ok(())
}

#[when(r#"the request is denied with note "{note}""#)]
fn request_denied(world: &mut SupplyPipelineWorld, note: String) -> Result<(), eyre::Report> {
    let request_id = world.request()?.id();
    let result = run_async(world.supplies.deny(request_id, Some(&note)));
    world.record(result);
    Ok(())
}

#[when("the request is marked purchased")]
fn request_purchased(world: &mut SupplyPipelineWorld) -> Result<(), eyre::Report> {
    let request_id = world.request()?.id();
    let result = run_async(world.supplies.mark_purchased(request_id));
    world.record(result);
    Ok(())
}

#[when("the request is marked delivered")]
fn request_delivered(world: &mut SupplyPipelineWorld) -> Result<(), eyre::Report> {
    let request_id = world.request()?.id();
    let result = run_async(world.supplies.mark_delivered(request_id));
    world.record(result);
    Ok(())
}

#[when("the request is reopened")]
fn request_reopened(world: &mut SupplyPipelineWorld) -> Result<(), eyre::Report> {
    let request_id = world.request()?.id();
    let result = run_async(world.supplies.reopen(request_id, None));
    world.record(result);
    Ok(())
}

#[when(r#"the worker requests {count:i64} of "{item}""#)]
fn worker_requests(
    world: &mut SupplyPipelineWorld,
    count: i64,
    item: String,
) -> Result<(), eyre::Report> {
    let worker_id = world.worker()?.id();
    let request = CreateSupplyRequest::new(worker_id, item)
        .with_quantity(Quantity::from_count(count));
    let result = run_async(world.supplies.create(request));
    world.record(result);
    Ok(())
}
