//! Given steps for supply pipeline scenarios.

use super::world::{SupplyPipelineWorld, run_async};
use eyre::WrapErr;
use homestead::{
    supply::{domain::Quantity, services::CreateSupplyRequest},
    worker::services::CreateWorkerRequest,
};
use rstest_bdd_macros::given;

#[given(r#"an active worker "{name}""#)]
fn active_worker(world: &mut SupplyPipelineWorld, name: String) -> Result<(), eyre::Report> {
    let worker = run_async(
        world
            .directory
            .create(CreateWorkerRequest::new(name).with_role("Field hand")),
    )
    .wrap_err("register worker for scenario")?;
    world.worker = Some(worker);
    Ok(())
}

#[given(r#"an inactive worker "{name}""#)]
fn inactive_worker(world: &mut SupplyPipelineWorld, name: String) -> Result<(), eyre::Report> {
    let worker = run_async(world.directory.create(CreateWorkerRequest::new(name)))
        .wrap_err("register worker for scenario")?;
    let deactivated = run_async(world.directory.deactivate(worker.id()))
        .wrap_err("deactivate worker for scenario")?;
    world.worker = Some(deactivated);
    Ok(())
}

#[given(r#"the worker has requested {count:i64} of "{item}""#)]
fn worker_has_requested(
    world: &mut SupplyPipelineWorld,
    count: i64,
    item: String,
) -> Result<(), eyre::Report> {
    let worker_id = world.worker()?.id();
    let request = CreateSupplyRequest::new(worker_id, item)
        .with_quantity(Quantity::from_count(count));
    let filed = run_async(world.supplies.create(request)).wrap_err("file supply request")?;
    world.current_request = Some(filed);
    Ok(())
}
