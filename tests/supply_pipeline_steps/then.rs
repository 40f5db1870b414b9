//! Then steps for supply pipeline scenarios.

use super::world::{SupplyPipelineWorld, run_async};
use homestead::{
    error::ErrorKind,
    supply::domain::{SupplyRequestFilter, SupplyStatus},
};
use rstest_bdd_macros::then;

fn ensure_conflict(world: &SupplyPipelineWorld) -> Result<(), eyre::Report> {
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

#[then(r#"the request status is "{status}""#)]
fn request_status_is(world: &SupplyPipelineWorld, status: String) -> Result<(), eyre::Report> {
    let expected = SupplyStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let request_id = world.request()?.id();
    let stored = run_async(world.supplies.find(request_id))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then(r#"the admin note is "{note}""#)]
fn admin_note_is(world: &SupplyPipelineWorld, note: String) -> Result<(), eyre::Report> {
    let current = world.request()?.admin_notes();
    eyre::ensure!(
        current == Some(note.as_str()),
        "expected admin note {note:?}, found {current:?}"
    );
    Ok(())
}

#[then("the action is refused as a conflict")]
fn action_refused(world: &SupplyPipelineWorld) -> Result<(), eyre::Report> {
    ensure_conflict(world)
}

#[then("the request is refused as a conflict")]
fn request_refused(world: &SupplyPipelineWorld) -> Result<(), eyre::Report> {
    ensure_conflict(world)?;
    let filed = run_async(world.supplies.list(SupplyRequestFilter::new().with_completed()))?;
    eyre::ensure!(filed.is_empty(), "no request should be filed");
    Ok(())
}
