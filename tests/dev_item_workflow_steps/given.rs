//! Given steps for dev item workflow scenarios.

use super::world::{DevWorkflowWorld, run_async};
use eyre::WrapErr;
use homestead::dev_tracker::{
    domain::{DevPriority, DevStatus, FeedbackType, ProdFeedback},
    services::CreateDevItemRequest,
};
use mockable::DefaultClock;
use rstest_bdd_macros::given;

#[given(r#"a dev item "{title}" at priority "{priority}""#)]
fn dev_item_at_priority(
    world: &mut DevWorkflowWorld,
    title: String,
    priority: String,
) -> Result<(), eyre::Report> {
    let parsed = DevPriority::try_from(priority.as_str())
        .map_err(|err| eyre::eyre!("invalid priority in scenario: {err}"))?;
    let created = run_async(
        world
            .items
            .create(CreateDevItemRequest::new(title).with_priority(parsed)),
    )
    .wrap_err("create dev item for scenario")?;
    world.current_item = Some(created);
    Ok(())
}

#[given(r#"a backlog dev item "{title}""#)]
fn backlog_dev_item(world: &mut DevWorkflowWorld, title: String) -> Result<(), eyre::Report> {
    let created = run_async(
        world
            .items
            .create(CreateDevItemRequest::new(title).with_status(DevStatus::Backlog)),
    )
    .wrap_err("create backlog dev item for scenario")?;
    world.current_item = Some(created);
    Ok(())
}

#[given("the item has been promoted to testing")]
fn item_promoted_to_testing(world: &mut DevWorkflowWorld) -> Result<(), eyre::Report> {
    let item_id = world.item()?.id();
    let promoted = run_async(world.items.promote_to_testing(item_id))
        .wrap_err("promote dev item to testing")?;
    world.current_item = Some(promoted);
    Ok(())
}

#[given(r#"production feedback titled "{title}""#)]
fn production_feedback(world: &mut DevWorkflowWorld, title: String) -> Result<(), eyre::Report> {
    let feedback = ProdFeedback::new(
        title,
        "reported from the office",
        FeedbackType::Improvement,
        &DefaultClock,
    );
    let feedback_id = world
        .tracker
        .submit_feedback(feedback)
        .wrap_err("submit production feedback")?;
    world.pending_feedback = Some(feedback_id);
    Ok(())
}
