//! In-memory integration tests for dev item views and feedback triage.

use std::sync::Arc;

use homestead::dev_tracker::{
    adapters::memory::InMemoryDevTracker,
    domain::{CompletionDay, DevPriority, DevStatus, FeedbackType, ProdFeedback, TestingSort},
    ports::ImageUpload,
    services::{CreateDevItemRequest, DevItemService, FeedbackIntakeService},
};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

type Tracker = InMemoryDevTracker<DefaultClock>;

struct Board {
    tracker: Arc<Tracker>,
    items: DevItemService<Tracker, Tracker, DefaultClock>,
    intake: FeedbackIntakeService<Tracker>,
}

#[fixture]
fn board() -> Board {
    let tracker = Arc::new(InMemoryDevTracker::new());
    let items = DevItemService::new(
        Arc::clone(&tracker),
        Arc::clone(&tracker),
        Arc::new(DefaultClock),
    );
    let intake = FeedbackIntakeService::new(Arc::clone(&tracker));
    Board {
        tracker,
        items,
        intake,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verified_items_are_grouped_under_today(board: Board) -> Result<(), eyre::Report> {
    let created = board
        .items
        .create(CreateDevItemRequest::new("Fix login").with_priority(DevPriority::High))
        .await?;
    board.items.promote_to_testing(created.id()).await?;
    board.items.verify(created.id()).await?;

    let groups = board.items.verified().await?;
    let group = groups
        .first()
        .ok_or_else(|| eyre::eyre!("expected one verified group"))?;

    eyre::ensure!(groups.len() == 1, "one completion day expected");
    eyre::ensure!(
        group.day == CompletionDay::Day(DefaultClock.utc().date_naive()),
        "grouped under today, got {}",
        group.day
    );
    eyre::ensure!(group.items.len() == 1, "the verified item is listed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn testing_view_lists_only_items_under_test(board: Board) -> Result<(), eyre::Report> {
    let first = board
        .items
        .create(CreateDevItemRequest::new("Camera feed"))
        .await?;
    let second = board
        .items
        .create(CreateDevItemRequest::new("Rain gauge"))
        .await?;
    board
        .items
        .create(CreateDevItemRequest::new("Still pending"))
        .await?;
    board.items.promote_to_testing(first.id()).await?;
    board.items.promote_to_testing(second.id()).await?;

    let testing = board.items.testing(TestingSort::Oldest).await?;

    eyre::ensure!(testing.len() == 2, "two items under test");
    eyre::ensure!(
        testing
            .iter()
            .all(|item| item.status() == DevStatus::Testing),
        "only testing items are listed"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn metrics_reflect_failures_and_collaboration(board: Board) -> Result<(), eyre::Report> {
    let created = board
        .items
        .create(CreateDevItemRequest::new("Pump scheduler"))
        .await?;
    board.items.promote_to_testing(created.id()).await?;
    board
        .items
        .fail(created.id(), "pump never stops", Some(true))
        .await?;

    let metrics = board.items.metrics().await?;

    eyre::ensure!(metrics.pending == 1, "failed item is pending again");
    eyre::ensure!(metrics.total_failures == 1, "one failure recorded");
    eyre::ensure!(metrics.needs_collab == 1, "collaboration was requested");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_uploads_are_rejected_by_the_store(board: Board) -> Result<(), eyre::Report> {
    let created = board
        .items
        .create(CreateDevItemRequest::new("Barn photos"))
        .await?;
    let upload = ImageUpload::new("empty.png", "image/png", Vec::new());

    let result = board.items.attach_image(created.id(), &upload).await;
    let stored = board.items.find(created.id()).await?;

    eyre::ensure!(result.is_err(), "empty upload should fail");
    eyre::ensure!(stored.images().is_empty(), "nothing attached");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pulled_feedback_keeps_its_type_and_description(board: Board) -> Result<(), eyre::Report> {
    board.tracker.submit_feedback(ProdFeedback::new(
        "Dark mode",
        "the office screen is too bright",
        FeedbackType::Feature,
        &DefaultClock,
    ))?;

    let imported = board.intake.pull().await?;
    let backlog = board.items.backlog().await?;
    let item = backlog
        .first()
        .ok_or_else(|| eyre::eyre!("expected an imported item"))?;

    eyre::ensure!(imported == 1, "one item imported");
    eyre::ensure!(item.item_type() == "feature", "type comes from the feedback");
    eyre::ensure!(
        item.test_notes() == "the office screen is too bright",
        "description becomes test notes"
    );
    eyre::ensure!(item.priority() == DevPriority::Medium, "imports default to medium");
    Ok(())
}
