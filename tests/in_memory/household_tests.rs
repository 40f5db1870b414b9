//! In-memory integration tests spanning workers, tasks and supplies.

use super::helpers::{Household, household};
use homestead::{
    error::ErrorKind,
    supply::{
        domain::{Quantity, SupplyRequestFilter, SupplyStatus},
        services::CreateSupplyRequest,
    },
    task::{domain::TaskState, services::CreateTaskRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn worker_summary_counts_open_tasks(household: Household) -> Result<(), eyre::Report> {
    let maria = household.hire("Maria").await?;
    let feed = household
        .tasks
        .create(CreateTaskRequest::new("Feed the goats").with_assignee(maria.id()))
        .await?;
    household
        .tasks
        .create(CreateTaskRequest::new("Mend fence").with_assignee(maria.id()))
        .await?;
    household.tasks.complete(feed.id(), Some("all fed")).await?;

    let summaries = household.directory.list(false).await?;
    let summary = summaries
        .first()
        .ok_or_else(|| eyre::eyre!("expected one worker summary"))?;

    eyre::ensure!(summaries.len() == 1, "expected one worker");
    eyre::ensure!(summary.task_count == 1, "only the open task counts");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivated_worker_keeps_tasks_until_reassigned(
    household: Household,
) -> Result<(), eyre::Report> {
    let maria = household.hire("Maria").await?;
    let sam = household.hire("Sam").await?;
    let task = household
        .tasks
        .create(CreateTaskRequest::new("Clean coop").with_assignee(maria.id()))
        .await?;

    household.directory.deactivate(maria.id()).await?;
    let still_owned = household.tasks.find(task.id()).await?;
    let reassigned = household.tasks.assign(task.id(), sam.id()).await?;

    eyre::ensure!(
        still_owned.assignee() == Some(maria.id()),
        "deactivation keeps the assignment"
    );
    eyre::ensure!(reassigned.assignee() == Some(sam.id()), "task moves to Sam");
    eyre::ensure!(reassigned.state() == TaskState::Assigned, "still not started");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inactive_workers_cannot_take_new_work(household: Household) -> Result<(), eyre::Report> {
    let lee = household.hire("Lee").await?;
    household.directory.deactivate(lee.id()).await?;

    let task = household
        .tasks
        .create(CreateTaskRequest::new("Stack hay").with_assignee(lee.id()))
        .await;
    let supply = household
        .supplies
        .create(CreateSupplyRequest::new(lee.id(), "boots"))
        .await;

    eyre::ensure!(
        task.map_err(|err| err.kind()).err() == Some(ErrorKind::Conflict),
        "task creation should be refused"
    );
    eyre::ensure!(
        supply.map_err(|err| err.kind()).err() == Some(ErrorKind::Conflict),
        "supply request should be refused"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn supply_listing_hides_completed_requests_by_default(
    household: Household,
) -> Result<(), eyre::Report> {
    let ana = household.hire("Ana").await?;
    let staples = household
        .supplies
        .create(
            CreateSupplyRequest::new(ana.id(), "fence staples")
                .with_quantity(Quantity::from_count(3)),
        )
        .await?;
    let gloves = household
        .supplies
        .create(CreateSupplyRequest::new(ana.id(), "gloves"))
        .await?;
    household.supplies.deny(gloves.id(), Some("use spares")).await?;

    let open = household.supplies.list(SupplyRequestFilter::new()).await?;
    let everything = household
        .supplies
        .list(SupplyRequestFilter::new().for_worker(ana.id()).with_completed())
        .await?;

    eyre::ensure!(open.len() == 1, "only the pending request is open");
    eyre::ensure!(
        open.first().map(|request| request.id()) == Some(staples.id()),
        "the open request is the staples"
    );
    eyre::ensure!(everything.len() == 2, "completed requests are included on request");
    eyre::ensure!(
        everything
            .iter()
            .any(|request| request.status() == SupplyStatus::Denied),
        "the denied request is listed"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_changes_are_broadcast_to_subscribers(
    household: Household,
) -> Result<(), eyre::Report> {
    let maria = household.hire("Maria").await?;
    let mut changes = household.tasks.subscribe();

    let task = household
        .tasks
        .create(CreateTaskRequest::new("Water seedlings").with_assignee(maria.id()))
        .await?;
    household.tasks.start(task.id()).await?;

    let created = changes.recv().await?;
    let started = changes.recv().await?;
    eyre::ensure!(created.task_id == task.id(), "creation is announced");
    eyre::ensure!(started.state == Some(TaskState::InProgress), "start is announced");
    eyre::ensure!(started.worker_ids == vec![maria.id()], "owner is notified");
    Ok(())
}
