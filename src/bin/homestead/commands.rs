//! Command handlers wired to the REST backend.

use crate::cli::{
    Commands, DevCommands, DevView, FeedbackCommands, ReviewArgs, SupplyCommands, TaskCommands,
    TaskWindow, WorkerCommands,
};
use homestead::backend::{BackendClient, BackendError};
use homestead::config::{ConfigError, HomesteadConfig};
use homestead::dev_tracker::{
    adapters::http::HttpDevTracker,
    domain::{DevItem, DevItemId, DevMetrics, FeedbackId, FeedbackReview, VerifiedGroup},
    services::{
        DevItemError, DevItemService, FeedbackIntakeError, FeedbackIntakeService, FeedbackSnapshot,
    },
};
use homestead::supply::{
    adapters::http::HttpSupplyRepository,
    domain::{SupplyRequest, SupplyRequestFilter, SupplyRequestId},
    services::{SupplyRequestError, SupplyRequestService},
};
use homestead::task::{
    adapters::http::HttpTaskRepository,
    domain::{Task, TaskId},
    services::{TaskLifecycleError, TaskLifecycleService},
};
use homestead::worker::{
    adapters::http::HttpWorkerRepository,
    domain::{WorkerId, WorkerSummary},
    services::{WorkerDirectoryError, WorkerDirectoryService},
};
use mockable::DefaultClock;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

type Tasks = TaskLifecycleService<HttpTaskRepository, HttpWorkerRepository, DefaultClock>;
type Directory = WorkerDirectoryService<HttpWorkerRepository, HttpTaskRepository, DefaultClock>;
type Supplies = SupplyRequestService<HttpSupplyRepository, HttpWorkerRepository, DefaultClock>;
type DevItems = DevItemService<HttpDevTracker, HttpDevTracker, DefaultClock>;
type Intake = FeedbackIntakeService<HttpDevTracker>;

/// Failures surfaced to the operator.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The backend client could not be built.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// A worker directory operation failed.
    #[error(transparent)]
    Workers(#[from] WorkerDirectoryError),
    /// A task operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskLifecycleError),
    /// A supply request operation failed.
    #[error(transparent)]
    Supplies(#[from] SupplyRequestError),
    /// A dev item operation failed.
    #[error(transparent)]
    DevItems(#[from] DevItemError),
    /// A feedback intake operation failed.
    #[error(transparent)]
    Feedback(#[from] FeedbackIntakeError),
    /// Writing output or waiting for a signal failed.
    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

/// Services bound to one backend, plus the output sink.
pub struct App<O> {
    directory: Directory,
    tasks: Tasks,
    supplies: Supplies,
    dev_items: DevItems,
    intake: Intake,
    poll_interval: Duration,
    out: O,
}

impl<O: Write> App<O> {
    /// Builds every service against the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Backend`] when the HTTP client cannot be
    /// built.
    pub fn connect(config: &HomesteadConfig, out: O) -> Result<Self, CommandError> {
        let client = BackendClient::new(&config.backend)?;
        let workers = Arc::new(HttpWorkerRepository::new(client.clone()));
        let tasks = Arc::new(HttpTaskRepository::new(client.clone()));
        let tracker = Arc::new(HttpDevTracker::new(client.clone()));
        let clock = Arc::new(DefaultClock);

        let dev_items = DevItemService::new(
            Arc::clone(&tracker),
            Arc::clone(&tracker),
            Arc::clone(&clock),
        );
        let intake =
            FeedbackIntakeService::new(tracker).with_in_flight(dev_items.in_flight().clone());

        Ok(Self {
            directory: WorkerDirectoryService::new(
                Arc::clone(&workers),
                Arc::clone(&tasks),
                Arc::clone(&clock),
            ),
            tasks: TaskLifecycleService::new(tasks, Arc::clone(&workers), Arc::clone(&clock)),
            supplies: SupplyRequestService::new(
                Arc::new(HttpSupplyRepository::new(client)),
                workers,
                clock,
            ),
            dev_items,
            intake,
            poll_interval: config.feedback_poll.interval(),
            out,
        })
    }

    /// Runs one command to completion.
    ///
    /// # Errors
    ///
    /// Returns the failing service's error, or [`CommandError::Io`] when
    /// output cannot be written.
    pub async fn dispatch(mut self, command: Commands) -> Result<(), CommandError> {
        match command {
            Commands::Workers { action } => self.workers(action).await,
            Commands::Tasks { action } => self.tasks(action).await,
            Commands::Supplies { action } => self.supplies(action).await,
            Commands::Dev { action } => self.dev(action).await,
            Commands::Feedback { action } => self.feedback(action).await,
        }
    }

    async fn workers(&mut self, action: WorkerCommands) -> Result<(), CommandError> {
        match action {
            WorkerCommands::List { all } => {
                let summaries = self.directory.list(all).await?;
                render_workers(&mut self.out, &summaries)?;
            }
        }
        Ok(())
    }

    async fn tasks(&mut self, action: TaskCommands) -> Result<(), CommandError> {
        let changed = match action {
            TaskCommands::List { window, worker } => {
                let listed = match worker {
                    Some(worker_id) => {
                        self.tasks
                            .list_for_worker(WorkerId::from_uuid(worker_id), true)
                            .await?
                    }
                    None => self.tasks_in(window).await?,
                };
                render_tasks(&mut self.out, &listed)?;
                return Ok(());
            }
            TaskCommands::Start { id } => self.tasks.start(TaskId::from_uuid(id)).await?,
            TaskCommands::Complete { id, note } => {
                self.tasks
                    .complete(TaskId::from_uuid(id), note.as_deref())
                    .await?
            }
            TaskCommands::Block { id, reason } => {
                self.tasks.block(TaskId::from_uuid(id), &reason).await?
            }
            TaskCommands::Unblock { id } => self.tasks.unblock(TaskId::from_uuid(id)).await?,
        };
        render_tasks(&mut self.out, &[changed])?;
        Ok(())
    }

    async fn tasks_in(&self, window: TaskWindow) -> Result<Vec<Task>, TaskLifecycleError> {
        match window {
            TaskWindow::All => self.tasks.list_all().await,
            TaskWindow::Today => self.tasks.list_today().await,
            TaskWindow::Upcoming => self.tasks.list_upcoming().await,
            TaskWindow::Overdue => self.tasks.list_overdue().await,
            TaskWindow::Assignable => self.tasks.list_assignable().await,
        }
    }

    async fn supplies(&mut self, action: SupplyCommands) -> Result<(), CommandError> {
        match action {
            SupplyCommands::List { all, worker } => {
                let mut filter = SupplyRequestFilter::new();
                if all {
                    filter = filter.with_completed();
                }
                if let Some(worker_id) = worker {
                    filter = filter.for_worker(WorkerId::from_uuid(worker_id));
                }
                let listed = self.supplies.list(filter).await?;
                render_supplies(&mut self.out, &listed)?;
            }
            SupplyCommands::Act { id, step, note } => {
                let moved = self
                    .supplies
                    .perform(SupplyRequestId::from_uuid(id), step.into(), note.as_deref())
                    .await?;
                render_supplies(&mut self.out, &[moved])?;
            }
        }
        Ok(())
    }

    async fn dev(&mut self, action: DevCommands) -> Result<(), CommandError> {
        let changed = match action {
            DevCommands::List { view, sort } => {
                match view {
                    DevView::Backlog => {
                        let listed = self.dev_items.backlog().await?;
                        render_dev_items(&mut self.out, &listed)?;
                    }
                    DevView::Implement => {
                        let listed = self.dev_items.to_implement(sort.implement()).await?;
                        render_dev_items(&mut self.out, &listed)?;
                    }
                    DevView::Testing => {
                        let listed = self.dev_items.testing(sort.testing()).await?;
                        render_dev_items(&mut self.out, &listed)?;
                    }
                    DevView::Verified => {
                        let groups = self.dev_items.verified().await?;
                        render_verified(&mut self.out, &groups)?;
                    }
                }
                return Ok(());
            }
            DevCommands::Metrics => {
                let metrics = self.dev_items.metrics().await?;
                render_metrics(&mut self.out, &metrics)?;
                return Ok(());
            }
            DevCommands::Promote { id } => {
                self.dev_items
                    .promote_to_testing(DevItemId::from_uuid(id))
                    .await?
            }
            DevCommands::Verify { id } => self.dev_items.verify(DevItemId::from_uuid(id)).await?,
            DevCommands::Fail { id, note, collab } => {
                self.dev_items
                    .fail(DevItemId::from_uuid(id), &note, collab.then_some(true))
                    .await?
            }
        };
        render_dev_items(&mut self.out, &[changed])?;
        Ok(())
    }

    async fn feedback(&mut self, action: FeedbackCommands) -> Result<(), CommandError> {
        match action {
            FeedbackCommands::List => {
                let pending = self.intake.list_pending().await?;
                let intake = self.intake.intake_status().await?;
                render_snapshot(&mut self.out, &FeedbackSnapshot { pending, intake })?;
            }
            FeedbackCommands::Review(args) => self.review(args).await?,
            FeedbackCommands::Pull => {
                let imported = self.intake.pull().await?;
                writeln!(self.out, "imported {imported} feedback item(s) into the backlog")?;
            }
            FeedbackCommands::Toggle => {
                let status = self.intake.toggle_intake().await?;
                let state = if status.enabled { "enabled" } else { "disabled" };
                writeln!(self.out, "feedback intake {state}")?;
            }
            FeedbackCommands::Delete { id } => {
                self.intake.delete(FeedbackId::from_uuid(id)).await?;
                writeln!(self.out, "deleted feedback {id}")?;
            }
            FeedbackCommands::Watch { interval_secs } => {
                let interval = interval_secs.map_or(self.poll_interval, Duration::from_secs);
                self.watch(interval).await?;
            }
        }
        Ok(())
    }

    async fn review(&mut self, args: ReviewArgs) -> Result<(), CommandError> {
        let review = FeedbackReview {
            action: args.action,
            note: args.note,
            priority: args.priority,
        };
        let created = self
            .intake
            .review(FeedbackId::from_uuid(args.id), &review)
            .await?;
        match created {
            Some(item) => render_dev_items(&mut self.out, &[item])?,
            None => writeln!(self.out, "feedback {} marked {}", args.id, review.action.outcome())?,
        }
        Ok(())
    }

    async fn watch(&mut self, interval: Duration) -> Result<(), CommandError> {
        let poller = self.intake.spawn_poller(interval);
        let mut updates = poller.subscribe();
        info!(interval_secs = interval.as_secs(), "watching pending feedback");
        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let latest = updates.borrow_and_update().clone();
                    if let Some(snapshot) = latest {
                        render_snapshot(&mut self.out, &snapshot)?;
                    }
                }
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    break;
                }
            }
        }
        poller.shutdown().await;
        Ok(())
    }
}

/// Writes one line per worker.
pub fn render_workers(out: &mut impl Write, summaries: &[WorkerSummary]) -> io::Result<()> {
    for summary in summaries {
        let worker = &summary.worker;
        let active = if worker.is_active() { "" } else { " (inactive)" };
        writeln!(
            out,
            "{}  {}{active}  {} open task(s)",
            worker.id(),
            worker.name(),
            summary.task_count
        )?;
    }
    Ok(())
}

/// Writes one line per task.
pub fn render_tasks(out: &mut impl Write, tasks: &[Task]) -> io::Result<()> {
    for task in tasks {
        let due = task
            .details()
            .due_date
            .map_or_else(|| "-".to_owned(), |date| date.to_string());
        writeln!(
            out,
            "{}  {:<11}  due {due}  {}",
            task.id(),
            task.state().as_str(),
            task.details().title
        )?;
    }
    Ok(())
}

/// Writes one line per supply request.
pub fn render_supplies(out: &mut impl Write, requests: &[SupplyRequest]) -> io::Result<()> {
    for request in requests {
        writeln!(
            out,
            "{}  {:<9}  {} x {}",
            request.id(),
            request.status().as_str(),
            request.quantity().get(),
            request.item_name()
        )?;
    }
    Ok(())
}

/// Writes one line per dev item.
pub fn render_dev_items(out: &mut impl Write, items: &[DevItem]) -> io::Result<()> {
    for item in items {
        let collab = if item.requires_collab() { "  [collab]" } else { "" };
        writeln!(
            out,
            "{}  {:<11}  {:<8}  {}{collab}",
            item.id(),
            item.status().as_str(),
            item.priority().as_str(),
            item.title()
        )?;
    }
    Ok(())
}

/// Writes verified items under a heading per completion day.
pub fn render_verified(out: &mut impl Write, groups: &[VerifiedGroup]) -> io::Result<()> {
    for group in groups {
        writeln!(out, "{}", group.day)?;
        render_dev_items(out, &group.items)?;
    }
    Ok(())
}

/// Writes the metrics block.
pub fn render_metrics(out: &mut impl Write, metrics: &DevMetrics) -> io::Result<()> {
    writeln!(out, "backlog      {}", metrics.backlog)?;
    writeln!(out, "pending      {}", metrics.pending)?;
    writeln!(out, "in progress  {}", metrics.in_progress)?;
    writeln!(out, "testing      {}", metrics.testing)?;
    writeln!(out, "verified     {}", metrics.verified)?;
    writeln!(out, "failures     {}", metrics.total_failures)?;
    writeln!(out, "needs collab {}", metrics.needs_collab)?;
    writeln!(out, "verified 7d  {}", metrics.verified_last_7_days)
}

/// Writes the intake state followed by each pending item.
pub fn render_snapshot(out: &mut impl Write, snapshot: &FeedbackSnapshot) -> io::Result<()> {
    let state = if snapshot.intake.enabled { "on" } else { "off" };
    writeln!(
        out,
        "intake {state}, {} pending",
        snapshot.intake.pending_count
    )?;
    for feedback in &snapshot.pending {
        writeln!(
            out,
            "{}  {:<11}  {:<8}  {}",
            feedback.id,
            feedback.feedback_type.as_str(),
            feedback.status.as_str(),
            feedback.title
        )?;
    }
    Ok(())
}
