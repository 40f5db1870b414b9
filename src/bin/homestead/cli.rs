//! Command-line surface of the operator tool.

use clap::{Args, Parser, Subcommand, ValueEnum};
use homestead::dev_tracker::domain::{DevPriority, ImplementSort, ReviewAction, TestingSort};
use homestead::supply::domain::SupplyAction;
use std::path::PathBuf;
use uuid::Uuid;

/// Top-level parser for the `homestead` binary.
#[derive(Debug, Parser)]
#[command(name = "homestead", version, about = "Household and farm dashboard operator tool")]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./homestead.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Root commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Worker directory.
    Workers {
        /// Subcommand.
        #[command(subcommand)]
        action: WorkerCommands,
    },
    /// Tasks and chores.
    Tasks {
        /// Subcommand.
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Supply requests.
    Supplies {
        /// Subcommand.
        #[command(subcommand)]
        action: SupplyCommands,
    },
    /// Development items.
    Dev {
        /// Subcommand.
        #[command(subcommand)]
        action: DevCommands,
    },
    /// Production feedback intake.
    Feedback {
        /// Subcommand.
        #[command(subcommand)]
        action: FeedbackCommands,
    },
}

/// Worker directory commands.
#[derive(Debug, Subcommand)]
pub enum WorkerCommands {
    /// List workers with their open task counts.
    List {
        /// Include deactivated workers.
        #[arg(long)]
        all: bool,
    },
}

/// Task window to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TaskWindow {
    /// Every task.
    #[default]
    All,
    /// Due today.
    Today,
    /// Due in the coming week.
    Upcoming,
    /// Past due and still open.
    Overdue,
    /// Open and owned by nobody.
    Assignable,
}

/// Task commands.
#[derive(Debug, Subcommand)]
pub enum TaskCommands {
    /// List tasks.
    List {
        /// Which tasks to show.
        #[arg(long, value_enum, default_value_t)]
        window: TaskWindow,
        /// Only tasks owned by this worker.
        #[arg(long)]
        worker: Option<Uuid>,
    },
    /// Start a task.
    Start {
        /// Record identifier.
        id: Uuid,
    },
    /// Complete a task.
    Complete {
        /// Record identifier.
        id: Uuid,
        /// Completion note.
        #[arg(long)]
        note: Option<String>,
    },
    /// Block a task.
    Block {
        /// Record identifier.
        id: Uuid,
        /// What the task is waiting on.
        #[arg(long)]
        reason: String,
    },
    /// Clear a block.
    Unblock {
        /// Record identifier.
        id: Uuid,
    },
}

/// Pipeline step accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SupplyStep {
    /// pending → approved
    Approve,
    /// pending → denied
    Deny,
    /// approved → purchased
    Purchase,
    /// purchased → delivered
    Deliver,
    /// approved → pending
    RevertToPending,
    /// purchased → approved
    RevertToApproved,
    /// delivered → purchased
    RevertToPurchased,
    /// denied → pending
    Reopen,
}

impl From<SupplyStep> for SupplyAction {
    fn from(step: SupplyStep) -> Self {
        match step {
            SupplyStep::Approve => Self::Approve,
            SupplyStep::Deny => Self::Deny,
            SupplyStep::Purchase => Self::MarkPurchased,
            SupplyStep::Deliver => Self::MarkDelivered,
            SupplyStep::RevertToPending => Self::RevertToPending,
            SupplyStep::RevertToApproved => Self::RevertToApproved,
            SupplyStep::RevertToPurchased => Self::RevertToPurchased,
            SupplyStep::Reopen => Self::Reopen,
        }
    }
}

/// Supply request commands.
#[derive(Debug, Subcommand)]
pub enum SupplyCommands {
    /// List supply requests, newest first.
    List {
        /// Include delivered and denied requests.
        #[arg(long)]
        all: bool,
        /// Only requests from this worker.
        #[arg(long)]
        worker: Option<Uuid>,
    },
    /// Move a request through the pipeline.
    Act {
        /// Record identifier.
        id: Uuid,
        /// Pipeline step to apply.
        #[arg(value_enum)]
        step: SupplyStep,
        /// Admin note recorded with the step.
        #[arg(long)]
        note: Option<String>,
    },
}

/// Dev item list to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DevView {
    /// Parked ideas.
    Backlog,
    /// Pending and in-progress work.
    #[default]
    Implement,
    /// Items waiting for a tester.
    Testing,
    /// Verified items grouped by day.
    Verified,
}

/// Ordering of list views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Priority first for the implement view, oldest first otherwise.
    #[default]
    Default,
    /// Oldest first.
    Oldest,
    /// Newest first.
    Newest,
}

impl SortOrder {
    /// Ordering for the implement view.
    #[must_use]
    pub const fn implement(self) -> ImplementSort {
        match self {
            Self::Default => ImplementSort::PriorityOldest,
            Self::Oldest => ImplementSort::Oldest,
            Self::Newest => ImplementSort::Newest,
        }
    }

    /// Ordering for the testing view.
    #[must_use]
    pub const fn testing(self) -> TestingSort {
        match self {
            Self::Default | Self::Oldest => TestingSort::Oldest,
            Self::Newest => TestingSort::Newest,
        }
    }
}

/// Dev item commands.
#[derive(Debug, Subcommand)]
pub enum DevCommands {
    /// List one of the dev item views.
    List {
        /// View to show.
        #[arg(long, value_enum, default_value_t)]
        view: DevView,
        /// Ordering of the view.
        #[arg(long, value_enum, default_value_t)]
        sort: SortOrder,
    },
    /// Show status counts and failure totals.
    Metrics,
    /// Move an item to testing.
    Promote {
        /// Record identifier.
        id: Uuid,
    },
    /// Mark a tested item as verified.
    Verify {
        /// Record identifier.
        id: Uuid,
    },
    /// Fail a tested item back to pending.
    Fail {
        /// Record identifier.
        id: Uuid,
        /// What went wrong.
        #[arg(long)]
        note: String,
        /// Flag the item as needing a pairing session.
        #[arg(long)]
        collab: bool,
    },
}

/// Arguments of a feedback review.
#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Record identifier.
    pub id: Uuid,
    /// approve, decline or kickback
    #[arg(value_parser = parse_review_action)]
    pub action: ReviewAction,
    /// Note for the submitter; required unless approving.
    #[arg(long)]
    pub note: Option<String>,
    /// Priority of the dev item created on approval.
    #[arg(long, value_parser = parse_priority, default_value = "medium")]
    pub priority: DevPriority,
}

/// Feedback intake commands.
#[derive(Debug, Subcommand)]
pub enum FeedbackCommands {
    /// List feedback waiting for review.
    List,
    /// Review one feedback item.
    Review(ReviewArgs),
    /// Import every pending item into the dev backlog.
    Pull,
    /// Switch production intake on or off.
    Toggle,
    /// Delete feedback without reviewing it.
    Delete {
        /// Record identifier.
        id: Uuid,
    },
    /// Re-check pending feedback until interrupted.
    Watch {
        /// Seconds between checks; defaults to the configured interval.
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}

fn parse_review_action(raw: &str) -> Result<ReviewAction, String> {
    ReviewAction::try_from(raw).map_err(|err| err.to_string())
}

fn parse_priority(raw: &str) -> Result<DevPriority, String> {
    DevPriority::try_from(raw).map_err(|err| err.to_string())
}
