//! Unit tests for task state transition rules.

use crate::task::domain::{
    Task, TaskAction, TaskDetails, TaskDomainError, TaskProgress, TaskState, TaskTitle,
    TaskTransition,
};
use crate::worker::domain::WorkerId;
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn details() -> TaskDetails {
    TaskDetails::titled(TaskTitle::new("Water the tomatoes").expect("valid title"))
}

fn task_in(state: TaskState, clock: &DefaultClock) -> Task {
    let owner = (state == TaskState::Assigned).then(WorkerId::new);
    let mut task = Task::new(details(), owner, clock);
    let prepared = match state {
        TaskState::Unassigned | TaskState::Assigned => Ok(()),
        TaskState::InProgress => task.start(clock).map(|_| ()),
        TaskState::Blocked => task.block("waiting on rain", clock).map(|_| ()),
        TaskState::Completed => task.complete(None, clock).map(|_| ()),
    };
    prepared.expect("fixture transition should succeed");
    assert_eq!(task.state(), state);
    task
}

fn apply(task: &mut Task, action: TaskAction, clock: &DefaultClock) -> Result<(), TaskDomainError> {
    match action {
        TaskAction::Assign => task.assign(WorkerId::new(), clock).map(|_| ()),
        TaskAction::Unassign => task.unassign(clock).map(|_| ()),
        TaskAction::Start => task.start(clock).map(|_| ()),
        TaskAction::Revert => task.revert(clock).map(|_| ()),
        TaskAction::Block => task.block("fence is down", clock).map(|_| ()),
        TaskAction::Unblock => task.unblock(clock).map(|_| ()),
        TaskAction::Complete => task.complete(Some("done early"), clock).map(|_| ()),
        TaskAction::Uncomplete => task.uncomplete(clock).map(|_| ()),
    }
}

#[rstest]
#[case(TaskState::Unassigned, TaskAction::Assign, true)]
#[case(TaskState::Unassigned, TaskAction::Unassign, true)]
#[case(TaskState::Unassigned, TaskAction::Start, true)]
#[case(TaskState::Unassigned, TaskAction::Revert, false)]
#[case(TaskState::Unassigned, TaskAction::Block, true)]
#[case(TaskState::Unassigned, TaskAction::Unblock, false)]
#[case(TaskState::Unassigned, TaskAction::Complete, true)]
#[case(TaskState::Unassigned, TaskAction::Uncomplete, false)]
#[case(TaskState::Assigned, TaskAction::Assign, false)]
#[case(TaskState::Assigned, TaskAction::Unassign, true)]
#[case(TaskState::Assigned, TaskAction::Start, true)]
#[case(TaskState::Assigned, TaskAction::Revert, false)]
#[case(TaskState::Assigned, TaskAction::Block, true)]
#[case(TaskState::Assigned, TaskAction::Unblock, false)]
#[case(TaskState::Assigned, TaskAction::Complete, true)]
#[case(TaskState::Assigned, TaskAction::Uncomplete, false)]
#[case(TaskState::InProgress, TaskAction::Assign, true)]
#[case(TaskState::InProgress, TaskAction::Unassign, true)]
#[case(TaskState::InProgress, TaskAction::Start, true)]
#[case(TaskState::InProgress, TaskAction::Revert, true)]
#[case(TaskState::InProgress, TaskAction::Block, true)]
#[case(TaskState::InProgress, TaskAction::Unblock, false)]
#[case(TaskState::InProgress, TaskAction::Complete, true)]
#[case(TaskState::InProgress, TaskAction::Uncomplete, false)]
#[case(TaskState::Blocked, TaskAction::Assign, true)]
#[case(TaskState::Blocked, TaskAction::Unassign, true)]
#[case(TaskState::Blocked, TaskAction::Start, false)]
#[case(TaskState::Blocked, TaskAction::Revert, false)]
#[case(TaskState::Blocked, TaskAction::Block, true)]
#[case(TaskState::Blocked, TaskAction::Unblock, true)]
#[case(TaskState::Blocked, TaskAction::Complete, false)]
#[case(TaskState::Blocked, TaskAction::Uncomplete, false)]
#[case(TaskState::Completed, TaskAction::Assign, false)]
#[case(TaskState::Completed, TaskAction::Unassign, false)]
#[case(TaskState::Completed, TaskAction::Start, false)]
#[case(TaskState::Completed, TaskAction::Revert, false)]
#[case(TaskState::Completed, TaskAction::Block, false)]
#[case(TaskState::Completed, TaskAction::Unblock, false)]
#[case(TaskState::Completed, TaskAction::Complete, false)]
#[case(TaskState::Completed, TaskAction::Uncomplete, true)]
fn transition_table_matches_lifecycle_rules(
    clock: DefaultClock,
    #[case] state: TaskState,
    #[case] action: TaskAction,
    #[case] allowed: bool,
) -> eyre::Result<()> {
    let mut task = task_in(state, &clock);
    let before = task.clone();
    let result = apply(&mut task, action, &clock);

    ensure!(
        result.is_ok() == allowed,
        "{action} from {state}: expected allowed={allowed}, got {result:?}"
    );
    if let Err(err) = result {
        ensure!(task == before, "refused {action} must leave the task untouched");
        ensure!(
            matches!(
                err,
                TaskDomainError::InvalidTransition { .. } | TaskDomainError::AlreadyAssigned { .. }
            ),
            "unexpected error {err:?}"
        );
    }
    Ok(())
}

#[rstest]
#[case(TaskState::Unassigned)]
#[case(TaskState::Assigned)]
#[case(TaskState::InProgress)]
fn completing_clears_in_progress_and_blocked(clock: DefaultClock, #[case] state: TaskState) {
    let mut task = task_in(state, &clock);

    task.complete(Some("all watered"), &clock)
        .expect("completion should succeed");

    assert_eq!(task.state(), TaskState::Completed);
    assert!(!task.progress().is_in_progress());
    assert!(!task.progress().is_blocked());
    assert_eq!(task.completion_note(), Some("all watered"));
}

#[rstest]
fn unblock_returns_to_not_started_even_after_start(clock: DefaultClock) {
    let mut task = task_in(TaskState::InProgress, &clock);
    task.block("no feed", &clock).expect("block should succeed");

    task.unblock(&clock).expect("unblock should succeed");

    assert_eq!(task.progress(), &TaskProgress::NotStarted);
    assert_eq!(task.blocked_reason(), None);
}

#[rstest]
fn block_replaces_an_earlier_reason(clock: DefaultClock) {
    let mut task = task_in(TaskState::Blocked, &clock);

    let transition = task
        .block("  tractor broken  ", &clock)
        .expect("re-blocking should succeed");

    assert_eq!(task.blocked_reason(), Some("tractor broken"));
    assert_eq!(
        transition,
        TaskTransition::Block {
            reason: "tractor broken".to_owned()
        }
    );
}

#[rstest]
#[case("")]
#[case("   ")]
fn block_requires_a_reason(clock: DefaultClock, #[case] reason: &str) {
    let mut task = task_in(TaskState::InProgress, &clock);

    let result = task.block(reason, &clock);

    assert_eq!(result, Err(TaskDomainError::EmptyBlockReason));
    assert_eq!(task.state(), TaskState::InProgress);
}

#[rstest]
fn uncomplete_drops_the_completion_note(clock: DefaultClock) {
    let mut task = task_in(TaskState::Unassigned, &clock);
    task.complete(Some("picked"), &clock)
        .expect("completion should succeed");

    task.uncomplete(&clock).expect("uncomplete should succeed");

    assert_eq!(task.state(), TaskState::Unassigned);
    assert_eq!(task.completion_note(), None);
}

#[rstest]
fn start_is_idempotent(clock: DefaultClock) {
    let mut task = task_in(TaskState::InProgress, &clock);

    let transition = task.start(&clock).expect("second start should succeed");

    assert_eq!(transition, None);
    assert_eq!(task.state(), TaskState::InProgress);
}

#[rstest]
fn assigning_the_current_owner_is_a_no_op(clock: DefaultClock) {
    let owner = WorkerId::new();
    let mut task = Task::new(details(), Some(owner), &clock);

    let transition = task.assign(owner, &clock).expect("assign should succeed");

    assert_eq!(transition, None);
    assert_eq!(task.assignee(), Some(owner));
}

#[rstest]
fn reassign_moves_ownership_in_one_transition(clock: DefaultClock) {
    let from = WorkerId::new();
    let to = WorkerId::new();
    let mut task = Task::new(details(), Some(from), &clock);
    task.start(&clock).expect("start should succeed");

    let transition = task.reassign(to, &clock).expect("reassign should succeed");

    assert_eq!(transition, Some(TaskTransition::Reassign { from, to }));
    assert_eq!(task.assignee(), Some(to));
    assert_eq!(task.state(), TaskState::InProgress);
}

#[rstest]
fn reassign_refuses_completed_tasks(clock: DefaultClock) {
    let from = WorkerId::new();
    let mut task = Task::new(details(), Some(from), &clock);
    task.complete(None, &clock).expect("complete should succeed");

    let result = task.reassign(WorkerId::new(), &clock);

    assert!(matches!(result, Err(TaskDomainError::InvalidTransition { .. })));
    assert_eq!(task.assignee(), Some(from));
}

#[rstest]
fn unassign_keeps_progress(clock: DefaultClock) {
    let owner = WorkerId::new();
    let mut task = Task::new(details(), Some(owner), &clock);
    task.start(&clock).expect("start should succeed");

    let transition = task.unassign(&clock).expect("unassign should succeed");

    assert_eq!(transition, Some(TaskTransition::Unassign { worker_id: owner }));
    assert_eq!(task.assignee(), None);
    assert_eq!(task.state(), TaskState::InProgress);
}

#[rstest]
fn worker_note_is_editable_on_completed_tasks(clock: DefaultClock) {
    let mut task = task_in(TaskState::Completed, &clock);

    task.set_worker_note(Some(" gate left open "), &clock);
    assert_eq!(task.worker_note(), Some("gate left open"));

    task.set_worker_note(Some("   "), &clock);
    assert_eq!(task.worker_note(), None);
    assert_eq!(task.state(), TaskState::Completed);
}
