//! Behaviour tests for task state transition validation.

#[path = "task_state_transition_steps/mod.rs"]
mod task_state_transition_steps_defs;

use rstest_bdd_macros::scenario;
use task_state_transition_steps_defs::world::{TaskTransitionWorld, world};

#[scenario(
    path = "tests/features/task_state_transitions.feature",
    name = "Completing a started task clears its progress"
)]
#[tokio::test(flavor = "multi_thread")]
async fn completing_clears_progress(world: TaskTransitionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_state_transitions.feature",
    name = "Unblocking returns the task to not started"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unblocking_returns_to_not_started(world: TaskTransitionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_state_transitions.feature",
    name = "Reject completing a blocked task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_completing_blocked_task(world: TaskTransitionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_state_transitions.feature",
    name = "Reject taking a task from another active worker"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_taking_task_from_active_worker(world: TaskTransitionWorld) {
    let _ = world;
}
