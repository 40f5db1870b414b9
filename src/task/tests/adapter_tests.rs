//! Tests for the in-memory store and the REST wire mapping.

use crate::task::{
    adapters::{
        http::{TaskDecodeError, TaskDto, TaskRoute, route, routes},
        memory::InMemoryTaskRepository,
    },
    domain::{Task, TaskDetails, TaskId, TaskProgress, TaskTitle, TaskTransition},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::worker::domain::WorkerId;
use mockable::DefaultClock;
use reqwest::Method;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn task(owner: Option<WorkerId>, clock: &DefaultClock) -> Task {
    let details = TaskDetails::titled(TaskTitle::new("Repair fence").expect("valid title"));
    Task::new(details, owner, clock)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn memory_store_reindexes_owner_on_record(clock: DefaultClock) {
    let repo = InMemoryTaskRepository::new();
    let first = WorkerId::new();
    let second = WorkerId::new();
    let mut stored = task(Some(first), &clock);
    repo.store(&stored).await.expect("store should succeed");

    let release = stored
        .unassign(&clock)
        .expect("unassign")
        .expect("owner present");
    repo.record(&stored, &release).await.expect("record");
    let assign = stored
        .assign(second, &clock)
        .expect("assign")
        .expect("assignment changed");
    repo.record(&stored, &assign).await.expect("record");

    let first_tasks = repo.list_for_worker(first, true).await.expect("list");
    let second_tasks = repo.list_for_worker(second, true).await.expect("list");
    assert!(first_tasks.is_empty());
    assert_eq!(second_tasks, vec![stored]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn memory_store_lists_open_tasks_first(clock: DefaultClock) {
    let repo = InMemoryTaskRepository::new();
    let owner = WorkerId::new();
    let mut done = task(Some(owner), &clock);
    done.complete(None, &clock).expect("complete");
    let open = task(Some(owner), &clock);
    repo.store(&done).await.expect("store");
    repo.store(&open).await.expect("store");

    let with_completed = repo.list_for_worker(owner, true).await.expect("list");
    let open_only = repo.list_for_worker(owner, false).await.expect("list");

    assert_eq!(with_completed, vec![open.clone(), done]);
    assert_eq!(open_only, vec![open]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn memory_store_rejects_duplicates_and_unknown_deletes(clock: DefaultClock) {
    let repo = InMemoryTaskRepository::new();
    let stored = task(None, &clock);
    repo.store(&stored).await.expect("store");

    let duplicate = repo.store(&stored).await;
    let missing = repo.delete(TaskId::new()).await;

    assert!(matches!(duplicate, Err(TaskRepositoryError::DuplicateTask(id)) if id == stored.id()));
    assert!(matches!(missing, Err(TaskRepositoryError::NotFound(_))));
}

#[rstest]
fn dto_round_trips_blocked_progress(clock: DefaultClock) {
    let mut blocked = task(None, &clock);
    blocked.block("waiting on parts", &clock).expect("block");

    let dto = TaskDto::from(&blocked);
    assert!(dto.is_blocked && !dto.is_completed && !dto.is_in_progress);
    assert_eq!(dto.blocked_reason.as_deref(), Some("waiting on parts"));

    let decoded = Task::try_from(dto).expect("decodable");
    assert_eq!(decoded, blocked);
}

#[rstest]
#[case(true, true, false)]
#[case(true, false, true)]
#[case(false, true, true)]
#[case(true, true, true)]
fn dto_rejects_conflicting_flags(
    clock: DefaultClock,
    #[case] is_completed: bool,
    #[case] is_blocked: bool,
    #[case] is_in_progress: bool,
) {
    let mut dto = TaskDto::from(&task(None, &clock));
    dto.is_completed = is_completed;
    dto.is_blocked = is_blocked;
    dto.is_in_progress = is_in_progress;
    dto.blocked_reason = Some("reason".to_owned());
    let id = TaskId::from_uuid(dto.id);

    assert_eq!(
        Task::try_from(dto),
        Err(TaskDecodeError::InconsistentFlags(id))
    );
}

#[rstest]
fn dto_rejects_blocked_without_reason(clock: DefaultClock) {
    let mut dto = TaskDto::from(&task(None, &clock));
    dto.is_blocked = true;
    dto.blocked_reason = Some("  ".to_owned());
    let id = TaskId::from_uuid(dto.id);

    assert_eq!(
        Task::try_from(dto),
        Err(TaskDecodeError::MissingBlockReason(id))
    );
}

#[rstest]
fn dto_deserializes_legacy_payload() {
    let payload = json!({
        "id": "5f0c1d52-7a34-4c58-9d2e-8c9b1f0a7e21",
        "title": "Feed goats",
        "priority": 1,
        "category": "animal_care",
        "is_completed": true,
        "completion_note": "extra hay",
        "created_at": "2026-04-01T08:00:00Z"
    });

    let dto: TaskDto = serde_json::from_value(payload).expect("valid payload");
    let decoded = Task::try_from(dto).expect("decodable");

    assert_eq!(
        decoded.progress(),
        &TaskProgress::Completed {
            note: Some("extra hay".to_owned())
        }
    );
    assert_eq!(decoded.created_at(), decoded.updated_at());
}

#[rstest]
fn owned_transitions_use_worker_scoped_endpoints(clock: DefaultClock) {
    let owner = WorkerId::new();
    let mut owned = task(Some(owner), &clock);
    owned.start(&clock).expect("start");
    let base = format!("/workers/{owner}/tasks/{}", owned.id());

    let start = route(&owned, &TaskTransition::Start);
    let block = route(
        &owned,
        &TaskTransition::Block {
            reason: "rain".to_owned(),
        },
    );

    assert_eq!(
        start,
        TaskRoute {
            method: Method::POST,
            path: format!("{base}/start"),
            body: None,
        }
    );
    assert_eq!(block.path, format!("{base}/block"));
    assert_eq!(block.body, Some(json!({ "reason": "rain" })));
    assert_eq!(route(&owned, &TaskTransition::Revert).path, format!("{base}/stop"));
}

#[rstest]
fn unowned_transitions_patch_the_task(clock: DefaultClock) {
    let mut unowned = task(None, &clock);
    unowned.start(&clock).expect("start");
    let task_path = format!("/tasks/{}", unowned.id());

    let start = route(&unowned, &TaskTransition::Start);
    let complete = route(&unowned, &TaskTransition::Complete { note: None });

    assert_eq!(start.method, Method::PATCH);
    assert_eq!(start.path, task_path);
    assert_eq!(
        start.body,
        Some(json!({
            "is_in_progress": true,
            "is_blocked": false,
            "blocked_reason": null,
        }))
    );
    assert_eq!(complete.method, Method::POST);
    assert_eq!(complete.path, format!("{task_path}/complete"));
}

#[rstest]
fn uncomplete_always_targets_the_task_endpoint(clock: DefaultClock) {
    let owner = WorkerId::new();
    let owned = task(Some(owner), &clock);

    let uncomplete = route(&owned, &TaskTransition::Uncomplete);
    let unassign = route(&owned, &TaskTransition::Unassign { worker_id: owner });

    assert_eq!(uncomplete.path, format!("/tasks/{}/uncomplete", owned.id()));
    assert_eq!(unassign.method, Method::DELETE);
    assert_eq!(
        unassign.path,
        format!("/workers/{owner}/tasks/{}/assignment", owned.id())
    );
}

#[rstest]
fn reassignment_releases_before_assigning(clock: DefaultClock) {
    let from = WorkerId::new();
    let to = WorkerId::new();
    let mut owned = task(Some(from), &clock);
    let transition = owned
        .reassign(to, &clock)
        .expect("reassign")
        .expect("owner changes");

    let calls = routes(&owned, &transition);

    let task_id = owned.id();
    let summary: Vec<(Method, String)> = calls
        .into_iter()
        .map(|call| (call.method, call.path))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Method::DELETE, format!("/workers/{from}/tasks/{task_id}/assignment")),
            (Method::POST, format!("/workers/{to}/tasks/{task_id}/assignment")),
        ]
    );
}
