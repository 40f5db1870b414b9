//! Domain tests for supply statuses, actions and quantities.

use crate::supply::domain::{
    ItemName, Quantity, SupplyAction, SupplyDomainError, SupplyEdit, SupplyRequest,
    SupplyRequestFilter, SupplyStatus,
};
use crate::worker::domain::WorkerId;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

const ALL_ACTIONS: [SupplyAction; 8] = [
    SupplyAction::Approve,
    SupplyAction::Deny,
    SupplyAction::MarkPurchased,
    SupplyAction::RevertToPending,
    SupplyAction::MarkDelivered,
    SupplyAction::RevertToApproved,
    SupplyAction::RevertToPurchased,
    SupplyAction::Reopen,
];

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn request_in(status: SupplyStatus, clock: &DefaultClock) -> SupplyRequest {
    let mut request = SupplyRequest::new(
        WorkerId::new(),
        ItemName::new("Gloves").expect("valid item"),
        Quantity::from_count(2),
        "",
        clock,
    );
    let path: &[SupplyAction] = match status {
        SupplyStatus::Pending => &[],
        SupplyStatus::Approved => &[SupplyAction::Approve],
        SupplyStatus::Purchased => &[SupplyAction::Approve, SupplyAction::MarkPurchased],
        SupplyStatus::Delivered => &[
            SupplyAction::Approve,
            SupplyAction::MarkPurchased,
            SupplyAction::MarkDelivered,
        ],
        SupplyStatus::Denied => &[SupplyAction::Deny],
    };
    for action in path {
        request
            .apply(*action, None, clock)
            .expect("fixture path should be valid");
    }
    request
}

#[rstest]
fn pending_only_reaches_approved_or_denied(clock: DefaultClock) {
    let reachable: Vec<SupplyStatus> = ALL_ACTIONS
        .into_iter()
        .filter_map(|action| {
            let mut request = request_in(SupplyStatus::Pending, &clock);
            request.apply(action, None, &clock).ok()
        })
        .collect();

    assert_eq!(reachable, vec![SupplyStatus::Approved, SupplyStatus::Denied]);
}

#[rstest]
fn every_status_accepts_exactly_its_available_actions(clock: DefaultClock) {
    for status in SupplyStatus::ALL {
        for action in ALL_ACTIONS {
            let mut request = request_in(status, &clock);
            let allowed = status.available_actions().contains(&action);
            let result = request.apply(action, None, &clock);

            assert_eq!(result.is_ok(), allowed, "{action} from {status}");
            if allowed {
                assert_eq!(request.status(), action.target());
            } else {
                assert_eq!(request.status(), status);
            }
        }
    }
}

#[rstest]
fn delivered_cannot_jump_back_to_approved(clock: DefaultClock) {
    let mut request = request_in(SupplyStatus::Delivered, &clock);

    let result = request.apply(SupplyAction::RevertToApproved, None, &clock);

    assert_eq!(
        result,
        Err(SupplyDomainError::InvalidTransition {
            request_id: request.id(),
            status: SupplyStatus::Delivered,
            action: SupplyAction::RevertToApproved,
        })
    );
}

#[rstest]
fn admin_note_is_recorded_and_blank_notes_are_ignored(clock: DefaultClock) {
    let mut request = request_in(SupplyStatus::Pending, &clock);

    request
        .apply(SupplyAction::Deny, Some(" over budget "), &clock)
        .expect("deny");
    request
        .apply(SupplyAction::Reopen, Some("   "), &clock)
        .expect("reopen");

    assert_eq!(request.admin_notes(), Some("over budget"));
    assert_eq!(request.status(), SupplyStatus::Pending);
}

#[rstest]
#[case("3", 3)]
#[case(" 12 ", 12)]
#[case("0", 1)]
#[case("-5", 1)]
#[case("lots", 1)]
#[case("", 1)]
#[case("99999999999", u32::MAX)]
fn quantity_input_is_coerced(#[case] raw: &str, #[case] expected: u32) {
    assert_eq!(Quantity::coerce(raw).get(), expected);
}

#[rstest]
fn edits_are_allowed_in_terminal_states(clock: DefaultClock) {
    let mut request = request_in(SupplyStatus::Denied, &clock);

    request.edit(
        SupplyEdit {
            item_name: Some(ItemName::new("Work gloves").expect("valid item")),
            quantity: Some(Quantity::coerce("4")),
            notes: None,
        },
        &clock,
    );

    assert_eq!(request.item_name().as_str(), "Work gloves");
    assert_eq!(request.quantity().get(), 4);
    assert_eq!(request.status(), SupplyStatus::Denied);
}

#[rstest]
fn filter_hides_completed_requests_by_default(clock: DefaultClock) {
    let open = request_in(SupplyStatus::Purchased, &clock);
    let delivered = request_in(SupplyStatus::Delivered, &clock);

    let default_filter = SupplyRequestFilter::new();
    let worker_filter = SupplyRequestFilter::new()
        .for_worker(open.worker_id())
        .with_completed();

    assert!(default_filter.matches(&open));
    assert!(!default_filter.matches(&delivered));
    assert!(worker_filter.matches(&open));
    assert!(!worker_filter.matches(&delivered));
}

#[rstest]
fn status_parses_case_insensitively() {
    assert_eq!(SupplyStatus::try_from(" Purchased "), Ok(SupplyStatus::Purchased));
    assert!(SupplyStatus::try_from("shipped").is_err());
}
