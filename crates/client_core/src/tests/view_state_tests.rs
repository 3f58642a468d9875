use super::*;

#[test]
fn fresh_slot_is_idle() {
    let slot: QuerySlot<u32> = QuerySlot::new("test");
    assert_eq!(slot.state(), &ViewState::Idle);
    assert!(slot.is_mounted());
}

#[test]
fn begin_enters_loading_and_clears_error() {
    let mut slot = QuerySlot::new("test");
    let ticket = slot.begin();
    slot.complete(ticket, Err::<u32, _>("offline".to_string()));
    assert_eq!(slot.state().error(), Some("offline"));

    slot.begin();
    assert!(slot.state().is_loading());
    assert_eq!(slot.state().error(), None);
}

#[test]
fn completion_moves_to_exactly_one_terminal_state() {
    let mut slot = QuerySlot::new("test");
    let ticket = slot.begin();
    assert!(slot.complete(ticket, Ok(7)));
    assert_eq!(slot.state().data(), Some(&7));

    assert!(!slot.complete(ticket, Ok(8)));
    assert_eq!(slot.state().data(), Some(&7));
}

#[test]
fn only_latest_ticket_is_applied() {
    let mut slot = QuerySlot::new("test");
    let first = slot.begin();
    let second = slot.begin();
    assert!(second > first);

    assert!(slot.complete(second, Ok("b")));
    assert!(!slot.complete(first, Ok("a")));
    assert_eq!(slot.state(), &ViewState::Success("b"));
}

#[test]
fn stale_ticket_cannot_complete_before_latest_either() {
    let mut slot = QuerySlot::new("test");
    let first = slot.begin();
    let second = slot.begin();

    assert!(!slot.complete(first, Ok("a")));
    assert!(slot.state().is_loading());
    assert!(slot.complete(second, Ok("b")));
}

#[test]
fn unmount_discards_in_flight_results() {
    let mut slot = QuerySlot::new("test");
    let ticket = slot.begin();
    slot.unmount();

    assert!(!slot.is_current(ticket));
    assert!(!slot.complete(ticket, Ok(1)));
    assert!(slot.state().is_loading());
}

#[test]
fn reject_supersedes_pending_fetch() {
    let mut slot = QuerySlot::new("test");
    let ticket = slot.begin();
    slot.reject("invalid input");

    assert_eq!(slot.state().error(), Some("invalid input"));
    assert!(!slot.complete(ticket, Ok(1)));
}

#[test]
fn serializes_with_status_tag() {
    let state: ViewState<Vec<u32>> = ViewState::Success(vec![1, 2]);
    let json = serde_json::to_value(&state).expect("serialize");
    assert_eq!(json, serde_json::json!({ "status": "success", "data": [1, 2] }));

    let idle: ViewState<u32> = ViewState::Idle;
    assert_eq!(
        serde_json::to_value(&idle).expect("serialize"),
        serde_json::json!({ "status": "idle" })
    );
}
