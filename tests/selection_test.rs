//! Tests for the in-memory selection state machine: initialization from a
//! resolver snapshot, toggle semantics, group tie-break, and payload
//! construction.

use permdesk::models::grant::PermissionStatus;
use permdesk::models::resolver::{UserPermission, UserPermissionGroup};
use permdesk::selection::SelectionState;

fn perm(id: i64, active: bool) -> UserPermission {
    UserPermission {
        id,
        code: format!("perm.{id}"),
        label: format!("Permission {id}"),
        description: String::new(),
        active,
    }
}

fn group(group_id: i64, permissions: Vec<UserPermission>) -> UserPermissionGroup {
    UserPermissionGroup {
        group_id,
        group_name: format!("Group {group_id}"),
        group_description: String::new(),
        permissions,
    }
}

/// Two groups: A {1 active, 2 inactive}, B {3 inactive}.
fn two_group_fixture() -> Vec<UserPermissionGroup> {
    vec![
        group(10, vec![perm(1, true), perm(2, false)]),
        group(20, vec![perm(3, false)]),
    ]
}

#[test]
fn test_initialize_collects_active_ids() {
    let state = SelectionState::initialize(&two_group_fixture());
    assert_eq!(state.selected_ids().iter().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(state.active_group(), Some(10));
}

#[test]
fn test_initialize_is_idempotent() {
    let groups = two_group_fixture();
    let mut state = SelectionState::initialize(&groups);
    let before = state.selected_ids().clone();
    state.reinitialize(&groups);
    assert_eq!(state.selected_ids(), &before);
}

#[test]
fn test_initialize_empty_catalog() {
    let state = SelectionState::initialize(&[]);
    assert!(state.selected_ids().is_empty());
    assert_eq!(state.active_group(), None);
    assert!(state.build_commit_payload().is_empty());
}

#[test]
fn test_toggle_one_is_self_inverse() {
    let mut state = SelectionState::initialize(&two_group_fixture());
    let before = state.selected_ids().clone();

    state.toggle_one(2);
    assert!(state.is_selected(2));
    state.toggle_one(2);
    assert_eq!(state.selected_ids(), &before);

    state.toggle_one(1);
    assert!(!state.is_selected(1));
    state.toggle_one(1);
    assert_eq!(state.selected_ids(), &before);
}

#[test]
#[should_panic(expected = "not in the catalog")]
fn test_toggle_one_unknown_id_panics() {
    let mut state = SelectionState::initialize(&two_group_fixture());
    state.toggle_one(999);
}

#[test]
fn test_toggle_group_partial_selects_all() {
    // 1 is selected, 2 is not — partial, so the toggle completes the group
    let mut state = SelectionState::initialize(&two_group_fixture());
    state.toggle_group(&[1, 2]);
    assert!(state.is_selected(1));
    assert!(state.is_selected(2));
}

#[test]
fn test_toggle_group_full_deselects_all() {
    let mut state = SelectionState::initialize(&two_group_fixture());
    state.toggle_group(&[1, 2]);
    assert_eq!(state.group_progress(&[1, 2]), (2, 2));

    state.toggle_group(&[1, 2]);
    assert!(!state.is_selected(1));
    assert!(!state.is_selected(2));
    assert_eq!(state.group_progress(&[1, 2]), (0, 2));
}

#[test]
fn test_toggle_group_none_selects_all() {
    let mut state = SelectionState::initialize(&two_group_fixture());
    state.toggle_group(&[3]);
    assert!(state.is_selected(3));
}

#[test]
fn test_set_active_group_does_not_touch_selection() {
    let mut state = SelectionState::initialize(&two_group_fixture());
    let before = state.selected_ids().clone();
    state.set_active_group(20);
    assert_eq!(state.active_group(), Some(20));
    assert_eq!(state.selected_ids(), &before);
}

#[test]
fn test_reinitialize_keeps_active_group_when_present() {
    let groups = two_group_fixture();
    let mut state = SelectionState::initialize(&groups);
    state.set_active_group(20);
    state.reinitialize(&groups);
    assert_eq!(state.active_group(), Some(20));

    // Group 20 gone — falls back to the first group
    let only_a = vec![group(10, vec![perm(1, true), perm(2, false)])];
    state.reinitialize(&only_a);
    assert_eq!(state.active_group(), Some(10));
}

#[test]
fn test_payload_covers_full_catalog() {
    let mut state = SelectionState::initialize(&two_group_fixture());
    state.toggle_one(3);

    let payload = state.build_commit_payload();
    assert_eq!(payload.len(), 3);
    for entry in &payload {
        assert_eq!(entry.status, state.is_selected(entry.id));
    }
    // Ascending id order, no duplicates
    let ids: Vec<i64> = payload.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_edit_session_end_to_end() {
    // initialize → {1}; group toggle completes A → {1,2}; toggle 3 → {1,2,3}
    let mut state = SelectionState::initialize(&two_group_fixture());
    assert_eq!(state.selected_ids().iter().copied().collect::<Vec<_>>(), vec![1]);

    state.toggle_group(&[1, 2]);
    assert_eq!(state.selected_ids().iter().copied().collect::<Vec<_>>(), vec![1, 2]);

    state.toggle_one(3);
    assert_eq!(state.selected_ids().iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);

    let payload = state.build_commit_payload();
    assert_eq!(
        payload,
        vec![
            PermissionStatus { id: 1, status: true },
            PermissionStatus { id: 2, status: true },
            PermissionStatus { id: 3, status: true },
        ]
    );
}

#[test]
fn test_group_deselect_end_to_end() {
    // With both of A selected, the group toggle clears both
    let mut state = SelectionState::initialize(&two_group_fixture());
    state.toggle_one(2);
    assert_eq!(state.selected_ids().iter().copied().collect::<Vec<_>>(), vec![1, 2]);

    state.toggle_group(&[1, 2]);
    assert!(state.selected_ids().is_empty());

    let payload = state.build_commit_payload();
    assert!(payload.iter().all(|e| !e.status));
    assert_eq!(payload.len(), 3);
}
