//! In-memory edit buffer for one permission-editing session.
//!
//! A `SelectionState` is constructed from a resolver snapshot when the edit
//! dialog opens, mutated by toggle operations while the admin works, and
//! discarded on close. It is private to one session and never shared.

use std::collections::BTreeSet;

use crate::models::grant::PermissionStatus;
use crate::models::resolver::UserPermissionGroup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    /// Every permission id in the catalog, fixed at initialization.
    catalog_ids: BTreeSet<i64>,
    /// Ids currently checked; always a subset of `catalog_ids`.
    selected: BTreeSet<i64>,
    /// Which group's permissions are displayed; gates the group toggle.
    active_group: Option<i64>,
}

impl SelectionState {
    /// Build the edit buffer from a resolver snapshot: the selected set is a
    /// fold over all groups collecting `active` ids, and the first group
    /// becomes the active one.
    pub fn initialize(groups: &[UserPermissionGroup]) -> Self {
        let mut state = SelectionState {
            catalog_ids: BTreeSet::new(),
            selected: BTreeSet::new(),
            active_group: None,
        };
        state.reinitialize(groups);
        state
    }

    /// Re-seed from a fresh resolver snapshot (e.g. after a commit).
    /// The active group is kept when it still exists, otherwise it falls
    /// back to the first group.
    pub fn reinitialize(&mut self, groups: &[UserPermissionGroup]) {
        self.catalog_ids.clear();
        self.selected.clear();
        for group in groups {
            for perm in &group.permissions {
                self.catalog_ids.insert(perm.id);
                if perm.active {
                    self.selected.insert(perm.id);
                }
            }
        }
        let still_present = self
            .active_group
            .is_some_and(|id| groups.iter().any(|g| g.group_id == id));
        if !still_present {
            self.active_group = groups.first().map(|g| g.group_id);
        }
    }

    /// Flip one permission. An id outside the catalog is a programming
    /// error, not a user-facing condition.
    pub fn toggle_one(&mut self, permission_id: i64) {
        assert!(
            self.catalog_ids.contains(&permission_id),
            "permission id {permission_id} is not in the catalog"
        );
        if !self.selected.remove(&permission_id) {
            self.selected.insert(permission_id);
        }
    }

    /// Group-level select-all/none. Partial selection counts as "not all
    /// selected", so the next click always completes the group rather than
    /// clearing it.
    pub fn toggle_group(&mut self, group_permission_ids: &[i64]) {
        for id in group_permission_ids {
            assert!(
                self.catalog_ids.contains(id),
                "permission id {id} is not in the catalog"
            );
        }
        let all_selected = group_permission_ids
            .iter()
            .all(|id| self.selected.contains(id));
        if all_selected {
            for id in group_permission_ids {
                self.selected.remove(id);
            }
        } else {
            for id in group_permission_ids {
                self.selected.insert(*id);
            }
        }
    }

    /// Pure view-state change; does not touch the selected set.
    pub fn set_active_group(&mut self, group_id: i64) {
        self.active_group = Some(group_id);
    }

    pub fn active_group(&self) -> Option<i64> {
        self.active_group
    }

    pub fn is_selected(&self, permission_id: i64) -> bool {
        self.selected.contains(&permission_id)
    }

    pub fn selected_ids(&self) -> &BTreeSet<i64> {
        &self.selected
    }

    /// Derived `selected / total` counter for one group; recomputed on every
    /// call, never stored.
    pub fn group_progress(&self, group_permission_ids: &[i64]) -> (usize, usize) {
        let selected = group_permission_ids
            .iter()
            .filter(|id| self.selected.contains(id))
            .count();
        (selected, group_permission_ids.len())
    }

    /// Build the commit payload: one `{id, status}` entry for every catalog
    /// permission, in ascending id order. Total by construction — replaying
    /// the same payload is a no-op, and an unselected permission is an
    /// explicit revocation rather than an omission.
    pub fn build_commit_payload(&self) -> Vec<PermissionStatus> {
        self.catalog_ids
            .iter()
            .map(|&id| PermissionStatus {
                id,
                status: self.selected.contains(&id),
            })
            .collect()
    }
}
