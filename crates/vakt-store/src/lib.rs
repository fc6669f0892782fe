//! Membership storage for the permission engine.
//!
//! The engine never talks to a database directly; it reads group structure
//! and memberships through the [`MembershipSource`] trait. The trait has two
//! required lookups (a user's directly joined groups and a group by id) and
//! derives the interesting part itself: [`MembershipSource::effective_groups`]
//! walks parent links upward so that joining a group implicitly joins every
//! ancestor.
//!
//! [`MemoryStore`] is the bundled implementation, suitable for tests and for
//! embedding; persistent backends implement the same trait over their own
//! rows.
//!
//! # Example
//!
//! ```ignore
//! use vakt_models::{Group, GroupKind, Membership, User};
//! use vakt_store::{MembershipSource, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! let board = store.add_group(Group::new("Board", GroupKind::Board));
//! let webkom = store.add_group(Group::new("Webkom", GroupKind::Committee).with_parent(board));
//! let alice = store.add_user(User::new("alice", "Alice", "Arnesen"));
//! store.add_membership(Membership::new(alice, webkom));
//!
//! // Joining Webkom also puts Alice in the Board subtree.
//! assert!(store.effective_groups(alice).contains(&board));
//! ```

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::debug;

use vakt_models::{Group, GroupId, Membership, MembershipId, User, UserId};

/// Read access to users, groups and memberships.
///
/// `direct_groups` must only report groups reached through an active
/// membership whose date window covers today; inactive users report no
/// groups at all. Everything above that is derived here.
pub trait MembershipSource {
    /// The groups the user directly holds a counting membership in.
    fn direct_groups(&self, user: UserId) -> Vec<GroupId>;

    /// Look up a group by id.
    fn group(&self, id: GroupId) -> Option<Group>;

    /// The user's direct groups plus every reachable ancestor.
    ///
    /// The walk follows parent links upward from each direct group. A parent
    /// reference to a group that no longer exists ends that path, so a
    /// deleted ancestor silently sheds the permissions it used to confer
    /// rather than failing the lookup. Cycles are tolerated (each group is
    /// visited once) even though a well-formed tree has none.
    fn effective_groups(&self, user: UserId) -> HashSet<GroupId> {
        let mut effective = HashSet::new();
        let mut pending = self.direct_groups(user);

        while let Some(id) = pending.pop() {
            if effective.contains(&id) {
                continue;
            }
            let Some(group) = self.group(id) else {
                continue;
            };
            effective.insert(id);
            if let Some(parent) = group.parent {
                pending.push(parent);
            }
        }

        effective
    }
}

/// An in-memory [`MembershipSource`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: HashMap<UserId, User>,
    groups: HashMap<GroupId, Group>,
    memberships: HashMap<MembershipId, Membership>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user, returning its id.
    pub fn add_user(&mut self, user: User) -> UserId {
        let id = user.id;
        self.users.insert(id, user);
        id
    }

    /// Insert a group, returning its id.
    pub fn add_group(&mut self, group: Group) -> GroupId {
        let id = group.id;
        self.groups.insert(id, group);
        id
    }

    /// Insert a membership, returning its id.
    ///
    /// At most one active membership may exist per (user, group) pair:
    /// inserting an active membership replaces any active one already held
    /// for the same pair. Inactive memberships are kept as history.
    pub fn add_membership(&mut self, membership: Membership) -> MembershipId {
        if membership.is_active {
            self.memberships.retain(|_, existing| {
                !(existing.is_active
                    && existing.user_id == membership.user_id
                    && existing.group_id == membership.group_id)
            });
        }
        let id = membership.id;
        self.memberships.insert(id, membership);
        id
    }

    /// Remove a group and every membership in it.
    ///
    /// Child groups are left pointing at the removed parent; the ancestor
    /// walk treats that as the end of the path.
    pub fn remove_group(&mut self, id: GroupId) {
        let removed = self.groups.remove(&id).is_some();
        let before = self.memberships.len();
        self.memberships.retain(|_, m| m.group_id != id);
        if removed {
            debug!(
                group_id = %id,
                cascaded_memberships = before - self.memberships.len(),
                "removed group"
            );
        }
    }

    /// Look up a user by id.
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }
}

impl MembershipSource for MemoryStore {
    fn direct_groups(&self, user: UserId) -> Vec<GroupId> {
        let Some(record) = self.users.get(&user) else {
            return Vec::new();
        };
        if !record.is_active {
            return Vec::new();
        }

        let today = Utc::now().date_naive();
        self.memberships
            .values()
            .filter(|m| m.user_id == user && m.is_current(today))
            .map(|m| m.group_id)
            .collect()
    }

    fn group(&self, id: GroupId) -> Option<Group> {
        self.groups.get(&id).cloned()
    }
}
