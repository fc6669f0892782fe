//! Per-request actor snapshots.
//!
//! Permission checks never query the store directly; they read from an
//! [`ActorSnapshot`] materialized once per logical request. The snapshot
//! captures the actor's effective group set and the union of keyword
//! permissions those groups carry, so repeated checks within one request
//! reuse a single store round-trip.
//!
//! Snapshots are plain values. They must not be cached across requests:
//! membership can change between requests, and a stale shared snapshot would
//! either leak access or lock a user out.

use std::collections::HashSet;

use tracing::debug;

use vakt_core::{KeywordPermission, any_grants};
use vakt_models::{Actor, GroupId, UserId};
use vakt_store::MembershipSource;

/// An actor plus everything the engine needs to know about their memberships.
///
/// For [`Actor::Anonymous`] both sets are empty. For a user the group set is
/// the transitive closure over parent links and the keyword list is the
/// deduplicated union across those groups.
#[derive(Debug, Clone)]
pub struct ActorSnapshot {
    pub actor: Actor,
    pub groups: HashSet<GroupId>,
    pub keywords: Vec<KeywordPermission>,
}

impl ActorSnapshot {
    /// The empty snapshot for an anonymous actor.
    pub fn anonymous() -> Self {
        Self {
            actor: Actor::Anonymous,
            groups: HashSet::new(),
            keywords: Vec::new(),
        }
    }

    /// Materialize a snapshot from the store.
    pub fn load<S>(actor: Actor, source: &S) -> Self
    where
        S: MembershipSource + ?Sized,
    {
        let Some(user) = actor.user_id() else {
            return Self::anonymous();
        };

        let groups = source.effective_groups(user);
        let mut keywords = Vec::new();
        let mut seen = HashSet::new();
        for id in &groups {
            if let Some(group) = source.group(*id) {
                for keyword in group.permissions {
                    if seen.insert(keyword.clone()) {
                        keywords.push(keyword);
                    }
                }
            }
        }

        debug!(
            actor = %actor,
            groups = groups.len(),
            keywords = keywords.len(),
            "loaded actor snapshot"
        );

        Self {
            actor,
            groups,
            keywords,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.actor.is_authenticated()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.actor.user_id()
    }

    /// Whether any held keyword permission prefix-matches `required`.
    ///
    /// Anonymous actors hold no keywords and always fail.
    pub fn has_keyword_permission(&self, required: &KeywordPermission) -> bool {
        any_grants(&self.keywords, required)
    }

    /// Whether the actor's effective groups intersect `groups`.
    pub fn in_any_group(&self, groups: &HashSet<GroupId>) -> bool {
        !self.groups.is_disjoint(groups)
    }
}
