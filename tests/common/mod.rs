//! Shared test fixtures: a miniature portal with a group tree, keyword
//! grants and a handful of users.
//!
//! The layout mirrors a typical student-organization setup:
//!
//! ```text
//! Abakus (root, no grants)
//! ├── Webkom   → /sudo/                  (alice)
//! ├── Arrkom   → /sudo/admin/events/     (bob)
//! └── Bedkom   → no keyword grants       (erik)
//! ```
//!
//! Carol exists but holds no memberships at all.

use vakt::{ActorSnapshot, MemoryStore};
use vakt_core::{KeywordPermission, permissions};
use vakt_models::{
    AclFields, Actor, Group, GroupId, GroupKind, Membership, Model, ObjectAcl, User, UserId,
};

/// A permission-bearing domain record, shaped like the portal's event model.
#[allow(dead_code)]
pub struct Event {
    pub title: String,
    pub acl: AclFields,
}

#[allow(dead_code)]
impl Event {
    pub fn new(title: &str, acl: AclFields) -> Self {
        Self {
            title: title.to_string(),
            acl,
        }
    }
}

impl Model for Event {
    const NAME: &'static str = "event";
}

impl ObjectAcl for Event {
    fn acl(&self) -> &AclFields {
        &self.acl
    }
}

/// The standing portal fixture used across the integration tests.
#[allow(dead_code)]
pub struct Portal {
    pub store: MemoryStore,
    pub abakus: GroupId,
    pub webkom: GroupId,
    pub arrkom: GroupId,
    pub bedkom: GroupId,
    pub alice: UserId,
    pub bob: UserId,
    pub carol: UserId,
    pub erik: UserId,
}

#[allow(dead_code)]
impl Portal {
    pub fn new() -> Self {
        let mut store = MemoryStore::new();

        let abakus = store.add_group(Group::new("Abakus", GroupKind::Other));
        let webkom = store.add_group(
            Group::new("Webkom", GroupKind::Committee)
                .with_parent(abakus)
                .with_permission(keyword(permissions::ROOT)),
        );
        let arrkom = store.add_group(
            Group::new("Arrkom", GroupKind::Committee)
                .with_parent(abakus)
                .with_permission(keyword(permissions::events::ALL)),
        );
        let bedkom =
            store.add_group(Group::new("Bedkom", GroupKind::Committee).with_parent(abakus));

        let alice = store.add_user(User::new("alice", "Alice", "Arnesen"));
        let bob = store.add_user(User::new("bob", "Bob", "Berg"));
        let carol = store.add_user(User::new("carol", "Carol", "Corneliussen"));
        let erik = store.add_user(User::new("erik", "Erik", "Eriksen"));

        store.add_membership(Membership::new(alice, webkom));
        store.add_membership(Membership::new(bob, arrkom));
        store.add_membership(Membership::new(erik, bedkom));

        Self {
            store,
            abakus,
            webkom,
            arrkom,
            bedkom,
            alice,
            bob,
            carol,
            erik,
        }
    }

    /// Load a fresh snapshot for one of the fixture users.
    pub fn snapshot(&self, user: UserId) -> ActorSnapshot {
        ActorSnapshot::load(Actor::User(user), &self.store)
    }

    pub fn anonymous(&self) -> ActorSnapshot {
        ActorSnapshot::anonymous()
    }
}

/// Parse a known-good keyword permission.
#[allow(dead_code)]
pub fn keyword(s: &str) -> KeywordPermission {
    KeywordPermission::new(s).unwrap()
}

/// Install a tracing subscriber for test debugging; only the first call
/// installs, later calls are no-ops.
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
