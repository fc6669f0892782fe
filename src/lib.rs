//! # Vakt
//!
//! An object + keyword permission evaluation engine for a student-organization
//! portal backend, implementing a two-tier authorization model over a group
//! hierarchy.
//!
//! ## Overview
//!
//! Vakt answers "may this actor perform this action on this record" using two
//! independent grant sources, checked in a fixed order:
//!
//! - **Keyword permissions**: coarse, prefix-matched string credentials
//!   (`/sudo/admin/events/create/`) attached to groups. Holding a prefix of
//!   the required string grants immediately and skips every other check.
//! - **Object ACLs**: fine-grained per-record fields (`created_by`,
//!   `can_edit_users`, `can_edit_groups`, `can_view_groups`, `require_auth`)
//!   consulted only when no keyword matched.
//!
//! Group membership is hierarchical: joining a group implicitly joins every
//! ancestor, so a grant placed high in the tree reaches every subtree member.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── vakt-core/       # Keyword permissions, actions, permission vocabulary
//! ├── vakt-models/     # Users, groups, memberships, object ACL fields
//! └── vakt-store/      # MembershipSource trait + in-memory store
//! src/                 # The evaluation engine itself
//! ├── snapshot.rs      # Per-request actor snapshot (groups + keywords)
//! ├── handler.rs       # Per-model policy: decision logic and filtering
//! └── registry.rs      # Startup-built handler registry and dispatch
//! ```
//!
//! ## Decision Order
//!
//! Every check runs the same pipeline:
//!
//! | stage | question | on success |
//! |-------|----------|------------|
//! | auth gate | does this permission admit anonymous actors? | continue |
//! | keyword | does any held keyword prefix the required string? | grant, skip the rest |
//! | object ACL | do the record's fields admit this actor? | grant |
//!
//! Point checks return a [`Verdict`] carrying *how* access was granted, so
//! calling layers can thread the outcome through explicitly instead of
//! re-deriving it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use vakt::{
//!     Action, ActorSnapshot, MembershipSource, PermissionHandler, PermissionRegistry,
//! };
//! use vakt_models::{Actor, Group, GroupKind, Membership, Model, User};
//! use vakt_store::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! let webkom = store.add_group(
//!     Group::new("Webkom", GroupKind::Committee)
//!         .with_permission("/sudo/".parse()?),
//! );
//! let alice = store.add_user(User::new("alice", "Alice", "Arnesen"));
//! store.add_membership(Membership::new(alice, webkom));
//!
//! let registry = PermissionRegistry::builder()
//!     .register::<Event>(
//!         PermissionHandler::builder("event")
//!             .with_object_acl()
//!             .build()?,
//!     )?
//!     .build();
//!
//! let snapshot = ActorSnapshot::load(Actor::User(alice), &store);
//! let verdict = registry.check::<Event>(&snapshot, &Action::Create);
//! assert!(verdict.is_granted());
//! ```
//!
//! ## Modules
//!
//! - [`snapshot`]: Materialized per-request membership and keyword sets
//! - [`handler`]: Per-model permission policy and queryset filtering
//! - [`registry`]: Immutable handler registry built at startup
//!
//! ## Security Considerations
//!
//! - Keyword strings are validated at group-save time; the engine assumes
//!   stored strings are well-formed and never re-validates on the hot path
//! - Unregistered model types fall back to a keyword-only handler that denies
//!   everything without an explicit grant
//! - A deleted group referenced from an ACL or a parent link grants nothing;
//!   missing data always fails closed
//! - Snapshots are loaded per logical request and never shared across
//!   requests, so membership changes take effect on the next check

pub mod handler;
pub mod registry;
pub mod snapshot;

pub use handler::{GrantVia, HandlerBuilder, HandlerError, PermissionHandler, Verdict};
pub use registry::{PermissionRegistry, PermissionRegistryBuilder, RegistryError};
pub use snapshot::ActorSnapshot;

// Re-export workspace crates for convenience
pub use vakt_core;
pub use vakt_models;
pub use vakt_store;

pub use vakt_core::{Action, KeywordPermission, Permission};
pub use vakt_models::{AclFields, Actor, Model, ObjectAcl};
pub use vakt_store::{MembershipSource, MemoryStore};
