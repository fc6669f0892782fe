//! # Vakt Models
//!
//! Domain models and DTOs for the vakt permission engine.
//!
//! This crate provides the data structures permission evaluation works over:
//! users and the anonymous/authenticated actor distinction, the group tree
//! with its memberships, and the per-record ACL fields.
//!
//! # Modules
//!
//! - [`ids`]: strongly-typed ID newtypes
//! - [`users`]: users and the [`Actor`] identity
//! - [`groups`]: groups, group kinds, memberships, membership roles
//! - [`acl`]: per-record ACL fields and the traits records implement
//!
//! # Example
//!
//! ```ignore
//! use vakt_models::{Actor, AclFields, Group, Membership};
//!
//! let acl = AclFields::default().with_require_auth(true);
//! assert!(acl.can_view_groups().is_empty());
//! ```

pub mod acl;
pub mod groups;
pub mod ids;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use acl::{AclFields, Model, ObjectAcl};
pub use groups::{CreateGroupDto, Group, GroupKind, Membership, MembershipRole, UpdateGroupDto};
pub use ids::{GroupId, MembershipId, UserId};
pub use users::{Actor, User};
