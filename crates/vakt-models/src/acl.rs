//! Per-object access control fields.
//!
//! Keyword permissions answer "can this user touch this *kind* of thing";
//! the fields in this module answer "can this user touch *this one*". Any
//! domain object that wants per-object control embeds [`AclFields`] (or
//! implements [`ObjectAcl`] directly) and registers a handler configured
//! with object checks.
//!
//! # Example
//!
//! ```ignore
//! use vakt_models::{AclFields, Model, ObjectAcl, UserId};
//!
//! struct Event {
//!     title: String,
//!     acl: AclFields,
//! }
//!
//! impl Model for Event {
//!     const NAME: &'static str = "event";
//! }
//!
//! impl ObjectAcl for Event {
//!     fn acl(&self) -> &AclFields {
//!         &self.acl
//!     }
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, UserId};

/// A domain object kind known to the permission engine.
///
/// `NAME` is the lowercase singular noun for the kind ("event", "meeting");
/// it is interpolated into keyword templates, so it must consist of ASCII
/// letters only.
pub trait Model {
    const NAME: &'static str;
}

/// The per-object access control fields.
///
/// The default value is a fully public object: no creator, no edit grants,
/// no view restriction, no authentication requirement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AclFields {
    /// The user who created the object. The creator can always view and
    /// edit it.
    pub created_by: Option<UserId>,
    /// Users granted edit access. The edit and view ACLs are independent;
    /// listing a user here does not also grant view.
    pub can_edit_users: HashSet<UserId>,
    /// Groups whose members are granted edit access.
    pub can_edit_groups: HashSet<GroupId>,
    /// Groups whose members are granted view access. When non-empty the
    /// object is visible only to those groups and to the creator; when
    /// empty the object is viewable by anyone the `require_auth` flag
    /// admits.
    pub can_view_groups: HashSet<GroupId>,
    /// When set, anonymous users are denied even if the object is
    /// otherwise public.
    pub require_auth: bool,
}

impl AclFields {
    /// A fully public object.
    pub fn public() -> Self {
        Self::default()
    }

    /// Record the creating user.
    pub fn with_created_by(mut self, user: UserId) -> Self {
        self.created_by = Some(user);
        self
    }

    /// Grant edit access to a user.
    pub fn with_edit_user(mut self, user: UserId) -> Self {
        self.can_edit_users.insert(user);
        self
    }

    /// Grant edit access to a group.
    pub fn with_edit_group(mut self, group: GroupId) -> Self {
        self.can_edit_groups.insert(group);
        self
    }

    /// Restrict view access to a group.
    pub fn with_view_group(mut self, group: GroupId) -> Self {
        self.can_view_groups.insert(group);
        self
    }

    /// Require an authenticated user.
    pub fn with_require_auth(mut self) -> Self {
        self.require_auth = true;
        self
    }

    /// Whether any per-object restriction is in effect at all.
    pub fn is_public(&self) -> bool {
        !self.require_auth && self.can_view_groups.is_empty()
    }
}

/// Access to an object's ACL fields.
///
/// Implemented by any domain object that embeds [`AclFields`]; the engine's
/// object checks read the fields exclusively through this trait.
pub trait ObjectAcl {
    fn acl(&self) -> &AclFields;

    fn created_by(&self) -> Option<UserId> {
        self.acl().created_by
    }

    fn can_edit_users(&self) -> &HashSet<UserId> {
        &self.acl().can_edit_users
    }

    fn can_edit_groups(&self) -> &HashSet<GroupId> {
        &self.acl().can_edit_groups
    }

    fn can_view_groups(&self) -> &HashSet<GroupId> {
        &self.acl().can_view_groups
    }

    fn require_auth(&self) -> bool {
        self.acl().require_auth
    }
}

impl ObjectAcl for AclFields {
    fn acl(&self) -> &AclFields {
        self
    }
}
