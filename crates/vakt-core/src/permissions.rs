//! Well-known keyword permission constants for the portal.
//!
//! This module provides centralized keyword permission strings for use across
//! the codebase. Using these constants instead of string literals ensures
//! consistency and makes refactoring easier.
//!
//! # Example
//!
//! ```ignore
//! use vakt_core::permissions;
//!
//! let group_grants = vec![permissions::events::CREATE.parse()?];
//! ```

use crate::keyword::KeywordPermission;

/// The root grant; prefixes every other keyword permission in the portal.
pub const ROOT: &str = "/sudo/";

/// The admin subtree; prefixes all per-model admin grants.
pub const ADMIN: &str = "/sudo/admin/";

/// Render the default admin keyword for a model and permission fragment,
/// e.g. `admin_keyword("event", "create")` → `/sudo/admin/events/create/`.
///
/// The model name is pluralized naively by appending `s`, matching how the
/// admin grant tree is laid out.
pub fn admin_keyword(model: &str, fragment: &str) -> KeywordPermission {
    KeywordPermission::new_unchecked(format!("/sudo/admin/{}s/{}/", model, fragment))
}

// =============================================================================
// Events permissions
// =============================================================================

pub mod events {
    /// Grant over the whole events subtree
    pub const ALL: &str = "/sudo/admin/events/";
    /// Permission to list events
    pub const LIST: &str = "/sudo/admin/events/list/";
    /// Permission to view a single event
    pub const VIEW: &str = "/sudo/admin/events/view/";
    /// Permission to create events
    pub const CREATE: &str = "/sudo/admin/events/create/";
    /// Permission to edit events
    pub const EDIT: &str = "/sudo/admin/events/edit/";
    /// Permission to delete events
    pub const DELETE: &str = "/sudo/admin/events/delete/";
}

// =============================================================================
// Meetings permissions
// =============================================================================

pub mod meetings {
    /// Grant over the whole meetings subtree
    pub const ALL: &str = "/sudo/admin/meetings/";
    /// Permission to list meetings
    pub const LIST: &str = "/sudo/admin/meetings/list/";
    /// Permission to view a single meeting
    pub const VIEW: &str = "/sudo/admin/meetings/view/";
    /// Permission to create meetings
    pub const CREATE: &str = "/sudo/admin/meetings/create/";
    /// Permission to edit meetings
    pub const EDIT: &str = "/sudo/admin/meetings/edit/";
    /// Permission to delete meetings
    pub const DELETE: &str = "/sudo/admin/meetings/delete/";
}

// =============================================================================
// Groups permissions
// =============================================================================

pub mod groups {
    /// Grant over the whole groups subtree
    pub const ALL: &str = "/sudo/admin/groups/";
    /// Permission to list groups
    pub const LIST: &str = "/sudo/admin/groups/list/";
    /// Permission to view a single group
    pub const VIEW: &str = "/sudo/admin/groups/view/";
    /// Permission to create groups
    pub const CREATE: &str = "/sudo/admin/groups/create/";
    /// Permission to edit groups
    pub const EDIT: &str = "/sudo/admin/groups/edit/";
    /// Permission to delete groups
    pub const DELETE: &str = "/sudo/admin/groups/delete/";
}

// =============================================================================
// Users permissions
// =============================================================================

pub mod users {
    /// Grant over the whole users subtree
    pub const ALL: &str = "/sudo/admin/users/";
    /// Permission to list users
    pub const LIST: &str = "/sudo/admin/users/list/";
    /// Permission to view a single user
    pub const VIEW: &str = "/sudo/admin/users/view/";
    /// Permission to create users
    pub const CREATE: &str = "/sudo/admin/users/create/";
    /// Permission to edit users
    pub const EDIT: &str = "/sudo/admin/users/edit/";
    /// Permission to delete users
    pub const DELETE: &str = "/sudo/admin/users/delete/";
}
