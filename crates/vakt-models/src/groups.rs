//! Group and membership domain models and DTOs.
//!
//! Groups form a strict tree (every group has at most one parent and the
//! graph has no cycles); a user's effective permission set is derived from
//! the groups they joined plus every ancestor of those groups. Keyword
//! permissions are attached to groups, never directly to users.
//!
//! # Core Types
//!
//! - [`Group`] - a node in the group tree, carrying keyword permissions
//! - [`GroupKind`] - the portal's group taxonomy
//! - [`Membership`] - a (user, group) relation with role and date window
//! - [`MembershipRole`] - member / leader / co-leader / treasurer
//!
//! # Request DTOs
//!
//! - [`CreateGroupDto`] / [`UpdateGroupDto`] - administrator group
//!   management; keyword permission strings are validated here, at save
//!   time, so the evaluation engine never sees a malformed one

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use vakt_core::{KeywordPermission, KeywordPermissionError};

use crate::ids::{GroupId, MembershipId, UserId};

/// The portal's group taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// A standing committee (e.g. the web committee).
    Committee,
    /// The organization board.
    Board,
    /// A member-run interest group.
    InterestGroup,
    /// A class-year group.
    Grade,
    /// Anything else.
    #[default]
    Other,
}

impl GroupKind {
    /// The wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Committee => "committee",
            Self::Board => "board",
            Self::InterestGroup => "interest_group",
            Self::Grade => "grade",
            Self::Other => "other",
        }
    }

    /// Parse a wire name; returns `None` for unknown kinds.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "committee" => Some(Self::Committee),
            "board" => Some(Self::Board),
            "interest_group" => Some(Self::InterestGroup),
            "grade" => Some(Self::Grade),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for GroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A group in the portal.
///
/// The `parent` reference shapes the tree; a group without a parent is its
/// own root. `permissions` holds the keyword grants every (transitive) member
/// of this group receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub kind: GroupKind,
    pub parent: Option<GroupId>,
    pub permissions: Vec<KeywordPermission>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create a root group with no permissions.
    pub fn new(name: impl Into<String>, kind: GroupKind) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            kind,
            parent: None,
            permissions: Vec::new(),
            description: None,
            created_at: Utc::now(),
        }
    }

    /// Attach this group under a parent.
    pub fn with_parent(mut self, parent: GroupId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add a keyword permission grant to this group.
    pub fn with_permission(mut self, permission: KeywordPermission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Whether this group is a root of the tree.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The role a membership carries inside its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    #[default]
    Member,
    Leader,
    CoLeader,
    Treasurer,
}

impl MembershipRole {
    /// The wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Leader => "leader",
            Self::CoLeader => "co_leader",
            Self::Treasurer => "treasurer",
        }
    }

    /// Parse a wire name; returns `None` for unknown roles.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "member" => Some(Self::Member),
            "leader" => Some(Self::Leader),
            "co_leader" => Some(Self::CoLeader),
            "treasurer" => Some(Self::Treasurer),
            _ => None,
        }
    }
}

impl std::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's membership in a group.
///
/// At most one active membership exists per (user, group) pair; the store
/// enforces that by replacement on insert. The date window bounds when the
/// membership counts; `end_date` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub group_id: GroupId,
    pub role: MembershipRole,
    pub is_active: bool,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Membership {
    /// Create an active, open-ended membership starting today.
    pub fn new(user_id: UserId, group_id: GroupId) -> Self {
        Self {
            id: MembershipId::new(),
            user_id,
            group_id,
            role: MembershipRole::default(),
            is_active: true,
            start_date: Utc::now().date_naive(),
            end_date: None,
        }
    }

    /// Set the membership role.
    pub fn with_role(mut self, role: MembershipRole) -> Self {
        self.role = role;
        self
    }

    /// Whether this membership counts on the given date.
    pub fn is_current(&self, on: NaiveDate) -> bool {
        self.is_active && self.start_date <= on && self.end_date.map_or(true, |end| on <= end)
    }
}

// DTOs

/// DTO for creating a new group.
///
/// Keyword permission strings arrive as plain strings and are validated by
/// [`CreateGroupDto::parse_permissions`] before anything is stored; a group
/// with a malformed permission list is never saved.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
    #[serde(default)]
    pub kind: GroupKind,
    pub parent: Option<GroupId>,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    /// Keyword permission strings to grant to this group.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl CreateGroupDto {
    /// Validate and parse the keyword permission strings.
    pub fn parse_permissions(&self) -> Result<Vec<KeywordPermission>, KeywordPermissionError> {
        self.permissions
            .iter()
            .map(|s| KeywordPermission::new(s.clone()))
            .collect()
    }
}

/// DTO for updating a group.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGroupDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
    /// Replacement keyword permission list, if present.
    pub permissions: Option<Vec<String>>,
}

impl UpdateGroupDto {
    /// Validate and parse the replacement permission list, if present.
    pub fn parse_permissions(
        &self,
    ) -> Result<Option<Vec<KeywordPermission>>, KeywordPermissionError> {
        self.permissions
            .as_ref()
            .map(|perms| {
                perms
                    .iter()
                    .map(|s| KeywordPermission::new(s.clone()))
                    .collect()
            })
            .transpose()
    }
}
