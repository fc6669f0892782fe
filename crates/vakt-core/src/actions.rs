//! API-level actions and the internal permission vocabulary.
//!
//! API callers speak in viewset actions (`list`, `retrieve`, `partial_update`,
//! ...); permission handlers speak in the internal vocabulary
//! ([`Permission`]): `List`, `Create`, `View`, `Edit`, `Delete`. The mapping
//! between the two is a fixed, case-sensitive table; any unknown action passes
//! through unchanged as a custom permission so that route-specific actions
//! like `approve` or `like` can carry their own keyword grants.
//!
//! Handlers only ever see [`Permission`] values, never raw action strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An API-surface action, as named by the routing layer.
///
/// The closed set of well-known actions mirrors the standard viewset verbs;
/// everything else is carried verbatim in [`Action::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Create,
    Retrieve,
    Update,
    PartialUpdate,
    Destroy,
    Metadata,
    /// A route-specific action such as `approve` or `like`.
    Custom(String),
}

impl Action {
    /// Parse an action name. Case-sensitive; unknown names become
    /// [`Action::Custom`] rather than an error.
    pub fn parse(name: &str) -> Self {
        match name {
            "list" => Self::List,
            "create" => Self::Create,
            "retrieve" => Self::Retrieve,
            "update" => Self::Update,
            "partial_update" => Self::PartialUpdate,
            "destroy" => Self::Destroy,
            "metadata" => Self::Metadata,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The wire name of this action.
    pub fn as_str(&self) -> &str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Retrieve => "retrieve",
            Self::Update => "update",
            Self::PartialUpdate => "partial_update",
            Self::Destroy => "destroy",
            Self::Metadata => "metadata",
            Self::Custom(name) => name,
        }
    }

    /// Resolve this action to its internal permission.
    ///
    /// This is the fixed table applied before any handler lookup:
    ///
    /// | action | permission |
    /// |---|---|
    /// | `list` | `List` |
    /// | `create` | `Create` |
    /// | `retrieve` | `View` |
    /// | `update` | `Edit` |
    /// | `partial_update` | `Edit` |
    /// | `destroy` | `Delete` |
    /// | `metadata` | `View` |
    /// | anything else | passed through unchanged |
    pub fn permission(&self) -> Permission {
        match self {
            Self::List => Permission::List,
            Self::Create => Permission::Create,
            Self::Retrieve => Permission::View,
            Self::Update => Permission::Edit,
            Self::PartialUpdate => Permission::Edit,
            Self::Destroy => Permission::Delete,
            Self::Metadata => Permission::View,
            Self::Custom(name) => Permission::Custom(name.clone()),
        }
    }

    /// The standard viewset route table, in the order clients usually
    /// enumerate it. Useful as the default input to grant introspection.
    pub fn standard() -> Vec<Action> {
        vec![
            Self::List,
            Self::Create,
            Self::Retrieve,
            Self::Update,
            Self::PartialUpdate,
            Self::Destroy,
        ]
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(|s| Self::parse(&s))
    }
}

/// The internal permission vocabulary handlers operate on.
///
/// `List` and `View` are read-type permissions; `Create`, `Edit` and `Delete`
/// are write-type. Custom permissions (from custom actions) are treated as
/// write-type at the object level since nothing weaker can be assumed about
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    List,
    Create,
    View,
    Edit,
    Delete,
    /// A free-form permission carried over from a custom action.
    Custom(String),
}

impl Permission {
    /// The lower-case fragment interpolated into keyword permission
    /// templates, e.g. `view` in `/sudo/admin/events/view/`.
    pub fn keyword_fragment(&self) -> &str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Custom(name) => name,
        }
    }

    /// Whether this is a read-type permission (`List` or `View`).
    ///
    /// Read-type permissions are checked against a record's view ACL,
    /// everything else against its edit ACL.
    pub fn is_read(&self) -> bool {
        matches!(self, Self::List | Self::View)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword_fragment())
    }
}

impl Serialize for Permission {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.keyword_fragment())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "list" => Self::List,
            "create" => Self::Create,
            "view" => Self::View,
            "edit" => Self::Edit,
            "delete" => Self::Delete,
            _ => Self::Custom(s),
        })
    }
}
