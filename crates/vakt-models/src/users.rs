//! User models and the actor identity permission checks run for.
//!
//! The engine never authenticates anybody; it receives an [`Actor`] that the
//! calling layer already resolved (session, token, whatever) and treats
//! [`Actor::Anonymous`] as the explicit "no identity" sentinel rather than an
//! absent value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// A user in the portal.
///
/// This is the lean profile the permission core needs; richer profile data
/// (emails, avatars, student numbers) belongs to the API layer. An inactive
/// user keeps existing as a record but contributes no memberships to
/// permission checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create an active user with a fresh id.
    pub fn new(
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// The user's full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The identity a permission check runs for.
///
/// Either an explicit anonymous sentinel or a reference to a user. The
/// calling layer resolves credentials to an `Actor` before invoking the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    /// No identity; requests without (valid) credentials.
    Anonymous,
    /// An authenticated user.
    User(UserId),
}

impl Actor {
    /// Shorthand for [`Actor::User`].
    #[inline]
    pub fn user(id: UserId) -> Self {
        Self::User(id)
    }

    /// Whether this actor carries an authenticated identity.
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// Whether this actor is the anonymous sentinel.
    #[inline]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// The user id, if authenticated.
    #[inline]
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }

    /// Whether this actor is the given user.
    #[inline]
    pub fn is_user(&self, id: UserId) -> bool {
        self.user_id() == Some(id)
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::User(id) => write!(f, "{}", id),
        }
    }
}

impl From<UserId> for Actor {
    fn from(id: UserId) -> Self {
        Self::User(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let user = User::new("alice", "Alice", "Lund");
        assert_eq!(user.full_name(), "Alice Lund");
        assert!(user.is_active);
    }

    #[test]
    fn test_actor_authenticated() {
        let id = UserId::new();
        let actor = Actor::user(id);
        assert!(actor.is_authenticated());
        assert!(!actor.is_anonymous());
        assert_eq!(actor.user_id(), Some(id));
        assert!(actor.is_user(id));
        assert!(!actor.is_user(UserId::new()));
    }

    #[test]
    fn test_actor_anonymous() {
        let actor = Actor::Anonymous;
        assert!(actor.is_anonymous());
        assert!(!actor.is_authenticated());
        assert_eq!(actor.user_id(), None);
        assert!(!actor.is_user(UserId::new()));
        assert_eq!(format!("{}", actor), "anonymous");
    }

    #[test]
    fn test_user_serialization() {
        let user = User::new("alice", "Alice", "Lund");
        let serialized = serde_json::to_string(&user).unwrap();
        assert!(serialized.contains("alice"));
        assert!(serialized.contains("Lund"));
    }
}
