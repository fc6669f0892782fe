//! Validated keyword permission strings with prefix matching.
//!
//! A keyword permission is a forward-slash delimited path such as
//! `/sudo/admin/events/create/`, granted to groups. Matching is a plain
//! string-prefix test: a group holding `/sudo/admin/` satisfies any check for
//! a permission under that subtree. The test is character-level, not
//! segment-aware, which is why validation insists every stored string ends in
//! `/` — without that, `/sudo/admin` would also match `/sudo/adminx/`.
//!
//! # Example
//!
//! ```ignore
//! use vakt_core::KeywordPermission;
//!
//! let held: KeywordPermission = "/sudo/admin/".parse().unwrap();
//! let required: KeywordPermission = "/sudo/admin/events/create/".parse().unwrap();
//! assert!(held.grants(&required));
//!
//! // Malformed strings never construct
//! assert!("sudo/admin/".parse::<KeywordPermission>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error type for keyword permission parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeywordPermissionError {
    #[error("keyword permission cannot be empty")]
    Empty,

    #[error("keyword permission '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("keyword permission '{0}' must end with '/'")]
    MissingTrailingSlash(String),

    #[error("keyword permission '{0}' may only contain ASCII letters and '/'")]
    InvalidCharacter(String),
}

/// A validated keyword permission string.
///
/// This type guarantees the contained string begins and ends with `/` and
/// contains only ASCII letters and `/`. The evaluation engine assumes every
/// stored keyword permission is well-formed; malformed input is rejected here,
/// at the point a group's permission list is saved, never at check time.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct KeywordPermission(String);

impl KeywordPermission {
    /// Create a new keyword permission from a string, validating it.
    pub fn new(keyword: impl Into<String>) -> Result<Self, KeywordPermissionError> {
        let keyword = keyword.into();
        Self::validate(&keyword)?;
        Ok(Self(keyword))
    }

    /// Create a keyword permission without validation.
    ///
    /// Intended for values loaded from a trusted source (e.g. the backing
    /// store) where validation already happened at save time.
    #[inline]
    pub fn new_unchecked(keyword: impl Into<String>) -> Self {
        Self(keyword.into())
    }

    /// Get the keyword as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume self and return the inner String.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether holding this keyword satisfies a check for `required`.
    ///
    /// Plain string-prefix semantics: `/sudo/` grants everything below
    /// `/sudo/`, including `/sudo/` itself. The relation is directional —
    /// `held.grants(required)`, never the other way around.
    #[inline]
    pub fn grants(&self, required: &KeywordPermission) -> bool {
        required.0.starts_with(&self.0)
    }

    /// Validate a keyword permission string.
    pub fn validate(keyword: &str) -> Result<(), KeywordPermissionError> {
        if keyword.is_empty() {
            return Err(KeywordPermissionError::Empty);
        }
        if !keyword.starts_with('/') {
            return Err(KeywordPermissionError::MissingLeadingSlash(
                keyword.to_string(),
            ));
        }
        if !keyword.ends_with('/') {
            return Err(KeywordPermissionError::MissingTrailingSlash(
                keyword.to_string(),
            ));
        }
        if !keyword.chars().all(|c| c == '/' || c.is_ascii_alphabetic()) {
            return Err(KeywordPermissionError::InvalidCharacter(
                keyword.to_string(),
            ));
        }
        Ok(())
    }
}

/// Whether any held keyword permission satisfies a check for `required`.
///
/// Anonymous callers hold no keywords, so an empty iterator always fails.
pub fn any_grants<'a, I>(held: I, required: &KeywordPermission) -> bool
where
    I: IntoIterator<Item = &'a KeywordPermission>,
{
    held.into_iter().any(|kw| kw.grants(required))
}

impl fmt::Debug for KeywordPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeywordPermission({})", self.0)
    }
}

impl fmt::Display for KeywordPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for KeywordPermission {
    type Err = KeywordPermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for KeywordPermission {
    type Error = KeywordPermissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for KeywordPermission {
    type Error = KeywordPermissionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for KeywordPermission {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<KeywordPermission> for String {
    fn from(keyword: KeywordPermission) -> String {
        keyword.0
    }
}

// Deserialize re-validates so stored malformed strings cannot sneak back in
// through a serialized payload.
impl<'de> Deserialize<'de> for KeywordPermission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keywords() {
        assert!(KeywordPermission::new("/sudo/").is_ok());
        assert!(KeywordPermission::new("/sudo/admin/").is_ok());
        assert!(KeywordPermission::new("/sudo/admin/events/create/").is_ok());
        assert!(KeywordPermission::new("/").is_ok());
    }

    #[test]
    fn test_invalid_keywords() {
        assert_eq!(
            KeywordPermission::new(""),
            Err(KeywordPermissionError::Empty)
        );
        assert!(matches!(
            KeywordPermission::new("sudo/admin/"),
            Err(KeywordPermissionError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            KeywordPermission::new("/sudo/admin"),
            Err(KeywordPermissionError::MissingTrailingSlash(_))
        ));
        assert!(matches!(
            KeywordPermission::new("/sudo/admin2/"),
            Err(KeywordPermissionError::InvalidCharacter(_))
        ));
        assert!(matches!(
            KeywordPermission::new("/sudo/ad min/"),
            Err(KeywordPermissionError::InvalidCharacter(_))
        ));
        assert!(matches!(
            KeywordPermission::new("/sudo/admin-events/"),
            Err(KeywordPermissionError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn test_prefix_grant() {
        let held = KeywordPermission::new("/sudo/admin/").unwrap();
        let required = KeywordPermission::new("/sudo/admin/events/create/").unwrap();
        assert!(held.grants(&required));
        assert!(held.grants(&held));
    }

    #[test]
    fn test_sibling_subtree_not_granted() {
        let held = KeywordPermission::new("/sudo/admin/events/").unwrap();
        let required = KeywordPermission::new("/sudo/admin/users/create/").unwrap();
        assert!(!held.grants(&required));
    }

    #[test]
    fn test_grant_is_directional() {
        let broad = KeywordPermission::new("/sudo/").unwrap();
        let narrow = KeywordPermission::new("/sudo/admin/events/").unwrap();
        assert!(broad.grants(&narrow));
        assert!(!narrow.grants(&broad));
    }

    #[test]
    fn test_any_grants() {
        let held = vec![
            KeywordPermission::new("/sudo/admin/meetings/").unwrap(),
            KeywordPermission::new("/sudo/admin/events/").unwrap(),
        ];
        let required = KeywordPermission::new("/sudo/admin/events/view/").unwrap();
        assert!(any_grants(&held, &required));

        let other = KeywordPermission::new("/sudo/admin/users/view/").unwrap();
        assert!(!any_grants(&held, &other));
        assert!(!any_grants([], &required));
    }

    #[test]
    fn test_trailing_slash_prevents_over_matching() {
        // `/sudo/admin` (no trailing slash) would prefix-match the unrelated
        // `/sudo/adminx/` subtree; validation rules it out entirely.
        assert!(KeywordPermission::new("/sudo/admin").is_err());
        let held = KeywordPermission::new("/sudo/admin/").unwrap();
        let unrelated = KeywordPermission::new("/sudo/adminx/view/").unwrap();
        assert!(!held.grants(&unrelated));
    }

    #[test]
    fn test_display_and_debug() {
        let kw = KeywordPermission::new("/sudo/admin/").unwrap();
        assert_eq!(format!("{}", kw), "/sudo/admin/");
        assert_eq!(format!("{:?}", kw), "KeywordPermission(/sudo/admin/)");
    }

    #[test]
    fn test_serde_round_trip() {
        let kw = KeywordPermission::new("/sudo/admin/events/").unwrap();
        let json = serde_json::to_string(&kw).unwrap();
        assert_eq!(json, r#""/sudo/admin/events/""#);
        let back: KeywordPermission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kw);
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        let result: Result<KeywordPermission, _> = serde_json::from_str(r#""sudo/admin/""#);
        assert!(result.is_err());
    }
}
