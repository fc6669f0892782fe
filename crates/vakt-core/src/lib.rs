//! # Vakt Core
//!
//! Permission vocabulary and keyword permission strings for the vakt engine.
//!
//! This crate provides the foundational permission types used throughout vakt:
//!
//! - [`actions`]: API-level actions and the internal permission vocabulary
//! - [`keyword`]: validated keyword permission strings with prefix matching
//! - [`permissions`]: well-known keyword permission constants for the portal
//!
//! # Example
//!
//! ```ignore
//! use vakt_core::{Action, KeywordPermission, Permission};
//!
//! // An API action resolves to an internal permission
//! let action = Action::parse("partial_update");
//! assert_eq!(action.permission(), Permission::Edit);
//!
//! // Keyword permissions match by string prefix
//! let held: KeywordPermission = "/sudo/admin/".parse()?;
//! let required: KeywordPermission = "/sudo/admin/events/create/".parse()?;
//! assert!(held.grants(&required));
//! ```

pub mod actions;
pub mod keyword;
pub mod permissions;

// Re-export commonly used types at crate root
pub use actions::{Action, Permission};
pub use keyword::{KeywordPermission, KeywordPermissionError, any_grants};
