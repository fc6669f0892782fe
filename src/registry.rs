//! Handler registry and dispatch.
//!
//! The registry maps model types to their [`PermissionHandler`]s. It is
//! built once at application startup through
//! [`PermissionRegistryBuilder`] and immutable afterwards, so concurrent
//! readers need no synchronization. Lookup is keyed by the model's type
//! identity, not its name; the name is only used for logging and for the
//! fallback handler.
//!
//! Checks arrive here in API vocabulary ([`Action`]) and are mapped to the
//! internal permission vocabulary before any handler sees them.
//!
//! # Example
//!
//! ```ignore
//! use vakt::{Action, Permission, PermissionHandler, PermissionRegistry};
//!
//! let registry = PermissionRegistry::builder()
//!     .register::<Event>(
//!         PermissionHandler::builder("event")
//!             .allow_anonymous(Permission::List)
//!             .with_object_acl()
//!             .build()?,
//!     )?
//!     .build();
//!
//! let verdict = registry.check::<Event>(&snapshot, &Action::List);
//! ```

use std::any::TypeId;
use std::collections::HashMap;

use tracing::warn;

use vakt_core::Action;
use vakt_models::{Model, ObjectAcl};

use crate::handler::{PermissionHandler, Verdict};
use crate::snapshot::ActorSnapshot;

/// Registration errors, surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("a permission handler is already registered for model '{model}'")]
    DuplicateHandler { model: &'static str },

    #[error("handler built for model '{handler}' registered under type named '{model}'")]
    ModelMismatch {
        model: &'static str,
        handler: String,
    },
}

/// Builder for [`PermissionRegistry`].
#[derive(Debug, Default)]
pub struct PermissionRegistryBuilder {
    handlers: HashMap<TypeId, PermissionHandler>,
}

impl PermissionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for model type `M`.
    ///
    /// # Errors
    ///
    /// Fails if `M` already has a handler, or if the handler was built for a
    /// different model name than `M::NAME`.
    pub fn register<M: Model + 'static>(
        mut self,
        handler: PermissionHandler,
    ) -> Result<Self, RegistryError> {
        if handler.model() != M::NAME {
            return Err(RegistryError::ModelMismatch {
                model: M::NAME,
                handler: handler.model().to_string(),
            });
        }
        let id = TypeId::of::<M>();
        if self.handlers.contains_key(&id) {
            return Err(RegistryError::DuplicateHandler { model: M::NAME });
        }
        self.handlers.insert(id, handler);
        Ok(self)
    }

    /// Freeze the registry.
    pub fn build(self) -> PermissionRegistry {
        PermissionRegistry {
            handlers: self.handlers,
        }
    }
}

/// The immutable handler registry; the single entry point the authorization
/// layer talks to.
///
/// Checks against an unregistered model type do not fail: they fall back to
/// a keyword-only handler that requires an explicit keyword grant for every
/// permission and supports no object ACL path. Missing registration degrades
/// to deny-by-default, never to allow.
#[derive(Debug, Default)]
pub struct PermissionRegistry {
    handlers: HashMap<TypeId, PermissionHandler>,
}

impl PermissionRegistry {
    pub fn builder() -> PermissionRegistryBuilder {
        PermissionRegistryBuilder::new()
    }

    /// The registered handler for `M`, if any.
    pub fn handler<M: Model + 'static>(&self) -> Option<&PermissionHandler> {
        self.handlers.get(&TypeId::of::<M>())
    }

    pub fn is_registered<M: Model + 'static>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<M>())
    }

    fn with_handler<M: Model + 'static, R>(
        &self,
        f: impl FnOnce(&PermissionHandler) -> R,
    ) -> R {
        match self.handlers.get(&TypeId::of::<M>()) {
            Some(handler) => f(handler),
            None => {
                warn!(
                    model = M::NAME,
                    "no permission handler registered; using keyword-only default"
                );
                f(&PermissionHandler::keyword_only(M::NAME))
            }
        }
    }

    /// The entry-gate check for `action` on model `M`, with no record in
    /// hand. See [`PermissionHandler::has_perm`].
    pub fn check<M: Model + 'static>(&self, actor: &ActorSnapshot, action: &Action) -> Verdict {
        self.with_handler::<M, _>(|handler| handler.has_perm(actor, &action.permission()))
    }

    /// The full point check for `action` on a loaded record. See
    /// [`PermissionHandler::check`].
    pub fn check_object<M: Model + ObjectAcl + 'static>(
        &self,
        actor: &ActorSnapshot,
        action: &Action,
        object: &M,
    ) -> Verdict {
        self.with_handler::<M, _>(|handler| handler.check(actor, &action.permission(), object))
    }

    /// Filter a queryset of `M` records down to those the actor may view.
    /// See [`PermissionHandler::filter_queryset`].
    pub fn filter<'a, M: Model + ObjectAcl + 'static>(
        &self,
        actor: &ActorSnapshot,
        queryset: &'a [M],
    ) -> Vec<&'a M> {
        self.with_handler::<M, _>(|handler| handler.filter_queryset(actor, queryset))
    }

    /// The subset of `actions` the actor may attempt on model `M`, judged at
    /// the entry gate.
    pub fn granted_actions<M: Model + 'static>(
        &self,
        actor: &ActorSnapshot,
        actions: &[Action],
    ) -> Vec<Action> {
        self.with_handler::<M, _>(|handler| handler.granted_actions(actor, actions))
    }

    /// The subset of `actions` the actor may perform on a specific record.
    pub fn granted_actions_for<M: Model + ObjectAcl + 'static>(
        &self,
        actor: &ActorSnapshot,
        actions: &[Action],
        object: &M,
    ) -> Vec<Action> {
        self.with_handler::<M, _>(|handler| handler.granted_actions_for(actor, actions, object))
    }
}

#[cfg(test)]
mod tests {
    use vakt_core::{KeywordPermission, permissions};
    use vakt_models::{AclFields, Actor, ObjectAcl, UserId};

    use super::*;

    struct Event {
        acl: AclFields,
    }

    impl Model for Event {
        const NAME: &'static str = "event";
    }

    impl ObjectAcl for Event {
        fn acl(&self) -> &AclFields {
            &self.acl
        }
    }

    struct Meeting;

    impl Model for Meeting {
        const NAME: &'static str = "meeting";
    }

    fn admin() -> ActorSnapshot {
        ActorSnapshot {
            actor: Actor::User(UserId::new()),
            groups: Default::default(),
            keywords: vec![KeywordPermission::new(permissions::ROOT).unwrap()],
        }
    }

    fn plain() -> ActorSnapshot {
        ActorSnapshot {
            actor: Actor::User(UserId::new()),
            groups: Default::default(),
            keywords: Vec::new(),
        }
    }

    fn event_registry() -> PermissionRegistry {
        PermissionRegistry::builder()
            .register::<Event>(
                PermissionHandler::builder("event")
                    .with_object_acl()
                    .build()
                    .unwrap(),
            )
            .unwrap()
            .build()
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let builder = PermissionRegistry::builder()
            .register::<Event>(
                PermissionHandler::builder("event")
                    .with_object_acl()
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let result =
            builder.register::<Event>(PermissionHandler::builder("event").build().unwrap());
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateHandler { model: "event" })
        ));
    }

    #[test]
    fn test_register_rejects_model_mismatch() {
        let result = PermissionRegistry::builder()
            .register::<Event>(PermissionHandler::builder("meeting").build().unwrap());
        assert!(matches!(result, Err(RegistryError::ModelMismatch { .. })));
    }

    #[test]
    fn test_registered_handler_dispatch() {
        let registry = event_registry();
        assert!(registry.is_registered::<Event>());
        assert!(!registry.is_registered::<Meeting>());

        // The registered handler defers to the object stage for detail
        // permissions.
        let verdict = registry.check::<Event>(&plain(), &Action::Retrieve);
        assert!(verdict.is_deferred());
    }

    #[test]
    fn test_unregistered_model_falls_back_to_keyword_only() {
        let registry = event_registry();

        // No handler for Meeting: an explicit keyword is the only path in.
        assert!(registry.check::<Meeting>(&plain(), &Action::List).is_denied());
        assert!(
            registry
                .check::<Meeting>(&admin(), &Action::List)
                .is_granted()
        );
    }

    #[test]
    fn test_check_object_composes_both_stages() {
        let registry = event_registry();

        let owner = plain();
        let record = Event {
            acl: AclFields::public()
                .with_created_by(owner.user_id().unwrap())
                .with_require_auth(),
        };

        assert!(
            registry
                .check_object::<Event>(&owner, &Action::Update, &record)
                .is_granted()
        );
        assert!(
            registry
                .check_object::<Event>(&plain(), &Action::Update, &record)
                .is_denied()
        );
        // Keyword holders skip the ACL entirely.
        assert!(
            registry
                .check_object::<Event>(&admin(), &Action::Update, &record)
                .is_granted()
        );
    }

    #[test]
    fn test_filter_dispatches_to_handler() {
        let registry = event_registry();
        let records = vec![
            Event {
                acl: AclFields::public(),
            },
            Event {
                acl: AclFields::public().with_require_auth(),
            },
        ];

        assert_eq!(registry.filter(&plain(), &records).len(), 1);
        assert_eq!(registry.filter(&admin(), &records).len(), 2);
    }

    #[test]
    fn test_granted_actions_via_registry() {
        let registry = event_registry();
        let granted = registry.granted_actions::<Meeting>(&plain(), &Action::standard());
        assert!(granted.is_empty());

        let granted = registry.granted_actions::<Meeting>(&admin(), &Action::standard());
        assert_eq!(granted, Action::standard());
    }
}
