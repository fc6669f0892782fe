//! Per-model permission policy.
//!
//! A [`PermissionHandler`] encapsulates every authorization rule for one
//! domain model: which permissions admit anonymous actors, which keyword
//! strings satisfy each permission, and whether the model carries per-record
//! ACL fields. Handlers are built once at startup through
//! [`PermissionHandler::builder`] and registered in the
//! [`registry`](crate::registry); all of their operations are pure reads.
//!
//! The keyword stage and the object stage are deliberately separate
//! operations, mirroring the split between a list-level check (no record in
//! hand yet) and a detail-level check (record loaded):
//!
//! - [`PermissionHandler::has_perm`] — the entry gate. Applies the
//!   authentication requirement, tries the keyword stage, and either grants,
//!   denies, or *defers* to a later stage.
//! - [`PermissionHandler::has_object_permission`] — the object stage. Pure
//!   ACL evaluation against one record; assumes the caller already ran
//!   [`has_perm`](PermissionHandler::has_perm) and got a deferred grant.
//! - [`PermissionHandler::check`] — the two composed, for callers that have
//!   the record up front.
//! - [`PermissionHandler::filter_queryset`] — the set-wise equivalent of the
//!   object stage for read access, used by list endpoints instead of N
//!   per-record checks.
//!
//! # Example
//!
//! ```ignore
//! use vakt::{Permission, PermissionHandler};
//!
//! let handler = PermissionHandler::builder("event")
//!     .allow_anonymous(Permission::List)
//!     .allow_anonymous(Permission::View)
//!     .with_object_acl()
//!     .build()?;
//!
//! let verdict = handler.has_perm(&snapshot, &Permission::Create);
//! ```

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, trace};

use vakt_core::{Action, KeywordPermission, KeywordPermissionError, Permission};
use vakt_models::ObjectAcl;

use crate::snapshot::ActorSnapshot;

/// The default keyword template: `{model}` is replaced by the model name
/// (pluralized naively by the trailing `s` already present in the template)
/// and `{permission}` by the permission's keyword fragment.
pub const DEFAULT_KEYWORD_TEMPLATE: &str = "/sudo/admin/{model}s/{permission}/";

/// How a granted verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantVia {
    /// A held keyword permission prefix-matched the required string.
    Keyword,
    /// The permission is configured as open; no keyword is required.
    Open,
    /// The actor owns the record.
    Owner,
    /// The record carries no view restriction.
    Public,
    /// The actor is listed directly in the record's edit users.
    ObjectUser,
    /// One of the actor's effective groups is listed on the record.
    ObjectGroup,
    /// Provisionally granted; the object or queryset stage still decides.
    Deferred,
}

/// The outcome of a permission check.
///
/// Carries both the boolean decision and, when granted, the stage that
/// granted it. Calling layers thread this value through to later stages
/// instead of stashing flags on shared request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    granted: bool,
    via: Option<GrantVia>,
}

impl Verdict {
    pub(crate) fn granted(via: GrantVia) -> Self {
        Self {
            granted: true,
            via: Some(via),
        }
    }

    pub(crate) fn denied() -> Self {
        Self {
            granted: false,
            via: None,
        }
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }

    pub fn is_denied(&self) -> bool {
        !self.granted
    }

    /// The granting stage, or `None` for a denial.
    pub fn via(&self) -> Option<GrantVia> {
        self.via
    }

    /// Whether this grant is provisional and the object or queryset stage
    /// must still run.
    pub fn is_deferred(&self) -> bool {
        self.via == Some(GrantVia::Deferred)
    }
}

/// Handler configuration errors, surfaced at build time.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("model name '{0}' must be non-empty lowercase ASCII letters")]
    InvalidModelName(String),

    #[error("keyword template '{template}' renders malformed keyword permissions")]
    InvalidTemplate {
        template: String,
        #[source]
        source: KeywordPermissionError,
    },
}

/// The per-model policy object. Construct through
/// [`PermissionHandler::builder`].
#[derive(Debug, Clone)]
pub struct PermissionHandler {
    model: String,
    template: String,
    default_require_auth: bool,
    require_auth: HashMap<Permission, bool>,
    keyword_overrides: HashMap<Permission, Vec<KeywordPermission>>,
    open_permissions: HashSet<Permission>,
    object_acl: bool,
}

impl PermissionHandler {
    /// Start building a handler for the given model name (lowercase singular,
    /// e.g. `"event"`).
    pub fn builder(model: impl Into<String>) -> HandlerBuilder {
        HandlerBuilder {
            model: model.into(),
            template: DEFAULT_KEYWORD_TEMPLATE.to_string(),
            default_require_auth: true,
            require_auth: HashMap::new(),
            keyword_overrides: HashMap::new(),
            open_permissions: HashSet::new(),
            object_acl: false,
        }
    }

    /// The fallback handler used for unregistered model types: keyword-only,
    /// authentication required, no object ACL path. Denies everything that
    /// lacks an explicit keyword grant.
    pub(crate) fn keyword_only(model: &str) -> Self {
        Self {
            model: model.to_string(),
            template: DEFAULT_KEYWORD_TEMPLATE.to_string(),
            default_require_auth: true,
            require_auth: HashMap::new(),
            keyword_overrides: HashMap::new(),
            open_permissions: HashSet::new(),
            object_acl: false,
        }
    }

    /// The model name this handler was built for.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether records of this model carry object ACL fields.
    pub fn supports_object_acl(&self) -> bool {
        self.object_acl
    }

    /// The keyword permissions that satisfy `permission`, OR-combined.
    ///
    /// An explicit override wins; otherwise the handler's template is
    /// rendered. An empty list means the keyword stage can never grant this
    /// permission (either configured via
    /// [`no_keyword`](HandlerBuilder::no_keyword) or because the rendered
    /// string was malformed, e.g. a custom action containing digits).
    pub fn required_keywords(&self, permission: &Permission) -> Vec<KeywordPermission> {
        if let Some(overrides) = self.keyword_overrides.get(permission) {
            return overrides.clone();
        }
        match render_keyword(&self.template, &self.model, permission.keyword_fragment()) {
            Ok(keyword) => vec![keyword],
            Err(error) => {
                debug!(
                    model = %self.model,
                    permission = %permission,
                    %error,
                    "keyword template rendered a malformed permission; treating as not granted"
                );
                Vec::new()
            }
        }
    }

    fn requires_auth(&self, permission: &Permission) -> bool {
        self.require_auth
            .get(permission)
            .copied()
            .unwrap_or(self.default_require_auth)
    }

    fn keyword_granted(&self, actor: &ActorSnapshot, permission: &Permission) -> bool {
        self.required_keywords(permission)
            .iter()
            .any(|required| actor.has_keyword_permission(required))
    }

    /// The entry gate, run before any record is loaded.
    ///
    /// Stages, in order:
    ///
    /// 1. Authentication requirement for this permission (default: required).
    ///    Anonymous actors are denied here unless the permission was marked
    ///    [`allow_anonymous`](HandlerBuilder::allow_anonymous).
    /// 2. Open permissions grant unconditionally.
    /// 3. The keyword stage grants if any held keyword prefix-matches a
    ///    required string.
    /// 4. For `List`, `View`, `Edit` and `Delete` on a model with object
    ///    ACLs, the decision is deferred: the verdict is granted with
    ///    [`GrantVia::Deferred`] and the caller must run
    ///    [`filter_queryset`](Self::filter_queryset) (for `List`) or
    ///    [`has_object_permission`](Self::has_object_permission) (for the
    ///    rest) to finish the check.
    ///
    /// `Create` and custom permissions never defer; with no record to consult
    /// they require an explicit keyword or open grant.
    pub fn has_perm(&self, actor: &ActorSnapshot, permission: &Permission) -> Verdict {
        if !actor.is_authenticated() && self.requires_auth(permission) {
            return Verdict::denied();
        }
        if self.open_permissions.contains(permission) {
            return Verdict::granted(GrantVia::Open);
        }
        if self.keyword_granted(actor, permission) {
            return Verdict::granted(GrantVia::Keyword);
        }
        if self.object_acl && deferrable(permission) {
            return Verdict::granted(GrantVia::Deferred);
        }
        Verdict::denied()
    }

    /// The object stage: pure ACL evaluation against one record.
    ///
    /// No keyword or authentication-map logic runs here; callers are expected
    /// to have run [`has_perm`](Self::has_perm) first and reached a deferred
    /// grant ([`check`](Self::check) does both). Anonymous handling at this
    /// stage is per-record: anonymous actors can read a record only when it
    /// has `require_auth = false` and no view groups, and can never write.
    ///
    /// Read-type permissions (`List`, `View`) consult the view ACL:
    /// the owner always passes; otherwise the record must be unrestricted
    /// (`require_auth = false` and empty `can_view_groups`) or one of the
    /// actor's effective groups must appear in `can_view_groups`.
    ///
    /// Everything else consults the edit ACL: the owner, a user listed in
    /// `can_edit_users`, or a member of a group in `can_edit_groups`.
    ///
    /// Handlers without object ACL support deny here unconditionally.
    pub fn has_object_permission<O: ObjectAcl>(
        &self,
        actor: &ActorSnapshot,
        permission: &Permission,
        object: &O,
    ) -> Verdict {
        if !self.object_acl {
            return Verdict::denied();
        }
        if permission.is_read() {
            self.check_view(actor, object)
        } else {
            self.check_edit(actor, object)
        }
    }

    /// The full point check for a loaded record: [`has_perm`](Self::has_perm)
    /// composed with [`has_object_permission`](Self::has_object_permission).
    ///
    /// A keyword or open grant short-circuits and the record's ACL fields are
    /// never consulted; a deferred grant is resolved against the record; a
    /// denial is final.
    pub fn check<O: ObjectAcl>(
        &self,
        actor: &ActorSnapshot,
        permission: &Permission,
        object: &O,
    ) -> Verdict {
        let entry = self.has_perm(actor, permission);
        if entry.is_deferred() {
            return self.has_object_permission(actor, permission, object);
        }
        entry
    }

    /// The set-wise equivalent of the view check, for list endpoints.
    ///
    /// If the actor holds the list-level keyword (or `List` is open), the
    /// queryset is returned unfiltered. Otherwise each record is kept exactly
    /// when [`has_object_permission`](Self::has_object_permission) with
    /// `View` would keep it: owners, unrestricted records, and view-group
    /// matches for authenticated actors; unrestricted records only for
    /// anonymous ones.
    ///
    /// The authentication map is not consulted here; the caller gates the
    /// list endpoint with [`has_perm`](Self::has_perm) first.
    pub fn filter_queryset<'a, O: ObjectAcl>(
        &self,
        actor: &ActorSnapshot,
        queryset: &'a [O],
    ) -> Vec<&'a O> {
        if self.open_permissions.contains(&Permission::List)
            || self.keyword_granted(actor, &Permission::List)
        {
            return queryset.iter().collect();
        }

        let visible: Vec<&O> = match actor.user_id() {
            None => queryset
                .iter()
                .filter(|record| !record.require_auth() && record.can_view_groups().is_empty())
                .collect(),
            Some(user) => queryset
                .iter()
                .filter(|record| {
                    record.created_by() == Some(user)
                        || (!record.require_auth() && record.can_view_groups().is_empty())
                        || actor.in_any_group(record.can_view_groups())
                })
                .collect(),
        };

        trace!(
            model = %self.model,
            total = queryset.len(),
            visible = visible.len(),
            "filtered queryset"
        );
        visible
    }

    /// The subset of `actions` the actor may attempt, judged at the entry
    /// gate. Deferred grants count as permitted here: the client may attempt
    /// the action and the object stage decides at request time. Introspection
    /// only, never enforcement.
    pub fn granted_actions(&self, actor: &ActorSnapshot, actions: &[Action]) -> Vec<Action> {
        actions
            .iter()
            .filter(|action| self.has_perm(actor, &action.permission()).is_granted())
            .cloned()
            .collect()
    }

    /// The subset of `actions` the actor may perform on a specific record,
    /// judged with the full composed check.
    pub fn granted_actions_for<O: ObjectAcl>(
        &self,
        actor: &ActorSnapshot,
        actions: &[Action],
        object: &O,
    ) -> Vec<Action> {
        actions
            .iter()
            .filter(|action| self.check(actor, &action.permission(), object).is_granted())
            .cloned()
            .collect()
    }

    fn check_view<O: ObjectAcl>(&self, actor: &ActorSnapshot, object: &O) -> Verdict {
        let Some(user) = actor.user_id() else {
            if !object.require_auth() && object.can_view_groups().is_empty() {
                return Verdict::granted(GrantVia::Public);
            }
            return Verdict::denied();
        };

        if object.created_by() == Some(user) {
            return Verdict::granted(GrantVia::Owner);
        }
        if !object.require_auth() && object.can_view_groups().is_empty() {
            return Verdict::granted(GrantVia::Public);
        }
        if actor.in_any_group(object.can_view_groups()) {
            return Verdict::granted(GrantVia::ObjectGroup);
        }
        Verdict::denied()
    }

    fn check_edit<O: ObjectAcl>(&self, actor: &ActorSnapshot, object: &O) -> Verdict {
        let Some(user) = actor.user_id() else {
            return Verdict::denied();
        };

        if object.created_by() == Some(user) {
            return Verdict::granted(GrantVia::Owner);
        }
        if object.can_edit_users().contains(&user) {
            return Verdict::granted(GrantVia::ObjectUser);
        }
        if actor.in_any_group(object.can_edit_groups()) {
            return Verdict::granted(GrantVia::ObjectGroup);
        }
        Verdict::denied()
    }
}

/// Whether this permission has a later enforcement stage to defer to.
///
/// `List` resolves at the queryset filter; `View`, `Edit` and `Delete`
/// resolve at the object stage. `Create` and custom permissions have no
/// later stage, so deferring them would silently allow — they must grant
/// at the entry gate or not at all.
fn deferrable(permission: &Permission) -> bool {
    matches!(
        permission,
        Permission::List | Permission::View | Permission::Edit | Permission::Delete
    )
}

fn render_keyword(
    template: &str,
    model: &str,
    fragment: &str,
) -> Result<KeywordPermission, KeywordPermissionError> {
    let rendered = template
        .replace("{model}", model)
        .replace("{permission}", fragment);
    KeywordPermission::new(rendered)
}

/// Builder for [`PermissionHandler`]. Obtained from
/// [`PermissionHandler::builder`].
#[derive(Debug)]
pub struct HandlerBuilder {
    model: String,
    template: String,
    default_require_auth: bool,
    require_auth: HashMap<Permission, bool>,
    keyword_overrides: HashMap<Permission, Vec<KeywordPermission>>,
    open_permissions: HashSet<Permission>,
    object_acl: bool,
}

impl HandlerBuilder {
    /// Admit anonymous actors to the entry gate for this permission.
    ///
    /// This only opens the gate: an anonymous actor still needs a granting
    /// stage (an open permission, or the object stage's public rules) to
    /// actually pass.
    pub fn allow_anonymous(mut self, permission: Permission) -> Self {
        self.require_auth.insert(permission, false);
        self
    }

    /// Require authentication for this permission, overriding a flipped
    /// default.
    pub fn require_authentication(mut self, permission: Permission) -> Self {
        self.require_auth.insert(permission, true);
        self
    }

    /// Change the default authentication requirement applied to permissions
    /// without an explicit entry.
    pub fn default_require_auth(mut self, value: bool) -> Self {
        self.default_require_auth = value;
        self
    }

    /// Replace the keyword template. `{model}` and `{permission}` are
    /// substituted at check time.
    pub fn keyword_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Override the keyword permissions satisfying `permission` with an
    /// explicit list of alternatives (any one of them grants).
    pub fn keyword_override(
        mut self,
        permission: Permission,
        keywords: Vec<KeywordPermission>,
    ) -> Self {
        self.keyword_overrides.insert(permission, keywords);
        self
    }

    /// Remove the keyword stage for `permission` entirely: no keyword can
    /// grant it, and the decision falls through to the object or queryset
    /// stage.
    pub fn no_keyword(mut self, permission: Permission) -> Self {
        self.keyword_overrides.insert(permission, Vec::new());
        self
    }

    /// Mark `permission` as open: granted to every actor that passes the
    /// authentication gate, with no keyword and no object check. Used for
    /// endpoints like self-service record creation.
    pub fn open(mut self, permission: Permission) -> Self {
        self.open_permissions.insert(permission);
        self
    }

    /// Enable the object ACL stage for this model's records.
    pub fn with_object_acl(mut self) -> Self {
        self.object_acl = true;
        self
    }

    /// Validate the configuration and produce the handler.
    ///
    /// # Errors
    ///
    /// Fails if the model name is not lowercase ASCII letters or the keyword
    /// template does not render well-formed keyword permissions.
    pub fn build(self) -> Result<PermissionHandler, HandlerError> {
        if self.model.is_empty() || !self.model.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(HandlerError::InvalidModelName(self.model));
        }
        if let Err(source) = render_keyword(
            &self.template,
            &self.model,
            Permission::View.keyword_fragment(),
        ) {
            return Err(HandlerError::InvalidTemplate {
                template: self.template,
                source,
            });
        }

        Ok(PermissionHandler {
            model: self.model,
            template: self.template,
            default_require_auth: self.default_require_auth,
            require_auth: self.require_auth,
            keyword_overrides: self.keyword_overrides,
            open_permissions: self.open_permissions,
            object_acl: self.object_acl,
        })
    }
}
