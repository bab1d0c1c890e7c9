//! Role-based access guard.
//!
//! A guarded page declares which roles may see it. On mount the guard reads
//! the stored credential and lands in exactly one state:
//!
//! | Stored credential           | State                          | Effect                      |
//! |-----------------------------|--------------------------------|-----------------------------|
//! | none                        | unauthorized, no credential    | navigate to redirect path   |
//! | present, does not decode    | unauthorized, no credential    | clear storage, navigate     |
//! | decodes, role allowed       | authorized                     | render the page             |
//! | decodes, role not allowed   | unauthorized, known role       | render the role's view      |
//!
//! Malformed and missing credentials look the same to the user. The
//! [`SignedOutReason`] in the outcome only feeds logs.

pub mod navigator;
pub mod page;
pub mod store;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::identity::{DecodedIdentity, decode};
use crate::types::{Role, RoleSet};

pub use navigator::{Navigator, RecordingNavigator};
pub use page::{Guarded, Mounted, Page, Rendered, with_auth};
pub use store::{CREDENTIAL_KEY, CredentialStore, MemoryCredentialStore};

/// Where signed-out users are sent when a page does not say otherwise.
pub const DEFAULT_REDIRECT_PATH: &str = "/login";

/// The "not authorized" page shown to a signed-in user with the wrong role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnauthorizedView {
    pub role: Role,
    pub path: String,
}

impl UnauthorizedView {
    fn default_for(role: Role) -> Self {
        Self {
            role,
            path: format!("/not-authorized-{}", role.slug()),
        }
    }
}

/// Role → unauthorized view table, one entry per role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnauthorizedViews {
    customer: UnauthorizedView,
    store_admin: UnauthorizedView,
    super_admin: UnauthorizedView,
}

impl UnauthorizedViews {
    #[must_use]
    pub const fn get(&self, role: Role) -> &UnauthorizedView {
        match role {
            Role::Customer => &self.customer,
            Role::StoreAdmin => &self.store_admin,
            Role::SuperAdmin => &self.super_admin,
        }
    }

    /// Replace the path of one role's view.
    #[must_use]
    pub fn with_path(mut self, role: Role, path: impl Into<String>) -> Self {
        let view = match role {
            Role::Customer => &mut self.customer,
            Role::StoreAdmin => &mut self.store_admin,
            Role::SuperAdmin => &mut self.super_admin,
        };
        view.path = path.into();
        self
    }
}

impl Default for UnauthorizedViews {
    fn default() -> Self {
        Self {
            customer: UnauthorizedView::default_for(Role::Customer),
            store_admin: UnauthorizedView::default_for(Role::StoreAdmin),
            super_admin: UnauthorizedView::default_for(Role::SuperAdmin),
        }
    }
}

/// Per-page guard configuration.
///
/// Defaults to every role allowed and [`DEFAULT_REDIRECT_PATH`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    allowed_roles: RoleSet,
    redirect_path: String,
    views: UnauthorizedViews,
    reject_expired: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            allowed_roles: RoleSet::all(),
            redirect_path: DEFAULT_REDIRECT_PATH.to_owned(),
            views: UnauthorizedViews::default(),
            reject_expired: false,
        }
    }
}

impl GuardConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the page to `roles`. An empty list denies every role.
    #[must_use]
    pub fn allow(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles = roles.into_iter().collect();
        self
    }

    #[must_use]
    pub const fn allow_set(mut self, roles: RoleSet) -> Self {
        self.allowed_roles = roles;
        self
    }

    #[must_use]
    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect_path = path.into();
        self
    }

    #[must_use]
    pub fn views(mut self, views: UnauthorizedViews) -> Self {
        self.views = views;
        self
    }

    /// Treat expired credentials like malformed ones.
    #[must_use]
    pub const fn reject_expired(mut self, reject: bool) -> Self {
        self.reject_expired = reject;
        self
    }

    #[must_use]
    pub const fn allowed_roles(&self) -> RoleSet {
        self.allowed_roles
    }
}

/// Why a user was treated as signed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignedOutReason {
    Missing,
    Malformed,
    Expired,
}

/// Result of one guard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    Authorized { identity: DecodedIdentity },
    Forbidden { role: Role, view: UnauthorizedView },
    SignedOut { reason: SignedOutReason, redirect: String },
}

/// Authorization state of one mounted page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthorizationState {
    /// Check not yet run.
    #[default]
    Loading,
    Authorized(DecodedIdentity),
    UnauthorizedWithRole {
        role: Role,
        view: UnauthorizedView,
    },
    UnauthorizedNoCredential {
        redirect: String,
    },
}

impl From<GuardOutcome> for AuthorizationState {
    fn from(outcome: GuardOutcome) -> Self {
        match outcome {
            GuardOutcome::Authorized { identity } => Self::Authorized(identity),
            GuardOutcome::Forbidden { role, view } => Self::UnauthorizedWithRole { role, view },
            GuardOutcome::SignedOut { redirect, .. } => Self::UnauthorizedNoCredential { redirect },
        }
    }
}

/// Decides page access from the stored credential.
#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    config: GuardConfig,
}

impl AccessGuard {
    #[must_use]
    pub const fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Whether `identity` still counts as signed in, whatever its role.
    ///
    /// Only `false` for an expired identity when expired credentials are rejected.
    #[must_use]
    pub fn accepts(&self, identity: &DecodedIdentity) -> bool {
        self.accepts_at(identity, Utc::now())
    }

    #[must_use]
    pub fn accepts_at(&self, identity: &DecodedIdentity, now: DateTime<Utc>) -> bool {
        !(self.config.reject_expired && identity.is_expired(now))
    }

    /// Run the check against the current time.
    pub fn evaluate<S, N>(&self, store: &mut S, navigator: &mut N) -> GuardOutcome
    where
        S: CredentialStore + ?Sized,
        N: Navigator + ?Sized,
    {
        self.evaluate_at(store, navigator, Utc::now())
    }

    /// Run the check, using `now` for the expiry test.
    ///
    /// Clears `store` when the credential does not decode (or is expired and
    /// the config rejects expired credentials), and pushes the redirect path
    /// on `navigator` whenever the user ends up signed out.
    pub fn evaluate_at<S, N>(
        &self,
        store: &mut S,
        navigator: &mut N,
        now: DateTime<Utc>,
    ) -> GuardOutcome
    where
        S: CredentialStore + ?Sized,
        N: Navigator + ?Sized,
    {
        let Some(credential) = store.get() else {
            return self.sign_out(navigator, SignedOutReason::Missing);
        };

        let identity = match decode(&credential) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding undecodable credential");
                store.clear();
                return self.sign_out(navigator, SignedOutReason::Malformed);
            }
        };

        if !self.accepts_at(&identity, now) {
            tracing::info!(
                subject = %identity.id,
                expired_at = %identity.expires_at,
                "Discarding expired credential"
            );
            store.clear();
            return self.sign_out(navigator, SignedOutReason::Expired);
        }

        if self.config.allowed_roles.contains(identity.role) {
            tracing::debug!(subject = %identity.id, role = %identity.role, "Access granted");
            return GuardOutcome::Authorized { identity };
        }

        let view = self.config.views.get(identity.role).clone();
        tracing::debug!(
            subject = %identity.id,
            role = %identity.role,
            allowed = %self.config.allowed_roles,
            "Access denied for role"
        );
        GuardOutcome::Forbidden {
            role: identity.role,
            view,
        }
    }

    fn sign_out<N>(&self, navigator: &mut N, reason: SignedOutReason) -> GuardOutcome
    where
        N: Navigator + ?Sized,
    {
        let redirect = self.config.redirect_path.clone();
        tracing::debug!(?reason, %redirect, "No usable credential, redirecting");
        navigator.push(&redirect);
        GuardOutcome::SignedOut { reason, redirect }
    }
}
