//! Role-guard extractors.
//!
//! Server-side rendition of the page guard: the session holds the credential
//! slot, a redirect pushed by the guard becomes a `303 See Other`, and a
//! disallowed role gets its "not authorized" page rendered in place.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn inventory(auth: Authorized<StoreAdminOnly>) -> impl IntoResponse {
//!     format!("Hello, {}!", auth.identity.email)
//! }
//! ```

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use lapak_core::guard::{
    CREDENTIAL_KEY, CredentialStore, GuardOutcome, MemoryCredentialStore, Navigator,
    UnauthorizedView,
};
use lapak_core::{Credential, DecodedIdentity, Role, RoleSet, decode};
use tower_sessions::Session;

use crate::error::AppError;
use crate::routes::not_authorized::NotAuthorizedTemplate;
use crate::state::AppState;

// =============================================================================
// Policies
// =============================================================================

/// Allow-list for a family of routes.
pub trait AccessPolicy: Send + Sync + 'static {
    const ALLOWED: RoleSet;
}

/// Any signed-in role.
pub struct AnySignedIn;

/// Shopping pages: cart, orders.
pub struct CustomerOnly;

/// Inventory and discount management.
pub struct StoreAdminOnly;

/// Store, user and revenue management.
pub struct SuperAdminOnly;

impl AccessPolicy for AnySignedIn {
    const ALLOWED: RoleSet = RoleSet::all();
}

impl AccessPolicy for CustomerOnly {
    const ALLOWED: RoleSet = RoleSet::only(Role::Customer);
}

impl AccessPolicy for StoreAdminOnly {
    const ALLOWED: RoleSet = RoleSet::only(Role::StoreAdmin);
}

impl AccessPolicy for SuperAdminOnly {
    const ALLOWED: RoleSet = RoleSet::only(Role::SuperAdmin);
}

// =============================================================================
// Extractors
// =============================================================================

/// Extractor that only succeeds for roles allowed by `P`.
pub struct Authorized<P> {
    pub identity: DecodedIdentity,
    _policy: PhantomData<fn() -> P>,
}

/// Why a guarded request was not let through.
#[derive(Debug)]
pub enum GuardRejection {
    /// No usable credential: send the user to sign in.
    Redirect(String),
    /// Signed in with a role the page does not allow.
    NotAuthorized(UnauthorizedView),
    /// The session layer is missing or failed.
    Error(AppError),
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(path) => Redirect::to(&path).into_response(),
            Self::NotAuthorized(view) => (
                StatusCode::FORBIDDEN,
                NotAuthorizedTemplate::for_role(view.role),
            )
                .into_response(),
            Self::Error(err) => err.into_response(),
        }
    }
}

/// Navigator that captures the guard's redirect for the response.
#[derive(Debug, Default)]
struct PendingRedirect(Option<String>);

impl Navigator for PendingRedirect {
    fn push(&mut self, path: &str) {
        self.0 = Some(path.to_owned());
    }
}

impl<P: AccessPolicy> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| GuardRejection::Error(AppError::Internal("session layer missing".into())))?;

        let mut slot = load_credential(&session).await;
        let mut redirect = PendingRedirect::default();
        let outcome = state.guard(P::ALLOWED).evaluate(&mut slot, &mut redirect);

        if slot.was_cleared() {
            clear_credential(&session)
                .await
                .map_err(|e| GuardRejection::Error(e.into()))?;
        }

        match outcome {
            GuardOutcome::Authorized { identity } => Ok(Self {
                identity,
                _policy: PhantomData,
            }),
            GuardOutcome::Forbidden { view, .. } => Err(GuardRejection::NotAuthorized(view)),
            GuardOutcome::SignedOut { redirect: fallback, reason } => {
                tracing::debug!(path = %parts.uri.path(), ?reason, "Guarded page needs sign-in");
                Err(GuardRejection::Redirect(redirect.0.unwrap_or(fallback)))
            }
        }
    }
}

/// Extractor that decodes the stored credential, if any, without enforcing a role.
///
/// Used for navigation chrome ("signed in as ...") on public pages. A stored
/// credential that does not decode, or that the guard would reject as
/// expired, reads as signed out but is left for the next guarded page to clear.
pub struct CurrentIdentity(pub Option<DecodedIdentity>);

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };
        let guard = state.guard(RoleSet::all());
        let identity = load_credential(session)
            .await
            .get()
            .and_then(|credential| decode(&credential).ok())
            .filter(|identity| guard.accepts(identity));
        Ok(Self(identity))
    }
}

// =============================================================================
// Session helpers
// =============================================================================

/// Copy the session's credential into a per-request slot.
///
/// A session read failure is logged and treated as no credential.
pub async fn load_credential(session: &Session) -> MemoryCredentialStore {
    match session.get::<String>(CREDENTIAL_KEY).await {
        Ok(Some(raw)) => MemoryCredentialStore::with_raw(&raw),
        Ok(None) => MemoryCredentialStore::new(),
        Err(e) => {
            tracing::error!("Failed to read credential from session: {e}");
            MemoryCredentialStore::new()
        }
    }
}

/// Store the credential in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_credential(
    session: &Session,
    credential: &Credential,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(CREDENTIAL_KEY, credential.expose()).await
}

/// Remove the credential from the session (logout, undecodable credential).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_credential(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<String>(CREDENTIAL_KEY).await?;
    Ok(())
}
