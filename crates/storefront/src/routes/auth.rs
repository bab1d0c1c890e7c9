//! Login and logout.
//!
//! The credential itself is issued by the backend's login endpoint; these
//! handlers only move it in and out of the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use lapak_core::{Credential, RoleSet, decode};
use serde::Deserialize;
use tower_sessions::Session;

use crate::middleware::{clear_credential, set_credential};
use crate::routes::home_path;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub token: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
}

fn error_message(code: &str) -> &'static str {
    match code {
        "invalid_token" => "That access token could not be read. Please sign in again.",
        "session" => "We could not start your session. Please try again.",
        _ => "Something went wrong. Please try again.",
    }
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle login form submission.
///
/// Nothing is stored unless the token decodes (and, when expired credentials
/// are rejected, has not expired); the user then lands on their
/// role's home page.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let Some(credential) = Credential::from_stored(&form.token) else {
        return Redirect::to("/login?error=invalid_token").into_response();
    };

    let identity = match decode(&credential) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Login rejected: {e}");
            return Redirect::to("/login?error=invalid_token").into_response();
        }
    };

    if !state.guard(RoleSet::all()).accepts(&identity) {
        tracing::warn!(
            subject = %identity.id,
            expired_at = %identity.expires_at,
            "Login rejected: credential expired"
        );
        return Redirect::to("/login?error=invalid_token").into_response();
    }

    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {e}");
        return Redirect::to("/login?error=session").into_response();
    }

    if let Err(e) = set_credential(&session, &credential).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/login?error=session").into_response();
    }

    tracing::info!(subject = %identity.id, role = %identity.role, "Signed in");
    Redirect::to(home_path(identity.role)).into_response()
}

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_credential(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert!(error_message("invalid_token").contains("could not be read"));
        assert!(error_message("session").contains("session"));
        assert!(error_message("???").starts_with("Something went wrong"));
    }
}
