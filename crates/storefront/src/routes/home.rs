//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use lapak_core::DecodedIdentity;

use crate::middleware::CurrentIdentity;

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub identity: Option<DecodedIdentity>,
}

/// Public landing page; shows who is signed in, if anyone.
pub async fn index(CurrentIdentity(identity): CurrentIdentity) -> impl IntoResponse {
    HomeTemplate { identity }
}
