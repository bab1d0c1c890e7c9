//! Admin dashboards.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use lapak_core::DecodedIdentity;

use crate::middleware::{Authorized, StoreAdminOnly, SuperAdminOnly};

#[derive(Template, WebTemplate)]
#[template(path = "dashboard/store_admin.html")]
pub struct StoreAdminTemplate {
    pub identity: DecodedIdentity,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard/super_admin.html")]
pub struct SuperAdminTemplate {
    pub identity: DecodedIdentity,
}

/// Inventory and discount management for one store.
pub async fn store_admin(auth: Authorized<StoreAdminOnly>) -> impl IntoResponse {
    StoreAdminTemplate {
        identity: auth.identity,
    }
}

/// Marketplace-wide stores, users and revenue.
pub async fn super_admin(auth: Authorized<SuperAdminOnly>) -> impl IntoResponse {
    SuperAdminTemplate {
        identity: auth.identity,
    }
}
