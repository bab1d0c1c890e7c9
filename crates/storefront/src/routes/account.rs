//! Signed-in shopper pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use lapak_core::DecodedIdentity;

use crate::middleware::{AnySignedIn, Authorized, CustomerOnly};

#[derive(Template, WebTemplate)]
#[template(path = "account/cart.html")]
pub struct CartTemplate {
    pub identity: DecodedIdentity,
}

#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub identity: DecodedIdentity,
}

#[derive(Template, WebTemplate)]
#[template(path = "account/overview.html")]
pub struct OverviewTemplate {
    pub identity: DecodedIdentity,
}

pub async fn cart(auth: Authorized<CustomerOnly>) -> impl IntoResponse {
    CartTemplate {
        identity: auth.identity,
    }
}

pub async fn orders(auth: Authorized<CustomerOnly>) -> impl IntoResponse {
    OrdersTemplate {
        identity: auth.identity,
    }
}

/// Account overview, open to every role.
pub async fn overview(auth: Authorized<AnySignedIn>) -> impl IntoResponse {
    OverviewTemplate {
        identity: auth.identity,
    }
}
