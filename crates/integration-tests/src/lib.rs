//! Integration tests for Lapak.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`,
//! so no server or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lapak-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `guard_routes` - Role guard behaviour on storefront pages
//! - `stores_api` - Nearby-store API and middleware headers

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use lapak_core::geo::StoreLocation;
use lapak_core::identity::encode_unsigned;
use lapak_storefront::config::StorefrontConfig;
use lapak_storefront::middleware::SESSION_COOKIE_NAME;
use lapak_storefront::{AppState, router};
use serde_json::json;
use tower::ServiceExt;

/// Far-future expiry (2100-01-01).
pub const FAR_FUTURE: i64 = 4_102_444_800;

/// A storefront router backed by an in-memory session store.
///
/// Clones share the session store, so a cookie from one request works on the next.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(&[], Vec::new())
    }

    /// Build an app with extra configuration variables and a store directory.
    #[must_use]
    pub fn with_env(vars: &[(&str, &str)], stores: Vec<StoreLocation>) -> Self {
        let mut env: HashMap<String, String> = HashMap::from([(
            "STOREFRONT_BASE_URL".to_string(),
            "http://localhost:3000".to_string(),
        )]);
        env.extend(vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));

        let config = StorefrontConfig::from_source(|key| env.get(key).cloned()).unwrap();
        Self {
            router: router(AppState::new(config, stores)),
        }
    }

    /// Send one request.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// `GET path`, with the session cookie if given.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::get(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// `POST /login` with `token`. Returns the response.
    pub async fn post_login(&self, token: &str) -> Response<Body> {
        let request = Request::post("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("token={token}")))
            .unwrap();
        self.send(request).await
    }

    /// Sign in with `token` and return the session cookie to send back.
    pub async fn login(&self, token: &str) -> String {
        let response = self.post_login(token).await;
        session_cookie(&response).unwrap()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Current time as Unix seconds.
#[must_use]
pub fn now_unix() -> i64 {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    i64::try_from(elapsed.as_secs()).unwrap()
}

/// Build an unsigned credential for `role` expiring at `exp`.
#[must_use]
pub fn token_with_expiry(role: &str, exp: i64) -> String {
    encode_unsigned(&json!({
        "id": 7,
        "email": format!("{role}@lapak.example"),
        "role": role,
        "exp": exp,
    }))
}

/// Build an unsigned, far-future credential for `role`.
#[must_use]
pub fn token(role: &str) -> String {
    token_with_expiry(role, FAR_FUTURE)
}

/// The `name=value` pair of the session cookie set by `response`, if any.
#[must_use]
pub fn session_cookie<B>(response: &Response<B>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_string)
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location<B>(response: &Response<B>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Read the whole response body as UTF-8.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
