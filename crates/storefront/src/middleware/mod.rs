//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded into the request span)
//! 4. Security headers
//! 5. Session layer (tower-sessions, holds the credential slot)
//!
//! Role checks are extractors ([`Authorized`]) rather than layers so every
//! route states its own allow-list.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AccessPolicy, AnySignedIn, Authorized, CurrentIdentity, CustomerOnly, GuardRejection,
    StoreAdminOnly, SuperAdminOnly, clear_credential, load_credential, set_credential,
};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
