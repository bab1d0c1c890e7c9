//! Role-specific "not authorized" pages.
//!
//! Guarded routes render these in place (status 403). They are also
//! reachable directly at `/not-authorized-{role}`.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use lapak_core::Role;

use crate::routes::home_path;

#[derive(Debug, Template, WebTemplate)]
#[template(path = "not_authorized.html")]
pub struct NotAuthorizedTemplate {
    pub role: Role,
    pub home: &'static str,
    pub home_label: &'static str,
}

impl NotAuthorizedTemplate {
    #[must_use]
    pub const fn for_role(role: Role) -> Self {
        let home_label = match role {
            Role::Customer => "shop",
            Role::StoreAdmin => "store dashboard",
            Role::SuperAdmin => "marketplace dashboard",
        };
        Self {
            role,
            home: home_path(role),
            home_label,
        }
    }
}

pub async fn customer() -> impl IntoResponse {
    NotAuthorizedTemplate::for_role(Role::Customer)
}

pub async fn store_admin() -> impl IntoResponse {
    NotAuthorizedTemplate::for_role(Role::StoreAdmin)
}

pub async fn super_admin() -> impl IntoResponse {
    NotAuthorizedTemplate::for_role(Role::SuperAdmin)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_role_and_home_link() {
        let html = NotAuthorizedTemplate::for_role(Role::StoreAdmin).render().unwrap();
        assert!(html.contains("Store admin accounts cannot open this page."));
        assert!(html.contains("href=\"/store-admin\""));
    }

    #[test]
    fn test_each_role_links_home() {
        for role in Role::ALL {
            let view = NotAuthorizedTemplate::for_role(role);
            assert_eq!(view.home, home_path(role));
        }
    }
}
