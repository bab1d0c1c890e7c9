//! Wrapping a page with the access guard.
//!
//! [`with_auth`] turns any [`Page`] into a [`Guarded`] page that takes the
//! same props. Each mount starts in [`AuthorizationState::Loading`] and runs
//! the check once, on the tick after the first render:
//!
//! ```
//! use lapak_core::guard::{
//!     GuardConfig, MemoryCredentialStore, Page, RecordingNavigator, Rendered, with_auth,
//! };
//!
//! struct Dashboard;
//!
//! impl Page for Dashboard {
//!     type Props = String;
//!     type Output = String;
//!
//!     fn render(&self, props: &String) -> String {
//!         format!("dashboard for {props}")
//!     }
//! }
//!
//! let guarded = with_auth(Dashboard, GuardConfig::default());
//! let mut mounted = guarded.mount();
//! assert_eq!(mounted.render(&"toko".to_string()), Rendered::Loading);
//!
//! let mut store = MemoryCredentialStore::new();
//! let mut nav = RecordingNavigator::new();
//! mounted.resolve(&mut store, &mut nav);
//! assert_eq!(mounted.render(&"toko".to_string()), Rendered::Redirecting("/login".into()));
//! ```

use super::{
    AccessGuard, AuthorizationState, CredentialStore, GuardConfig, Navigator, UnauthorizedView,
};

/// Something that renders from props.
pub trait Page {
    type Props;
    type Output;

    fn render(&self, props: &Self::Props) -> Self::Output;
}

/// What a guarded page shows for its current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<O> {
    Loading,
    Page(O),
    NotAuthorized(UnauthorizedView),
    /// Nothing is shown; a navigation to this path has been pushed.
    Redirecting(String),
}

/// A page wrapped with an access guard.
#[derive(Debug, Clone)]
pub struct Guarded<P> {
    page: P,
    guard: AccessGuard,
}

/// Wrap `page` so it only renders for the roles `config` allows.
pub const fn with_auth<P: Page>(page: P, config: GuardConfig) -> Guarded<P> {
    Guarded {
        page,
        guard: AccessGuard::new(config),
    }
}

impl<P: Page> Guarded<P> {
    /// Start a mount. State starts at `Loading`.
    #[must_use]
    pub fn mount(&self) -> Mounted<'_, P> {
        Mounted {
            guarded: self,
            state: AuthorizationState::Loading,
        }
    }

    #[must_use]
    pub const fn guard(&self) -> &AccessGuard {
        &self.guard
    }
}

impl<P: Page> Page for Guarded<P> {
    type Props = P::Props;
    type Output = Rendered<P::Output>;

    /// Renders the initial, unresolved mount: always `Loading`.
    fn render(&self, props: &Self::Props) -> Self::Output {
        self.mount().render(props)
    }
}

/// One mount of a guarded page. Dropping it discards the state.
#[derive(Debug)]
pub struct Mounted<'a, P> {
    guarded: &'a Guarded<P>,
    state: AuthorizationState,
}

impl<P: Page> Mounted<'_, P> {
    #[must_use]
    pub const fn state(&self) -> &AuthorizationState {
        &self.state
    }

    /// Run the access check. Only the first call on a mount does anything.
    pub fn resolve<S, N>(&mut self, store: &mut S, navigator: &mut N) -> &AuthorizationState
    where
        S: CredentialStore + ?Sized,
        N: Navigator + ?Sized,
    {
        if self.state == AuthorizationState::Loading {
            self.state = self.guarded.guard.evaluate(store, navigator).into();
        }
        &self.state
    }

    /// Render for the current state. The wrapped page is only called once
    /// the mount is authorized.
    pub fn render(&self, props: &P::Props) -> Rendered<P::Output> {
        match &self.state {
            AuthorizationState::Loading => Rendered::Loading,
            AuthorizationState::Authorized(_) => Rendered::Page(self.guarded.page.render(props)),
            AuthorizationState::UnauthorizedWithRole { view, .. } => {
                Rendered::NotAuthorized(view.clone())
            }
            AuthorizationState::UnauthorizedNoCredential { redirect } => {
                Rendered::Redirecting(redirect.clone())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use serde_json::json;

    use super::*;
    use crate::guard::{MemoryCredentialStore, RecordingNavigator};
    use crate::identity::encode_unsigned;
    use crate::types::Role;

    /// Counts renders so tests can prove the page never ran.
    #[derive(Default)]
    struct Inventory {
        renders: Cell<u32>,
    }

    impl Page for Inventory {
        type Props = u32;
        type Output = String;

        fn render(&self, low_stock: &u32) -> String {
            self.renders.set(self.renders.get() + 1);
            format!("{low_stock} items low on stock")
        }
    }

    fn store_for(role: Role) -> MemoryCredentialStore {
        MemoryCredentialStore::with_raw(&encode_unsigned(&json!({
            "id": 3,
            "email": "ops@toko.id",
            "role": role.as_str(),
            "exp": 4_000_000_000_i64,
        })))
    }

    #[test]
    fn test_loading_before_resolve() {
        let guarded = with_auth(Inventory::default(), GuardConfig::default());
        let mounted = guarded.mount();
        assert_eq!(mounted.render(&5), Rendered::Loading);
        assert_eq!(guarded.render(&5), Rendered::Loading);
        assert_eq!(guarded.page.renders.get(), 0);
    }

    #[test]
    fn test_allowed_role_renders_page_with_same_props() {
        let guarded = with_auth(
            Inventory::default(),
            GuardConfig::new().allow([Role::StoreAdmin, Role::SuperAdmin]),
        );
        let mut mounted = guarded.mount();
        let mut store = store_for(Role::StoreAdmin);
        let mut nav = RecordingNavigator::new();

        mounted.resolve(&mut store, &mut nav);

        assert_eq!(mounted.render(&4), Rendered::Page("4 items low on stock".to_string()));
        assert!(nav.pushed().is_empty());
    }

    #[test]
    fn test_disallowed_role_never_renders_page() {
        let guarded = with_auth(Inventory::default(), GuardConfig::new().allow([Role::SuperAdmin]));
        let mut mounted = guarded.mount();
        let mut store = store_for(Role::StoreAdmin);
        let mut nav = RecordingNavigator::new();

        mounted.resolve(&mut store, &mut nav);

        let Rendered::NotAuthorized(view) = mounted.render(&1) else {
            panic!("expected not-authorized view");
        };
        assert_eq!(view.role, Role::StoreAdmin);
        assert_eq!(view.path, "/not-authorized-store-admin");
        assert!(nav.pushed().is_empty());
        assert_eq!(guarded.page.renders.get(), 0);
    }

    #[test]
    fn test_no_credential_redirects_and_never_renders_page() {
        let guarded = with_auth(Inventory::default(), GuardConfig::default());
        let mut mounted = guarded.mount();
        let mut store = MemoryCredentialStore::new();
        let mut nav = RecordingNavigator::new();

        mounted.resolve(&mut store, &mut nav);

        assert_eq!(mounted.render(&1), Rendered::Redirecting("/login".to_string()));
        assert_eq!(nav.current(), Some("/login"));
        assert_eq!(guarded.page.renders.get(), 0);
    }

    #[test]
    fn test_resolve_runs_once_per_mount() {
        let guarded = with_auth(Inventory::default(), GuardConfig::default());
        let mut mounted = guarded.mount();
        let mut store = MemoryCredentialStore::new();
        let mut nav = RecordingNavigator::new();

        mounted.resolve(&mut store, &mut nav);
        mounted.resolve(&mut store, &mut nav);
        assert_eq!(nav.pushed().len(), 1);

        // A fresh mount checks again.
        let mut remount = guarded.mount();
        remount.resolve(&mut store, &mut nav);
        assert_eq!(nav.pushed().len(), 2);
    }

    #[test]
    fn test_resolve_observes_login_between_mounts() {
        let guarded = with_auth(Inventory::default(), GuardConfig::new().allow([Role::Customer]));
        let mut store = MemoryCredentialStore::new();
        let mut nav = RecordingNavigator::new();

        let mut first = guarded.mount();
        first.resolve(&mut store, &mut nav);
        assert!(matches!(
            first.state(),
            AuthorizationState::UnauthorizedNoCredential { .. }
        ));
        drop(first);

        store.set(store_for(Role::Customer).get().unwrap());
        let mut second = guarded.mount();
        second.resolve(&mut store, &mut nav);
        assert!(matches!(second.state(), AuthorizationState::Authorized(_)));
    }
}
