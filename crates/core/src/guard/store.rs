//! Credential storage capability.

use crate::types::Credential;

/// Storage key the credential lives under (browser storage, server session).
pub const CREDENTIAL_KEY: &str = "token";

/// The single slot holding the bearer credential.
///
/// Login sets it, logout clears it, and the guard clears it when the stored
/// value does not decode.
pub trait CredentialStore {
    fn get(&self) -> Option<Credential>;
    fn set(&mut self, credential: Credential);
    fn clear(&mut self);
}

/// In-memory credential slot.
///
/// Used by the CLI and tests, and by the storefront as the per-request slot
/// it loads from and writes back to the session.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Option<Credential>,
    cleared: bool,
}

impl MemoryCredentialStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: None,
            cleared: false,
        }
    }

    /// A store holding `raw`, or an empty one if `raw` is blank.
    #[must_use]
    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Credential::from_stored(raw),
            cleared: false,
        }
    }

    /// Whether `clear` was called since construction.
    #[must_use]
    pub const fn was_cleared(&self) -> bool {
        self.cleared
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.slot.clone()
    }

    fn set(&mut self, credential: Credential) {
        self.slot = Some(credential);
    }

    fn clear(&mut self) {
        self.slot = None;
        self.cleared = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let mut store = MemoryCredentialStore::new();
        assert!(store.get().is_none());

        store.set(Credential::from_stored("a.b.c").unwrap());
        assert_eq!(store.get().unwrap().expose(), "a.b.c");
        assert!(!store.was_cleared());

        store.clear();
        assert!(store.get().is_none());
        assert!(store.was_cleared());
    }

    #[test]
    fn test_with_raw_blank_is_empty() {
        assert!(MemoryCredentialStore::with_raw("").get().is_none());
    }
}
