//! Bearer credential type.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// An opaque bearer credential issued by the login endpoint.
///
/// Holding one only means the user is *possibly* authenticated; the payload
/// still has to decode (see [`crate::decode`]). The raw value is wrapped in a
/// [`SecretString`] so it never ends up in logs through `Debug`.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Build a credential from a raw stored value.
    ///
    /// Returns `None` for empty or whitespace-only input: an empty storage
    /// slot is the same as no credential at all. Surrounding whitespace is
    /// trimmed.
    #[must_use]
    pub fn from_stored(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(SecretString::from(trimmed.to_owned())))
    }

    /// Expose the raw bearer string.
    ///
    /// Only call this when the value must leave the process (storage, an
    /// `Authorization` header) or be parsed.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}
