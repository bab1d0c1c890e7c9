//! User roles and role allow-lists.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a [`Role`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// Permission class attached to a user identity.
///
/// Wire names are snake case (`customer`, `store_admin`, `super_admin`), the
/// same strings the backend puts in the credential payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Shops, manages a cart and views orders.
    Customer,
    /// Manages inventory and discounts for one store.
    StoreAdmin,
    /// Manages stores, users and revenue across the marketplace.
    SuperAdmin,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 3] = [Self::Customer, Self::StoreAdmin, Self::SuperAdmin];

    /// Position of this role in [`Role::ALL`]; used to key per-role tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Customer => 0,
            Self::StoreAdmin => 1,
            Self::SuperAdmin => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::StoreAdmin => "store_admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// URL-friendly form (`store-admin`), used in route paths.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::StoreAdmin => "store-admin",
            Self::SuperAdmin => "super-admin",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::StoreAdmin => "Store admin",
            Self::SuperAdmin => "Super admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "store_admin" | "store-admin" => Ok(Self::StoreAdmin),
            "super_admin" | "super-admin" => Ok(Self::SuperAdmin),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

/// A set of roles, used as a page's allow-list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All roles: the allow-list used when a page declares none.
    #[must_use]
    pub const fn all() -> Self {
        Self(0b111)
    }

    #[must_use]
    pub const fn only(role: Role) -> Self {
        Self::empty().with(role)
    }

    #[must_use]
    pub const fn with(self, role: Role) -> Self {
        Self(self.0 | (1 << role.index()))
    }

    #[must_use]
    pub const fn contains(self, role: Role) -> bool {
        self.0 & (1 << role.index()) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |role| self.contains(*role))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Role::as_str).collect();
        f.write_str(&names.join(","))
    }
}
