//! Core types for Lapak.
//!
//! Type-safe wrappers for the values that flow through authentication.

pub mod credential;
pub mod email;
pub mod role;
pub mod subject;

pub use credential::Credential;
pub use email::{Email, EmailError};
pub use role::{Role, RoleParseError, RoleSet};
pub use subject::SubjectId;
