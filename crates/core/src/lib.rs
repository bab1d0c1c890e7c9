//! Lapak Core - shared types and access control.
//!
//! This crate is used by every Lapak component:
//! - `storefront` - customer shop plus store-admin and super-admin dashboards
//! - `cli` - command-line tools for inspecting credentials and store data
//!
//! # Architecture
//!
//! The core crate does no network or database I/O. Anything stateful the
//! guard touches (credential storage, navigation) is passed in as a
//! capability, so the same decision logic runs in the HTTP server, the CLI and
//! in unit tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for credentials, emails, roles and subject ids
//! - [`identity`] - Decoding a bearer credential into a [`DecodedIdentity`]
//! - [`guard`] - Role-based access guard and its mount lifecycle
//! - [`geo`] - Distance ranking for the nearby-store list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod geo;
pub mod guard;
pub mod identity;
pub mod types;

pub use identity::{DecodeError, DecodedIdentity, decode};
pub use types::*;
