// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Durable roster mapping chat identities to provisioned accounts.
//!
//! The roster is a cache of backend state: the provisioning backend is the
//! source of truth for account existence, the roster remembers which chat
//! identity owns which account plus the full list of known account names.
//! Orphaned accounts (no identity mapping) are permitted.

pub mod error;
pub mod model;
pub mod store;

pub use error::RosterError;
pub use model::Roster;
pub use store::{JsonRosterStore, RosterStore};
