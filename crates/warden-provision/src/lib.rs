// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Capability interface over the external provisioning system.
//!
//! The backend is the source of truth for account existence and
//! credentials. Warden only ever drives it through the three operations
//! below; everything else about the remote system is out of scope.

pub mod backend;
pub mod error;

pub use backend::{Credentials, ProvisioningBackend};
pub use error::ProvisionError;
