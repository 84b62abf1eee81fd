// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared primitives for the warden workspace.
//!
//! This crate provides the identifier newtypes used across all warden
//! crates, plus a redacting [`Secret`] wrapper for credential material.

pub mod id;
pub mod secret;

pub use id::{AccountName, IdentityId, IdentityIdError, NameError};
pub use secret::{Secret, REDACTED};
