// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Account lifecycle orchestration.
//!
//! The [`AccountManager`] is the only writer of the roster. Every
//! successful backend call is followed by a roster mutation and a
//! synchronous persist before the operation completes; a persist failure
//! after a committed backend change is surfaced, not hidden.

pub mod error;
pub mod manager;

pub use error::AccountError;
pub use manager::AccountManager;
