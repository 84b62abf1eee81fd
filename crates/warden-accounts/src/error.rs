// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;
use warden_core::AccountName;
use warden_provision::ProvisionError;
use warden_roster::RosterError;

#[derive(Debug, Error)]
pub enum AccountError {
	/// The identity is already bound to an account.
	#[error("identity already has an account: {0}")]
	AlreadyExists(AccountName),

	#[error("account not found: {0}")]
	NotFound(String),

	/// The provisioning backend failed; nothing was mutated locally.
	#[error("provisioning backend failed: {0}")]
	Backend(#[source] ProvisionError),

	/// The roster write failed after a committed backend change. Backend
	/// and roster now disagree; manual reconciliation is required.
	#[error("roster persistence failed after a committed backend change: {0}")]
	Persistence(#[source] RosterError),
}
