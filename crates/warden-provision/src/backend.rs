// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use warden_core::{AccountName, Secret};

use crate::error::ProvisionError;

/// Freshly generated credential pair for an account.
///
/// Generated by the backend on create/reset, delivered to the owning
/// identity exactly once, and never persisted anywhere in warden.
#[derive(Clone, Debug)]
pub struct Credentials {
	/// Password for the filing-system share.
	pub filing: Secret,
	/// Password for the database login.
	pub database: Secret,
}

/// The three-operation contract surface of the external provisioning
/// system.
#[async_trait]
pub trait ProvisioningBackend: Send + Sync {
	/// Provision a new account with a backend-generated unique name.
	async fn create(&self) -> Result<AccountName, ProvisionError>;

	/// Deprovision an existing account and all of its data.
	async fn remove(&self, account: &AccountName) -> Result<(), ProvisionError>;

	/// Regenerate both credentials for an existing account.
	async fn reset_password(&self, account: &AccountName) -> Result<Credentials, ProvisionError>;
}
