// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, instrument};
use warden_core::{AccountName, IdentityId};
use warden_provision::{Credentials, ProvisionError, ProvisioningBackend};
use warden_roster::{Roster, RosterStore};

use crate::error::AccountError;

/// Orchestrates the provisioning backend and the roster.
///
/// All mutating methods are expected to run on the mutate lane, which is
/// what serializes them; the `RwLock` only publishes committed snapshots
/// to lookups running on the read lane. A lookup may observe the roster
/// just before or just after a concurrent mutation commits.
pub struct AccountManager {
	backend: Arc<dyn ProvisioningBackend>,
	store: Arc<dyn RosterStore>,
	roster: Arc<RwLock<Roster>>,
}

impl AccountManager {
	pub fn new(
		backend: Arc<dyn ProvisioningBackend>,
		store: Arc<dyn RosterStore>,
		roster: Roster,
	) -> Self {
		Self {
			backend,
			store,
			roster: Arc::new(RwLock::new(roster)),
		}
	}

	/// Construct a manager with the roster loaded from the store.
	pub async fn load(
		backend: Arc<dyn ProvisioningBackend>,
		store: Arc<dyn RosterStore>,
	) -> Result<Self, warden_roster::RosterError> {
		let roster = store.load().await?;
		Ok(Self::new(backend, store, roster))
	}

	/// Provision a fresh account with no owner yet.
	///
	/// Identity binding is a separate step because one command may create
	/// accounts for several identities.
	#[instrument(skip(self))]
	pub async fn create_account(&self) -> Result<AccountName, AccountError> {
		let name = self.backend.create().await.map_err(map_backend)?;

		let snapshot = {
			let mut roster = self.roster.write().await;
			roster.add_account(name.clone());
			roster.clone()
		};
		self.persist(&snapshot).await?;

		info!(account = %name, "created account");
		Ok(name)
	}

	/// Bind an identity to an account and persist the mapping.
	#[instrument(skip(self))]
	pub async fn bind_identity(
		&self,
		identity: &IdentityId,
		account: &AccountName,
	) -> Result<(), AccountError> {
		let snapshot = {
			let mut roster = self.roster.write().await;
			if let Some(existing) = roster.account_for(identity) {
				return Err(AccountError::AlreadyExists(existing.clone()));
			}
			roster.bind(identity.clone(), account.clone());
			roster.clone()
		};
		self.persist(&snapshot).await?;

		info!(identity = %identity, account = %account, "bound identity to account");
		Ok(())
	}

	/// Deprovision an account and drop any identity mapping pointing at it.
	#[instrument(skip(self))]
	pub async fn remove_account(&self, account: &AccountName) -> Result<(), AccountError> {
		self.backend.remove(account).await.map_err(map_backend)?;

		let snapshot = {
			let mut roster = self.roster.write().await;
			roster.remove_account(account);
			roster.clone()
		};
		self.persist(&snapshot).await?;

		info!(account = %account, "removed account");
		Ok(())
	}

	/// Regenerate both credentials for an existing account.
	///
	/// The returned secrets are never stored; the caller must deliver
	/// them to the owning identity exactly once.
	#[instrument(skip(self))]
	pub async fn reset_password(&self, account: &AccountName) -> Result<Credentials, AccountError> {
		let credentials = self
			.backend
			.reset_password(account)
			.await
			.map_err(map_backend)?;

		info!(account = %account, "reset account credentials");
		Ok(credentials)
	}

	/// Roster-only lookup: which account does this identity own.
	pub async fn account_for(&self, identity: &IdentityId) -> Option<AccountName> {
		self.roster.read().await.account_for(identity).cloned()
	}

	/// Roster-only reverse lookup: which identity owns this account.
	pub async fn identity_for(&self, account: &AccountName) -> Option<IdentityId> {
		self.roster.read().await.identity_for(account).cloned()
	}

	/// Roster-only enumeration of all known account names.
	pub async fn accounts(&self) -> Vec<AccountName> {
		self.roster.read().await.accounts.clone()
	}

	async fn persist(&self, roster: &Roster) -> Result<(), AccountError> {
		self.store.save(roster).await.map_err(|e| {
			// Backend and roster now disagree; this needs a human.
			error!(
					error = %e,
					"roster persist failed after a committed backend change"
			);
			AccountError::Persistence(e)
		})
	}
}

fn map_backend(error: ProvisionError) -> AccountError {
	match error {
		ProvisionError::NotFound(name) => AccountError::NotFound(name),
		other => AccountError::Backend(other),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::sync::Mutex;
	use warden_core::Secret;
	use warden_roster::RosterError;

	/// Backend that hands out sequential account names.
	struct MockBackend {
		counter: AtomicU32,
		calls: AtomicU32,
		fail_with: Option<fn() -> ProvisionError>,
	}

	impl MockBackend {
		fn new() -> Self {
			Self {
				counter: AtomicU32::new(0),
				calls: AtomicU32::new(0),
				fail_with: None,
			}
		}

		fn failing(fail_with: fn() -> ProvisionError) -> Self {
			Self {
				counter: AtomicU32::new(0),
				calls: AtomicU32::new(0),
				fail_with: Some(fail_with),
			}
		}

		fn call_count(&self) -> u32 {
			self.calls.load(Ordering::SeqCst)
		}
	}

	#[async_trait]
	impl ProvisioningBackend for MockBackend {
		async fn create(&self) -> Result<AccountName, ProvisionError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if let Some(fail) = self.fail_with {
				return Err(fail());
			}
			let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
			Ok(AccountName::parse(&format!("s{n}")).unwrap())
		}

		async fn remove(&self, _account: &AccountName) -> Result<(), ProvisionError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if let Some(fail) = self.fail_with {
				return Err(fail());
			}
			Ok(())
		}

		async fn reset_password(
			&self,
			_account: &AccountName,
		) -> Result<Credentials, ProvisionError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if let Some(fail) = self.fail_with {
				return Err(fail());
			}
			Ok(Credentials {
				filing: Secret::from("filing-pw"),
				database: Secret::from("database-pw"),
			})
		}
	}

	/// Store that records every save.
	struct RecordingStore {
		saved: Mutex<Vec<Roster>>,
		fail_saves: bool,
	}

	impl RecordingStore {
		fn new() -> Self {
			Self {
				saved: Mutex::new(Vec::new()),
				fail_saves: false,
			}
		}

		fn failing() -> Self {
			Self {
				saved: Mutex::new(Vec::new()),
				fail_saves: true,
			}
		}

		fn save_count(&self) -> usize {
			self.saved.lock().unwrap().len()
		}
	}

	#[async_trait]
	impl RosterStore for RecordingStore {
		async fn load(&self) -> Result<Roster, RosterError> {
			Ok(self
				.saved
				.lock()
				.unwrap()
				.last()
				.cloned()
				.unwrap_or_default())
		}

		async fn save(&self, roster: &Roster) -> Result<(), RosterError> {
			if self.fail_saves {
				return Err(RosterError::Io(std::io::Error::new(
					std::io::ErrorKind::Other,
					"disk full",
				)));
			}
			self.saved.lock().unwrap().push(roster.clone());
			Ok(())
		}
	}

	fn identity(s: &str) -> IdentityId {
		IdentityId::parse(s).unwrap()
	}

	fn manager_with(
		backend: Arc<MockBackend>,
		store: Arc<RecordingStore>,
	) -> AccountManager {
		AccountManager::new(backend, store, Roster::new())
	}

	#[tokio::test]
	async fn test_create_then_bind_round_trips_through_lookups() {
		let backend = Arc::new(MockBackend::new());
		let store = Arc::new(RecordingStore::new());
		let manager = manager_with(backend, Arc::clone(&store));

		let name = manager.create_account().await.unwrap();
		manager.bind_identity(&identity("100"), &name).await.unwrap();

		assert_eq!(manager.account_for(&identity("100")).await, Some(name.clone()));
		assert_eq!(manager.identity_for(&name).await, Some(identity("100")));
	}

	#[tokio::test]
	async fn test_create_persists_the_roster() {
		let backend = Arc::new(MockBackend::new());
		let store = Arc::new(RecordingStore::new());
		let manager = manager_with(backend, Arc::clone(&store));

		let name = manager.create_account().await.unwrap();

		assert_eq!(store.save_count(), 1);
		let persisted = store.load().await.unwrap();
		assert!(persisted.contains_account(&name));
	}

	#[tokio::test]
	async fn test_double_bind_yields_already_exists_and_leaves_roster_unchanged() {
		let backend = Arc::new(MockBackend::new());
		let store = Arc::new(RecordingStore::new());
		let manager = manager_with(backend, Arc::clone(&store));

		let first = manager.create_account().await.unwrap();
		let second = manager.create_account().await.unwrap();
		manager.bind_identity(&identity("100"), &first).await.unwrap();
		let saves_before = store.save_count();

		let result = manager.bind_identity(&identity("100"), &second).await;

		match result {
			Err(AccountError::AlreadyExists(existing)) => assert_eq!(existing, first),
			other => panic!("expected AlreadyExists, got: {other:?}"),
		}
		assert_eq!(manager.account_for(&identity("100")).await, Some(first));
		// The rejected attempt must not have touched the store.
		assert_eq!(store.save_count(), saves_before);
	}

	#[tokio::test]
	async fn test_remove_account_unbinds_identity() {
		let backend = Arc::new(MockBackend::new());
		let store = Arc::new(RecordingStore::new());
		let manager = manager_with(backend, Arc::clone(&store));

		let name = manager.create_account().await.unwrap();
		manager.bind_identity(&identity("100"), &name).await.unwrap();

		manager.remove_account(&name).await.unwrap();

		assert_eq!(manager.account_for(&identity("100")).await, None);
		assert!(!manager.accounts().await.contains(&name));
	}

	#[tokio::test]
	async fn test_remove_unknown_account_maps_backend_not_found() {
		let backend = Arc::new(MockBackend::failing(|| {
			ProvisionError::NotFound("s99".to_string())
		}));
		let store = Arc::new(RecordingStore::new());
		let manager = manager_with(backend, Arc::clone(&store));

		let result = manager
			.remove_account(&AccountName::parse("s99").unwrap())
			.await;

		assert!(matches!(result, Err(AccountError::NotFound(_))));
		assert_eq!(store.save_count(), 0);
	}

	#[tokio::test]
	async fn test_reset_password_failure_mutates_nothing() {
		let backend = Arc::new(MockBackend::failing(|| {
			ProvisionError::Unavailable("connection refused".to_string())
		}));
		let store = Arc::new(RecordingStore::new());
		let manager = manager_with(Arc::clone(&backend), Arc::clone(&store));

		let result = manager
			.reset_password(&AccountName::parse("s1").unwrap())
			.await;

		assert!(matches!(result, Err(AccountError::Backend(_))));
		assert_eq!(store.save_count(), 0);
	}

	#[tokio::test]
	async fn test_reset_password_returns_fresh_credentials() {
		let backend = Arc::new(MockBackend::new());
		let store = Arc::new(RecordingStore::new());
		let manager = manager_with(backend, Arc::clone(&store));

		let name = manager.create_account().await.unwrap();
		let credentials = manager.reset_password(&name).await.unwrap();

		assert_eq!(credentials.filing.expose(), "filing-pw");
		assert_eq!(credentials.database.expose(), "database-pw");
		// Reset never persists anything.
		assert_eq!(store.save_count(), 1);
	}

	#[tokio::test]
	async fn test_create_surfaces_persistence_failure() {
		let backend = Arc::new(MockBackend::new());
		let store = Arc::new(RecordingStore::failing());
		let manager = manager_with(Arc::clone(&backend), store);

		let result = manager.create_account().await;

		assert!(matches!(result, Err(AccountError::Persistence(_))));
		// The backend-side effect already happened.
		assert_eq!(backend.call_count(), 1);
	}

	#[tokio::test]
	async fn test_backend_failure_leaves_roster_untouched() {
		let backend = Arc::new(MockBackend::failing(|| {
			ProvisionError::Rejected("quota exceeded".to_string())
		}));
		let store = Arc::new(RecordingStore::new());
		let manager = manager_with(backend, Arc::clone(&store));

		let result = manager.create_account().await;

		assert!(matches!(result, Err(AccountError::Backend(_))));
		assert!(manager.accounts().await.is_empty());
		assert_eq!(store.save_count(), 0);
	}
}
