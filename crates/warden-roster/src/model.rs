// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use warden_core::{AccountName, IdentityId};

/// In-memory roster state.
///
/// Invariant: every account name appearing as a mapping value is also
/// present in `accounts`. The reverse does not hold: `accounts` may carry
/// orphaned entries with no owning identity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
	pub identities: HashMap<IdentityId, AccountName>,
	pub accounts: Vec<AccountName>,
}

impl Roster {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn account_for(&self, identity: &IdentityId) -> Option<&AccountName> {
		self.identities.get(identity)
	}

	/// Reverse lookup: which identity owns this account, if any.
	pub fn identity_for(&self, account: &AccountName) -> Option<&IdentityId> {
		self.identities
			.iter()
			.find(|(_, name)| *name == account)
			.map(|(identity, _)| identity)
	}

	pub fn contains_account(&self, account: &AccountName) -> bool {
		self.accounts.iter().any(|name| name == account)
	}

	/// Record a freshly provisioned account with no owner yet.
	pub fn add_account(&mut self, account: AccountName) {
		if !self.contains_account(&account) {
			self.accounts.push(account);
		}
	}

	/// Bind an identity to an account, upholding the mapping invariant.
	///
	/// Returns `false` (and leaves the roster untouched) if the identity
	/// is already bound.
	pub fn bind(&mut self, identity: IdentityId, account: AccountName) -> bool {
		if self.identities.contains_key(&identity) {
			return false;
		}
		self.add_account(account.clone());
		self.identities.insert(identity, account);
		true
	}

	/// Drop an account and any identity mapping pointing at it.
	///
	/// Returns `false` if the account was not known.
	pub fn remove_account(&mut self, account: &AccountName) -> bool {
		if !self.contains_account(account) {
			return false;
		}
		self.accounts.retain(|name| name != account);
		self.identities.retain(|_, name| name != account);
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn identity(s: &str) -> IdentityId {
		IdentityId::parse(s).unwrap()
	}

	fn account(s: &str) -> AccountName {
		AccountName::parse(s).unwrap()
	}

	#[test]
	fn test_bind_and_lookup() {
		let mut roster = Roster::new();
		assert!(roster.bind(identity("100"), account("s1")));

		assert_eq!(roster.account_for(&identity("100")), Some(&account("s1")));
		assert_eq!(roster.identity_for(&account("s1")), Some(&identity("100")));
	}

	#[test]
	fn test_bind_inserts_account_name() {
		let mut roster = Roster::new();
		roster.bind(identity("100"), account("s1"));

		assert!(roster.contains_account(&account("s1")));
	}

	#[test]
	fn test_double_bind_is_rejected_and_leaves_roster_unchanged() {
		let mut roster = Roster::new();
		roster.bind(identity("100"), account("s1"));
		let before = roster.clone();

		assert!(!roster.bind(identity("100"), account("s2")));
		assert_eq!(roster, before);
	}

	#[test]
	fn test_remove_account_drops_reverse_mapping() {
		let mut roster = Roster::new();
		roster.bind(identity("100"), account("s1"));

		assert!(roster.remove_account(&account("s1")));
		assert_eq!(roster.account_for(&identity("100")), None);
		assert!(!roster.contains_account(&account("s1")));
	}

	#[test]
	fn test_remove_unknown_account_returns_false() {
		let mut roster = Roster::new();
		assert!(!roster.remove_account(&account("s9")));
	}

	#[test]
	fn test_orphaned_accounts_are_permitted() {
		let mut roster = Roster::new();
		roster.add_account(account("s3"));

		assert!(roster.contains_account(&account("s3")));
		assert_eq!(roster.identity_for(&account("s3")), None);
	}

	#[test]
	fn test_add_account_is_idempotent() {
		let mut roster = Roster::new();
		roster.add_account(account("s3"));
		roster.add_account(account("s3"));

		assert_eq!(roster.accounts.len(), 1);
	}
}
