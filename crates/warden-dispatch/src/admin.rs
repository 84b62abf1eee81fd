// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::HashSet;

use warden_core::IdentityId;

/// The configured set of administrator identities.
///
/// Loaded once at startup and immutable for the process lifetime.
#[derive(Clone, Debug, Default)]
pub struct AdminSet {
	ids: HashSet<IdentityId>,
}

impl AdminSet {
	pub fn new(ids: impl IntoIterator<Item = IdentityId>) -> Self {
		Self {
			ids: ids.into_iter().collect(),
		}
	}

	pub fn is_admin(&self, identity: &IdentityId) -> bool {
		self.ids.contains(identity)
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_membership() {
		let admins = AdminSet::new([IdentityId::parse("100").unwrap()]);

		assert!(admins.is_admin(&IdentityId::parse("100").unwrap()));
		assert!(!admins.is_admin(&IdentityId::parse("200").unwrap()));
	}

	#[test]
	fn test_empty_set_grants_nothing() {
		let admins = AdminSet::default();
		assert!(admins.is_empty());
		assert!(!admins.is_admin(&IdentityId::parse("100").unwrap()));
	}
}
