// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;

use warden_core::{AccountName, IdentityId};

/// Identifier of the originating chat message, used to key acknowledgment
/// state. Opaque to warden.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandId(String);

impl CommandId {
	pub fn new(s: impl Into<String>) -> Self {
		Self(s.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CommandId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
	/// Create accounts for the targeted identities.
	Register,
	/// Remove accounts, targeted by identity or by account name.
	Kill,
	/// Reset credentials; empty targets means the issuer's own account.
	Password,
	/// Resolve identity ↔ account in either direction; empty targets
	/// means the issuer's own binding.
	Whois,
}

impl fmt::Display for CommandKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Register => "register",
			Self::Kill => "kill",
			Self::Password => "password",
			Self::Whois => "whois",
		};
		f.write_str(name)
	}
}

/// A single resolved target of a command.
///
/// The transport resolves mentions and role expansions into `Identity`
/// targets and bare arguments into `Account` targets before dispatch.
/// `AllAccounts` is the enumeration wildcard, honored by `whois` only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
	Identity(IdentityId),
	Account(AccountName),
	AllAccounts,
}

/// An inbound command with its targets already resolved.
#[derive(Clone, Debug)]
pub struct Command {
	pub id: CommandId,
	pub issuer: IdentityId,
	pub kind: CommandKind,
	pub targets: Vec<Target>,
}

impl Command {
	/// Whether this invocation needs administrator privilege.
	///
	/// Account creation and removal always do. Lookups and password
	/// resets are privileged only when aimed at someone other than the
	/// issuer.
	pub fn requires_admin(&self) -> bool {
		match self.kind {
			CommandKind::Register | CommandKind::Kill => true,
			CommandKind::Password | CommandKind::Whois => self
				.targets
				.iter()
				.any(|target| !matches!(target, Target::Identity(id) if *id == self.issuer)),
		}
	}
}
