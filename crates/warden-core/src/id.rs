// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityIdError {
	#[error("identity id is empty")]
	Empty,

	#[error("identity id contains whitespace: '{0}'")]
	Whitespace(String),
}

#[derive(Debug, Error)]
pub enum NameError {
	#[error("account name is empty")]
	Empty,

	#[error("account name contains invalid character '{found}': '{name}'")]
	InvalidCharacter { name: String, found: char },
}

/// Stable identifier of a chat-platform user.
///
/// Identities come from the external transport and are opaque to warden;
/// the only structure we rely on is that they are non-empty and contain
/// no whitespace, so they can be used as map keys and logged verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
	pub fn parse(s: &str) -> Result<Self, IdentityIdError> {
		if s.is_empty() {
			return Err(IdentityIdError::Empty);
		}
		if s.chars().any(char::is_whitespace) {
			return Err(IdentityIdError::Whitespace(s.to_string()));
		}
		Ok(Self(s.to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for IdentityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for IdentityId {
	type Err = IdentityIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// Name of a provisioned account on the remote server.
///
/// Account names are generated by the provisioning backend (e.g. `s17`)
/// but may also arrive as raw command arguments, so `parse` rejects
/// anything that could be confused with a mention or path component.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountName(String);

impl AccountName {
	pub fn parse(s: &str) -> Result<Self, NameError> {
		if s.is_empty() {
			return Err(NameError::Empty);
		}
		if let Some(found) = s
			.chars()
			.find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '-')
		{
			return Err(NameError::InvalidCharacter {
				name: s.to_string(),
				found,
			});
		}
		Ok(Self(s.to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for AccountName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for AccountName {
	type Err = NameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
