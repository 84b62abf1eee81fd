// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Startup configuration for warden.
//!
//! Defaults merged with an optional TOML file. Configuration is read once
//! at startup and immutable for the process lifetime; in particular the
//! administrator set cannot change without a restart.

pub mod error;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use warden_core::IdentityId;

pub use error::ConfigError;

const DEFAULT_ROSTER_PATH: &str = "roster.json";
const DEFAULT_COOLDOWN_SECS: u64 = 10;

/// Partial configuration as read from a single source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WardenConfigLayer {
	pub admins: Option<Vec<String>>,
	pub roster_path: Option<PathBuf>,
	pub cooldown_secs: Option<u64>,
}

impl WardenConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.admins.is_some() {
			self.admins = other.admins;
		}
		if other.roster_path.is_some() {
			self.roster_path = other.roster_path;
		}
		if other.cooldown_secs.is_some() {
			self.cooldown_secs = other.cooldown_secs;
		}
	}

	pub fn finalize(self) -> Result<WardenConfig, ConfigError> {
		let mut admins = HashSet::new();
		for raw in self.admins.unwrap_or_default() {
			let id = IdentityId::parse(&raw)
				.map_err(|source| ConfigError::InvalidAdminId { value: raw, source })?;
			admins.insert(id);
		}

		Ok(WardenConfig {
			admins,
			roster_path: self
				.roster_path
				.unwrap_or_else(|| PathBuf::from(DEFAULT_ROSTER_PATH)),
			cooldown: Duration::from_secs(
				self.cooldown_secs.unwrap_or(DEFAULT_COOLDOWN_SECS),
			),
		})
	}
}

/// Finalized configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WardenConfig {
	pub admins: HashSet<IdentityId>,
	pub roster_path: PathBuf,
	pub cooldown: Duration,
}

/// Load configuration from a TOML file merged over defaults.
///
/// An absent file is not an error; warden then runs with an empty
/// administrator set, which refuses every privileged command.
pub fn load(path: impl AsRef<Path>) -> Result<WardenConfig, ConfigError> {
	let path = path.as_ref();
	let mut layer = WardenConfigLayer::default();

	if path.exists() {
		debug!(path = %path.display(), "loading config file");
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
			path: path.to_path_buf(),
			source: e,
		})?;
		let file_layer: WardenConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: path.to_path_buf(),
				source: e,
			})?;
		layer.merge(file_layer);
	} else {
		debug!(path = %path.display(), "config file not found, using defaults");
	}

	let config = layer.finalize()?;
	info!(
		admins = config.admins.len(),
		roster_path = %config.roster_path.display(),
		cooldown_secs = config.cooldown.as_secs(),
		"starting new warden session"
	);
	Ok(config)
}
