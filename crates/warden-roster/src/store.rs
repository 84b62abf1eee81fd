// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::RosterError;
use crate::model::Roster;

#[async_trait]
pub trait RosterStore: Send + Sync {
	/// Load the persisted roster; an absent file yields an empty roster.
	async fn load(&self) -> Result<Roster, RosterError>;

	/// Persist the full roster. The write must be atomic: a crash during
	/// save leaves either the previous or the new roster on disk, never a
	/// truncated one.
	async fn save(&self, roster: &Roster) -> Result<(), RosterError>;
}

/// Roster persisted as a single JSON file, replaced wholesale on save.
pub struct JsonRosterStore {
	path: PathBuf,
}

impl JsonRosterStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	fn tmp_path(&self) -> PathBuf {
		let mut tmp = self.path.as_os_str().to_owned();
		tmp.push(".tmp");
		PathBuf::from(tmp)
	}
}

#[async_trait]
impl RosterStore for JsonRosterStore {
	async fn load(&self) -> Result<Roster, RosterError> {
		if !self.path.exists() {
			info!(path = %self.path.display(), "no roster file, starting empty");
			return Ok(Roster::new());
		}

		let contents = tokio::fs::read_to_string(&self.path).await?;
		let roster: Roster = serde_json::from_str(&contents)?;

		debug!(
				path = %self.path.display(),
				identities = roster.identities.len(),
				accounts = roster.accounts.len(),
				"loaded roster from disk"
		);

		Ok(roster)
	}

	async fn save(&self, roster: &Roster) -> Result<(), RosterError> {
		if let Some(parent) = self.path.parent() {
			if !parent.as_os_str().is_empty() {
				tokio::fs::create_dir_all(parent).await?;
			}
		}

		let tmp_path = self.tmp_path();
		let json = serde_json::to_string_pretty(roster)?;

		// Temp file lives in the same directory so the rename stays on one
		// filesystem and is atomic.
		tokio::fs::write(&tmp_path, &json).await?;
		tokio::fs::rename(&tmp_path, &self.path).await?;

		debug!(
				path = %self.path.display(),
				identities = roster.identities.len(),
				accounts = roster.accounts.len(),
				"saved roster to disk"
		);

		Ok(())
	}
}
