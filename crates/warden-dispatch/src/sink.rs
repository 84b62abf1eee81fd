// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;
use warden_core::IdentityId;

/// Processing state of a command, as shown to the issuing user.
///
/// A transport maps these onto whatever it has: reaction emoji, status
/// replies, structured events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
	Pending,
	Success,
	/// Mixed per-target results: some succeeded, some failed.
	Warning,
	Error,
}

/// Per-command status marker sink, keyed to the originating message by
/// the transport at construction time.
#[async_trait]
pub trait StatusSink: Send + Sync {
	async fn status(&self, status: Status);
}

/// Outbound replies for a single command.
#[async_trait]
pub trait ReplySink: Send + Sync {
	/// Reply in the channel the command came from.
	async fn reply(&self, text: &str);

	/// Deliver a message privately to one identity. This is the only
	/// path credentials ever travel.
	async fn send_private(&self, identity: &IdentityId, text: &str);
}

/// The reporting half of a command: everything a job needs to surface
/// its outcome.
#[derive(Clone)]
pub struct CommandContext {
	pub status: Arc<dyn StatusSink>,
	pub reply: Arc<dyn ReplySink>,
}
