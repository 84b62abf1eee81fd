// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;
use warden_jobs::JobError;

#[derive(Debug, Error)]
pub enum DispatchError {
	/// The issuing identity lacks the required privilege. Terminal: no
	/// job was enqueued and no backend call was made.
	#[error("issuer is not an administrator")]
	Unauthorized,

	/// The command kind is on cooldown; the invocation was rejected
	/// before reaching the queue.
	#[error("command on cooldown, retry in {remaining_secs}s")]
	Cooldown { remaining_secs: u64 },

	#[error(transparent)]
	Queue(#[from] JobError),
}
