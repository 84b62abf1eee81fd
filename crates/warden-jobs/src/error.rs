// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
	/// The executor has shut down; the job was not enqueued.
	#[error("executor is shut down, job rejected")]
	Closed,
}
