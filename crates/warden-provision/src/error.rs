// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Errors reported by the external provisioning backend.
#[derive(Debug, Error)]
pub enum ProvisionError {
	#[error("account not found: {0}")]
	NotFound(String),

	#[error("backend unavailable: {0}")]
	Unavailable(String),

	#[error("backend rejected the operation: {0}")]
	Rejected(String),
}
