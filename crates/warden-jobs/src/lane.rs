// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

/// The two well-known warden lanes.
///
/// `Mutate` serializes everything that touches the roster or the
/// provisioning backend (register, kill, password). `Read` carries
/// roster-only lookups so they never queue behind a slow mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
	Mutate,
	Read,
}
