// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;

use zeroize::Zeroize;

/// Placeholder emitted wherever a secret would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// Wrapper for credential material that must never reach a log line.
///
/// `Debug` and `Display` both render [`REDACTED`]; the underlying value is
/// only reachable through [`Secret::expose`] and is zeroized on drop.
/// Secrets are deliberately not serializable; the roster never stores
/// them and nothing else should either.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
	pub fn new(value: String) -> Self {
		Self(value)
	}

	/// Access the underlying secret value.
	///
	/// Call sites are the audit surface for secret handling; keep them
	/// limited to the point of delivery.
	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for Secret {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl fmt::Display for Secret {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl Drop for Secret {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}

impl From<String> for Secret {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for Secret {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_debug_redacts() {
		let secret = Secret::from("hunter2");
		assert_eq!(format!("{secret:?}"), REDACTED);
	}

	#[test]
	fn test_display_redacts() {
		let secret = Secret::from("hunter2");
		assert_eq!(format!("{secret}"), REDACTED);
	}

	#[test]
	fn test_expose_returns_value() {
		let secret = Secret::from("hunter2");
		assert_eq!(secret.expose(), "hunter2");
	}
}
