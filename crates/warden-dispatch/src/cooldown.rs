// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::command::CommandKind;

/// Per-command-kind rate limit.
///
/// Rejects a repeat invocation of the same kind inside the window,
/// bounding queue growth under command spam. Checked before anything is
/// enqueued.
pub struct Cooldown {
	window: Duration,
	last: Mutex<HashMap<CommandKind, Instant>>,
}

impl Cooldown {
	pub fn new(window: Duration) -> Self {
		Self {
			window,
			last: Mutex::new(HashMap::new()),
		}
	}

	/// Record an invocation attempt. `Err` carries the remaining wait.
	pub fn check(&self, kind: CommandKind) -> Result<(), Duration> {
		let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
		let now = Instant::now();

		if let Some(previous) = last.get(&kind) {
			let elapsed = now.duration_since(*previous);
			if elapsed < self.window {
				return Err(self.window - elapsed);
			}
		}

		last.insert(kind, now);
		Ok(())
	}
}
