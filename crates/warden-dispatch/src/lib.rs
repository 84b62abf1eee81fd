// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Command dispatch: permission checks, cooldowns, job construction, and
//! per-command acknowledgment state.
//!
//! The dispatcher is the seam between the chat transport and the account
//! core. Inbound commands arrive with their targets already resolved by
//! the transport (mentions, role expansions, raw account names); the
//! dispatcher authorizes the issuer, builds one job per invocation, and
//! reports per-target outcomes through the transport-provided sinks.

pub mod admin;
pub mod command;
pub mod cooldown;
pub mod dispatcher;
pub mod error;
pub mod sink;

pub use admin::AdminSet;
pub use command::{Command, CommandId, CommandKind, Target};
pub use cooldown::Cooldown;
pub use dispatcher::{AckRecord, Dispatcher};
pub use error::DispatchError;
pub use sink::{CommandContext, ReplySink, Status, StatusSink};
