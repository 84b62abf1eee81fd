// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use warden_accounts::{AccountError, AccountManager};
use warden_core::{AccountName, IdentityId};
use warden_jobs::{Lane, LaneExecutor};
use warden_provision::Credentials;

use crate::admin::AdminSet;
use crate::command::{Command, CommandId, CommandKind, Target};
use crate::cooldown::Cooldown;
use crate::error::DispatchError;
use crate::sink::{CommandContext, Status};

/// Last observed acknowledgment state for a command.
#[derive(Clone, Debug)]
pub struct AckRecord {
	pub status: Status,
	pub updated_at: DateTime<Utc>,
}

type AckRegistry = Arc<Mutex<HashMap<CommandId, AckRecord>>>;

/// Upper bound on retained acknowledgment records. Resolved entries are
/// evicted oldest-first once the registry exceeds this; pending entries
/// are never evicted.
const MAX_ACK_RECORDS: usize = 1024;

/// Maps inbound commands to permission checks, job construction, and
/// enqueueing.
///
/// Per command the state machine is `received → authorized? → enqueued →
/// (success | partial-failure | failure)`. The acknowledgment registry
/// always reflects the current state, so a caller can observe any
/// in-flight command.
pub struct Dispatcher {
	manager: Arc<AccountManager>,
	executor: Arc<LaneExecutor<Lane>>,
	admins: AdminSet,
	cooldown: Cooldown,
	acks: AckRegistry,
}

impl Dispatcher {
	pub fn new(
		manager: Arc<AccountManager>,
		executor: Arc<LaneExecutor<Lane>>,
		admins: AdminSet,
		cooldown_window: Duration,
	) -> Self {
		Self {
			manager,
			executor,
			admins,
			cooldown: Cooldown::new(cooldown_window),
			acks: Arc::new(Mutex::new(HashMap::new())),
		}
	}

	/// Validate and enqueue a command. Returns as soon as the job is
	/// queued; outcomes are reported through the command's sinks.
	#[instrument(skip(self, ctx), fields(command = %command.id, kind = %command.kind, issuer = %command.issuer))]
	pub async fn dispatch(
		&self,
		command: Command,
		ctx: CommandContext,
	) -> Result<(), DispatchError> {
		if command.requires_admin() && !self.admins.is_admin(&command.issuer) {
			warn!("unauthorized command refused");
			ctx.reply.reply("You are not allowed to do that.").await;
			ctx.status.status(Status::Error).await;
			record_ack(&self.acks, &command.id, Status::Error);
			return Err(DispatchError::Unauthorized);
		}

		if let Err(remaining) = self.cooldown.check(command.kind) {
			let remaining_secs = remaining.as_secs().max(1);
			ctx.reply
				.reply(&format!("Too fast, try again in {remaining_secs}s."))
				.await;
			ctx.status.status(Status::Error).await;
			record_ack(&self.acks, &command.id, Status::Error);
			return Err(DispatchError::Cooldown { remaining_secs });
		}

		let lane = match command.kind {
			CommandKind::Register | CommandKind::Kill | CommandKind::Password => Lane::Mutate,
			CommandKind::Whois => Lane::Read,
		};

		record_ack(&self.acks, &command.id, Status::Pending);
		ctx.status.status(Status::Pending).await;

		let manager = Arc::clone(&self.manager);
		let acks = Arc::clone(&self.acks);
		let job_ctx = ctx.clone();
		let job_command = command.clone();

		let submitted = self.executor.submit(lane, async move {
			let status = run_command(&manager, &job_command, &job_ctx).await;
			record_ack(&acks, &job_command.id, status);
			job_ctx.status.status(status).await;
			Ok(())
		});

		if let Err(e) = submitted {
			record_ack(&self.acks, &command.id, Status::Error);
			ctx.status.status(Status::Error).await;
			return Err(e.into());
		}

		info!(lane = ?lane, targets = command.targets.len(), "command enqueued");
		Ok(())
	}

	/// Current acknowledgment state for a command, if it was ever seen.
	pub fn ack_state(&self, id: &CommandId) -> Option<AckRecord> {
		self.acks
			.lock()
			.unwrap_or_else(|e| e.into_inner())
			.get(id)
			.cloned()
	}
}

fn record_ack(acks: &AckRegistry, id: &CommandId, status: Status) {
	let mut acks = acks.lock().unwrap_or_else(|e| e.into_inner());
	acks.insert(
		id.clone(),
		AckRecord {
			status,
			updated_at: Utc::now(),
		},
	);
	evict_resolved(&mut acks, MAX_ACK_RECORDS);
}

/// Drop the oldest resolved records until the registry fits `capacity`.
///
/// Pending records always survive: a command still in the queue must stay
/// observable no matter how much resolved history has accumulated.
fn evict_resolved(acks: &mut HashMap<CommandId, AckRecord>, capacity: usize) {
	while acks.len() > capacity {
		let oldest = acks
			.iter()
			.filter(|(_, record)| record.status != Status::Pending)
			.min_by_key(|(_, record)| record.updated_at)
			.map(|(id, _)| id.clone());

		match oldest {
			Some(id) => {
				acks.remove(&id);
			}
			None => break,
		}
	}
}

/// Execute one command invocation, iterating its targets.
///
/// Every per-target fault is converted into a reply here; nothing
/// escapes to the lane.
async fn run_command(manager: &AccountManager, command: &Command, ctx: &CommandContext) -> Status {
	let (ok, failed) = match command.kind {
		CommandKind::Register => run_register(manager, command, ctx).await,
		CommandKind::Kill => run_kill(manager, command, ctx).await,
		CommandKind::Password => run_password(manager, command, ctx).await,
		CommandKind::Whois => run_whois(manager, command, ctx).await,
	};

	match (ok, failed) {
		(_, 0) => Status::Success,
		(0, _) => Status::Error,
		_ => Status::Warning,
	}
}

async fn run_register(
	manager: &AccountManager,
	command: &Command,
	ctx: &CommandContext,
) -> (usize, usize) {
	let mut ok = 0;
	let mut failed = 0;

	if command.targets.is_empty() {
		ctx.reply.reply("No users mentioned.").await;
		return (0, 1);
	}

	for target in &command.targets {
		let identity = match target {
			Target::Identity(identity) => identity,
			_ => {
				ctx.reply.reply("register only accepts user mentions.").await;
				failed += 1;
				continue;
			}
		};

		if let Some(existing) = manager.account_for(identity).await {
			ctx.reply
				.reply(&format!("That user already has an account: {existing}"))
				.await;
			failed += 1;
			continue;
		}

		match provision_for(manager, identity, ctx).await {
			Ok(name) => {
				ctx.reply
					.reply(&format!("Created account: {name}"))
					.await;
				ok += 1;
			}
			Err(e) => {
				warn!(identity = %identity, error = %e, "account creation failed");
				ctx.reply
					.reply(&format!("Could not create an account for {identity}."))
					.await;
				failed += 1;
			}
		}
	}

	(ok, failed)
}

/// Create, bind, and hand over credentials in one step, so a freshly
/// registered user is immediately able to log in.
async fn provision_for(
	manager: &AccountManager,
	identity: &IdentityId,
	ctx: &CommandContext,
) -> Result<AccountName, AccountError> {
	let name = manager.create_account().await?;
	manager.bind_identity(identity, &name).await?;
	let credentials = manager.reset_password(&name).await?;

	ctx.reply
		.send_private(identity, &welcome_message(&name, &credentials))
		.await;

	Ok(name)
}

async fn run_kill(
	manager: &AccountManager,
	command: &Command,
	ctx: &CommandContext,
) -> (usize, usize) {
	let mut ok = 0;
	let mut failed = 0;

	if command.targets.is_empty() {
		ctx.reply.reply("No targets given.").await;
		return (0, 1);
	}

	for target in &command.targets {
		let name = match target {
			Target::Identity(identity) => match manager.account_for(identity).await {
				Some(name) => name,
				None => {
					ctx.reply.reply("That user has no account.").await;
					failed += 1;
					continue;
				}
			},
			Target::Account(name) => name.clone(),
			Target::AllAccounts => {
				ctx.reply.reply("kill does not accept a wildcard.").await;
				failed += 1;
				continue;
			}
		};

		match manager.remove_account(&name).await {
			Ok(()) => {
				ctx.reply.reply(&format!("Removed account: {name}")).await;
				ok += 1;
			}
			Err(e) => {
				warn!(account = %name, error = %e, "account removal failed");
				ctx.reply.reply("Could not remove the account.").await;
				failed += 1;
			}
		}
	}

	(ok, failed)
}

async fn run_password(
	manager: &AccountManager,
	command: &Command,
	ctx: &CommandContext,
) -> (usize, usize) {
	let mut ok = 0;
	let mut failed = 0;

	// No explicit targets means the issuer's own account.
	let targets = if command.targets.is_empty() {
		vec![Target::Identity(command.issuer.clone())]
	} else {
		command.targets.clone()
	};

	for target in &targets {
		let (owner, name) = match target {
			Target::Identity(identity) => match manager.account_for(identity).await {
				Some(name) => (identity.clone(), name),
				None => {
					ctx.reply.reply("That user has no account.").await;
					failed += 1;
					continue;
				}
			},
			Target::Account(name) => match manager.identity_for(name).await {
				Some(owner) => (owner, name.clone()),
				None => {
					// Nobody to deliver the new credentials to.
					ctx.reply
						.reply("That account has no owner to receive credentials.")
						.await;
					failed += 1;
					continue;
				}
			},
			Target::AllAccounts => {
				ctx.reply.reply("password does not accept a wildcard.").await;
				failed += 1;
				continue;
			}
		};

		match manager.reset_password(&name).await {
			Ok(credentials) => {
				ctx.reply
					.send_private(&owner, &reset_message(&name, &credentials))
					.await;
				ctx.reply
					.reply(&format!("New credentials set for: {name}"))
					.await;
				ok += 1;
			}
			Err(e) => {
				warn!(account = %name, error = %e, "password reset failed");
				ctx.reply.reply("Could not reset the password.").await;
				failed += 1;
			}
		}
	}

	(ok, failed)
}

async fn run_whois(
	manager: &AccountManager,
	command: &Command,
	ctx: &CommandContext,
) -> (usize, usize) {
	let mut ok = 0;
	let mut failed = 0;

	let targets = if command.targets.is_empty() {
		vec![Target::Identity(command.issuer.clone())]
	} else {
		command.targets.clone()
	};

	for target in &targets {
		match target {
			Target::Identity(identity) => match manager.account_for(identity).await {
				Some(name) => {
					ctx.reply.reply(name.as_str()).await;
					ok += 1;
				}
				None => {
					ctx.reply
						.reply("That user has no account on the server.")
						.await;
					failed += 1;
				}
			},
			Target::Account(name) => match manager.identity_for(name).await {
				Some(identity) => {
					ctx.reply.reply(identity.as_str()).await;
					ok += 1;
				}
				None => {
					ctx.reply.reply("No such user.").await;
					failed += 1;
				}
			},
			Target::AllAccounts => {
				let accounts = manager.accounts().await;
				if accounts.is_empty() {
					ctx.reply.reply("No accounts provisioned.").await;
				} else {
					let mut lines = Vec::with_capacity(accounts.len());
					for name in &accounts {
						match manager.identity_for(name).await {
							Some(identity) => lines.push(format!("{name}: {identity}")),
							None => lines.push(format!("{name}: unowned")),
						}
					}
					ctx.reply.reply(&lines.join("\n")).await;
				}
				ok += 1;
			}
		}
	}

	(ok, failed)
}

fn welcome_message(account: &AccountName, credentials: &Credentials) -> String {
	format!(
		"An account has been created for you.\nLogin: `{account}`\nFiling password: `{}`\nDatabase password: `{}`",
		credentials.filing.expose(),
		credentials.database.expose()
	)
}

fn reset_message(account: &AccountName, credentials: &Credentials) -> String {
	format!(
		"New credentials for `{account}`.\nFiling password: `{}`\nDatabase password: `{}`",
		credentials.filing.expose(),
		credentials.database.expose()
	)
}
