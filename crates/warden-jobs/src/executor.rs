// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::JobError;

/// Error type a job may resolve to; the executor logs it and moves on.
pub type JobFault = Box<dyn std::error::Error + Send + Sync + 'static>;

type Job = BoxFuture<'static, Result<(), JobFault>>;

struct Inner<K> {
	lanes: HashMap<K, mpsc::UnboundedSender<Job>>,
	handles: Vec<JoinHandle<()>>,
	closed: bool,
}

/// Serialized executor with one FIFO worker per lane key.
///
/// `submit` never blocks on job execution; it hands the job to the lane's
/// worker and returns. Lane workers are spawned lazily on first submit.
pub struct LaneExecutor<K> {
	inner: Mutex<Inner<K>>,
}

impl<K> LaneExecutor<K>
where
	K: Eq + Hash + Copy + Debug + Send + 'static,
{
	pub fn new() -> Self {
		Self {
			inner: Mutex::new(Inner {
				lanes: HashMap::new(),
				handles: Vec::new(),
				closed: false,
			}),
		}
	}

	/// Enqueue a job on the given lane.
	///
	/// Fails with [`JobError::Closed`] once the executor has shut down;
	/// a job is never silently dropped.
	pub fn submit<F>(&self, lane: K, job: F) -> Result<(), JobError>
	where
		F: Future<Output = Result<(), JobFault>> + Send + 'static,
	{
		let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

		if inner.closed {
			warn!(lane = ?lane, "job submitted after shutdown");
			return Err(JobError::Closed);
		}

		let sender = match inner.lanes.get(&lane) {
			Some(sender) => sender.clone(),
			None => {
				let (tx, rx) = mpsc::unbounded_channel();
				let handle = tokio::spawn(worker_loop(lane, rx));
				inner.lanes.insert(lane, tx.clone());
				inner.handles.push(handle);
				debug!(lane = ?lane, "lane worker started");
				tx
			}
		};

		sender
			.send(Box::pin(job))
			.map_err(|_| JobError::Closed)
	}

	/// Stop accepting new jobs, drain everything already queued, and join
	/// the lane workers.
	pub async fn shutdown(&self) {
		let (lanes, handles) = {
			let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
			inner.closed = true;
			(
				std::mem::take(&mut inner.lanes),
				std::mem::take(&mut inner.handles),
			)
		};

		// Dropping the senders lets each worker drain its backlog and exit.
		drop(lanes);

		for handle in handles {
			let _ = handle.await;
		}

		info!("lane executor shut down");
	}
}

impl<K> Default for LaneExecutor<K>
where
	K: Eq + Hash + Copy + Debug + Send + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}

async fn worker_loop<K: Debug>(lane: K, mut rx: mpsc::UnboundedReceiver<Job>) {
	while let Some(job) = rx.recv().await {
		// Each job runs in its own task so a panic is contained by the
		// JoinHandle instead of taking the worker down.
		match tokio::spawn(job).await {
			Ok(Ok(())) => {}
			Ok(Err(fault)) => {
				warn!(lane = ?lane, error = %fault, "job failed");
			}
			Err(join_error) => {
				error!(lane = ?lane, error = %join_error, "job panicked");
			}
		}
	}

	debug!(lane = ?lane, "lane drained, worker exiting");
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lane::Lane;
	use std::sync::Arc;
	use std::time::{Duration, Instant};
	use tokio::sync::oneshot;

	#[tokio::test(flavor = "multi_thread")]
	async fn test_mutate_lane_runs_jobs_in_order_without_overlap() {
		let executor = LaneExecutor::new();
		let spans: Arc<Mutex<Vec<(usize, Instant, Instant)>>> = Arc::new(Mutex::new(Vec::new()));

		for i in 0..5 {
			let spans = Arc::clone(&spans);
			executor
				.submit(Lane::Mutate, async move {
					let start = Instant::now();
					tokio::time::sleep(Duration::from_millis(10)).await;
					spans.lock().unwrap().push((i, start, Instant::now()));
					Ok(())
				})
				.unwrap();
		}

		executor.shutdown().await;

		let spans = spans.lock().unwrap();
		assert_eq!(spans.len(), 5);
		for (i, window) in spans.windows(2).enumerate() {
			let (a, _, a_end) = window[0];
			let (b, b_start, _) = window[1];
			assert_eq!(a, i);
			assert_eq!(b, i + 1);
			assert!(a_end <= b_start, "jobs {a} and {b} overlapped");
		}
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_read_lane_does_not_wait_for_mutate_lane() {
		let executor = LaneExecutor::new();
		let (release_tx, release_rx) = oneshot::channel::<()>();
		let (read_done_tx, read_done_rx) = oneshot::channel::<()>();

		executor
			.submit(Lane::Mutate, async move {
				release_rx.await.ok();
				Ok(())
			})
			.unwrap();

		executor
			.submit(Lane::Read, async move {
				read_done_tx.send(()).ok();
				Ok(())
			})
			.unwrap();

		// The read job must finish while the mutate lane is still blocked.
		tokio::time::timeout(Duration::from_secs(1), read_done_rx)
			.await
			.expect("read lane stalled behind mutate lane")
			.unwrap();

		release_tx.send(()).unwrap();
		executor.shutdown().await;
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_submit_after_shutdown_fails_loudly() {
		let executor: LaneExecutor<Lane> = LaneExecutor::new();
		executor.shutdown().await;

		let result = executor.submit(Lane::Mutate, async { Ok(()) });
		assert!(matches!(result, Err(JobError::Closed)));
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_shutdown_drains_queued_jobs() {
		let executor = LaneExecutor::new();
		let counter = Arc::new(Mutex::new(0u32));

		for _ in 0..10 {
			let counter = Arc::clone(&counter);
			executor
				.submit(Lane::Mutate, async move {
					*counter.lock().unwrap() += 1;
					Ok(())
				})
				.unwrap();
		}

		executor.shutdown().await;
		assert_eq!(*counter.lock().unwrap(), 10);
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_failed_job_does_not_stall_the_lane() {
		let executor = LaneExecutor::new();
		let (done_tx, done_rx) = oneshot::channel::<()>();

		executor
			.submit(Lane::Mutate, async {
				Err::<(), JobFault>("backend exploded".into())
			})
			.unwrap();
		executor
			.submit(Lane::Mutate, async move {
				done_tx.send(()).ok();
				Ok(())
			})
			.unwrap();

		tokio::time::timeout(Duration::from_secs(1), done_rx)
			.await
			.expect("lane stalled after failed job")
			.unwrap();

		executor.shutdown().await;
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn test_panicking_job_does_not_kill_the_worker() {
		let executor = LaneExecutor::new();
		let (done_tx, done_rx) = oneshot::channel::<()>();

		executor
			.submit(Lane::Mutate, async { panic!("job blew up") })
			.unwrap();
		executor
			.submit(Lane::Mutate, async move {
				done_tx.send(()).ok();
				Ok(())
			})
			.unwrap();

		tokio::time::timeout(Duration::from_secs(1), done_rx)
			.await
			.expect("lane stalled after panicking job")
			.unwrap();

		executor.shutdown().await;
	}
}
