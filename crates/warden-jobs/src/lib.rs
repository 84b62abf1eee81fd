// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Lane-keyed serialized job executor.
//!
//! Each lane is an independent FIFO: jobs submitted to the same lane run
//! strictly in submission order and never overlap, jobs on different lanes
//! run concurrently with no ordering between them. A job that fails or
//! panics is logged at the execution boundary and the lane moves on.
//!
//! Warden uses two lanes ([`Lane::Mutate`] and [`Lane::Read`]) but the
//! executor is generic over its lane key so further resources can get
//! their own serialized lane without new machinery.

pub mod error;
pub mod executor;
pub mod lane;

pub use error::JobError;
pub use executor::{JobFault, LaneExecutor};
pub use lane::Lane;
