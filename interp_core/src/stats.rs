// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Process-wide solver statistics.
//!
//! These counters are cumulative over the whole run and shared by every solver
//! in the chain; per-state cost lives on [crate::state::ExecutionState] instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static SOLVER_TIME_MICROS: AtomicU64 = AtomicU64::new(0);
static QUERIES: AtomicU64 = AtomicU64::new(0);
static QUERY_CACHE_HITS: AtomicU64 = AtomicU64::new(0);
static QUERY_CACHE_MISSES: AtomicU64 = AtomicU64::new(0);

/// Add wall-clock time spent inside the timed query service.
pub fn add_solver_time(elapsed: Duration) {
    SOLVER_TIME_MICROS.fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
}

/// Total wall-clock time spent on solver queries so far.
pub fn solver_time() -> Duration {
    Duration::from_micros(SOLVER_TIME_MICROS.load(Ordering::Relaxed))
}

/// Record one query reaching a backend.
pub fn increment_queries() {
    QUERIES.fetch_add(1, Ordering::Relaxed);
}

pub fn queries() -> u64 {
    QUERIES.load(Ordering::Relaxed)
}

pub fn increment_query_cache_hits() {
    QUERY_CACHE_HITS.fetch_add(1, Ordering::Relaxed);
}

pub fn query_cache_hits() -> u64 {
    QUERY_CACHE_HITS.load(Ordering::Relaxed)
}

pub fn increment_query_cache_misses() {
    QUERY_CACHE_MISSES.fetch_add(1, Ordering::Relaxed);
}

pub fn query_cache_misses() -> u64 {
    QUERY_CACHE_MISSES.load(Ordering::Relaxed)
}
