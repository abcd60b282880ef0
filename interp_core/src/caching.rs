// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! A memoizing wrapper around another solver backend.

use crate::constraints::ConstraintSet;
use crate::solver::{Query, SolverBackend, UnsatCore, Validity};
use crate::stats;
use anyhow::Result;
use fxhash::FxHashMap;
use interp_expr::{Array, Expr};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheEntry {
    constraints: ConstraintSet,
    expr: Expr,
}

impl CacheEntry {
    fn of(query: &Query<'_>) -> Self {
        CacheEntry { constraints: query.constraints.clone(), expr: query.expr.clone() }
    }
}

/// Wraps a backend and answers repeated validity and truth queries from memory,
/// together with the unsat cores that justified them. Only successful answers
/// are cached; a backend failure is asked again next time. Value, assignment
/// and range queries always go through.
pub struct CachingSolver {
    inner: Box<dyn SolverBackend>,
    validity_cache: FxHashMap<CacheEntry, (Validity, UnsatCore)>,
    truth_cache: FxHashMap<CacheEntry, (bool, UnsatCore)>,
}

impl CachingSolver {
    pub fn new(inner: Box<dyn SolverBackend>) -> Self {
        CachingSolver {
            inner,
            validity_cache: FxHashMap::default(),
            truth_cache: FxHashMap::default(),
        }
    }
}

impl SolverBackend for CachingSolver {
    fn compute_validity(&mut self, query: &Query<'_>) -> Result<(Validity, UnsatCore)> {
        let key = CacheEntry::of(query);
        if let Some(answer) = self.validity_cache.get(&key) {
            stats::increment_query_cache_hits();
            tracing::trace!(expr = ?query.expr, "validity cache hit");
            return Ok(answer.clone());
        }

        stats::increment_query_cache_misses();
        let answer = self.inner.compute_validity(query)?;
        self.validity_cache.insert(key, answer.clone());
        Ok(answer)
    }

    fn compute_truth(&mut self, query: &Query<'_>) -> Result<(bool, UnsatCore)> {
        let key = CacheEntry::of(query);
        if let Some(answer) = self.truth_cache.get(&key) {
            stats::increment_query_cache_hits();
            tracing::trace!(expr = ?query.expr, "truth cache hit");
            return Ok(answer.clone());
        }

        stats::increment_query_cache_misses();
        let answer = self.inner.compute_truth(query)?;
        self.truth_cache.insert(key, answer.clone());
        Ok(answer)
    }

    fn compute_value(&mut self, query: &Query<'_>) -> Result<Expr> {
        stats::increment_query_cache_misses();
        self.inner.compute_value(query)
    }

    fn compute_initial_values(
        &mut self,
        query: &Query<'_>,
        objects: &[Array],
    ) -> Result<(Vec<Vec<u8>>, UnsatCore)> {
        stats::increment_query_cache_misses();
        self.inner.compute_initial_values(query, objects)
    }

    fn get_range(&mut self, query: &Query<'_>) -> Result<(Expr, Expr)> {
        self.inner.get_range(query)
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.inner.set_timeout(timeout);
    }
}
