// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The timed query service: a thin wrapper over a solver backend that adds
//! constant fast-paths, optional pre-query simplification, wall-time
//! instrumentation and per-state cost accounting.

use crate::constraints::ConstraintSet;
use crate::solver::{Query, SolverBackend, UnsatCore, Validity};
use crate::state::ExecutionState;
use crate::stats;
use anyhow::Result;
use interp_expr::{Array, Expr};
use std::time::{Duration, Instant};
use tracing::trace;

/// Wraps a solver and tracks the statistics the engine cares about: every
/// timed operation adds its wall-clock cost (simplification included) to the
/// process-wide solver-time statistic and to the state's `query_cost`.
pub struct TimingSolver {
    backend: Box<dyn SolverBackend>,
    simplify_exprs: bool,
    interpolation_enabled: bool,
}

impl TimingSolver {
    /// `simplify_exprs` controls whether expressions are rewritten against the
    /// path condition before querying; `interpolation_enabled` gates the
    /// splicing of simplification cores into unsat cores.
    pub fn new(
        backend: Box<dyn SolverBackend>,
        simplify_exprs: bool,
        interpolation_enabled: bool,
    ) -> Self {
        TimingSolver { backend, simplify_exprs, interpolation_enabled }
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.backend.set_timeout(timeout);
    }

    fn maybe_simplify(&self, constraints: &ConstraintSet, expr: Expr) -> (Expr, Vec<Expr>) {
        if self.simplify_exprs {
            constraints.simplify_expr(&expr)
        } else {
            (expr, Vec::new())
        }
    }

    fn charge(&self, state: &mut ExecutionState, elapsed: Duration) {
        stats::add_solver_time(elapsed);
        state.query_cost += elapsed.as_micros() as f64 / 1_000_000.;
    }

    /// Is `expr` valid, invalid or neither under the state's path condition?
    pub fn evaluate(
        &mut self,
        state: &mut ExecutionState,
        expr: Expr,
    ) -> Result<(Validity, UnsatCore)> {
        // Fast path, to avoid timer and backend overhead.
        if expr.is_constant() {
            let validity = if expr.is_true() { Validity::True } else { Validity::False };
            return Ok((validity, UnsatCore::new()));
        }

        let start = Instant::now();

        let (expr, simplification_core) = self.maybe_simplify(&state.constraints, expr);

        let result = self.backend.compute_validity(&Query::new(&state.constraints, expr));
        let result = result.map(|(validity, mut unsat_core)| {
            // A rewritten query is only equivalent to the original under the
            // constraints the simplifier consumed, so a definite answer owes
            // its core those constraints as well.
            if self.interpolation_enabled && validity != Validity::Unknown && self.simplify_exprs
            {
                unsat_core.splice(0..0, simplification_core);
            }
            trace!(%validity, "evaluate");
            (validity, unsat_core)
        });

        self.charge(state, start.elapsed());
        result
    }

    /// Must `expr` be true under the state's path condition?
    pub fn must_be_true(
        &mut self,
        state: &mut ExecutionState,
        expr: Expr,
    ) -> Result<(bool, UnsatCore)> {
        // Fast path, to avoid timer and backend overhead.
        if expr.is_constant() {
            return Ok((expr.is_true(), UnsatCore::new()));
        }

        let start = Instant::now();

        let (expr, simplification_core) = self.maybe_simplify(&state.constraints, expr);

        let result = self.backend.compute_truth(&Query::new(&state.constraints, expr));
        let result = result.map(|(truth, mut unsat_core)| {
            if self.interpolation_enabled && self.simplify_exprs {
                unsat_core.splice(0..0, simplification_core);
            }
            trace!(truth, "must_be_true");
            (truth, unsat_core)
        });

        self.charge(state, start.elapsed());
        result
    }

    /// Must `expr` be false? Asked as `must_be_true(expr == 0)`, not as a
    /// separate backend operation.
    pub fn must_be_false(
        &mut self,
        state: &mut ExecutionState,
        expr: Expr,
    ) -> Result<(bool, UnsatCore)> {
        self.must_be_true(state, expr.is_zero())
    }

    /// May `expr` be true? The negation of `must_be_false`; does not time
    /// independently and propagates its failure.
    pub fn may_be_true(
        &mut self,
        state: &mut ExecutionState,
        expr: Expr,
    ) -> Result<(bool, UnsatCore)> {
        let (result, unsat_core) = self.must_be_false(state, expr)?;
        Ok((!result, unsat_core))
    }

    /// May `expr` be false? The negation of `must_be_true`.
    pub fn may_be_false(
        &mut self,
        state: &mut ExecutionState,
        expr: Expr,
    ) -> Result<(bool, UnsatCore)> {
        let (result, unsat_core) = self.must_be_true(state, expr)?;
        Ok((!result, unsat_core))
    }

    /// Some concrete value `expr` can take under the path condition. The
    /// backend returns a value, not a validity, so there is no unsat core.
    pub fn get_value(&mut self, state: &mut ExecutionState, expr: Expr) -> Result<Expr> {
        // Fast path, to avoid timer and backend overhead.
        if expr.is_constant() {
            return Ok(expr);
        }

        let start = Instant::now();

        let (expr, _simplification_core) = self.maybe_simplify(&state.constraints, expr);

        let result = self.backend.compute_value(&Query::new(&state.constraints, expr));

        self.charge(state, start.elapsed());
        result
    }

    /// A satisfying byte assignment for exactly the requested arrays. An empty
    /// request succeeds immediately: no timer, no backend.
    pub fn get_initial_values(
        &mut self,
        state: &mut ExecutionState,
        objects: &[Array],
    ) -> Result<(Vec<Vec<u8>>, UnsatCore)> {
        if objects.is_empty() {
            return Ok((Vec::new(), UnsatCore::new()));
        }

        let start = Instant::now();

        // The query expression is a trivially satisfiable placeholder; only the
        // path condition constrains the assignment.
        let result = self
            .backend
            .compute_initial_values(&Query::new(&state.constraints, Expr::bool_false()), objects);

        self.charge(state, start.elapsed());
        result
    }

    /// Bounds on `expr` under the path condition. This path intentionally
    /// bypasses the timer and the query-cost accounting, unlike every sibling
    /// operation; do not unify it with the others.
    pub fn get_range(&mut self, state: &ExecutionState, expr: Expr) -> Result<(Expr, Expr)> {
        self.backend.get_range(&Query::new(&state.constraints, expr))
    }
}
