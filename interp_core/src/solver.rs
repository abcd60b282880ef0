// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The backend solver interface.

use crate::constraints::ConstraintSet;
use crate::stats;
use anyhow::{bail, Result};
use interp_expr::{Array, Expr};
use std::time::Duration;

/// Our notion of a backend's answer to a validity query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Validity {
    True,
    False,
    Unknown,
}

/// The subset of input constraints sufficient to justify a definite answer.
pub type UnsatCore = Vec<Expr>;

/// A transient pairing of a path condition and a target expression. Queries
/// have no lifetime beyond the backend call that consumes them.
#[derive(Debug)]
pub struct Query<'a> {
    pub constraints: &'a ConstraintSet,
    pub expr: Expr,
}

impl<'a> Query<'a> {
    pub fn new(constraints: &'a ConstraintSet, expr: Expr) -> Self {
        Query { constraints, expr }
    }
}

/// An opaque constraint solver. A failed call (`Err`) means the backend could
/// not answer (error, timeout, resource exhaustion) and the caller must not
/// treat it as a logical answer. Retry policy, if any, belongs behind this
/// trait, not in front of it.
pub trait SolverBackend {
    /// Decide whether `query.expr` is valid, invalid or neither under the
    /// constraints, with an unsat core for definite answers.
    fn compute_validity(&mut self, query: &Query<'_>) -> Result<(Validity, UnsatCore)>;

    /// Decide whether `query.expr` must be true under the constraints.
    fn compute_truth(&mut self, query: &Query<'_>) -> Result<(bool, UnsatCore)>;

    /// Produce some concrete value `query.expr` can take under the constraints.
    fn compute_value(&mut self, query: &Query<'_>) -> Result<Expr>;

    /// Produce a satisfying byte assignment for exactly the requested arrays.
    fn compute_initial_values(
        &mut self,
        query: &Query<'_>,
        objects: &[Array],
    ) -> Result<(Vec<Vec<u8>>, UnsatCore)>;

    /// Tight lower and upper bounds on `query.expr` under the constraints.
    fn get_range(&mut self, query: &Query<'_>) -> Result<(Expr, Expr)>;

    /// Span after which the backend should give up on a single query. Passed
    /// through opaquely; backends without timeouts may ignore it.
    fn set_timeout(&mut self, _timeout: Duration) {}
}

/// A backend for disabled-solver configurations and tests: refuses every query
/// while still counting it in the process-wide statistics.
#[derive(Debug, Default)]
pub struct DummySolver;

impl SolverBackend for DummySolver {
    fn compute_validity(&mut self, _query: &Query<'_>) -> Result<(Validity, UnsatCore)> {
        stats::increment_queries();
        bail!("dummy solver refuses all queries")
    }

    fn compute_truth(&mut self, _query: &Query<'_>) -> Result<(bool, UnsatCore)> {
        stats::increment_queries();
        bail!("dummy solver refuses all queries")
    }

    fn compute_value(&mut self, _query: &Query<'_>) -> Result<Expr> {
        stats::increment_queries();
        bail!("dummy solver refuses all queries")
    }

    fn compute_initial_values(
        &mut self,
        _query: &Query<'_>,
        _objects: &[Array],
    ) -> Result<(Vec<Vec<u8>>, UnsatCore)> {
        stats::increment_queries();
        bail!("dummy solver refuses all queries")
    }

    fn get_range(&mut self, _query: &Query<'_>) -> Result<(Expr, Expr)> {
        stats::increment_queries();
        bail!("dummy solver refuses all queries")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_solver_fails_but_counts_queries() {
        let constraints = ConstraintSet::new();
        let mut solver = DummySolver;
        let before = stats::queries();

        let query = Query::new(&constraints, Expr::wp_var("x", 1));
        assert!(solver.compute_validity(&query).is_err());
        let query = Query::new(&constraints, Expr::wp_var("x", 1));
        assert!(solver.compute_truth(&query).is_err());

        assert!(stats::queries() >= before + 2);
    }

    #[test]
    fn validity_displays_like_its_variants() {
        assert_eq!(Validity::True.to_string(), "True");
        assert_eq!(Validity::Unknown.to_string(), "Unknown");
    }
}
