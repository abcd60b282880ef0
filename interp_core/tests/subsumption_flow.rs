// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! End-to-end flow of a subsumption check: rewrite a stored interpolant over
//! shadow array identities, then ask the timed, caching solver stack whether
//! the current path condition implies it.

use anyhow::Result;
use interp_core::caching::CachingSolver;
use interp_core::constraints::ConstraintSet;
use interp_core::shadow;
use interp_core::solver::{Query, SolverBackend, UnsatCore, Validity};
use interp_core::state::ExecutionState;
use interp_core::timing::TimingSolver;
use interp_expr::{Array, Expr, UpdateList};
use std::cell::Cell;
use std::rc::Rc;

/// Answers every truth query `true` with a fixed core, counting invocations.
struct AffirmingBackend {
    calls: Rc<Cell<usize>>,
    core: UnsatCore,
}

impl SolverBackend for AffirmingBackend {
    fn compute_validity(&mut self, _query: &Query<'_>) -> Result<(Validity, UnsatCore)> {
        self.calls.set(self.calls.get() + 1);
        Ok((Validity::True, self.core.clone()))
    }

    fn compute_truth(&mut self, _query: &Query<'_>) -> Result<(bool, UnsatCore)> {
        self.calls.set(self.calls.get() + 1);
        Ok((true, self.core.clone()))
    }

    fn compute_value(&mut self, query: &Query<'_>) -> Result<Expr> {
        self.calls.set(self.calls.get() + 1);
        Ok(Expr::int_constant(0, query.expr.width()))
    }

    fn compute_initial_values(
        &mut self,
        _query: &Query<'_>,
        objects: &[Array],
    ) -> Result<(Vec<Vec<u8>>, UnsatCore)> {
        self.calls.set(self.calls.get() + 1);
        Ok((objects.iter().map(|o| vec![0; o.size() as usize]).collect(), vec![]))
    }

    fn get_range(&mut self, query: &Query<'_>) -> Result<(Expr, Expr)> {
        self.calls.set(self.calls.get() + 1);
        let w = query.expr.width();
        Ok((Expr::int_constant(0, w), Expr::int_constant(0, w)))
    }
}

#[test]
fn subsumption_check_rewrites_then_queries_once_per_distinct_interpolant() {
    shadow::reset_shadow_arrays();

    // The stored interpolant mentions the subsumed state's symbolic input.
    let input = Array::new("input", 4, 32);
    let shadow_input = Array::new("input_shadow", 4, 32);
    shadow::register_shadow_array(&input, &shadow_input);

    let stored = Expr::read(UpdateList::new(input), Expr::int_constant(0, 32))
        .ult(Expr::int_constant(100, 32));
    let (interpolant, introduced) = shadow::rewrite(&stored);

    // Every array the rewrite introduced is a registered shadow, ready for
    // existential quantification by the checker.
    assert_eq!(introduced.len(), 1);
    assert!(introduced.contains(&shadow_input));
    let shadow_read =
        Expr::read(UpdateList::new(shadow_input), Expr::int_constant(0, 32));
    assert_eq!(interpolant, shadow_read.clone().ult(Expr::int_constant(100, 32)));

    // The candidate state's path condition pins the interpolant's free read.
    let pinned = Expr::int_constant(7, 32).eq(shadow_read);
    let mut state = ExecutionState::with_constraints(
        [pinned.clone()].into_iter().collect::<ConstraintSet>(),
    );

    let calls = Rc::new(Cell::new(0));
    let backend = AffirmingBackend {
        calls: calls.clone(),
        core: vec![pinned.clone()],
    };
    let caching = CachingSolver::new(Box::new(backend));
    let mut solver = TimingSolver::new(Box::new(caching), true, true);

    let (holds, core) = solver.must_be_true(&mut state, interpolant.clone()).unwrap();
    assert!(holds);
    // The simplifier consumed the pinning constraint, so the core carries it
    // ahead of the backend's contribution.
    assert_eq!(core, vec![pinned.clone(), pinned]);
    assert_eq!(calls.get(), 1);
    assert!(state.query_cost >= 0.0);

    // The identical check against the same path condition is served from the
    // cache without another backend round trip.
    let (holds_again, core_again) = solver.must_be_true(&mut state, interpolant).unwrap();
    assert!(holds_again);
    assert_eq!(core, core_again);
    assert_eq!(calls.get(), 1);
}

#[test]
fn constant_interpolant_needs_no_backend_at_all() {
    let calls = Rc::new(Cell::new(0));
    let backend = AffirmingBackend { calls: calls.clone(), core: vec![] };
    let mut solver = TimingSolver::new(Box::new(backend), true, true);
    let mut state = ExecutionState::new();

    let (rewritten, introduced) = shadow::rewrite(&Expr::bool_true());
    assert!(introduced.is_empty());

    let (holds, core) = solver.must_be_true(&mut state, rewritten).unwrap();
    assert!(holds);
    assert!(core.is_empty());
    assert_eq!(calls.get(), 0);
    assert_eq!(state.query_cost, 0.0);
}
