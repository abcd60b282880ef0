// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The slice of an execution state this core reads and writes.

use crate::constraints::ConstraintSet;
use interp_expr::Expr;

/// One explored program state, as seen from the interpolation core: its path
/// condition plus the cumulative wall-clock cost of the queries issued on its
/// behalf. The host interpreter owns the full state; we only account against it.
#[derive(Debug, Default, Clone)]
pub struct ExecutionState {
    pub constraints: ConstraintSet,
    /// Seconds spent answering solver queries for this state.
    pub query_cost: f64,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraints(constraints: ConstraintSet) -> Self {
        ExecutionState { constraints, query_cost: 0.0 }
    }

    pub fn add_constraint(&mut self, constraint: Expr) {
        self.constraints.add_constraint(constraint);
    }
}
