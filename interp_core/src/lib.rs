// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The interpolation-support core of the symbolic-execution engine.
//!
//! Three pieces share the expression model from `interp_expr` and are invoked
//! together whenever the engine decides whether one explored state subsumes
//! another:
//! 1. [timing::TimingSolver] issues and times constraint-solver queries on
//!    behalf of execution states.
//! 2. [shadow] rewrites expression trees to introduce fresh shadow arrays for
//!    existential quantification in subsumption queries.
//! 3. [wp] performs weakest-precondition substitution and dependency analysis
//!    over the same trees.
//!
//! The host interpreter, the search scheduler and the concrete SMT backend are
//! external collaborators: the first two own the [state::ExecutionState]s passed
//! in here, the last is consumed through the [solver::SolverBackend] trait.

pub mod caching;
pub mod config;
pub mod constraints;
pub mod shadow;
pub mod solver;
pub mod state;
pub mod stats;
pub mod timing;
pub mod wp;
