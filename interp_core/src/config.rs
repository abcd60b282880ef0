// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The configuration surface recognized by the interpolation core.

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Environment variable used to control log tracing.
const LOG_ENV_VAR: &str = "INTERP_LOG";

/// Options recognized by the interpolation core. The host engine flattens these
/// into its own command line; anything not listed here is none of our business.
#[derive(Debug, Default, Parser)]
pub struct InterpArgs {
    /// Disable interpolation for search space reduction. When disabled, no
    /// unsat-core bookkeeping is performed and shadow rewriting is unused.
    #[arg(long)]
    pub no_interpolation: bool,

    /// Do not simplify expressions against the path condition before queries.
    #[arg(long)]
    pub no_simplify_exprs: bool,

    /// Avoid existential quantification in subsumption checks by equating each
    /// existential variable with its corresponding free variable. Alters how
    /// the subsumption checker uses the shadow rewriter's output.
    #[arg(long)]
    pub no_existential: bool,

    /// Maximum number of subsumption table entries kept by the subsumption
    /// checker; the oldest entry is dropped beyond this (0 = unbounded).
    #[arg(long, default_value_t = 0)]
    pub max_subsumption_table_entries: usize,

    /// Verbosity of symbolic-execution-state tracing (0 = off).
    #[arg(long, default_value_t = 0)]
    pub debug_state: u32,

    /// Verbosity of subsumption-check tracing: the higher the more (0 = off).
    #[arg(long, default_value_t = 0)]
    pub debug_subsumption: u32,
}

impl InterpArgs {
    pub fn interpolation_enabled(&self) -> bool {
        !self.no_interpolation
    }

    pub fn simplify_exprs(&self) -> bool {
        !self.no_simplify_exprs
    }
}

/// Initialize the logger from the `INTERP_LOG` environment variable and the
/// debug-verbosity options. The debug levels only add output; they never change
/// query results.
pub fn init_logger(args: &InterpArgs) {
    let mut filter = EnvFilter::from_env(LOG_ENV_VAR);
    if args.debug_state > 0 || args.debug_subsumption > 0 {
        filter = filter.add_directive("interp_core=debug".parse().unwrap());
    }
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    // A second initialization (e.g. by an embedding host) keeps the first logger.
    let _ = subscriber.try_init();
}
