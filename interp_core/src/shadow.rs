// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The shadow substitution engine.
//!
//! Subsumption checking compares a candidate state's constraints against a
//! stored interpolant. Reusing the candidate's live array identities directly
//! would let the solver conflate the comparison variables with the state's real
//! symbolic memory, so [rewrite] replaces every array identity reachable via
//! reads with a registered shadow counterpart; the subsumption checker then
//! existentially quantifies the returned shadows.

use fxhash::{FxHashMap, FxHashSet};
use interp_expr::{Array, Expr, ExprValue, UpdateList, UpdateNode};
use lazy_static::lazy_static;
use std::sync::{Arc, RwLock};
use tracing::debug;

lazy_static! {
    /// Process-wide source-to-shadow array mapping. Registrations happen rarely,
    /// at state-setup time; reads happen during every rewrite.
    static ref SHADOW_ARRAYS: RwLock<FxHashMap<Array, Array>> =
        RwLock::new(FxHashMap::default());
}

/// Marks a shadow array's name as derived from its source's.
const SHADOW_NAME_SUFFIX: &str = "__shadow__";

/// Map `source` to `target` for all subsequent rewrites. Rewriting only reads
/// the registry.
pub fn register_shadow_array(source: &Array, target: &Array) {
    debug!(?source, ?target, "register shadow array");
    SHADOW_ARRAYS.write().unwrap().insert(source.clone(), target.clone());
}

/// Create, register and return a fresh shadow counterpart of `source`: same
/// shape, name derived with [SHADOW_NAME_SUFFIX]. A source that already has a
/// shadow keeps it, so repeated calls return the same identity.
pub fn create_shadow_array(source: &Array) -> Array {
    // Check-and-insert under one write lock, so concurrent callers cannot
    // register two shadows for the same source.
    let mut registry = SHADOW_ARRAYS.write().unwrap();
    if let Some(existing) = registry.get(source) {
        return existing.clone();
    }
    let shadow = Array::new(
        source.name().suffixed(SHADOW_NAME_SUFFIX),
        source.size(),
        source.range(),
    );
    debug!(?source, ?shadow, "create shadow array");
    registry.insert(source.clone(), shadow.clone());
    shadow
}

/// The registered shadow counterpart of `source`, if any.
pub fn shadow_array_of(source: &Array) -> Option<Array> {
    SHADOW_ARRAYS.read().unwrap().get(source).cloned()
}

/// Drop every registration. A reset boundary for the host; never called during
/// rewriting.
pub fn reset_shadow_arrays() {
    SHADOW_ARRAYS.write().unwrap().clear();
}

/// Rewrite `expr`, replacing every array reachable via reads with its shadow
/// counterpart, and return the set of shadow arrays introduced.
///
/// Rewriting is a pure function of its input plus the current registry
/// snapshot: it never creates or mutates registry entries, and rewriting the
/// same input twice under the same registry yields structurally identical
/// output.
pub fn rewrite(expr: &Expr) -> (Expr, FxHashSet<Array>) {
    let mut introduced = FxHashSet::default();
    let rewritten = shadow_expression(expr, &mut introduced);
    (rewritten, introduced)
}

/// Rebuild an update chain over the shadow identities. The recursion bottoms
/// out at the oldest write, so writes are reconstructed oldest-first and the
/// rewritten chain resolves reads exactly as the original did.
fn shadow_update_chain(
    head: Option<&Arc<UpdateNode>>,
    introduced: &mut FxHashSet<Array>,
) -> Option<Arc<UpdateNode>> {
    let node = head?;
    Some(Arc::new(UpdateNode::new(
        shadow_expression(node.index(), introduced),
        shadow_expression(node.value(), introduced),
        shadow_update_chain(node.next(), introduced),
    )))
}

fn shadow_expression(expr: &Expr, introduced: &mut FxHashSet<Array>) -> Expr {
    match expr.value() {
        ExprValue::Constant(_) => expr.clone(),
        ExprValue::Read { updates, index } => {
            let root = match shadow_array_of(updates.root()) {
                Some(shadow) => {
                    introduced.insert(shadow.clone());
                    shadow
                }
                // An unregistered array stays itself; only registered
                // identities are quantified away.
                None => updates.root().clone(),
            };
            let head = shadow_update_chain(updates.head(), introduced);
            Expr::read(UpdateList::from_parts(root, head), shadow_expression(index, introduced))
        }
        ExprValue::Cast { op, e } => {
            shadow_expression(e, introduced).cast(*op, expr.width())
        }
        ExprValue::UnOp { op, e } => Expr::unop(*op, shadow_expression(e, introduced)),
        ExprValue::Extract { e, offset } => {
            shadow_expression(e, introduced).extract(*offset, expr.width())
        }
        ExprValue::NotOptimized(e) => shadow_expression(e, introduced).not_optimized(),
        ExprValue::BinOp { op, lhs, rhs } => Expr::binop(
            *op,
            shadow_expression(lhs, introduced),
            shadow_expression(rhs, introduced),
        ),
        ExprValue::Select { condition, true_value, false_value } => Expr::select(
            shadow_expression(condition, introduced),
            shadow_expression(true_value, introduced),
            shadow_expression(false_value, introduced),
        ),
        // WP-layer tags never occur in the constraints handed to the
        // subsumption checker; reaching one here is an unsound rewrite.
        ExprValue::WpVar { .. } | ExprValue::Upd { .. } => {
            panic!("shadow rewrite on unsupported node: {expr:?}")
        }
    }
}
