// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Weakest-precondition substitution and dependency analysis.
//!
//! Interpolant strengthening propagates a postcondition backward across an
//! assignment by substituting the assignment's right-hand side for its
//! left-hand variable throughout the current WP formula. Substituting the
//! eliminated sentinel lets conjunctions shrink term-by-term as variables are
//! eliminated, while arithmetic that loses an operand vanishes rather than
//! becoming ill-typed.

use interp_expr::{BinaryOperator, Expr, ExprValue, Name};

/// Does `expr` mention the program-variable placeholder bound to `target`?
pub fn is_target_dependent(target: Name, expr: &Expr) -> bool {
    match expr.value() {
        ExprValue::Constant(_) => false,
        ExprValue::WpVar { identifier } => *identifier == target,
        ExprValue::Cast { e, .. }
        | ExprValue::UnOp { e, .. }
        | ExprValue::Extract { e, .. }
        | ExprValue::NotOptimized(e) => is_target_dependent(target, e),
        ExprValue::BinOp { lhs, rhs, .. } => {
            is_target_dependent(target, lhs) || is_target_dependent(target, rhs)
        }
        ExprValue::Select { condition, true_value, false_value } => {
            is_target_dependent(target, condition)
                || is_target_dependent(target, true_value)
                || is_target_dependent(target, false_value)
        }
        ExprValue::Upd { index, value, next } => {
            is_target_dependent(target, index)
                || is_target_dependent(target, value)
                || is_target_dependent(target, next)
        }
        // WP formulas model memory with Upd nodes; a raw read has no meaning
        // here and silently skipping it would yield an unsound interpolant.
        ExprValue::Read { .. } => {
            panic!("dependency test on unsupported node: {expr:?}")
        }
    }
}

/// Replace every occurrence of `lhs` in `base` by `rhs`, where `rhs = None` is
/// the eliminated sentinel requesting that `lhs` vanish from the formula.
///
/// `None` results propagate by operator:
/// * `And`/`Or`/`Xor` absorb an eliminated operand and return the survivor;
///   both operands eliminated eliminates the node.
/// * Every other operator collapses: losing any operand eliminates the node.
///
/// `lhs` matches structurally, except that placeholders match on bound identity
/// alone: they denote variables, not full expressions.
pub fn substitute(base: &Expr, lhs: &Expr, rhs: Option<&Expr>) -> Option<Expr> {
    if base == lhs {
        return rhs.cloned();
    }

    match base.value() {
        ExprValue::Constant(_) => Some(base.clone()),
        ExprValue::WpVar { identifier } => match lhs.value() {
            ExprValue::WpVar { identifier: target } if identifier == target => rhs.cloned(),
            _ => Some(base.clone()),
        },
        ExprValue::Cast { op, e } => {
            Some(substitute(e, lhs, rhs)?.cast(*op, base.width()))
        }
        ExprValue::UnOp { op, e } => Some(Expr::unop(*op, substitute(e, lhs, rhs)?)),
        ExprValue::Extract { e, offset } => {
            Some(substitute(e, lhs, rhs)?.extract(*offset, base.width()))
        }
        ExprValue::NotOptimized(e) => Some(substitute(e, lhs, rhs)?.not_optimized()),
        ExprValue::BinOp {
            op: op @ (BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor),
            lhs: a,
            rhs: b,
        } => match (substitute(a, lhs, rhs), substitute(b, lhs, rhs)) {
            (None, None) => None,
            (Some(survivor), None) | (None, Some(survivor)) => Some(survivor),
            (Some(a), Some(b)) => Some(Expr::binop(*op, a, b)),
        },
        ExprValue::BinOp { op, lhs: a, rhs: b } => {
            Some(Expr::binop(*op, substitute(a, lhs, rhs)?, substitute(b, lhs, rhs)?))
        }
        ExprValue::Select { condition, true_value, false_value } => Some(Expr::select(
            substitute(condition, lhs, rhs)?,
            substitute(true_value, lhs, rhs)?,
            substitute(false_value, lhs, rhs)?,
        )),
        ExprValue::Upd { index, value, next } => Some(Expr::upd(
            substitute(index, lhs, rhs)?,
            substitute(value, lhs, rhs)?,
            substitute(next, lhs, rhs)?,
        )),
        ExprValue::Read { .. } => {
            panic!("substitution on unsupported node: {base:?}")
        }
    }
}
