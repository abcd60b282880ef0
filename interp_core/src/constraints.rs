// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Path conditions and pre-query simplification.

use fxhash::FxHashSet;
use interp_expr::{BinaryOperator, Expr, ExprValue};

/// An ordered collection of boolean expressions forming a state's path
/// condition. Owned by the execution state; queries borrow it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintSet {
    constraints: Vec<Expr>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_constraint(&mut self, constraint: Expr) {
        assert!(constraint.is_bool(), "path condition entries must be boolean: {constraint:?}");
        self.constraints.push(constraint);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expr> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Rewrite `expr` using facts the path condition already pins down, and
    /// report which constraints were used (the simplification core).
    ///
    /// Two kinds of rules are derived: a constraint `Eq(c, x)` with constant `c`
    /// replaces occurrences of `x` by `c`; any other constraint replaces
    /// occurrences of itself by true. The caller splices the returned core into
    /// the unsat core of a subsequent definite answer, since the rewritten query
    /// is only equivalent to the original under those constraints.
    pub fn simplify_expr(&self, expr: &Expr) -> (Expr, Vec<Expr>) {
        let mut rules: Vec<(Expr, Expr, usize)> = Vec::with_capacity(self.constraints.len());
        for (i, constraint) in self.constraints.iter().enumerate() {
            match constraint.value() {
                ExprValue::BinOp { op: BinaryOperator::Eq, lhs, rhs } if lhs.is_constant() => {
                    rules.push((rhs.clone(), lhs.clone(), i));
                }
                _ => rules.push((constraint.clone(), Expr::bool_true(), i)),
            }
        }

        let mut used = FxHashSet::default();
        let simplified = replace(expr, &rules, &mut used);

        let mut used: Vec<usize> = used.into_iter().collect();
        used.sort_unstable();
        let core = used.into_iter().map(|i| self.constraints[i].clone()).collect();
        (simplified, core)
    }
}

impl FromIterator<Expr> for ConstraintSet {
    fn from_iter<T: IntoIterator<Item = Expr>>(iter: T) -> Self {
        ConstraintSet { constraints: iter.into_iter().collect() }
    }
}

/// Structural recursive replacement. Update chains inside reads are left alone;
/// the rules derived from a path condition never equate array histories.
fn replace(expr: &Expr, rules: &[(Expr, Expr, usize)], used: &mut FxHashSet<usize>) -> Expr {
    if let Some((_, to, i)) = rules.iter().find(|(from, _, _)| from == expr) {
        used.insert(*i);
        return to.clone();
    }

    match expr.value() {
        ExprValue::Constant(_) | ExprValue::WpVar { .. } => expr.clone(),
        ExprValue::Read { updates, index } => {
            Expr::read(updates.clone(), replace(index, rules, used))
        }
        ExprValue::Cast { op, e } => replace(e, rules, used).cast(*op, expr.width()),
        ExprValue::UnOp { op, e } => Expr::unop(*op, replace(e, rules, used)),
        ExprValue::Extract { e, offset } => {
            replace(e, rules, used).extract(*offset, expr.width())
        }
        ExprValue::NotOptimized(e) => replace(e, rules, used).not_optimized(),
        ExprValue::BinOp { op, lhs, rhs } => {
            Expr::binop(*op, replace(lhs, rules, used), replace(rhs, rules, used))
        }
        ExprValue::Select { condition, true_value, false_value } => Expr::select(
            replace(condition, rules, used),
            replace(true_value, rules, used),
            replace(false_value, rules, used),
        ),
        ExprValue::Upd { index, value, next } => Expr::upd(
            replace(index, rules, used),
            replace(value, rules, used),
            replace(next, rules, used),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_constraint_rewrites_and_lands_in_core() {
        let x = Expr::wp_var("x", 32);
        let three = Expr::int_constant(3, 32);
        let fixes_x = three.clone().eq(x.clone());

        let mut constraints = ConstraintSet::new();
        constraints.add_constraint(fixes_x.clone());

        let query = x.clone().add(Expr::int_constant(1, 32));
        let (simplified, core) = constraints.simplify_expr(&query);

        assert_eq!(simplified, three.add(Expr::int_constant(1, 32)));
        assert_eq!(core, vec![fixes_x]);
    }

    #[test]
    fn known_constraint_becomes_true() {
        let p = Expr::wp_var("x", 32).ult(Expr::wp_var("y", 32));
        let constraints: ConstraintSet = [p.clone()].into_iter().collect();

        let query = p.clone().and(Expr::wp_var("z", 1));
        let (simplified, core) = constraints.simplify_expr(&query);

        assert_eq!(simplified, Expr::bool_true().and(Expr::wp_var("z", 1)));
        assert_eq!(core, vec![p]);
    }

    #[test]
    fn untouched_query_has_empty_core() {
        let constraints: ConstraintSet =
            [Expr::wp_var("x", 1)].into_iter().collect();
        let query = Expr::wp_var("y", 32).is_zero();
        let (simplified, core) = constraints.simplify_expr(&query);
        assert_eq!(simplified, query);
        assert!(core.is_empty());
    }
}
