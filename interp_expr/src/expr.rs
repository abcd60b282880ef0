// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// This file has a lot of functions with names like "add"
#![allow(clippy::should_implement_trait)]

use self::BinaryOperator::*;
use self::ExprValue::*;
use crate::array::UpdateList;
use crate::Name;
use num::bigint::BigInt;
use std::sync::Arc;

///////////////////////////////////////////////////////////////////////////////////////////////
/// Datatypes
///////////////////////////////////////////////////////////////////////////////////////////////

/// Bit-width of an expression node.
pub type Width = u64;

/// Booleans are one-bit values.
pub const BOOL_WIDTH: Width = 1;

/// An `Expr` is one node of the symbolic expression DAG: a tagged value plus the
/// bit-width of the result it denotes. Nodes are immutable and reference counted;
/// cloning an `Expr` is a pointer copy, and rewrites share every subtree they do
/// not change.
///
/// The fields are kept private and there are no mutating accessors, so the only
/// way to create expressions is through the constructors, which check widths.
/// Constructors follow a chained style: `x + 5 == y` is written
/// `x.add(five).eq(y)`.
///
/// Equality is structural, with two deliberate exceptions: array roots inside a
/// [Read] compare by array identity, and [WpVar] compares by bound identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(Arc<ExprNode>);

#[derive(Debug, PartialEq, Eq, Hash)]
struct ExprNode {
    value: ExprValue,
    width: Width,
}

/// The closed grammar of expression tags. Every traversal over expressions must
/// match on all of these; extending the grammar is a compile-time obligation on
/// each traversal, not a runtime one.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum ExprValue {
    /// A literal bit pattern of the node's width. `Constant(1)` at width 1 is true.
    Constant(BigInt),
    /// A placeholder denoting a program variable during weakest-precondition
    /// reasoning. Identified by name, not by structure.
    WpVar { identifier: Name },
    /// A read of `updates` at `index`, resolved newest-write-first.
    Read { updates: UpdateList, index: Expr },
    /// Width conversions; the result width lives in the node.
    Cast { op: CastOperator, e: Expr },
    /// Logical/bitwise not, unary float ops and float classification predicates.
    UnOp { op: UnaryOperator, e: Expr },
    /// The `width(self)` bits of `e` starting at bit `offset`.
    Extract { e: Expr, offset: u64 },
    /// A fence that keeps the optimizer from rewriting the wrapped expression.
    NotOptimized(Expr),
    /// `lhs op rhs`.
    BinOp { op: BinaryOperator, lhs: Expr, rhs: Expr },
    /// `condition ? true_value : false_value`
    Select { condition: Expr, true_value: Expr, false_value: Expr },
    /// Expression-level array update used by the WP engine: the array value
    /// equal to `next` everywhere except at `index`, where it holds `value`.
    Upd { index: Expr, value: Expr, next: Expr },
}

/// IEEE rounding modes carried by the float operations that need one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    ToNearest,
    Downward,
    Upward,
    TowardsZero,
}

impl Default for RoundingMode {
    fn default() -> Self {
        RoundingMode::ToNearest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastOperator {
    ZeroExtend,
    SignExtend,
    FloatExtend,
    FloatTruncate(RoundingMode),
    FloatToUnsigned(RoundingMode),
    FloatToSigned(RoundingMode),
    UnsignedToFloat(RoundingMode),
    SignedToFloat(RoundingMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `!self` (bitwise at the node's width; logical at width 1)
    Not,
    /// `-self` as a float
    Fneg,
    /// `fabs(self)`
    Fabs,
    /// `sqrt(self)`
    Fsqrt(RoundingMode),
    /// round to integral
    Frint(RoundingMode),
    /// `isnan(self)`
    IsNan,
    /// `isinf(self)`
    IsInfinite,
    /// `isnormal(self)`
    IsNormal,
    /// `issubnormal(self)`
    IsSubnormal,
}

/// Binary operators. Comparisons produce a boolean; `Concat` produces the sum of
/// the operand widths; everything else requires and preserves a common width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Udiv,
    Sdiv,
    Urem,
    Srem,
    And,
    Or,
    Xor,
    Shl,
    Lshr,
    Ashr,
    Eq,
    Ne,
    Ult,
    Ule,
    Ugt,
    Uge,
    Slt,
    Sle,
    Sgt,
    Sge,
    Fadd(RoundingMode),
    Fsub(RoundingMode),
    Fmul(RoundingMode),
    Fdiv(RoundingMode),
    Frem(RoundingMode),
    Fmax,
    Fmin,
    Foeq,
    Folt,
    Fole,
    Fogt,
    Foge,
    Concat,
}

impl BinaryOperator {
    /// Operators whose result is a boolean regardless of operand width.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Eq | Ne
                | Ult
                | Ule
                | Ugt
                | Uge
                | Slt
                | Sle
                | Sgt
                | Sge
                | Foeq
                | Folt
                | Fole
                | Fogt
                | Foge
        )
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////
/// Implementations
///////////////////////////////////////////////////////////////////////////////////////////////

/// Getters
impl Expr {
    pub fn width(&self) -> Width {
        self.0.width
    }

    pub fn value(&self) -> &ExprValue {
        &self.0.value
    }

    /// If the expression is a constant, return its bit pattern.
    pub fn constant_value(&self) -> Option<&BigInt> {
        match &self.0.value {
            Constant(i) => Some(i),
            _ => None,
        }
    }
}

/// Predicates
impl Expr {
    pub fn is_constant(&self) -> bool {
        matches!(self.0.value, Constant(_))
    }

    pub fn is_bool(&self) -> bool {
        self.0.width == BOOL_WIDTH
    }

    /// The boolean constant true. False for wider constants and non-constants.
    pub fn is_true(&self) -> bool {
        self.is_bool() && self.constant_value().is_some_and(|i| *i == BigInt::from(1))
    }

    /// The boolean constant false.
    pub fn is_false(&self) -> bool {
        self.is_bool() && self.constant_value().is_some_and(|i| *i == BigInt::from(0))
    }
}

/// Private constructor. Making this a macro allows multiple references to self in the same call.
macro_rules! expr {
    ( $value:expr, $width:expr) => {{
        let width = $width;
        let value = $value;
        Expr(Arc::new(ExprNode { value, width }))
    }};
}

/// Constructors
impl Expr {
    /// `123`
    pub fn int_constant<T>(i: T, width: Width) -> Self
    where
        T: Into<BigInt>,
    {
        expr!(Constant(i.into()), width)
    }

    /// true/false as a one-bit value
    pub fn bool_constant(c: bool) -> Self {
        Expr::int_constant(u8::from(c), BOOL_WIDTH)
    }

    pub fn bool_true() -> Self {
        Expr::bool_constant(true)
    }

    pub fn bool_false() -> Self {
        Expr::bool_constant(false)
    }

    /// A placeholder for the program variable bound to `identifier`.
    pub fn wp_var<T: Into<Name>>(identifier: T, width: Width) -> Self {
        expr!(WpVar { identifier: identifier.into() }, width)
    }

    /// `updates[index]`, one cell wide.
    pub fn read(updates: UpdateList, index: Expr) -> Self {
        let width = updates.root().range();
        expr!(Read { updates, index }, width)
    }

    /// Rebuild a cast of kind `op` to `width` around `self`.
    pub fn cast(self, op: CastOperator, width: Width) -> Self {
        expr!(Cast { op, e: self }, width)
    }

    pub fn zext(self, width: Width) -> Self {
        assert!(width >= self.width(), "can't zero-extend {self:?} to narrower width {width}");
        self.cast(CastOperator::ZeroExtend, width)
    }

    pub fn sext(self, width: Width) -> Self {
        assert!(width >= self.width(), "can't sign-extend {self:?} to narrower width {width}");
        self.cast(CastOperator::SignExtend, width)
    }

    pub fn float_extend(self, width: Width) -> Self {
        self.cast(CastOperator::FloatExtend, width)
    }

    pub fn float_truncate(self, width: Width, rounding: RoundingMode) -> Self {
        self.cast(CastOperator::FloatTruncate(rounding), width)
    }

    pub fn float_to_unsigned(self, width: Width, rounding: RoundingMode) -> Self {
        self.cast(CastOperator::FloatToUnsigned(rounding), width)
    }

    pub fn float_to_signed(self, width: Width, rounding: RoundingMode) -> Self {
        self.cast(CastOperator::FloatToSigned(rounding), width)
    }

    pub fn unsigned_to_float(self, width: Width, rounding: RoundingMode) -> Self {
        self.cast(CastOperator::UnsignedToFloat(rounding), width)
    }

    pub fn signed_to_float(self, width: Width, rounding: RoundingMode) -> Self {
        self.cast(CastOperator::SignedToFloat(rounding), width)
    }

    /// Rebuild a unary node of kind `op` around `e`. Classification predicates
    /// produce a boolean; the other unary operators preserve the operand width.
    pub fn unop(op: UnaryOperator, e: Expr) -> Self {
        let width = match op {
            UnaryOperator::IsNan
            | UnaryOperator::IsInfinite
            | UnaryOperator::IsNormal
            | UnaryOperator::IsSubnormal => BOOL_WIDTH,
            UnaryOperator::Not
            | UnaryOperator::Fneg
            | UnaryOperator::Fabs
            | UnaryOperator::Fsqrt(_)
            | UnaryOperator::Frint(_) => e.width(),
        };
        expr!(UnOp { op, e }, width)
    }

    /// `!self`
    pub fn not(self) -> Self {
        Expr::unop(UnaryOperator::Not, self)
    }

    pub fn fneg(self) -> Self {
        Expr::unop(UnaryOperator::Fneg, self)
    }

    pub fn fabs(self) -> Self {
        Expr::unop(UnaryOperator::Fabs, self)
    }

    pub fn fsqrt(self, rounding: RoundingMode) -> Self {
        Expr::unop(UnaryOperator::Fsqrt(rounding), self)
    }

    pub fn frint(self, rounding: RoundingMode) -> Self {
        Expr::unop(UnaryOperator::Frint(rounding), self)
    }

    pub fn is_nan(self) -> Self {
        Expr::unop(UnaryOperator::IsNan, self)
    }

    pub fn is_infinite(self) -> Self {
        Expr::unop(UnaryOperator::IsInfinite, self)
    }

    pub fn is_normal(self) -> Self {
        Expr::unop(UnaryOperator::IsNormal, self)
    }

    pub fn is_subnormal(self) -> Self {
        Expr::unop(UnaryOperator::IsSubnormal, self)
    }

    /// The `width` bits of `self` starting at bit `offset`.
    pub fn extract(self, offset: u64, width: Width) -> Self {
        assert!(
            offset + width <= self.width(),
            "extract out of range: [{offset}, {offset}+{width}) of {self:?}"
        );
        expr!(Extract { e: self, offset }, width)
    }

    pub fn not_optimized(self) -> Self {
        let width = self.width();
        expr!(NotOptimized(self), width)
    }

    /// Rebuild a binary node of the identical operator tag from two operands.
    pub fn binop(op: BinaryOperator, lhs: Expr, rhs: Expr) -> Self {
        let width = match op {
            Concat => lhs.width() + rhs.width(),
            _ => {
                assert_eq!(
                    lhs.width(),
                    rhs.width(),
                    "operand widths differ for {op:?}:\n{lhs:?}\n{rhs:?}"
                );
                if op.is_comparison() { BOOL_WIDTH } else { lhs.width() }
            }
        };
        expr!(BinOp { op, lhs, rhs }, width)
    }

    /// `condition ? true_value : false_value`
    pub fn select(condition: Expr, true_value: Expr, false_value: Expr) -> Self {
        assert!(condition.is_bool(), "select condition must be boolean: {condition:?}");
        assert_eq!(
            true_value.width(),
            false_value.width(),
            "select branches must have one width:\n{true_value:?}\n{false_value:?}"
        );
        let width = true_value.width();
        expr!(Select { condition, true_value, false_value }, width)
    }

    /// The array value that is `next` everywhere except at `index`.
    pub fn upd(index: Expr, value: Expr, next: Expr) -> Self {
        let width = next.width();
        expr!(Upd { index, value, next }, width)
    }

    /// `self == 0` at the operand width; the standard negation of a query.
    pub fn is_zero(self) -> Self {
        let width = self.width();
        self.eq(Expr::int_constant(0, width))
    }
}

/// Binary-operator conveniences
impl Expr {
    pub fn add(self, rhs: Expr) -> Self {
        Expr::binop(Add, self, rhs)
    }

    pub fn sub(self, rhs: Expr) -> Self {
        Expr::binop(Sub, self, rhs)
    }

    pub fn mul(self, rhs: Expr) -> Self {
        Expr::binop(Mul, self, rhs)
    }

    pub fn udiv(self, rhs: Expr) -> Self {
        Expr::binop(Udiv, self, rhs)
    }

    pub fn sdiv(self, rhs: Expr) -> Self {
        Expr::binop(Sdiv, self, rhs)
    }

    pub fn urem(self, rhs: Expr) -> Self {
        Expr::binop(Urem, self, rhs)
    }

    pub fn srem(self, rhs: Expr) -> Self {
        Expr::binop(Srem, self, rhs)
    }

    pub fn and(self, rhs: Expr) -> Self {
        Expr::binop(And, self, rhs)
    }

    pub fn or(self, rhs: Expr) -> Self {
        Expr::binop(Or, self, rhs)
    }

    pub fn xor(self, rhs: Expr) -> Self {
        Expr::binop(Xor, self, rhs)
    }

    pub fn shl(self, rhs: Expr) -> Self {
        Expr::binop(Shl, self, rhs)
    }

    pub fn lshr(self, rhs: Expr) -> Self {
        Expr::binop(Lshr, self, rhs)
    }

    pub fn ashr(self, rhs: Expr) -> Self {
        Expr::binop(Ashr, self, rhs)
    }

    pub fn eq(self, rhs: Expr) -> Self {
        Expr::binop(Eq, self, rhs)
    }

    pub fn ne(self, rhs: Expr) -> Self {
        Expr::binop(Ne, self, rhs)
    }

    pub fn ult(self, rhs: Expr) -> Self {
        Expr::binop(Ult, self, rhs)
    }

    pub fn ule(self, rhs: Expr) -> Self {
        Expr::binop(Ule, self, rhs)
    }

    pub fn ugt(self, rhs: Expr) -> Self {
        Expr::binop(Ugt, self, rhs)
    }

    pub fn uge(self, rhs: Expr) -> Self {
        Expr::binop(Uge, self, rhs)
    }

    pub fn slt(self, rhs: Expr) -> Self {
        Expr::binop(Slt, self, rhs)
    }

    pub fn sle(self, rhs: Expr) -> Self {
        Expr::binop(Sle, self, rhs)
    }

    pub fn sgt(self, rhs: Expr) -> Self {
        Expr::binop(Sgt, self, rhs)
    }

    pub fn sge(self, rhs: Expr) -> Self {
        Expr::binop(Sge, self, rhs)
    }

    pub fn concat(self, rhs: Expr) -> Self {
        Expr::binop(Concat, self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{Array, UpdateList};

    #[test]
    fn constant_predicates() {
        assert!(Expr::bool_true().is_true());
        assert!(Expr::bool_false().is_false());
        assert!(!Expr::bool_false().is_true());
        // A wide 1 is not the boolean true.
        assert!(!Expr::int_constant(1, 32).is_true());
        assert!(Expr::int_constant(7, 32).is_constant());
        assert!(!Expr::wp_var("x", 32).is_constant());
    }

    #[test]
    fn widths_follow_operators() {
        let x = Expr::wp_var("x", 32);
        let y = Expr::wp_var("y", 32);
        assert_eq!(x.clone().add(y.clone()).width(), 32);
        assert_eq!(x.clone().eq(y.clone()).width(), BOOL_WIDTH);
        assert_eq!(x.clone().concat(y.clone()).width(), 64);
        assert_eq!(x.clone().zext(64).width(), 64);
        assert_eq!(x.clone().extract(8, 8).width(), 8);
        assert_eq!(x.clone().is_nan().width(), BOOL_WIDTH);
        assert_eq!(
            Expr::select(x.clone().eq(y.clone()), x.clone(), y.clone()).width(),
            32
        );
        assert!(x.is_zero().is_bool());
    }

    #[test]
    fn structural_equality() {
        let five = Expr::int_constant(5, 32);
        let e1 = Expr::wp_var("x", 32).add(five.clone());
        let e2 = Expr::wp_var("x", 32).add(five.clone());
        let e3 = Expr::wp_var("y", 32).add(five);
        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
    }

    #[test]
    fn read_equality_tracks_array_identity() {
        let idx = Expr::int_constant(0, 32);
        let a = Array::new("buf", 4, 8);
        let b = Array::new("buf", 4, 8);
        let read_a = Expr::read(UpdateList::new(a.clone()), idx.clone());
        let read_a2 = Expr::read(UpdateList::new(a), idx.clone());
        let read_b = Expr::read(UpdateList::new(b), idx);
        assert_eq!(read_a, read_a2);
        assert_ne!(read_a, read_b);
        assert_eq!(read_a.width(), 8);
    }
}
