// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! The symbolic expression model shared by the interpolation core.
//!
//! Expressions form a closed, typed grammar of immutable nodes ([expr::ExprValue])
//! with fixed arity per tag. Nodes are reference counted and structurally shared,
//! so a rewritten tree reuses every untouched subtree of its input. Three kinds of
//! identity exist in the model:
//! 1. [Name] is an interned identifier; comparison is O(1) and stable for the
//!    lifetime of the process.
//! 2. [array::Array] is a versioned memory object; arrays compare by identity,
//!    never by structural value.
//! 3. Everything else compares structurally, via derived equality on the grammar.
//!
//! A read from an array is resolved against an [array::UpdateList]: the ordered
//! history of symbolic writes applied to that array, newest write first.

mod name;
pub use name::{InternName, Name};
pub mod array;
pub mod expr;
pub use array::{Array, UpdateList, UpdateNode};
pub use expr::{
    BinaryOperator, CastOperator, Expr, ExprValue, RoundingMode, UnaryOperator, Width, BOOL_WIDTH,
};
