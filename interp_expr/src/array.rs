// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Arrays and their symbolic write histories.

use crate::expr::{Expr, Width};
use crate::Name;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An immutable named entity representing one versioned memory object.
///
/// Two arrays are the same array only if they were created by the same call to
/// [Array::new]; the name is for diagnostics and solver declarations, and two
/// distinct arrays may share it (e.g. a live array and its shadow counterpart
/// before renaming). Equality and hashing therefore go through the allocation
/// identity, which is stable and O(1).
#[derive(Clone)]
pub struct Array(Arc<ArrayData>);

#[derive(Debug)]
struct ArrayData {
    name: Name,
    /// Number of cells in the array.
    size: u64,
    /// Bit-width of each cell.
    range: Width,
}

impl Array {
    pub fn new<T: Into<Name>>(name: T, size: u64, range: Width) -> Self {
        Array(Arc::new(ArrayData { name: name.into(), size, range }))
    }

    pub fn name(&self) -> Name {
        self.0.name
    }

    pub fn size(&self) -> u64 {
        self.0.size
    }

    pub fn range(&self) -> Width {
        self.0.range
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Array {}

impl Hash for Array {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl std::fmt::Debug for Array {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(fmt, "Array({:?}[{}] x{})", self.0.name, self.0.range, self.0.size)
    }
}

/// One symbolic write in an array's history.
#[derive(Debug, PartialEq, Eq)]
pub struct UpdateNode {
    index: Expr,
    value: Expr,
    /// The next-older write, or `None` at the end of the history.
    next: Option<Arc<UpdateNode>>,
}

impl UpdateNode {
    pub fn new(index: Expr, value: Expr, next: Option<Arc<UpdateNode>>) -> Self {
        UpdateNode { index, value, next }
    }

    pub fn index(&self) -> &Expr {
        &self.index
    }

    pub fn value(&self) -> &Expr {
        &self.value
    }

    pub fn next(&self) -> Option<&Arc<UpdateNode>> {
        self.next.as_ref()
    }
}

impl Hash for UpdateNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.value.hash(state);
        self.next.hash(state);
    }
}

/// The ordered history of writes applied to an array, newest write at the head.
///
/// A read at index `i` walks the list from the head until it finds a write whose
/// index matches `i`, falling through to the root array if none does. The list
/// is persistent: [UpdateList::extend] shares the entire existing history with
/// the extended copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdateList {
    root: Array,
    head: Option<Arc<UpdateNode>>,
}

impl UpdateList {
    /// An empty history over `root`.
    pub fn new(root: Array) -> Self {
        UpdateList { root, head: None }
    }

    /// Reassemble a history from a (possibly rewritten) root and chain head.
    pub fn from_parts(root: Array, head: Option<Arc<UpdateNode>>) -> Self {
        UpdateList { root, head }
    }

    pub fn root(&self) -> &Array {
        &self.root
    }

    pub fn head(&self) -> Option<&Arc<UpdateNode>> {
        self.head.as_ref()
    }

    /// Record a new write, which becomes the newest entry of the history.
    pub fn extend(&self, index: Expr, value: Expr) -> Self {
        UpdateList {
            root: self.root.clone(),
            head: Some(Arc::new(UpdateNode::new(index, value, self.head.clone()))),
        }
    }

    /// Number of writes in the history.
    pub fn len(&self) -> usize {
        let mut n = 0;
        let mut cursor = self.head.as_ref();
        while let Some(node) = cursor {
            n += 1;
            cursor = node.next();
        }
        n
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Expr, BOOL_WIDTH};

    #[test]
    fn array_identity_not_structural() {
        let a = Array::new("buf", 4, 8);
        let b = Array::new("buf", 4, 8);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn update_list_orders_writes_newest_first() {
        let a = Array::new("buf", 4, 8);
        let ul = UpdateList::new(a)
            .extend(Expr::int_constant(0, 32), Expr::int_constant(1, 8))
            .extend(Expr::int_constant(0, 32), Expr::int_constant(2, 8));

        assert_eq!(ul.len(), 2);
        let head = ul.head().unwrap();
        assert_eq!(head.value(), &Expr::int_constant(2, 8));
        assert_eq!(head.next().unwrap().value(), &Expr::int_constant(1, 8));
        assert!(head.next().unwrap().next().is_none());
    }

    #[test]
    fn empty_update_list() {
        let ul = UpdateList::new(Array::new("flag", 1, BOOL_WIDTH));
        assert!(ul.is_empty());
        assert_eq!(ul.len(), 0);
    }
}
