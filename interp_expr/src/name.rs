// Copyright Interp Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use lazy_static::lazy_static;
use std::sync::Mutex;
use string_interner::StringInterner;
use string_interner::backend::StringBackend;
use string_interner::symbol::SymbolU32;

/// An interned identifier for arrays and program-variable placeholders.
/// The engine compares these identities on every traversal of every expression
/// tree, so they must be cheap: interning makes `Name` a `Copy` index whose
/// equality is a single integer comparison, stable for the process lifetime.
/// The downside is that interned names are never freed, so only identities that
/// live in long-lived expression trees should be interned.
///
/// We use a single global interner protected by a `Mutex` (i.e. threadsafe).
/// To create a name, either do
/// `let n: Name = s.into();` or
/// `let n = s.intern();`
#[derive(Clone, Hash, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(SymbolU32);

lazy_static! {
    static ref INTERNER: Mutex<StringInterner<StringBackend>> =
        Mutex::new(StringInterner::default());
}

impl Name {
    pub fn is_empty(&self) -> bool {
        self.map(|s| s.is_empty())
    }

    /// Apply the function `f` to the interned string, represented as an &str.
    /// Exporting the backing &str directly is blocked by lifetime rules, so
    /// callers operate on it through a closure instead.
    pub fn map<T, F: FnOnce(&str) -> T>(&self, f: F) -> T {
        f(INTERNER.lock().unwrap().resolve(self.0).unwrap())
    }

    /// The name formed by appending `suffix`, interned like any other name.
    /// This is how derived identities (a shadow array's solver declaration,
    /// a versioned rename) stay traceable to the identity they came from.
    pub fn suffixed(&self, suffix: &str) -> Name {
        // Interning happens after `map` returns; the interner lock is not
        // reentrant.
        let combined = self.map(|s| format!("{s}{suffix}"));
        combined.into()
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(fmt, "{}", INTERNER.lock().unwrap().resolve(self.0).unwrap())
    }
}

/// Custom-implement Debug, so debug logging contains meaningful strings, not numbers
impl std::fmt::Debug for Name {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(fmt, "{:?}", INTERNER.lock().unwrap().resolve(self.0).unwrap())
    }
}

impl<T> From<T> for Name
where
    T: AsRef<str>,
{
    fn from(s: T) -> Name {
        Name(INTERNER.lock().unwrap().get_or_intern(s))
    }
}

impl<T> PartialEq<T> for Name
where
    T: AsRef<str>,
{
    fn eq(&self, other: &T) -> bool {
        INTERNER.lock().unwrap().resolve(self.0).unwrap() == other.as_ref()
    }
}

pub trait InternName {
    fn intern(self) -> Name;
}

impl<T> InternName for T
where
    T: Into<Name>,
{
    fn intern(self) -> Name {
        self.into()
    }
}
