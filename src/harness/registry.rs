//! # Test Registry
//!
//! Maps symbolic test tokens to their functions and display names.
//!
//! Tokens are declared with [`unit_tests!`](crate::unit_tests), which generates
//! the token enum together with an exhaustive token → (function, name) mapping,
//! so a token can never point at the wrong test. [`Registry`] lays the records
//! out in token order and checks that layout when it is built: the record for a
//! token lives at `token.index() - FIRST.index()`, which keeps lookup a single
//! index operation.
//!
//! ```
//! use brz::harness::{Registry, TestToken};
//!
//! fn test_passes() -> bool { true }
//! fn test_fails() -> bool { false }
//!
//! brz::unit_tests! {
//!     enum Demo {
//!         Passes => test_passes,
//!         Fails => test_fails,
//!     }
//! }
//!
//! let registry = Registry::<Demo>::build().unwrap();
//! assert_eq!(registry.name_of(Demo::Fails), "test_fails");
//! assert_eq!(Demo::END, 2);
//! ```

use crate::errors::RegistryError;
use std::fmt;

/// A unit test: returns `true` on success.
pub type TestFn = fn() -> bool;

/// A symbolic identifier for one test in a suite.
pub trait TestToken: Copy + Eq + Ord + fmt::Debug + 'static {
    /// The first token; its record sits at offset zero.
    const FIRST: Self;
    /// Every real token, in order.
    const ALL: &'static [Self];
    /// Sentinel index one past the last real token. Bounds iteration only.
    const END: usize;

    fn index(self) -> usize;
    fn name(self) -> &'static str;
    fn function(self) -> TestFn;
}

/// One row of the test table.
#[derive(Clone, Copy)]
pub struct TestRecord<T> {
    pub token: T,
    pub function: TestFn,
    pub name: &'static str,
}

impl<T: TestToken> TestRecord<T> {
    pub fn new(token: T, function: TestFn, name: &'static str) -> Self {
        Self {
            token,
            function,
            name,
        }
    }

    /// The record the token's own mapping describes.
    pub fn from_token(token: T) -> Self {
        Self::new(token, token.function(), token.name())
    }
}

impl<T: fmt::Debug> fmt::Debug for TestRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestRecord")
            .field("token", &self.token)
            .field("name", &self.name)
            .finish()
    }
}

/// The ordered test table for one suite. Read-only once built.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    records: Vec<TestRecord<T>>,
}

impl<T: TestToken> Registry<T> {
    /// Builds the table from the token mapping.
    pub fn build() -> Result<Self, RegistryError> {
        Self::new(T::ALL.iter().map(|&token| TestRecord::from_token(token)))
    }

    /// Builds the table from an explicit record list, rejecting any list
    /// that is out of token order, has gaps, or is incomplete.
    pub fn new<I>(records: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = TestRecord<T>>,
    {
        let records: Vec<TestRecord<T>> = records.into_iter().collect();
        let first = T::FIRST.index();

        for (position, record) in records.iter().enumerate() {
            let index = record.token.index();
            let offset = index.wrapping_sub(first);
            if index < first || offset != position {
                return Err(RegistryError::Misordered {
                    name: record.name,
                    position,
                    offset,
                });
            }
        }

        let expected = T::END - first;
        if records.len() != expected {
            return Err(RegistryError::CountMismatch {
                expected,
                found: records.len(),
            });
        }

        Ok(Self { records })
    }

    pub fn lookup(&self, token: T) -> &TestRecord<T> {
        &self.records[token.index() - T::FIRST.index()]
    }

    pub fn function_of(&self, token: T) -> TestFn {
        self.lookup(token).function
    }

    pub fn name_of(&self, token: T) -> &'static str {
        self.lookup(token).name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in registration (token) order.
    pub fn iter(&self) -> std::slice::Iter<'_, TestRecord<T>> {
        self.records.iter()
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = &'a TestRecord<T>;
    type IntoIter = std::slice::Iter<'a, TestRecord<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Declares a suite's token enum and its token → test mapping.
///
/// Each entry is `Token => function_name`; the function's identifier becomes
/// the test's display name. The first entry is the suite's `FIRST` token.
#[macro_export]
macro_rules! unit_tests {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $first:ident => $first_fn:ident
            $(, $variant:ident => $func:ident)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $first,
            $($variant,)*
        }

        impl $crate::harness::registry::TestToken for $name {
            const FIRST: Self = $name::$first;
            const ALL: &'static [Self] = &[$name::$first, $($name::$variant,)*];
            const END: usize = <Self as $crate::harness::registry::TestToken>::ALL.len();

            fn index(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                match self {
                    $name::$first => stringify!($first_fn),
                    $($name::$variant => stringify!($func),)*
                }
            }

            fn function(self) -> $crate::harness::registry::TestFn {
                match self {
                    $name::$first => $first_fn as $crate::harness::registry::TestFn,
                    $($name::$variant => $func as $crate::harness::registry::TestFn,)*
                }
            }
        }
    };
}
