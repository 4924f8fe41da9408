//! Comparator strategies and a stable merge sort.
//!
//! Ordered collections need two things that `slice::sort` does not give
//! them: an ordering that can be chosen at runtime and stored as a value, and
//! a sort whose behaviour (stability, comparison pattern, error handling) is
//! fixed by this crate rather than by the standard library version.
//!
//! ```text
//! Comparator     - strategy value: compare(a, b) -> Ordering
//! sort / sort_by - stable, O(n log n), never requires T: Clone
//! try_sort_by    - same, comparator may fail; input untouched on error
//! ```
//!
//! # Quick Start
//!
//! ```
//! use strand_sort::{ComparatorExt, NaturalComparator, sort};
//!
//! let mut files = vec!["log10.txt", "log9.txt", "Log1.txt"];
//! sort(&mut files, &NaturalComparator::case_insensitive());
//! assert_eq!(files, ["Log1.txt", "log9.txt", "log10.txt"]);
//!
//! sort(&mut files, &NaturalComparator::case_insensitive().reversed());
//! assert_eq!(files, ["log10.txt", "log9.txt", "Log1.txt"]);
//! ```
//!
//! # Comparators
//!
//! | Comparator | Order |
//! |------------|-------|
//! | [`OrdComparator`] | the operands' own `Ord` |
//! | [`IntComparator`] | integers, including integer JSON values |
//! | [`FloatComparator`] | IEEE total order, including float JSON values |
//! | [`NaturalComparator`] | strings with digit runs compared by magnitude |
//! | [`FnComparator`] | sign of a caller-supplied function |
//!
//! Any comparator can be flipped with [`ComparatorExt::reversed`] and
//! chained with [`ComparatorExt::then`].

#![warn(missing_docs)]

pub mod comparator;
pub mod natural;
pub mod sort;

pub use comparator::{
    Comparator, ComparatorExt, FloatComparator, FnComparator, IntComparator, OrdComparator, Reverse,
    Sign, Then,
};
pub use natural::{NaturalComparator, natural_cmp};
pub use sort::{INSERTION_CUTOFF, is_sorted_by, sort, sort_by, try_sort_by};
