//! Natural-order string comparison.
//!
//! Runs of ASCII digits compare by numeric magnitude, everything else byte by
//! byte:
//!
//! ```text
//! byte order:    file1  file10  file2
//! natural order: file1  file2   file10
//! ```
//!
//! Magnitudes are compared on the digit text itself (length after stripping
//! leading zeros, then digits), so runs of any length work without overflow.

use core::cmp::Ordering;

use crate::Comparator;

/// Natural-order comparator for strings.
///
/// Equal magnitudes written with a different number of leading zeros are
/// ordered by the zeros, fewer first. If two strings still tie, plain byte
/// order decides, so only identical strings compare `Equal`.
///
/// ```
/// use std::cmp::Ordering;
/// use strand_sort::{Comparator, NaturalComparator};
///
/// let natural = NaturalComparator::new();
/// assert_eq!(natural.compare("item2", "item10"), Ordering::Less);
///
/// let folded = NaturalComparator::case_insensitive();
/// assert_eq!(folded.compare("IMG12", "img3"), Ordering::Greater);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalComparator {
    fold_case: bool,
}

impl NaturalComparator {
    /// Creates a case-sensitive natural comparator.
    pub const fn new() -> Self {
        Self { fold_case: false }
    }

    /// Creates a comparator that ignores ASCII case outside digit runs.
    pub const fn case_insensitive() -> Self {
        Self { fold_case: true }
    }

    /// Returns `true` if ASCII case is folded.
    pub const fn folds_case(&self) -> bool {
        self.fold_case
    }
}

impl Comparator<str> for NaturalComparator {
    #[inline]
    fn compare(&self, a: &str, b: &str) -> Ordering {
        compare_bytes(a.as_bytes(), b.as_bytes(), self.fold_case)
    }
}

impl Comparator<String> for NaturalComparator {
    #[inline]
    fn compare(&self, a: &String, b: &String) -> Ordering {
        compare_bytes(a.as_bytes(), b.as_bytes(), self.fold_case)
    }
}

impl Comparator<&str> for NaturalComparator {
    #[inline]
    fn compare(&self, a: &&str, b: &&str) -> Ordering {
        compare_bytes(a.as_bytes(), b.as_bytes(), self.fold_case)
    }
}

/// Case-sensitive natural comparison of two strings.
///
/// ```
/// use std::cmp::Ordering;
/// use strand_sort::natural_cmp;
///
/// assert_eq!(natural_cmp("v1.9", "v1.10"), Ordering::Less);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    compare_bytes(a.as_bytes(), b.as_bytes(), false)
}

fn compare_bytes(a: &[u8], b: &[u8], fold_case: bool) -> Ordering {
    let (mut i, mut j) = (0, 0);
    // First difference in leading zeros, consulted only if nothing else differs.
    let mut zeros = Ordering::Equal;

    while i < a.len() && j < b.len() {
        let (x, y) = (a[i], b[j]);

        if x.is_ascii_digit() && y.is_ascii_digit() {
            let (run_a, zeros_a, end_a) = digit_run(a, i);
            let (run_b, zeros_b, end_b) = digit_run(b, j);

            let ord = run_a.len().cmp(&run_b.len()).then_with(|| run_a.cmp(run_b));
            if ord != Ordering::Equal {
                return ord;
            }
            if zeros == Ordering::Equal {
                zeros = zeros_a.cmp(&zeros_b);
            }

            i = end_a;
            j = end_b;
            continue;
        }

        let (x, y) = if fold_case {
            (x.to_ascii_lowercase(), y.to_ascii_lowercase())
        } else {
            (x, y)
        };
        if x != y {
            return x.cmp(&y);
        }
        i += 1;
        j += 1;
    }

    (a.len() - i)
        .cmp(&(b.len() - j))
        .then(zeros)
        .then_with(|| a.cmp(b))
}

/// Splits the digit run starting at `start` into its significant digits and
/// its leading-zero count. Also returns the index just past the run.
fn digit_run(bytes: &[u8], start: usize) -> (&[u8], usize, usize) {
    let mut pos = start;
    while pos < bytes.len() && bytes[pos] == b'0' {
        pos += 1;
    }
    let significant = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    (&bytes[significant..pos], significant - start, pos)
}
