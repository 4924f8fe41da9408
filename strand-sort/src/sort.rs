//! Stable merge sort driven by a [`Comparator`].
//!
//! # Algorithm
//!
//! Top-down merge sort over two equal-sized position buffers that swap roles
//! at each recursion level:
//!
//! ```text
//! [lo, hi) with hi - lo <= INSERTION_CUTOFF  -> stable insertion sort
//! otherwise                                  -> sort both halves into the
//!                                               other buffer, then merge
//! left tail <= right head                    -> halves already in order, copy
//! ```
//!
//! Merging takes from the left half unless its head is strictly greater than
//! the right head, which is what makes the sort stable.
//!
//! The buffers hold positions, not elements: the element type needs no
//! `Clone`, and the sequence itself is only touched once the final order is
//! known. The permutation is then applied in place by following cycles.
//!
//! # Cost
//!
//! | | |
//! |-|-|
//! | Comparisons | O(n log n) |
//! | Auxiliary space | two `usize` buffers of length n |
//! | Element moves | at most n - 1 swaps |

use core::cmp::Ordering;
use core::convert::Infallible;

use crate::Comparator;

/// Ranges at or below this length are insertion sorted.
pub const INSERTION_CUTOFF: usize = 8;

/// Sorts `seq` in place, stably, using `comparator`.
///
/// ```
/// use strand_sort::{FnComparator, sort};
///
/// let mut pairs = [("a", 1), ("b", 1), ("a", 0)];
/// let by_count = FnComparator::new(|x: &(&str, i32), y: &(&str, i32)| x.1 - y.1);
/// sort(&mut pairs, &by_count);
///
/// assert_eq!(pairs, [("a", 0), ("a", 1), ("b", 1)]);
/// ```
pub fn sort<T, C>(seq: &mut [T], comparator: &C)
where
    C: Comparator<T> + ?Sized,
{
    sort_by(seq, |a, b| comparator.compare(a, b));
}

/// Sorts `seq` in place, stably, with a comparison closure.
pub fn sort_by<T, F>(seq: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let Ok(()) = try_sort_by::<T, Infallible, _>(seq, |a, b| Ok(compare(a, b)));
}

/// Sorts `seq` in place, stably, with a fallible comparison closure.
///
/// # Errors
///
/// Returns the first error produced by `compare`, unmodified. `seq` is left
/// exactly as it was.
///
/// ```
/// use std::cmp::Ordering;
/// use strand_sort::try_sort_by;
///
/// let mut seq = vec!["3", "1", "x", "2"];
/// let err = try_sort_by(&mut seq, |a, b| {
///     let a: i32 = a.parse()?;
///     let b: i32 = b.parse()?;
///     Ok::<Ordering, std::num::ParseIntError>(a.cmp(&b))
/// })
/// .unwrap_err();
///
/// assert_eq!(err.to_string(), "invalid digit found in string");
/// assert_eq!(seq, ["3", "1", "x", "2"]);
/// ```
pub fn try_sort_by<T, E, F>(seq: &mut [T], mut compare: F) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    let len = seq.len();
    if len < 2 {
        return Ok(());
    }

    let mut src: Vec<usize> = (0..len).collect();
    let mut dst = src.clone();

    {
        let elements: &[T] = seq;
        let mut greater = |x: usize, y: usize| -> Result<bool, E> {
            Ok(compare(&elements[x], &elements[y])? == Ordering::Greater)
        };
        merge_sort(&mut src, &mut dst, 0, len, &mut greater)?;
    }

    apply_permutation(seq, &mut dst);
    Ok(())
}

/// Returns `true` if no element of `seq` is greater than its successor.
pub fn is_sorted_by<T, C>(seq: &[T], comparator: &C) -> bool
where
    C: Comparator<T> + ?Sized,
{
    seq.windows(2)
        .all(|pair| comparator.compare(&pair[0], &pair[1]) != Ordering::Greater)
}

// =============================================================================
// Internals
// =============================================================================

/// Sorts positions `[lo, hi)` into `dst`.
///
/// On entry `src` and `dst` hold the same positions over `[lo, hi)`. On exit
/// `dst` holds them in order and `src` is scratch.
fn merge_sort<E, G>(
    src: &mut [usize],
    dst: &mut [usize],
    lo: usize,
    hi: usize,
    greater: &mut G,
) -> Result<(), E>
where
    G: FnMut(usize, usize) -> Result<bool, E>,
{
    if hi - lo <= INSERTION_CUTOFF {
        return insertion_sort(dst, lo, hi, greater);
    }

    let mid = lo + (hi - lo) / 2;
    merge_sort(dst, src, lo, mid, greater)?;
    merge_sort(dst, src, mid, hi, greater)?;

    if !greater(src[mid - 1], src[mid])? {
        dst[lo..hi].copy_from_slice(&src[lo..hi]);
        return Ok(());
    }

    let (mut p, mut q) = (lo, mid);
    for slot in &mut dst[lo..hi] {
        let take_left = q >= hi || (p < mid && !greater(src[p], src[q])?);
        if take_left {
            *slot = src[p];
            p += 1;
        } else {
            *slot = src[q];
            q += 1;
        }
    }

    Ok(())
}

fn insertion_sort<E, G>(buf: &mut [usize], lo: usize, hi: usize, greater: &mut G) -> Result<(), E>
where
    G: FnMut(usize, usize) -> Result<bool, E>,
{
    for i in lo + 1..hi {
        let mut j = i;
        while j > lo && greater(buf[j - 1], buf[j])? {
            buf.swap(j - 1, j);
            j -= 1;
        }
    }
    Ok(())
}

/// Reorders `seq` so that `seq[k]` becomes the element previously at
/// `order[k]`. Consumes `order` (it ends as the identity).
fn apply_permutation<T>(seq: &mut [T], order: &mut [usize]) {
    for start in 0..order.len() {
        if order[start] == start {
            continue;
        }

        let mut cur = start;
        loop {
            let next = order[cur];
            order[cur] = cur;
            if next == start {
                break;
            }
            seq.swap(cur, next);
            cur = next;
        }
    }
}
