//! Total-order strategies.
//!
//! A [`Comparator`] decides how two values order, independently of the
//! values' own `Ord` (if any). Collections store a comparator once, at
//! configuration time, and hand it to [`sort`](crate::sort()) or to their own
//! ordered logic.
//!
//! Contract: `compare` must be a strict weak ordering. It is antisymmetric,
//! transitive, and `compare(a, a) == Equal`. Sorting with a comparator that
//! breaks the contract never panics or loses elements, but the resulting
//! order is unspecified.
//!
//! # Built-ins
//!
//! | Comparator | Operands | Order |
//! |------------|----------|-------|
//! | [`OrdComparator`] | any `T: Ord` | `Ord::cmp` |
//! | [`IntComparator`] | primitive integers, integer JSON values | numeric |
//! | [`FloatComparator`] | `f32`, `f64`, float JSON values | IEEE total order |
//! | [`NaturalComparator`](crate::NaturalComparator) | strings | digit runs by magnitude |
//! | [`FnComparator`] | anything | sign of a wrapped function |

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use std::rc::Rc;

use serde_json::Value;

/// A total-order strategy over `T`.
pub trait Comparator<T: ?Sized> {
    /// Orders `a` relative to `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Adapters available on every comparator.
///
/// Kept apart from [`Comparator`] so that a comparator implemented for
/// several operand types can be adapted without naming one of them.
///
/// ```
/// use strand_sort::{Comparator, ComparatorExt, IntComparator, OrdComparator};
///
/// let desc = IntComparator.reversed();
/// assert!(desc.compare(&1u8, &2u8).is_gt());
///
/// let by_len = strand_sort::FnComparator::new(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// assert!(by_len.then(OrdComparator).compare(&"b", &"a").is_gt());
/// ```
pub trait ComparatorExt: Sized {
    /// Returns a comparator with the opposite order.
    #[inline]
    fn reversed(self) -> Reverse<Self> {
        Reverse(self)
    }

    /// Returns a comparator that consults `next` when `self` finds a tie.
    #[inline]
    fn then<B>(self, next: B) -> Then<Self, B> {
        Then(self, next)
    }
}

impl<C> ComparatorExt for C {}

impl<T: ?Sized, C: Comparator<T> + ?Sized> Comparator<T> for &C {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (**self).compare(a, b)
    }
}

impl<T: ?Sized, C: Comparator<T> + ?Sized> Comparator<T> for Box<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (**self).compare(a, b)
    }
}

impl<T: ?Sized, C: Comparator<T> + ?Sized> Comparator<T> for Rc<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (**self).compare(a, b)
    }
}

// =============================================================================
// OrdComparator
// =============================================================================

/// Delegates to the operands' own [`Ord`] capability.
///
/// ```
/// use std::cmp::Ordering;
/// use strand_sort::{Comparator, OrdComparator};
///
/// assert_eq!(OrdComparator.compare("a", "b"), Ordering::Less);
/// assert_eq!(OrdComparator.compare(&(1, 2), &(1, 2)), Ordering::Equal);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrdComparator;

impl<T: Ord + ?Sized> Comparator<T> for OrdComparator {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

// =============================================================================
// IntComparator
// =============================================================================

/// Native order of integers.
///
/// Also orders integer `serde_json::Value`s. Handing it a non-integer value
/// is a contract violation, caught by a debug assertion; release builds fall
/// back to an unspecified but panic-free order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntComparator;

macro_rules! impl_int_comparator {
    ($($ty:ty),*) => {
        $(
            impl Comparator<$ty> for IntComparator {
                #[inline]
                fn compare(&self, a: &$ty, b: &$ty) -> Ordering {
                    a.cmp(b)
                }
            }
        )*
    };
}

impl_int_comparator!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

fn json_int(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
}

impl Comparator<Value> for IntComparator {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let (x, y) = (json_int(a), json_int(b));
        debug_assert!(
            x.is_some() && y.is_some(),
            "contract violation: IntComparator requires integer operands, got {a} and {b}"
        );
        x.cmp(&y)
    }
}

// =============================================================================
// FloatComparator
// =============================================================================

/// IEEE 754 total order of floats (`-NaN < -inf < ... < -0.0 < 0.0 < ... < inf < NaN`).
///
/// Also orders float `serde_json::Value`s. Handing it a value that is not a
/// float is a contract violation, caught by a debug assertion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatComparator;

impl Comparator<f64> for FloatComparator {
    #[inline]
    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }
}

impl Comparator<f32> for FloatComparator {
    #[inline]
    fn compare(&self, a: &f32, b: &f32) -> Ordering {
        a.total_cmp(b)
    }
}

impl Comparator<Value> for FloatComparator {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        debug_assert!(
            a.is_f64() && b.is_f64(),
            "contract violation: FloatComparator requires float operands, got {a} and {b}"
        );
        let x = a.as_f64().unwrap_or(f64::NAN);
        let y = b.as_f64().unwrap_or(f64::NAN);
        x.total_cmp(&y)
    }
}

// =============================================================================
// FnComparator
// =============================================================================

/// A comparison result whose sign carries the order.
pub trait Sign {
    /// Maps negative to `Less`, zero to `Equal`, positive to `Greater`.
    fn sign(&self) -> Ordering;
}

macro_rules! impl_sign_int {
    ($($ty:ty),*) => {
        $(
            impl Sign for $ty {
                #[inline]
                fn sign(&self) -> Ordering {
                    self.cmp(&0)
                }
            }
        )*
    };
}

impl_sign_int!(i8, i16, i32, i64, i128, isize);

impl Sign for f64 {
    /// `NaN` counts as zero.
    #[inline]
    fn sign(&self) -> Ordering {
        self.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
    }
}

impl Sign for f32 {
    #[inline]
    fn sign(&self) -> Ordering {
        self.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
    }
}

impl Sign for Ordering {
    #[inline]
    fn sign(&self) -> Ordering {
        *self
    }
}

/// Wraps a caller-supplied comparison function.
///
/// Only the sign of the function's result matters, so the classic
/// "subtract the keys" style works unchanged:
///
/// ```
/// use std::cmp::Ordering;
/// use strand_sort::{Comparator, FnComparator};
///
/// let by_len = FnComparator::new(|a: &&str, b: &&str| a.len() as i64 - b.len() as i64);
/// assert_eq!(by_len.compare(&"ab", &"abcd"), Ordering::Less);
/// ```
pub struct FnComparator<F, R = Ordering> {
    f: F,
    _result: PhantomData<fn() -> R>,
}

impl<F, R> FnComparator<F, R> {
    /// Wraps `f`.
    pub fn new<T: ?Sized>(f: F) -> Self
    where
        F: Fn(&T, &T) -> R,
        R: Sign,
    {
        Self {
            f,
            _result: PhantomData,
        }
    }

    /// Returns the wrapped function.
    pub fn into_inner(self) -> F {
        self.f
    }
}

impl<F: Clone, R> Clone for FnComparator<F, R> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _result: PhantomData,
        }
    }
}

impl<F, R> fmt::Debug for FnComparator<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnComparator")
    }
}

impl<T, F, R> Comparator<T> for FnComparator<F, R>
where
    T: ?Sized,
    F: Fn(&T, &T) -> R,
    R: Sign,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.f)(a, b).sign()
    }
}

// =============================================================================
// Adapters
// =============================================================================

/// Flips the order of the wrapped comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Breaks ties of the first comparator with the second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Then<A, B>(pub A, pub B);

impl<T: ?Sized, A: Comparator<T>, B: Comparator<T>> Comparator<T> for Then<A, B> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(a, b).then_with(|| self.1.compare(a, b))
    }
}
