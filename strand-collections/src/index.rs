//! Bucket link type.
//!
//! A link is a plain unsigned integer addressing a storage slot. The
//! integer's `MAX` is reserved to mean "no bucket", so a bucket pays one
//! integer per link rather than an `Option` wrapper. [`Index::get`] turns a
//! link into an explicit `Option` wherever it leaves the chain internals.

use core::fmt;

/// An unsigned slot address with a reserved "no link" value.
///
/// ```
/// use strand_collections::Index;
///
/// assert_eq!(3u32.get(), Some(3));
/// assert_eq!(u32::NONE.get(), None);
///
/// // The sentinel itself is never handed out as a slot.
/// assert_eq!(u16::try_from_slot(65_535), None);
/// assert_eq!(u16::try_from_slot(65_534), Some(65_534));
/// ```
pub trait Index: Copy + Eq + fmt::Debug {
    /// The "no link" value.
    const NONE: Self;

    /// Returns `None` for [`NONE`](Self::NONE), `Some(self)` otherwise.
    fn get(self) -> Option<Self>;

    /// Returns `true` unless this is [`NONE`](Self::NONE).
    #[inline]
    fn is_some(self) -> bool {
        self.get().is_some()
    }

    /// Slot position addressed by this link.
    fn slot(self) -> usize;

    /// Link for slot position `slot`, or `None` if the position does not fit
    /// below the sentinel.
    fn try_from_slot(slot: usize) -> Option<Self>;
}

macro_rules! unsigned_links {
    ($($ty:ty),*) => {$(
        impl Index for $ty {
            const NONE: Self = <$ty>::MAX;

            #[inline]
            fn get(self) -> Option<Self> {
                (self != Self::NONE).then_some(self)
            }

            #[inline]
            fn slot(self) -> usize {
                self as usize
            }

            #[inline]
            fn try_from_slot(slot: usize) -> Option<Self> {
                <$ty>::try_from(slot).ok().and_then(Index::get)
            }
        }
    )*};
}

unsigned_links!(u16, u32, u64, usize);
