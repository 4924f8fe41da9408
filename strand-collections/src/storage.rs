//! Arenas that hand out stable slot indices.
//!
//! A chain never holds a pointer to a bucket, only the index its storage
//! returned on insert. Any arena that keeps those indices valid until the
//! value is removed can back a chain.

use core::mem;

use crate::Index;

/// An arena of `T` addressed by stable indices.
///
/// An index returned by [`insert`](Self::insert) keeps addressing the same
/// value until that value is removed; afterwards the slot may be handed out
/// again. Every operation is O(1).
///
/// | Storage | Index | Notes |
/// |---------|-------|-------|
/// | `slab::Slab<T>` | `usize` | default for chains |
/// | [`VecStorage<T, Idx>`] | `Idx` (default `u32`) | narrower links |
pub trait Storage<T> {
    /// Slot address type.
    type Index: Index;

    /// Stores `value` and returns its index.
    fn insert(&mut self, value: T) -> Self::Index;

    /// Takes the value out of slot `index`. `None` if the slot is vacant.
    fn remove(&mut self, index: Self::Index) -> Option<T>;

    /// Value in slot `index`, if occupied.
    fn get(&self, index: Self::Index) -> Option<&T>;

    /// Mutable value in slot `index`, if occupied.
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T>;

    /// Number of stored values.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is stored.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every value and forgets every index.
    fn clear(&mut self);
}

impl<T> Storage<T> for slab::Slab<T> {
    type Index = usize;

    #[inline]
    fn insert(&mut self, value: T) -> usize {
        slab::Slab::insert(self, value)
    }

    #[inline]
    fn remove(&mut self, index: usize) -> Option<T> {
        self.try_remove(index)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        slab::Slab::get(self, index)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, index)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        slab::Slab::clear(self);
    }
}

// =============================================================================
// VecStorage
// =============================================================================

#[derive(Debug, Clone)]
enum Entry<T, Idx> {
    Full(T),
    /// Vacant, pointing at the next vacant slot.
    Free(Idx),
}

/// A `Vec`-backed arena with a chosen index width.
///
/// Freed slots are threaded into a free list and reused most recent first.
/// With the default `u32` index a bucket's two links take eight bytes.
///
/// ```
/// use strand_collections::{Storage, VecStorage};
///
/// let mut arena: VecStorage<&str, u16> = VecStorage::new();
/// let a = arena.insert("a");
/// let b = arena.insert("b");
///
/// assert_eq!(arena.remove(a), Some("a"));
/// assert_eq!(arena.insert("c"), a);
/// assert_eq!(arena.get(b), Some(&"b"));
/// assert_eq!(arena.slots(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct VecStorage<T, Idx: Index = u32> {
    entries: Vec<Entry<T, Idx>>,
    free: Idx,
    len: usize,
}

impl<T, Idx: Index> VecStorage<T, Idx> {
    /// Creates an empty arena.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Idx::NONE,
            len: 0,
        }
    }

    /// Creates an empty arena that can hold `capacity` values without
    /// reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Number of slots ever allocated, occupied or not.
    #[inline]
    pub fn slots(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, index: Idx) -> Option<&T> {
        match self.entries.get(index.slot())? {
            Entry::Full(value) => Some(value),
            Entry::Free(_) => None,
        }
    }
}

impl<T, Idx: Index> Default for VecStorage<T, Idx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Idx: Index> Storage<T> for VecStorage<T, Idx> {
    type Index = Idx;

    /// # Panics
    ///
    /// Panics if every address of `Idx` below its sentinel is taken.
    fn insert(&mut self, value: T) -> Idx {
        let index = match self.free.get() {
            Some(index) => {
                let entry = mem::replace(&mut self.entries[index.slot()], Entry::Full(value));
                if let Entry::Free(next) = entry {
                    self.free = next;
                }
                index
            }
            None => {
                let Some(index) = Idx::try_from_slot(self.entries.len()) else {
                    panic!("VecStorage is out of {} addresses", core::any::type_name::<Idx>());
                };
                self.entries.push(Entry::Full(value));
                index
            }
        };
        self.len += 1;
        index
    }

    fn remove(&mut self, index: Idx) -> Option<T> {
        let entry = self.entries.get_mut(index.slot())?;
        if let Entry::Free(_) = entry {
            return None;
        }

        let Entry::Full(value) = mem::replace(entry, Entry::Free(self.free)) else {
            return None;
        };
        self.free = index;
        self.len -= 1;
        Some(value)
    }

    #[inline]
    fn get(&self, index: Idx) -> Option<&T> {
        self.entry(index)
    }

    #[inline]
    fn get_mut(&mut self, index: Idx) -> Option<&mut T> {
        match self.entries.get_mut(index.slot())? {
            Entry::Full(value) => Some(value),
            Entry::Free(_) => None,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.free = Idx::NONE;
        self.len = 0;
    }
}
