//! Order-preserving, equality-based set over a doubly linked bucket chain.
//!
//! Every item lives in its own [`Bucket`] inside the chain's storage arena.
//! Buckets are linked by index in both directions, so a located bucket is
//! spliced out in O(1) and iteration order is exactly insertion order,
//! independent of any hash function.
//!
//! Membership uses the item's own `PartialEq`, never a comparator, which
//! makes the chain usable for items that cannot be hashed meaningfully. The
//! price is an O(n) scan for `add`, `remove` and `contains`.
//!
//! # Example
//!
//! ```
//! use strand_collections::BucketChain;
//!
//! let mut chain = BucketChain::new();
//! assert!(chain.add("foo"));
//! assert!(chain.add("bar"));
//! assert!(!chain.add("foo")); // already present
//!
//! assert_eq!(chain.len(), 2);
//! assert!(chain.remove(&"foo"));
//! assert!(!chain.contains(&"foo"));
//! ```
//!
//! # Cursor
//!
//! Besides Rust iterators the chain carries one bidirectional cursor for
//! collections that expose positional, resumable iteration:
//!
//! ```
//! use strand_collections::BucketChain;
//!
//! let mut chain: BucketChain<u32> = [10, 20, 30].into_iter().collect();
//!
//! chain.end();
//! let mut seen = Vec::new();
//! while chain.valid() {
//!     seen.push((chain.key(), chain.current().copied()));
//!     chain.prev();
//! }
//! assert_eq!(seen, vec![(Some(2), Some(30)), (Some(1), Some(20)), (Some(0), Some(10))]);
//! ```
//!
//! # Cloning
//!
//! `clone()` builds fresh buckets in the same order, so structural changes to
//! either chain never show through the other. The items themselves are
//! `Clone`d: for shared handles such as `Rc<RefCell<_>>` that is a shallow
//! copy and interior mutation stays visible through both chains.

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::{Index, Storage};

/// A node in the chain: one item plus its neighbour links.
///
/// Users only see `&T`; the links are an implementation detail.
#[derive(Debug, Clone)]
pub struct Bucket<T, Idx: Index = usize> {
    item: T,
    prev: Idx,
    next: Idx,
}

impl<T, Idx: Index> Bucket<T, Idx> {
    #[inline]
    fn new(item: T, prev: Idx) -> Self {
        Self {
            item,
            prev,
            next: Idx::NONE,
        }
    }

    /// Returns the bucket's item.
    #[inline]
    pub fn item(&self) -> &T {
        &self.item
    }
}

/// Chain backed by a compact [`VecStorage`](crate::VecStorage) with `u32` links.
pub type CompactBucketChain<T> = BucketChain<T, crate::VecStorage<Bucket<T, u32>, u32>, u32>;

/// An insertion-ordered set of unique items.
///
/// # Type Parameters
///
/// - `T`: Item type, compared with its own `PartialEq`
/// - `S`: Storage arena for the buckets (default `slab::Slab`)
/// - `Idx`: Link index type, dictated by the storage (default `usize`)
pub struct BucketChain<T, S = slab::Slab<Bucket<T, usize>>, Idx: Index = usize>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
{
    storage: S,
    head: Idx,
    tail: Idx,
    len: usize,
    cursor: Idx,
    cursor_key: usize,
    _marker: PhantomData<T>,
}

impl<T> BucketChain<T> {
    /// Creates an empty slab-backed chain.
    #[inline]
    pub fn new() -> Self {
        Self::with_storage(slab::Slab::new())
    }

    /// Creates an empty slab-backed chain with room for `capacity` items.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_storage(slab::Slab::with_capacity(capacity))
    }
}

impl<T, S, Idx> Default for BucketChain<T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx> + Default,
    Idx: Index,
{
    fn default() -> Self {
        Self::with_storage(S::default())
    }
}

// =============================================================================
// Base impl - structure, links and cursor
// =============================================================================

impl<T, S, Idx> BucketChain<T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    /// Creates an empty chain over the given storage.
    ///
    /// The chain owns every bucket in `storage`; anything already stored is
    /// dropped.
    pub fn with_storage(mut storage: S) -> Self {
        storage.clear();
        Self {
            storage,
            head: Idx::NONE,
            tail: Idx::NONE,
            len: 0,
            cursor: Idx::NONE,
            cursor_key: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of items in the chain.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain holds no items.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the first item in insertion order.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.head.get().map(|idx| &self.bucket(idx).item)
    }

    /// Returns the last item in insertion order.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.tail.get().map(|idx| &self.bucket(idx).item)
    }

    /// Returns an iterator over the items in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, S, Idx> {
        Iter {
            chain: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Removes every item and unsets the cursor.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = Idx::NONE;
        self.tail = Idx::NONE;
        self.len = 0;
        self.cursor = Idx::NONE;
        self.cursor_key = 0;
    }

    /// Removes and returns the first item.
    pub fn pop_first(&mut self) -> Option<T> {
        let idx = self.head.get()?;
        Some(self.unlink(idx, 0))
    }

    /// Removes and returns the last item.
    pub fn pop_last(&mut self) -> Option<T> {
        let idx = self.tail.get()?;
        Some(self.unlink(idx, self.len - 1))
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    /// Moves the cursor to the first bucket (unset if the chain is empty).
    #[inline]
    pub fn rewind(&mut self) {
        self.cursor = self.head;
        self.cursor_key = 0;
    }

    /// Moves the cursor to the last bucket (unset if the chain is empty).
    #[inline]
    pub fn end(&mut self) {
        self.cursor = self.tail;
        self.cursor_key = self.len.saturating_sub(1);
    }

    /// Returns `true` if the cursor references a bucket.
    #[inline]
    pub fn valid(&self) -> bool {
        self.cursor.is_some()
    }

    /// Returns the item under the cursor.
    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.cursor.get().map(|idx| &self.bucket(idx).item)
    }

    /// Returns the positional index of the cursor.
    #[inline]
    pub fn key(&self) -> Option<usize> {
        self.cursor.get().map(|_| self.cursor_key)
    }

    /// Steps the cursor towards the tail.
    ///
    /// Stepping past the last bucket unsets the cursor; stepping an unset
    /// cursor does nothing.
    pub fn next(&mut self) {
        if let Some(idx) = self.cursor.get() {
            self.cursor = self.bucket(idx).next;
            self.cursor_key = if self.cursor.is_some() {
                self.cursor_key + 1
            } else {
                0
            };
        }
    }

    /// Steps the cursor towards the head.
    ///
    /// Stepping past the first bucket unsets the cursor; stepping an unset
    /// cursor does nothing.
    pub fn prev(&mut self) {
        if let Some(idx) = self.cursor.get() {
            self.cursor = self.bucket(idx).prev;
            self.cursor_key = self
                .cursor_key
                .checked_sub(1)
                .filter(|_| self.cursor.is_some())
                .unwrap_or(0);
        }
    }

    // ========================================================================
    // Links
    // ========================================================================

    #[inline]
    fn bucket(&self, idx: Idx) -> &Bucket<T, Idx> {
        self.storage
            .get(idx)
            .expect("bucket chain link points at a vacant slot")
    }

    #[inline]
    fn bucket_mut(&mut self, idx: Idx) -> &mut Bucket<T, Idx> {
        self.storage
            .get_mut(idx)
            .expect("bucket chain link points at a vacant slot")
    }

    /// Appends a new bucket at the tail without checking for duplicates.
    fn link_back(&mut self, item: T) {
        let idx = self.storage.insert(Bucket::new(item, self.tail));

        if let Some(tail) = self.tail.get() {
            self.bucket_mut(tail).next = idx;
        } else {
            self.head = idx;
        }

        self.tail = idx;
        self.len += 1;
    }

    /// Splices the bucket at `idx` (at position `pos`) out of the chain.
    fn unlink(&mut self, idx: Idx, pos: usize) -> T {
        let Bucket { item, prev, next } = self
            .storage
            .remove(idx)
            .expect("bucket chain link points at a vacant slot");

        if let Some(prev) = prev.get() {
            self.bucket_mut(prev).next = next;
        } else {
            self.head = next;
        }

        if let Some(next) = next.get() {
            self.bucket_mut(next).prev = prev;
        } else {
            self.tail = prev;
        }

        // The cursor follows the successor of a removed bucket and keeps its
        // positional key aligned with the buckets in front of it.
        if self.cursor == idx {
            self.cursor = next;
            if next.get().is_none() {
                self.cursor_key = 0;
            }
        } else if self.cursor.is_some() && pos < self.cursor_key {
            self.cursor_key -= 1;
        }

        self.len -= 1;
        item
    }
}

// =============================================================================
// Equality-based set operations
// =============================================================================

impl<T, S, Idx> BucketChain<T, S, Idx>
where
    T: PartialEq,
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    /// Locates the bucket holding an item equal to `item`, with its position.
    fn find(&self, item: &T) -> Option<(Idx, usize)> {
        let mut idx = self.head;
        let mut pos = 0;
        while let Some(current) = idx.get() {
            let bucket = self.bucket(current);
            if bucket.item == *item {
                return Some((current, pos));
            }
            idx = bucket.next;
            pos += 1;
        }
        None
    }

    /// Appends `item` unless an equal item is already present.
    ///
    /// Returns `true` if the item was inserted.
    pub fn add(&mut self, item: T) -> bool {
        if self.find(&item).is_some() {
            return false;
        }
        self.link_back(item);
        true
    }

    /// Removes the item equal to `item`.
    ///
    /// Returns `false`, leaving the chain untouched, if no such item exists.
    pub fn remove(&mut self, item: &T) -> bool {
        self.take(item).is_some()
    }

    /// Removes the item equal to `item` and returns the stored value.
    pub fn take(&mut self, item: &T) -> Option<T> {
        let (idx, pos) = self.find(item)?;
        Some(self.unlink(idx, pos))
    }

    /// Returns `true` if an item equal to `item` is present.
    pub fn contains(&self, item: &T) -> bool {
        self.find(item).is_some()
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<T, S, Idx> Clone for BucketChain<T, S, Idx>
where
    T: Clone,
    S: Storage<Bucket<T, Idx>, Index = Idx> + Default,
    Idx: Index,
{
    fn clone(&self) -> Self {
        let mut copy = Self::default();
        let mut cursor = Idx::NONE;

        let mut idx = self.head;
        while let Some(current) = idx.get() {
            let bucket = self.bucket(current);
            copy.link_back(bucket.item.clone());
            if current == self.cursor {
                cursor = copy.tail;
            }
            idx = bucket.next;
        }

        copy.cursor = cursor;
        copy.cursor_key = self.cursor_key;
        copy
    }
}

impl<T, S, Idx> fmt::Debug for BucketChain<T, S, Idx>
where
    T: fmt::Debug,
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S, Idx, S2, Idx2> PartialEq<BucketChain<T, S2, Idx2>> for BucketChain<T, S, Idx>
where
    T: PartialEq,
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    S2: Storage<Bucket<T, Idx2>, Index = Idx2>,
    Idx: Index,
    Idx2: Index,
{
    /// Chains are equal when they hold equal items in the same order.
    fn eq(&self, other: &BucketChain<T, S2, Idx2>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T, S, Idx> FromIterator<T> for BucketChain<T, S, Idx>
where
    T: PartialEq,
    S: Storage<Bucket<T, Idx>, Index = Idx> + Default,
    Idx: Index,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut chain = Self::default();
        chain.extend(iter);
        chain
    }
}

impl<T, S, Idx> Extend<T> for BucketChain<T, S, Idx>
where
    T: PartialEq,
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<'a, T, S, Idx> IntoIterator for &'a BucketChain<T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S, Idx>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S, Idx> IntoIterator for BucketChain<T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    type Item = T;
    type IntoIter = IntoIter<T, S, Idx>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { chain: self }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over a chain, in insertion order.
pub struct Iter<'a, T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    chain: &'a BucketChain<T, S, Idx>,
    front: Idx,
    back: Idx,
    remaining: usize,
}

impl<'a, T, S, Idx> Iterator for Iter<'a, T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let bucket = self.chain.bucket(self.front);
        self.front = bucket.next;
        self.remaining -= 1;
        Some(&bucket.item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, S, Idx> DoubleEndedIterator for Iter<'_, T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let bucket = self.chain.bucket(self.back);
        self.back = bucket.prev;
        self.remaining -= 1;
        Some(&bucket.item)
    }
}

impl<T, S, Idx> ExactSizeIterator for Iter<'_, T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
}

impl<T, S, Idx> FusedIterator for Iter<'_, T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
}

/// Owning iterator over a chain, in insertion order.
pub struct IntoIter<T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    chain: BucketChain<T, S, Idx>,
}

impl<T, S, Idx> Iterator for IntoIter<T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.chain.pop_first()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len, Some(self.chain.len))
    }
}

impl<T, S, Idx> DoubleEndedIterator for IntoIter<T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.chain.pop_last()
    }
}

impl<T, S, Idx> ExactSizeIterator for IntoIter<T, S, Idx>
where
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
}

// =============================================================================
// serde
// =============================================================================

#[cfg(feature = "serde")]
impl<T, S, Idx> serde::Serialize for BucketChain<T, S, Idx>
where
    T: serde::Serialize,
    S: Storage<Bucket<T, Idx>, Index = Idx>,
    Idx: Index,
{
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S, Idx> serde::Deserialize<'de> for BucketChain<T, S, Idx>
where
    T: serde::Deserialize<'de> + PartialEq,
    S: Storage<Bucket<T, Idx>, Index = Idx> + Default,
    Idx: Index,
{
    /// Rebuilds the chain from a sequence; later duplicates are dropped.
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = <Vec<T> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walks the links both ways and checks them against `len`.
    fn assert_links<T, S, Idx>(chain: &BucketChain<T, S, Idx>)
    where
        T: Clone + PartialEq + fmt::Debug,
        S: Storage<Bucket<T, Idx>, Index = Idx>,
        Idx: Index,
    {
        let mut forward = Vec::new();
        let mut idx = chain.head;
        while let Some(current) = idx.get() {
            forward.push(chain.bucket(current).item.clone());
            idx = chain.bucket(current).next;
        }

        let mut backward = Vec::new();
        let mut idx = chain.tail;
        while let Some(current) = idx.get() {
            backward.push(chain.bucket(current).item.clone());
            idx = chain.bucket(current).prev;
        }
        backward.reverse();

        assert_eq!(forward.len(), chain.len());
        assert_eq!(forward, backward);
        assert_eq!(chain.storage.len(), chain.len());
    }

    fn chain_of(items: &[&'static str]) -> BucketChain<&'static str> {
        items.iter().copied().collect()
    }

    #[test]
    fn new_chain_is_empty() {
        let chain: BucketChain<u64> = BucketChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(chain.first().is_none());
        assert!(chain.last().is_none());
        assert!(!chain.valid());
    }

    #[test]
    fn add_appends_in_order() {
        let mut chain = BucketChain::new();
        assert!(chain.add(1));
        assert!(chain.add(2));
        assert!(chain.add(3));

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.first(), Some(&1));
        assert_eq!(chain.last(), Some(&3));
        assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_links(&chain);
    }

    #[test]
    fn add_duplicate_is_noop() {
        let mut chain = chain_of(&["foo", "bar"]);
        assert!(!chain.add("foo"));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec!["foo", "bar"]);
    }

    #[test]
    fn remove_head_middle_tail() {
        let mut chain = chain_of(&["a", "b", "c", "d"]);

        assert!(chain.remove(&"b"));
        assert_links(&chain);
        assert!(chain.remove(&"a"));
        assert_links(&chain);
        assert!(chain.remove(&"d"));
        assert_links(&chain);

        assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(chain.first(), chain.last());

        assert!(chain.remove(&"c"));
        assert!(chain.is_empty());
        assert!(chain.first().is_none());
        assert_links(&chain);
    }

    #[test]
    fn remove_missing_returns_false() {
        let mut chain = chain_of(&["a", "b"]);
        assert!(!chain.remove(&"z"));
        assert_eq!(chain.len(), 2);
        assert_links(&chain);
    }

    #[test]
    fn take_returns_stored_item() {
        let mut chain: BucketChain<String> = BucketChain::new();
        chain.add("x".to_string());
        assert_eq!(chain.take(&"x".to_string()), Some("x".to_string()));
        assert_eq!(chain.take(&"x".to_string()), None);
    }

    #[test]
    fn readd_after_remove_goes_to_tail() {
        let mut chain = chain_of(&["a", "b", "c"]);
        chain.remove(&"a");
        chain.add("a");
        assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec!["b", "c", "a"]);
        assert_links(&chain);
    }

    #[test]
    fn cursor_forward_walk() {
        let mut chain = chain_of(&["a", "b", "c"]);

        chain.rewind();
        let mut seen = Vec::new();
        while chain.valid() {
            seen.push((chain.key().unwrap(), *chain.current().unwrap()));
            chain.next();
        }
        assert_eq!(seen, vec![(0, "a"), (1, "b"), (2, "c")]);
        assert_eq!(chain.current(), None);
        assert_eq!(chain.key(), None);
    }

    #[test]
    fn cursor_past_boundary_is_idempotent() {
        let mut chain = chain_of(&["a", "b"]);

        chain.end();
        chain.next();
        assert!(!chain.valid());
        chain.next();
        chain.next();
        assert!(!chain.valid());

        chain.rewind();
        chain.prev();
        assert!(!chain.valid());
        chain.prev();
        assert!(!chain.valid());
        assert_eq!(chain.key(), None);
    }

    #[test]
    fn unset_cursor_resets_key() {
        let mut chain = chain_of(&["a", "b", "c"]);

        chain.rewind();
        chain.prev();
        assert!(!chain.valid());
        assert_eq!(chain.key(), None);
        assert_eq!(chain.cursor_key, 0);

        chain.end();
        assert_eq!(chain.key(), Some(2));
        chain.next();
        assert_eq!(chain.cursor_key, 0);

        chain.end();
        assert!(chain.remove(&"c"));
        assert!(!chain.valid());
        assert_eq!(chain.cursor_key, 0);

        chain.end();
        chain.prev();
        assert_eq!(chain.key(), Some(0));
        assert_eq!(chain.current(), Some(&"a"));
    }

    #[test]
    fn cursor_on_empty_chain() {
        let mut chain: BucketChain<u8> = BucketChain::new();
        chain.rewind();
        assert!(!chain.valid());
        chain.end();
        assert!(!chain.valid());
        assert_eq!(chain.current(), None);
    }

    #[test]
    fn removing_cursor_bucket_moves_to_successor() {
        let mut chain = chain_of(&["a", "b", "c"]);
        chain.rewind();
        chain.next();
        assert_eq!(chain.current(), Some(&"b"));

        chain.remove(&"b");
        assert_eq!(chain.current(), Some(&"c"));
        assert_eq!(chain.key(), Some(1));
    }

    #[test]
    fn removing_before_cursor_shifts_key() {
        let mut chain = chain_of(&["a", "b", "c"]);
        chain.end();
        assert_eq!(chain.key(), Some(2));

        chain.remove(&"a");
        assert_eq!(chain.current(), Some(&"c"));
        assert_eq!(chain.key(), Some(1));

        chain.remove(&"c");
        assert!(!chain.valid());
    }

    #[test]
    fn clone_is_structurally_independent() {
        let mut original = chain_of(&["foo", "bar", "baz"]);
        let copy = original.clone();

        assert!(original.remove(&"foo"));
        assert!(original.remove(&"bar"));
        assert!(original.remove(&"baz"));

        assert!(original.is_empty());
        assert_eq!(copy.len(), 3);
        assert!(copy.contains(&"foo"));
        assert!(copy.contains(&"bar"));
        assert!(copy.contains(&"baz"));
        assert_links(&copy);
    }

    #[test]
    fn clone_preserves_cursor_position() {
        let mut original = chain_of(&["a", "b", "c"]);
        original.rewind();
        original.next();

        let mut copy = original.clone();
        assert_eq!(copy.current(), Some(&"b"));
        assert_eq!(copy.key(), Some(1));

        copy.next();
        assert_eq!(copy.current(), Some(&"c"));
        assert_eq!(original.current(), Some(&"b"));
    }

    #[test]
    fn clone_shares_items_shallowly() {
        use std::cell::RefCell;
        use std::rc::Rc;

        #[derive(Debug, Clone)]
        struct Shared(Rc<RefCell<u32>>);
        impl PartialEq for Shared {
            fn eq(&self, other: &Self) -> bool {
                Rc::ptr_eq(&self.0, &other.0)
            }
        }

        let cell = Rc::new(RefCell::new(1));
        let mut original = BucketChain::new();
        original.add(Shared(Rc::clone(&cell)));

        let copy = original.clone();
        *cell.borrow_mut() = 5;

        assert_eq!(*copy.first().unwrap().0.borrow(), 5);
        assert_eq!(*original.first().unwrap().0.borrow(), 5);
    }

    #[test]
    fn iter_is_double_ended_and_exact() {
        let chain = chain_of(&["a", "b", "c", "d"]);
        let mut iter = chain.iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(&"a"));
        assert_eq!(iter.next_back(), Some(&"d"));
        assert_eq!(iter.next(), Some(&"b"));
        assert_eq!(iter.next_back(), Some(&"c"));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);

        let reversed: Vec<_> = chain.iter().rev().copied().collect();
        assert_eq!(reversed, vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn into_iter_drains_in_order() {
        let chain = chain_of(&["x", "y", "z"]);
        let items: Vec<_> = chain.into_iter().collect();
        assert_eq!(items, vec!["x", "y", "z"]);

        let chain = chain_of(&["x", "y", "z"]);
        let items: Vec<_> = chain.into_iter().rev().collect();
        assert_eq!(items, vec!["z", "y", "x"]);
    }

    #[test]
    fn pop_first_and_last() {
        let mut chain = chain_of(&["a", "b", "c"]);
        assert_eq!(chain.pop_first(), Some("a"));
        assert_eq!(chain.pop_last(), Some("c"));
        assert_eq!(chain.pop_last(), Some("b"));
        assert_eq!(chain.pop_first(), None);
        assert_links(&chain);
    }

    #[test]
    fn clear_empties_and_unsets_cursor() {
        let mut chain = chain_of(&["a", "b"]);
        chain.rewind();
        chain.clear();
        assert!(chain.is_empty());
        assert!(!chain.valid());
        assert!(chain.add("a"));
        assert_links(&chain);
    }

    #[test]
    fn compact_chain_behaves_the_same() {
        let mut chain: CompactBucketChain<u64> = CompactBucketChain::default();
        for i in 0..10 {
            chain.add(i);
        }
        for i in (0..10).step_by(2) {
            assert!(chain.remove(&i));
        }
        chain.add(100);

        assert_eq!(chain.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5, 7, 9, 100]);
        assert_links(&chain);
    }

    #[test]
    fn equality_ignores_storage() {
        let a: BucketChain<u32> = [1, 2, 3].into_iter().collect();
        let b: CompactBucketChain<u32> = [1, 2, 3].into_iter().collect();
        let c: BucketChain<u32> = [3, 2, 1].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn debug_lists_items() {
        let chain = chain_of(&["a", "b"]);
        assert_eq!(format!("{chain:?}"), r#"{"a", "b"}"#);
    }

    #[test]
    fn with_storage_discards_existing_values() {
        let mut storage = slab::Slab::new();
        Storage::insert(&mut storage, Bucket::new(9u8, usize::NONE));
        let chain: BucketChain<u8> = BucketChain::with_storage(storage);
        assert!(chain.is_empty());
        assert_links(&chain);
    }
}
