//! A bucket chain guarded by an item [`TypeConstraint`].
//!
//! This is the composition concrete collections are expected to use: the
//! constraint is a plain value held next to the chain, and every insert is
//! validated before the chain is touched.

use crate::{BucketChain, Classify, ConstraintError, Iter, TypeConstraint, TypeMismatch, TypeTag};

/// An insertion-ordered set whose items must satisfy one declared tag.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use strand_collections::TypedChain;
///
/// let mut names = TypedChain::new(Some("string")).unwrap();
/// assert_eq!(names.add(json!("ada")), Ok(true));
/// assert!(names.add(json!(7)).is_err());
/// assert_eq!(names.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TypedChain<T> {
    constraint: TypeConstraint,
    chain: BucketChain<T>,
}

impl<T> TypedChain<T> {
    /// Creates an empty chain with the item tag fixed. `None` means untyped.
    pub fn new(item_type: Option<&str>) -> Result<Self, ConstraintError> {
        Ok(Self {
            constraint: TypeConstraint::for_items(item_type)?,
            chain: BucketChain::new(),
        })
    }

    /// Creates an empty chain that accepts any item.
    pub fn untyped() -> Self {
        Self {
            constraint: TypeConstraint::new(),
            chain: BucketChain::new(),
        }
    }

    /// Returns the declared item tag.
    pub fn item_type(&self) -> Option<&TypeTag> {
        self.constraint.item_type()
    }

    /// Returns the constraint guarding this chain.
    pub fn constraint(&self) -> &TypeConstraint {
        &self.constraint
    }

    /// Returns the underlying chain.
    pub fn as_chain(&self) -> &BucketChain<T> {
        &self.chain
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns `true` if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Returns an iterator over the items in insertion order.
    pub fn iter(&self) -> Iter<'_, T, slab::Slab<crate::Bucket<T>>, usize> {
        self.chain.iter()
    }
}

impl<T: Classify + PartialEq> TypedChain<T> {
    /// Validates and inserts `item`.
    ///
    /// Returns `Ok(false)` if an equal item is already present.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatch`] without modifying the chain if `item` does
    /// not satisfy the item tag.
    pub fn add(&mut self, item: T) -> Result<bool, TypeMismatch> {
        self.constraint.check_item(&item)?;
        Ok(self.chain.add(item))
    }

    /// Validates every item, then inserts them all.
    ///
    /// Either every item is offered to the chain or, on the first mismatch,
    /// none is. Returns the number of items actually inserted.
    pub fn add_all<I>(&mut self, items: I) -> Result<usize, TypeMismatch>
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        for item in &items {
            self.constraint.check_item(item)?;
        }

        let before = self.chain.len();
        self.chain.extend(items);
        Ok(self.chain.len() - before)
    }

    /// Removes the item equal to `item`.
    pub fn remove(&mut self, item: &T) -> bool {
        self.chain.remove(item)
    }

    /// Returns `true` if an item equal to `item` is present.
    pub fn contains(&self, item: &T) -> bool {
        self.chain.contains(item)
    }
}
