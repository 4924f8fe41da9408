//! Core building blocks for order-preserving, equality-based collections.
//!
//! Concrete collections (stacks, queues, typed sets, maps) are thin layers
//! over two pieces provided here:
//!
//! ```text
//! Storage (Slab / VecStorage) - owns buckets, provides stable indices
//! BucketChain                 - links buckets in insertion order, by index
//! TypeConstraint              - set-once tags checked before each insert
//! ```
//!
//! # Why a bucket chain
//!
//! A hash set needs a meaningful `Hash`; a sorted set needs a total order.
//! Many domain objects have neither, only equality. The chain stores each item
//! in its own bucket, scans linearly for equality, and keeps strict insertion
//! order no matter how items are added or removed:
//!
//! - **Stable order**: iteration is insertion order, forwards or backwards
//! - **O(1) splice**: a located bucket is unlinked without shifting anything
//! - **No cycles**: links are arena indices, never `Rc`/raw pointers
//! - **Independent copies**: `clone()` rebuilds the link structure
//!
//! # Quick Start
//!
//! ```
//! use strand_collections::BucketChain;
//!
//! let mut chain = BucketChain::new();
//! chain.add("foo");
//! chain.add("bar");
//! chain.add("baz");
//!
//! let copy = chain.clone();
//! chain.remove(&"bar");
//!
//! assert_eq!(chain.iter().copied().collect::<Vec<_>>(), ["foo", "baz"]);
//! assert_eq!(copy.iter().copied().collect::<Vec<_>>(), ["foo", "bar", "baz"]);
//! ```
//!
//! # Storage Options
//!
//! | Storage | Index | Use Case |
//! |---------|-------|----------|
//! | `slab::Slab` | `usize` | Default choice |
//! | [`VecStorage`] | `u32` (configurable) | Compact links for large chains |
//!
//! # Type Constraints
//!
//! ```
//! use serde_json::json;
//! use strand_collections::TypedChain;
//!
//! let mut ints = TypedChain::new(Some("int")).unwrap();
//! ints.add(json!(1)).unwrap();
//!
//! let err = ints.add(json!("one")).unwrap_err();
//! assert_eq!(err.to_string(), r#"item must be of type int, string given: String("one")"#);
//! ```
//!
//! # Feature Flags
//!
//! - `serde` - `Serialize`/`Deserialize` for [`BucketChain`] (as a sequence)
//!   and [`TypeTag`] (as its string form)

#![warn(missing_docs)]

pub mod bucket;
pub mod constraint;
pub mod index;
pub mod storage;
pub mod typed;

pub use bucket::{Bucket, BucketChain, CompactBucketChain, IntoIter, Iter};
pub use constraint::{
    Callable, Classify, ConstraintError, Kind, Role, TypeConstraint, TypeMismatch, TypeTag,
};
pub use index::Index;
pub use storage::{Storage, VecStorage};
pub use typed::TypedChain;
