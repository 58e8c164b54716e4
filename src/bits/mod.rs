//! Random-access membership views over the doc ids of a segment.
//!
//! A [`Bits`] answers "is this document in the set?" in constant time.
//! Filters expose one when they can, so that a query can test candidates
//! directly instead of leap-frogging over a second iterator.

mod alive_bitset;
mod bitset;

use std::sync::Arc;

pub use self::alive_bitset::AliveBitSet;
pub use self::bitset::{BitSet, TinySet};
use crate::DocId;

/// Fixed-length random-access view over the documents `[0, len)` of a segment.
///
/// A `Bits` is immutable for the whole duration of a query execution.
pub trait Bits: Send + Sync + 'static {
    /// Returns true iff `doc` belongs to the set.
    ///
    /// `doc` is expected to be lower than `len()`.
    fn get(&self, doc: DocId) -> bool;

    /// Number of documents covered by this view.
    fn len(&self) -> u32;
}

impl<TBits: Bits + ?Sized> Bits for Arc<TBits> {
    #[inline]
    fn get(&self, doc: DocId) -> bool {
        (**self).get(doc)
    }

    fn len(&self) -> u32 {
        (**self).len()
    }
}

impl<TBits: Bits + ?Sized> Bits for Box<TBits> {
    #[inline]
    fn get(&self, doc: DocId) -> bool {
        (**self).get(doc)
    }

    fn len(&self) -> u32 {
        (**self).len()
    }
}

/// `Bits` accepting every document of `[0, len)`.
#[derive(Clone, Copy, Debug)]
pub struct MatchAllBits {
    len: u32,
}

impl MatchAllBits {
    /// Creates a view accepting every document in `[0, len)`.
    pub fn new(len: u32) -> MatchAllBits {
        MatchAllBits { len }
    }
}

impl Bits for MatchAllBits {
    #[inline]
    fn get(&self, _doc: DocId) -> bool {
        true
    }

    fn len(&self) -> u32 {
        self.len
    }
}

/// Logical AND of two `Bits` views of the same segment.
pub struct IntersectionBits {
    left: Arc<dyn Bits>,
    right: Arc<dyn Bits>,
}

impl IntersectionBits {
    /// Creates the intersection of two views.
    ///
    /// # Panics
    ///
    /// Panics if the two views do not cover the same number of documents.
    pub fn new(left: Arc<dyn Bits>, right: Arc<dyn Bits>) -> IntersectionBits {
        assert_eq!(
            left.len(),
            right.len(),
            "Intersected bits must cover the same segment"
        );
        IntersectionBits { left, right }
    }
}

impl Bits for IntersectionBits {
    #[inline]
    fn get(&self, doc: DocId) -> bool {
        self.left.get(doc) && self.right.get(doc)
    }

    fn len(&self) -> u32 {
        self.left.len()
    }
}

/// Restricts `bits` to the documents accepted by `accept_docs`, if any.
///
/// `accept_docs` is tested first.
pub fn intersect_with_accept_docs(
    bits: Arc<dyn Bits>,
    accept_docs: Option<Arc<dyn Bits>>,
) -> Arc<dyn Bits> {
    match accept_docs {
        Some(accept_docs) => Arc::new(IntersectionBits::new(accept_docs, bits)),
        None => bits,
    }
}
