use std::sync::Arc;

use super::{BitSet, Bits};
use crate::DocId;

/// Set of alive `DocId`s.
///
/// Cloning an `AliveBitSet` is cheap: the underlying bitset is shared.
#[derive(Clone, Debug)]
pub struct AliveBitSet {
    num_deleted: usize,
    bitset: Arc<BitSet>,
}

impl AliveBitSet {
    /// Builds the alive bitset of a segment of `max_doc` documents, given its deleted docs.
    ///
    /// Deleted docs outside of `[0, max_doc)` are ignored.
    pub fn from_deleted_docs(deleted_docs: &[DocId], max_doc: u32) -> AliveBitSet {
        let mut bitset = BitSet::with_max_value_and_full(max_doc);
        for &doc in deleted_docs {
            if doc < max_doc {
                bitset.remove(doc);
            }
        }
        AliveBitSet::from_bitset(bitset)
    }

    /// Wraps a bitset in which set bits are the alive documents.
    pub fn from_bitset(bitset: BitSet) -> AliveBitSet {
        let num_deleted = bitset.max_value() as usize - bitset.len();
        AliveBitSet {
            num_deleted,
            bitset: Arc::new(bitset),
        }
    }

    /// Returns true iff the document is still "alive". In other words, if it has not been deleted.
    #[inline]
    pub fn is_alive(&self, doc: DocId) -> bool {
        self.bitset.contains(doc)
    }

    /// Returns true iff the document has been marked as deleted.
    #[inline]
    pub fn is_deleted(&self, doc: DocId) -> bool {
        !self.is_alive(doc)
    }

    /// Iterate over the alive docids.
    #[inline]
    pub fn iter_alive(&self) -> impl Iterator<Item = DocId> + '_ {
        self.bitset.iter()
    }

    /// Get underlying bitset
    #[inline]
    pub fn bitset(&self) -> &BitSet {
        &self.bitset
    }

    /// The number of deleted docs
    pub fn num_deleted(&self) -> usize {
        self.num_deleted
    }
}

impl Bits for AliveBitSet {
    #[inline]
    fn get(&self, doc: DocId) -> bool {
        self.is_alive(doc)
    }

    fn len(&self) -> u32 {
        self.bitset.max_value()
    }
}
