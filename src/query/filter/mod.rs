//! Unscored restrictions of the documents matched by a query.
//!
//! A [`Filter`] does not score anything. For a given segment, it exposes the set
//! of documents it accepts as a [`DocIdSet`]: an iterator, a random-access
//! [`Bits`], or both. What the filter exposes decides which execution
//! strategies a [`FilteredQuery`](crate::query::FilteredQuery) can pick.

mod bitset_filter;
mod predicate_filter;
mod query_filter;

use std::fmt;
use std::sync::Arc;

pub use self::bitset_filter::{BitSetFilter, BitSetProducer};
pub use self::predicate_filter::PredicateFilter;
pub use self::query_filter::QueryFilter;
use crate::bits::Bits;
use crate::core::SegmentReader;
use crate::docset::DocSet;
use crate::query::BitsDocSet;

/// The documents of a segment accepted by a [`Filter`].
pub enum DocIdSet {
    /// Only an iterator is available.
    DocSet(Box<dyn DocSet>),
    /// Only random access is available.
    Bits(Arc<dyn Bits>),
    /// Both views are available, and describe the same set.
    Both {
        /// Iterator over the accepted documents.
        docset: Box<dyn DocSet>,
        /// Random-access view of the accepted documents.
        bits: Arc<dyn Bits>,
    },
}

impl DocIdSet {
    /// Estimated number of accepted documents.
    ///
    /// Without an iterator, this is the length of the bits, i.e. the `max_doc`
    /// of the segment.
    pub fn cost(&self) -> u64 {
        match self {
            DocIdSet::DocSet(docset) | DocIdSet::Both { docset, .. } => docset.cost(),
            DocIdSet::Bits(bits) => bits.len() as u64,
        }
    }

    /// Returns the random-access view, if available.
    pub fn bits(&self) -> Option<Arc<dyn Bits>> {
        match self {
            DocIdSet::DocSet(_) => None,
            DocIdSet::Bits(bits) | DocIdSet::Both { bits, .. } => Some(bits.clone()),
        }
    }

    /// Returns an iterator over the accepted documents.
    ///
    /// A bits-only set is scanned document by document.
    pub fn into_docset(self) -> Box<dyn DocSet> {
        match self {
            DocIdSet::DocSet(docset) | DocIdSet::Both { docset, .. } => docset,
            DocIdSet::Bits(bits) => Box::new(BitsDocSet::from_bits(bits)),
        }
    }
}

impl fmt::Debug for DocIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            DocIdSet::DocSet(_) => "DocSet",
            DocIdSet::Bits(_) => "Bits",
            DocIdSet::Both { .. } => "Both",
        };
        write!(f, "DocIdSet::{kind}(cost={})", self.cost())
    }
}

/// A `Filter` restricts the documents of a segment, without scoring them.
pub trait Filter: FilterClone + Send + Sync + fmt::Debug + 'static {
    /// Returns the documents of the segment accepted by the filter.
    ///
    /// The returned set must not contain any document rejected by `accept_docs`.
    /// `None` means that the filter does not accept any document in this segment.
    fn doc_id_set(
        &self,
        reader: &SegmentReader,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<DocIdSet>>;
}

/// Implements `box_clone`.
pub trait FilterClone {
    /// Returns a boxed clone of `self`.
    fn box_clone(&self) -> Box<dyn Filter>;
}

impl<T> FilterClone for T
where T: 'static + Filter + Clone
{
    fn box_clone(&self) -> Box<dyn Filter> {
        Box::new(self.clone())
    }
}

impl Filter for Box<dyn Filter> {
    fn doc_id_set(
        &self,
        reader: &SegmentReader,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<DocIdSet>> {
        self.as_ref().doc_id_set(reader, accept_docs)
    }
}

impl FilterClone for Box<dyn Filter> {
    fn box_clone(&self) -> Box<dyn Filter> {
        self.as_ref().box_clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::DocIdSet;
    use crate::bits::{BitSet, Bits, MatchAllBits};
    use crate::docset::DocSet;
    use crate::query::VecDocSet;
    use crate::tests::collect_docs;

    #[test]
    fn test_doc_id_set_cost() {
        let docset = DocIdSet::DocSet(Box::new(VecDocSet::from(vec![1, 2, 3])));
        assert_eq!(docset.cost(), 3);
        assert!(docset.bits().is_none());
        let bits = DocIdSet::Bits(Arc::new(MatchAllBits::new(10)));
        assert_eq!(bits.cost(), 10);
        assert_eq!(bits.bits().map(|bits| bits.len()), Some(10));
    }

    #[test]
    fn test_doc_id_set_into_docset() {
        let mut bitset = BitSet::with_max_value(8);
        bitset.insert(2);
        bitset.insert(5);
        let bits: Arc<dyn Bits> = Arc::new(bitset);
        let mut docset = DocIdSet::Bits(bits.clone()).into_docset();
        assert_eq!(collect_docs(&mut docset), vec![2, 5]);
        let both = DocIdSet::Both {
            docset: Box::new(VecDocSet::from(vec![2, 5])),
            bits,
        };
        assert_eq!(both.cost(), 2);
        assert_eq!(format!("{both:?}"), "DocIdSet::Both(cost=2)");
        let mut docset = both.into_docset();
        assert_eq!(docset.advance(), 2);
    }
}
