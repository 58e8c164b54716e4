use std::fmt;
use std::sync::Arc;

use super::{DocIdSet, Filter};
use crate::bits::{intersect_with_accept_docs, Bits};
use crate::core::SegmentReader;
use crate::DocId;

type Predicate = Arc<dyn Fn(DocId) -> bool + Send + Sync>;

/// Filter testing every document against a predicate.
///
/// The predicate has no skip structure: only random access is exposed.
/// Iterating over it means testing every document of the segment.
#[derive(Clone)]
pub struct PredicateFilter {
    name: String,
    predicate: Predicate,
}

impl PredicateFilter {
    /// Creates a new filter. `name` is only used for debugging.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> PredicateFilter
    where F: Fn(DocId) -> bool + Send + Sync + 'static {
        PredicateFilter {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for PredicateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PredicateFilter({})", self.name)
    }
}

struct PredicateBits {
    predicate: Predicate,
    max_doc: u32,
}

impl Bits for PredicateBits {
    #[inline]
    fn get(&self, doc: DocId) -> bool {
        (self.predicate)(doc)
    }

    fn len(&self) -> u32 {
        self.max_doc
    }
}

impl Filter for PredicateFilter {
    fn doc_id_set(
        &self,
        reader: &SegmentReader,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<DocIdSet>> {
        if reader.num_docs() == 0 {
            return Ok(None);
        }
        let predicate_bits = Arc::new(PredicateBits {
            predicate: self.predicate.clone(),
            max_doc: reader.max_doc(),
        });
        Ok(Some(DocIdSet::Bits(intersect_with_accept_docs(
            predicate_bits,
            accept_docs,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::PredicateFilter;
    use crate::query::{DocIdSet, Filter};
    use crate::tests::collect_docs;
    use crate::SegmentReader;

    #[test]
    fn test_predicate_filter_bits_only() {
        let reader = SegmentReader::builder(10).deleted_docs(&[4]).build().unwrap();
        let filter = PredicateFilter::new("even", |doc| doc % 2 == 0);
        assert_eq!(format!("{filter:?}"), "PredicateFilter(even)");
        let doc_id_set = filter
            .doc_id_set(&reader, reader.accept_docs())
            .unwrap()
            .unwrap();
        assert!(matches!(doc_id_set, DocIdSet::Bits(_)));
        assert_eq!(doc_id_set.cost(), 10);
        let bits = doc_id_set.bits().unwrap();
        assert!(bits.get(2));
        assert!(!bits.get(3));
        assert!(!bits.get(4));
        assert_eq!(collect_docs(&mut doc_id_set.into_docset()), vec![0, 2, 6, 8]);
    }

    #[test]
    fn test_predicate_filter_empty_segment() {
        let reader = SegmentReader::builder(0).build().unwrap();
        let filter = PredicateFilter::new("any", |_| true);
        assert!(filter.doc_id_set(&reader, None).unwrap().is_none());
    }
}
