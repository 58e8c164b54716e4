use std::sync::Arc;

use super::{DocIdSet, Filter};
use crate::bits::Bits;
use crate::core::SegmentReader;
use crate::docset::DocSet;
use crate::query::{EnableScoring, Query};

/// Filter accepting the documents matched by a query. Scores are ignored.
///
/// Only an iterator is exposed. If the query scorer is two-phase, so is the
/// iterator.
#[derive(Debug)]
pub struct QueryFilter {
    query: Box<dyn Query>,
}

impl Clone for QueryFilter {
    fn clone(&self) -> Self {
        QueryFilter {
            query: self.query.box_clone(),
        }
    }
}

impl QueryFilter {
    /// Creates a filter out of a query.
    pub fn new(query: Box<dyn Query>) -> QueryFilter {
        QueryFilter { query }
    }

    /// Returns the wrapped query.
    pub fn query(&self) -> &dyn Query {
        self.query.as_ref()
    }
}

impl Filter for QueryFilter {
    fn doc_id_set(
        &self,
        reader: &SegmentReader,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<DocIdSet>> {
        let weight = self.query.weight(EnableScoring::disabled())?;
        let scorer_opt = weight.scorer(reader, 1.0, accept_docs)?;
        Ok(scorer_opt.map(|scorer| DocIdSet::DocSet(Box::new(scorer) as Box<dyn DocSet>)))
    }
}

#[cfg(test)]
mod tests {
    use super::QueryFilter;
    use crate::docset::DocSet;
    use crate::query::{DocIdSet, Filter, FilterClone, TermQuery};
    use crate::tests::collect_docs;
    use crate::SegmentReader;

    fn reader() -> SegmentReader {
        SegmentReader::builder(20)
            .postings("red", vec![(1, 1), (4, 2), (9, 1), (15, 1)])
            .unwrap()
            .deleted_docs(&[9])
            .build().unwrap()
    }

    #[test]
    fn test_query_filter_iterator_only() {
        let reader = reader();
        let filter = QueryFilter::new(Box::new(TermQuery::new("red")));
        let doc_id_set = filter.doc_id_set(&reader, None).unwrap().unwrap();
        assert!(matches!(doc_id_set, DocIdSet::DocSet(_)));
        assert!(doc_id_set.bits().is_none());
        assert_eq!(collect_docs(&mut doc_id_set.into_docset()), vec![1, 4, 9, 15]);
    }

    #[test]
    fn test_query_filter_accept_docs() {
        let reader = reader();
        let filter = QueryFilter::new(Box::new(TermQuery::new("red"))).box_clone();
        let mut docset = filter
            .doc_id_set(&reader, reader.accept_docs())
            .unwrap()
            .unwrap()
            .into_docset();
        assert!(docset.two_phase().is_some());
        assert_eq!(collect_docs(&mut docset), vec![1, 4, 15]);
    }

    #[test]
    fn test_query_filter_no_match() {
        let reader = reader();
        let filter = QueryFilter::new(Box::new(TermQuery::new("blue")));
        assert!(filter.doc_id_set(&reader, None).unwrap().is_none());
    }
}
