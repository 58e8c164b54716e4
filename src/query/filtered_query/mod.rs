//! Query restricted to the documents accepted by a [`Filter`].
//!
//! The filter does not contribute to the score. How the query and the filter
//! are combined on a given segment is decided by the [`FilterStrategy`] of the
//! query, from the views the filter exposes and its cost.

mod bulk_scorer;
mod scorer;
mod strategy;

use std::sync::Arc;

pub use self::bulk_scorer::{FilteredBulkScorer, QueryFirstBulkScorer};
pub use self::scorer::{FilteredScorer, QueryFirstScorer};
pub use self::strategy::{FilterStrategy, LeapFrogLead, DEFAULT_DENSITY_FACTOR};
use crate::bits::Bits;
use crate::core::SegmentReader;
use crate::docset::DocSet;
use crate::query::{
    AllQuery, BulkScorer, ConstScorer, DefaultBulkScorer, DocIdSet, EnableScoring, Explanation,
    Filter, Query, Scorer, Weight,
};
use crate::{DocId, Score};

/// A query whose matches must also be accepted by a filter.
///
/// The score of a document is the score the wrapped query gives it.
///
/// ```rust
/// use filtered_query::collector::DocSetCollector;
/// use filtered_query::query::{FilterStrategy, FilteredQuery, PredicateFilter, TermQuery};
/// use filtered_query::{DocAddress, Searcher, SegmentReader};
///
/// # fn main() -> filtered_query::Result<()> {
/// let segment = SegmentReader::builder(20)
///     .postings("rust", vec![(2, 1), (3, 1), (8, 2), (13, 1)])?
///     .build()?;
/// let searcher = Searcher::new(vec![segment]);
/// let query = FilteredQuery::with_strategy(
///     Box::new(TermQuery::new("rust")),
///     Box::new(PredicateFilter::new("even", |doc| doc % 2 == 0)),
///     FilterStrategy::QueryFirst,
/// )?;
/// let docs = searcher.search(&query, &DocSetCollector)?;
/// assert_eq!(docs.len(), 2);
/// assert!(docs.contains(&DocAddress::new(0, 8)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FilteredQuery {
    query: Box<dyn Query>,
    filter: Box<dyn Filter>,
    strategy: FilterStrategy,
}

impl Clone for FilteredQuery {
    fn clone(&self) -> Self {
        FilteredQuery {
            query: self.query.box_clone(),
            filter: self.filter.box_clone(),
            strategy: self.strategy,
        }
    }
}

impl FilteredQuery {
    /// Creates a filtered query using the default [`FilterStrategy`].
    pub fn new(query: Box<dyn Query>, filter: Box<dyn Filter>) -> FilteredQuery {
        FilteredQuery {
            query,
            filter,
            strategy: FilterStrategy::default(),
        }
    }

    /// Creates a filtered query using the given strategy.
    ///
    /// Returns an error if the strategy is misconfigured.
    pub fn with_strategy(
        query: Box<dyn Query>,
        filter: Box<dyn Filter>,
        strategy: FilterStrategy,
    ) -> crate::Result<FilteredQuery> {
        strategy.validate()?;
        Ok(FilteredQuery {
            query,
            filter,
            strategy,
        })
    }

    /// Returns the wrapped query.
    pub fn query(&self) -> &dyn Query {
        self.query.as_ref()
    }

    /// Returns the filter.
    pub fn filter(&self) -> &dyn Filter {
        self.filter.as_ref()
    }

    /// Returns the strategy used to combine the query and the filter.
    pub fn strategy(&self) -> FilterStrategy {
        self.strategy
    }
}

impl Query for FilteredQuery {
    fn weight(&self, enable_scoring: EnableScoring<'_>) -> crate::Result<Box<dyn Weight>> {
        let match_all = self.query.as_ref().is::<AllQuery>();
        Ok(Box::new(FilteredWeight {
            query_weight: self.query.weight(enable_scoring)?,
            filter: self.filter.box_clone(),
            strategy: self.strategy,
            match_all,
        }))
    }
}

/// Weight associated with a [`FilteredQuery`].
pub struct FilteredWeight {
    query_weight: Box<dyn Weight>,
    filter: Box<dyn Filter>,
    strategy: FilterStrategy,
    // The query accepts every document: only the filter is iterated.
    match_all: bool,
}

impl FilteredWeight {
    fn doc_id_set(
        &self,
        reader: &SegmentReader,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<DocIdSet>> {
        let doc_id_set_opt = self.filter.doc_id_set(reader, accept_docs)?;
        if doc_id_set_opt.is_none() {
            debug!("filter {:?} matches no document in segment", self.filter);
        }
        Ok(doc_id_set_opt)
    }

    /// Returns the scorer of the segment, with the strategy it picked.
    pub fn filtered_scorer(
        &self,
        reader: &SegmentReader,
        boost: Score,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<FilteredScorer>> {
        let Some(doc_id_set) = self.doc_id_set(reader, accept_docs)? else {
            return Ok(None);
        };
        if self.match_all {
            let filter_docset = doc_id_set.into_docset();
            return Ok(Some(FilteredScorer::MatchAll(ConstScorer::new(
                filter_docset,
                boost,
            ))));
        }
        self.strategy
            .filtered_scorer(reader, self.query_weight.as_ref(), boost, doc_id_set)
    }

    fn accepted_by_filter(&self, reader: &SegmentReader, doc: DocId) -> crate::Result<bool> {
        let Some(doc_id_set) = self.doc_id_set(reader, reader.accept_docs())? else {
            return Ok(false);
        };
        if let Some(bits) = doc_id_set.bits() {
            return Ok(bits.get(doc));
        }
        Ok(doc_id_set.into_docset().seek(doc) == doc)
    }
}

impl Weight for FilteredWeight {
    fn scorer(
        &self,
        reader: &SegmentReader,
        boost: Score,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<Box<dyn Scorer>>> {
        let scorer_opt = self.filtered_scorer(reader, boost, accept_docs)?;
        Ok(scorer_opt.map(|scorer| Box::new(scorer) as Box<dyn Scorer>))
    }

    fn bulk_scorer(
        &self,
        reader: &SegmentReader,
        boost: Score,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<Box<dyn BulkScorer>>> {
        if self.match_all {
            let scorer_opt = self.filtered_scorer(reader, boost, accept_docs)?;
            return Ok(scorer_opt.map(|scorer| {
                Box::new(DefaultBulkScorer::new(scorer)) as Box<dyn BulkScorer>
            }));
        }
        let Some(doc_id_set) = self.doc_id_set(reader, accept_docs)? else {
            return Ok(None);
        };
        let bulk_scorer_opt = self.strategy.filtered_bulk_scorer(
            reader,
            self.query_weight.as_ref(),
            boost,
            doc_id_set,
        )?;
        Ok(bulk_scorer_opt.map(|bulk_scorer| Box::new(bulk_scorer) as Box<dyn BulkScorer>))
    }

    fn explain(&self, reader: &SegmentReader, doc: DocId) -> crate::Result<Explanation> {
        let query_explanation = self.query_weight.explain(reader, doc)?;
        if self.accepted_by_filter(reader, doc)? {
            return Ok(query_explanation);
        }
        let mut explanation =
            Explanation::new(format!("failure to match filter: {:?}", self.filter), 0.0);
        explanation.add_detail(query_explanation);
        Ok(explanation)
    }
}
