use std::sync::Arc;

use super::scorer::FilteredScorer;
use crate::bits::Bits;
use crate::docset::DocSet;
use crate::query::bulk_scorer::first_doc_in_window;
use crate::query::two_phase::{confirm, Approximation};
use crate::query::{BulkScorer, DefaultBulkScorer, Scorer};
use crate::{DocId, Score};

/// Scans the query scorer and tests every document against the filter bits.
///
/// If the query is two-phase, its approximation is scanned and a candidate is only
/// confirmed once the filter bits accept it. Only the matching documents are scored.
pub struct QueryFirstBulkScorer {
    scorer: Approximation<Box<dyn Scorer>>,
    bits: Arc<dyn Bits>,
}

impl QueryFirstBulkScorer {
    /// Creates a new `QueryFirstBulkScorer`.
    pub fn new(scorer: Box<dyn Scorer>, bits: Arc<dyn Bits>) -> QueryFirstBulkScorer {
        QueryFirstBulkScorer {
            scorer: Approximation(scorer),
            bits,
        }
    }
}

impl BulkScorer for QueryFirstBulkScorer {
    fn score(&mut self, callback: &mut dyn FnMut(DocId, Score), min: DocId, max: DocId) -> DocId {
        let mut doc = first_doc_in_window(&mut self.scorer, min);
        while doc < max {
            if self.bits.get(doc) && confirm(&mut self.scorer.0) {
                callback(doc, self.scorer.0.score());
            }
            doc = self.scorer.advance();
        }
        doc
    }

    fn cost(&self) -> u64 {
        self.scorer.cost()
    }
}

/// Bulk scorer of a [`FilteredQuery`](super::FilteredQuery) over one segment.
pub enum FilteredBulkScorer {
    /// Drives a [`FilteredScorer`] one document at a time.
    Scorer(DefaultBulkScorer<FilteredScorer>),
    /// Tests the documents of the query against the filter bits.
    QueryFirst(QueryFirstBulkScorer),
}

impl BulkScorer for FilteredBulkScorer {
    fn score(&mut self, callback: &mut dyn FnMut(DocId, Score), min: DocId, max: DocId) -> DocId {
        match self {
            FilteredBulkScorer::Scorer(bulk_scorer) => bulk_scorer.score(callback, min, max),
            FilteredBulkScorer::QueryFirst(bulk_scorer) => bulk_scorer.score(callback, min, max),
        }
    }

    fn cost(&self) -> u64 {
        match self {
            FilteredBulkScorer::Scorer(bulk_scorer) => bulk_scorer.cost(),
            FilteredBulkScorer::QueryFirst(bulk_scorer) => bulk_scorer.cost(),
        }
    }
}
