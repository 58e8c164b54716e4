use std::sync::Arc;

use super::Scorer;
use crate::bits::Bits;
use crate::core::SegmentReader;
use crate::docset::{DocSet, TERMINATED};
use crate::query::{BulkScorer, DefaultBulkScorer, Explanation};
use crate::{DocId, Score};

/// A Weight is the specialization of a `Query`
/// for a given set of segments.
///
/// See [`Query`](crate::query::Query).
pub trait Weight: Send + Sync + 'static {
    /// Returns the scorer for the given segment.
    ///
    /// `boost` is a multiplier to apply to the score.
    ///
    /// Documents rejected by `accept_docs` are never returned. `None` means the
    /// segment does not contain any match: this is not an error.
    ///
    /// See [`Query`](crate::query::Query).
    fn scorer(
        &self,
        reader: &SegmentReader,
        boost: Score,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<Box<dyn Scorer>>>;

    /// Returns a scorer scoring documents by windows.
    ///
    /// By default, this simply drives the scorer returned by `.scorer(...)`.
    fn bulk_scorer(
        &self,
        reader: &SegmentReader,
        boost: Score,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<Box<dyn BulkScorer>>> {
        let scorer_opt = self.scorer(reader, boost, accept_docs)?;
        Ok(scorer_opt.map(|scorer| Box::new(DefaultBulkScorer::new(scorer)) as Box<dyn BulkScorer>))
    }

    /// Returns an [`Explanation`] for the given document.
    fn explain(&self, reader: &SegmentReader, doc: DocId) -> crate::Result<Explanation>;

    /// Returns the number documents within the given [`SegmentReader`].
    fn count(&self, reader: &SegmentReader) -> crate::Result<u32> {
        match self.scorer(reader, 1.0, reader.accept_docs())? {
            Some(mut scorer) => Ok(scorer.count()),
            None => Ok(0),
        }
    }

    /// Iterates through all of the document matched by the DocSet
    /// `DocSet` and push the scored documents to the collector.
    fn for_each(
        &self,
        reader: &SegmentReader,
        callback: &mut dyn FnMut(DocId, Score),
    ) -> crate::Result<()> {
        if let Some(mut bulk_scorer) = self.bulk_scorer(reader, 1.0, reader.accept_docs())? {
            bulk_scorer.score_all(callback);
        }
        Ok(())
    }

    /// Iterates through all of the document matched by the DocSet
    /// `DocSet` and push the documents to the collector, without computing any score.
    fn for_each_no_score(
        &self,
        reader: &SegmentReader,
        callback: &mut dyn FnMut(DocId),
    ) -> crate::Result<()> {
        if let Some(mut docset) = self.scorer(reader, 1.0, reader.accept_docs())? {
            let mut doc = docset.advance();
            while doc != TERMINATED {
                callback(doc);
                doc = docset.advance();
            }
        }
        Ok(())
    }
}
