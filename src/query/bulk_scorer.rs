use crate::docset::{DocSet, NOT_STARTED, TERMINATED};
use crate::query::Scorer;
use crate::{DocId, Score};

/// Scores a segment by windows of doc ids.
///
/// Scoring a window pushes its matching documents, in increasing order, to the callback.
pub trait BulkScorer: Send {
    /// Scores the matching documents of `[min, max)`.
    ///
    /// Returns a lower bound of the next matching document: the next call is
    /// expected to start at or after it. `TERMINATED` means there is nothing left.
    fn score(&mut self, callback: &mut dyn FnMut(DocId, Score), min: DocId, max: DocId) -> DocId;

    /// Scores every remaining document.
    fn score_all(&mut self, callback: &mut dyn FnMut(DocId, Score)) {
        self.score(callback, 0, TERMINATED);
    }

    /// Same as [`DocSet::cost()`] for the underlying scorer.
    fn cost(&self) -> u64;
}

impl<TBulkScorer: BulkScorer + ?Sized> BulkScorer for Box<TBulkScorer> {
    fn score(&mut self, callback: &mut dyn FnMut(DocId, Score), min: DocId, max: DocId) -> DocId {
        (**self).score(callback, min, max)
    }

    fn score_all(&mut self, callback: &mut dyn FnMut(DocId, Score)) {
        (**self).score_all(callback)
    }

    fn cost(&self) -> u64 {
        (**self).cost()
    }
}

/// Positions `scorer` on its first document greater or equal to `min`.
pub(crate) fn first_doc_in_window<TScorer: DocSet + ?Sized>(scorer: &mut TScorer, min: DocId) -> DocId {
    let doc = scorer.doc();
    if doc == NOT_STARTED || doc < min {
        scorer.seek(min)
    } else {
        doc
    }
}

/// `BulkScorer` driving a [`Scorer`] one document at a time.
pub struct DefaultBulkScorer<TScorer> {
    scorer: TScorer,
}

impl<TScorer: Scorer> DefaultBulkScorer<TScorer> {
    /// Creates a bulk scorer over `scorer`.
    pub fn new(scorer: TScorer) -> DefaultBulkScorer<TScorer> {
        DefaultBulkScorer { scorer }
    }

    /// Returns the underlying scorer.
    pub fn scorer(&self) -> &TScorer {
        &self.scorer
    }
}

impl<TScorer: Scorer> BulkScorer for DefaultBulkScorer<TScorer> {
    fn score(&mut self, callback: &mut dyn FnMut(DocId, Score), min: DocId, max: DocId) -> DocId {
        let mut doc = first_doc_in_window(&mut self.scorer, min);
        while doc < max {
            callback(doc, self.scorer.score());
            doc = self.scorer.advance();
        }
        doc
    }

    fn cost(&self) -> u64 {
        self.scorer.cost()
    }
}
