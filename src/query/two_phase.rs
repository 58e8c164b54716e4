use crate::docset::{DocSet, TERMINATED};
use crate::query::Scorer;
use crate::{DocId, Score};

/// Two-phase view of a [`DocSet`].
///
/// The approximation is a superset of the matching documents, cheap to iterate
/// and to seek. Whether its current document really matches is decided by
/// [`TwoPhase::matches()`], which may be expensive.
pub trait TwoPhase: Send {
    /// Returns the approximation, a `DocSet` yielding a superset of the matching documents.
    ///
    /// Moving the approximation moves the `DocSet` exposing this view.
    fn approximation(&mut self) -> &mut dyn DocSet;

    /// Returns true iff the current document of the approximation is a match.
    ///
    /// This must only be called when the approximation is positioned on a document,
    /// and at most once per document.
    fn matches(&mut self) -> bool;

    /// An estimate of the expected cost of a single call to `.matches()`, expressed
    /// in number of simple operations (comparing two numbers, indexing an array...).
    ///
    /// The returned value must be positive.
    fn match_cost(&self) -> f32;
}

/// Advances the approximation of `docset`, or `docset` itself if it has no two-phase view.
pub(crate) fn advance_approximation<TDocSet: DocSet + ?Sized>(docset: &mut TDocSet) -> DocId {
    match docset.two_phase() {
        Some(two_phase) => two_phase.approximation().advance(),
        None => docset.advance(),
    }
}

/// Seeks the approximation of `docset`, or `docset` itself if it has no two-phase view.
pub(crate) fn seek_approximation<TDocSet: DocSet + ?Sized>(
    docset: &mut TDocSet,
    target: DocId,
) -> DocId {
    match docset.two_phase() {
        Some(two_phase) => two_phase.approximation().seek(target),
        None => docset.seek(target),
    }
}

/// Confirms the current candidate of `docset`.
///
/// A docset without a two-phase view is always positioned on a match.
pub(crate) fn confirm<TDocSet: DocSet + ?Sized>(docset: &mut TDocSet) -> bool {
    match docset.two_phase() {
        Some(two_phase) => two_phase.matches(),
        None => true,
    }
}

/// Match cost of `docset`, `None` if matches need no confirmation.
pub(crate) fn match_cost<TDocSet: DocSet + ?Sized>(docset: &mut TDocSet) -> Option<f32> {
    docset.two_phase().map(|two_phase| two_phase.match_cost())
}

/// `DocSet` moving the approximation of the wrapped docset, or the docset itself
/// if it has no two-phase view.
///
/// Its documents are candidates: they still have to be confirmed on the wrapped
/// docset with [`confirm`].
pub(crate) struct Approximation<TDocSet>(pub(crate) TDocSet);

impl<TDocSet: DocSet> DocSet for Approximation<TDocSet> {
    fn advance(&mut self) -> DocId {
        advance_approximation(&mut self.0)
    }

    fn seek(&mut self, target: DocId) -> DocId {
        seek_approximation(&mut self.0, target)
    }

    fn doc(&self) -> DocId {
        self.0.doc()
    }

    fn cost(&self) -> u64 {
        self.0.cost()
    }
}

/// `DocSet` made of an approximation and a per-document predicate.
///
/// Iterating over it directly yields the confirmed documents only. Conjunctions
/// drive the approximation instead and only evaluate the predicate once all other
/// conjuncts agree on a candidate.
pub struct TwoPhaseDocSet<TDocSet, TPredicate> {
    approximation: TDocSet,
    predicate: TPredicate,
    match_cost: f32,
}

impl<TDocSet, TPredicate> TwoPhaseDocSet<TDocSet, TPredicate>
where
    TDocSet: DocSet,
    TPredicate: FnMut(DocId) -> bool + Send,
{
    /// Creates a new `TwoPhaseDocSet`.
    ///
    /// `match_cost` is the estimated cost of one evaluation of `predicate`.
    pub fn new(
        approximation: TDocSet,
        predicate: TPredicate,
        match_cost: f32,
    ) -> TwoPhaseDocSet<TDocSet, TPredicate> {
        debug_assert!(match_cost > 0.0);
        TwoPhaseDocSet {
            approximation,
            predicate,
            match_cost,
        }
    }

    fn confirm_or_advance(&mut self, doc: DocId) -> DocId {
        if doc == TERMINATED || (self.predicate)(doc) {
            doc
        } else {
            self.advance()
        }
    }
}

impl<TDocSet, TPredicate> DocSet for TwoPhaseDocSet<TDocSet, TPredicate>
where
    TDocSet: DocSet,
    TPredicate: FnMut(DocId) -> bool + Send,
{
    fn advance(&mut self) -> DocId {
        loop {
            let doc = self.approximation.advance();
            if doc == TERMINATED || (self.predicate)(doc) {
                return doc;
            }
        }
    }

    fn seek(&mut self, target: DocId) -> DocId {
        let current = self.approximation.doc();
        let doc = self.approximation.seek(target);
        if doc == current {
            // Did not move: the current document has already been confirmed.
            return doc;
        }
        self.confirm_or_advance(doc)
    }

    fn doc(&self) -> DocId {
        self.approximation.doc()
    }

    fn cost(&self) -> u64 {
        self.approximation.cost()
    }

    fn two_phase(&mut self) -> Option<&mut dyn TwoPhase> {
        Some(self)
    }
}

impl<TDocSet, TPredicate> TwoPhase for TwoPhaseDocSet<TDocSet, TPredicate>
where
    TDocSet: DocSet,
    TPredicate: FnMut(DocId) -> bool + Send,
{
    fn approximation(&mut self) -> &mut dyn DocSet {
        &mut self.approximation
    }

    fn matches(&mut self) -> bool {
        let doc = self.approximation.doc();
        (self.predicate)(doc)
    }

    fn match_cost(&self) -> f32 {
        self.match_cost
    }
}

impl<TScorer, TPredicate> Scorer for TwoPhaseDocSet<TScorer, TPredicate>
where
    TScorer: Scorer,
    TPredicate: FnMut(DocId) -> bool + Send + 'static,
{
    fn score(&mut self) -> Score {
        self.approximation.score()
    }

    fn freq(&mut self) -> u32 {
        self.approximation.freq()
    }
}
