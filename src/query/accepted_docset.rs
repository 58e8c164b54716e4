use std::sync::Arc;

use crate::bits::Bits;
use crate::docset::{DocSet, TERMINATED};
use crate::query::all_query::AllScorer;
use crate::query::two_phase::{confirm, match_cost, Approximation};
use crate::query::{Scorer, TwoPhase};
use crate::{DocId, Score};

/// Filters out the documents of a `DocSet` that are rejected by an accept-docs [`Bits`].
///
/// The bit test is exposed as a two-phase confirmation, so that conjunctions
/// only test the documents every other conjunct agrees on. If the wrapped docset
/// is two-phase itself, its approximation is iterated and its own confirmation
/// only runs on the candidates the bits accept.
pub struct AcceptedDocSet<TDocSet> {
    approximation: Approximation<TDocSet>,
    accept_docs: Arc<dyn Bits>,
    match_cost: f32,
}

/// Iterates over the documents accepted by a [`Bits`], by scanning `[0, bits.len())`.
///
/// This is what a filter without any skip structure looks like when an
/// iterator is required.
pub type BitsDocSet = AcceptedDocSet<AllScorer>;

impl<TDocSet: DocSet> AcceptedDocSet<TDocSet> {
    /// Creates a new `AcceptedDocSet`.
    pub fn new(mut docset: TDocSet, accept_docs: Arc<dyn Bits>) -> AcceptedDocSet<TDocSet> {
        let match_cost = 1.0 + match_cost(&mut docset).unwrap_or(0.0);
        AcceptedDocSet {
            approximation: Approximation(docset),
            accept_docs,
            match_cost,
        }
    }

    /// Bits first, then the confirmation of the wrapped docset.
    fn is_match(&mut self, doc: DocId) -> bool {
        self.accept_docs.get(doc) && confirm(&mut self.approximation.0)
    }

    fn confirm_or_advance(&mut self, mut doc: DocId) -> DocId {
        while doc != TERMINATED && !self.is_match(doc) {
            doc = self.approximation.advance();
        }
        doc
    }
}

impl AcceptedDocSet<AllScorer> {
    /// Scans the documents accepted by `bits`.
    pub fn from_bits(bits: Arc<dyn Bits>) -> BitsDocSet {
        AcceptedDocSet::new(AllScorer::new(bits.len()), bits)
    }
}

impl<TDocSet: DocSet> DocSet for AcceptedDocSet<TDocSet> {
    fn advance(&mut self) -> DocId {
        let doc = self.approximation.advance();
        self.confirm_or_advance(doc)
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

    /// Upper bound: rejected documents are not deducted.
    fn cost(&self) -> u64 {
        self.approximation.cost()
    }

    fn two_phase(&mut self) -> Option<&mut dyn TwoPhase> {
        Some(self)
    }
}

impl<TDocSet: DocSet> TwoPhase for AcceptedDocSet<TDocSet> {
    fn approximation(&mut self) -> &mut dyn DocSet {
        &mut self.approximation
    }

    fn matches(&mut self) -> bool {
        let doc = self.approximation.doc();
        self.is_match(doc)
    }

    fn match_cost(&self) -> f32 {
        self.match_cost
    }
}

impl<TScorer: Scorer> Scorer for AcceptedDocSet<TScorer> {
    fn score(&mut self) -> Score {
        self.approximation.0.score()
    }

    fn freq(&mut self) -> u32 {
        self.approximation.0.freq()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::{AcceptedDocSet, BitsDocSet};
    use crate::bits::{AliveBitSet, BitSet, Bits, MatchAllBits};
    use crate::docset::{DocSet, TERMINATED};
    use crate::query::{TwoPhase, TwoPhaseDocSet, VecDocSet};
    use crate::tests::{collect_docs, test_seek_against_unoptimized};

    fn bits(max_doc: u32, docs: &[u32]) -> Arc<dyn Bits> {
        let mut bitset = BitSet::with_max_value(max_doc);
        for &doc in docs {
            bitset.insert(doc);
        }
        Arc::new(bitset)
    }

    #[test]
    fn test_accepted_docset() {
        let accept_docs = Arc::new(AliveBitSet::from_deleted_docs(&[3, 9], 20));
        let mut docset = AcceptedDocSet::new(VecDocSet::from(vec![1, 3, 5, 9, 12]), accept_docs);
        assert_eq!(collect_docs(&mut docset), vec![1, 5, 12]);
    }

    #[test]
    fn test_accepted_docset_seek() {
        let accept_docs = bits(20, &[1, 5, 12]);
        let mut docset = AcceptedDocSet::new(VecDocSet::from(vec![1, 3, 5, 9, 12]), accept_docs);
        assert_eq!(docset.seek(2), 5);
        assert_eq!(docset.seek(5), 5);
        assert_eq!(docset.seek(6), 12);
        assert_eq!(docset.seek(13), TERMINATED);
    }

    #[test]
    fn test_accepted_docset_seek_against_unoptimized() {
        test_seek_against_unoptimized(
            || {
                AcceptedDocSet::new(
                    VecDocSet::from(vec![0, 2, 4, 6, 8, 10, 12, 14]),
                    bits(16, &[0, 4, 5, 6, 14]),
                )
            },
            vec![0, 1, 2, 4, 5, 7, 13, 14, 15, TERMINATED],
        );
    }

    #[test]
    fn test_bits_docset() {
        let mut docset = BitsDocSet::from_bits(bits(130, &[0, 64, 65, 129]));
        assert_eq!(docset.cost(), 130);
        assert_eq!(collect_docs(&mut docset), vec![0, 64, 65, 129]);
        let mut docset = BitsDocSet::from_bits(Arc::new(MatchAllBits::new(3)));
        assert_eq!(collect_docs(&mut docset), vec![0, 1, 2]);
        let mut docset = BitsDocSet::from_bits(Arc::new(MatchAllBits::new(0)));
        assert_eq!(docset.advance(), TERMINATED);
    }

    #[test]
    fn test_bits_docset_two_phase() {
        let mut docset = BitsDocSet::from_bits(bits(10, &[3, 7]));
        let two_phase = docset.two_phase().unwrap();
        assert_eq!(two_phase.approximation().seek(2), 2);
        assert!(!two_phase.matches());
        assert_eq!(two_phase.approximation().seek(3), 3);
        assert!(two_phase.matches());
    }

    #[test]
    fn test_accepted_docset_confirms_wrapped_two_phase_last() {
        let evaluations = Arc::new(AtomicUsize::new(0));
        let evaluations_clone = evaluations.clone();
        let wrapped = TwoPhaseDocSet::new(
            VecDocSet::from((0..100).collect::<Vec<u32>>()),
            move |doc| {
                evaluations_clone.fetch_add(1, Ordering::SeqCst);
                doc != 70
            },
            5.0,
        );
        let mut docset = AcceptedDocSet::new(wrapped, bits(100, &[40, 70, 90]));
        assert_eq!(collect_docs(&mut docset), vec![40, 90]);
        assert_eq!(evaluations.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_accepted_docset_two_phase_view_of_two_phase_docset() {
        let evaluations = Arc::new(AtomicUsize::new(0));
        let evaluations_clone = evaluations.clone();
        let wrapped = TwoPhaseDocSet::new(
            VecDocSet::from(vec![1, 2, 3, 4]),
            move |doc| {
                evaluations_clone.fetch_add(1, Ordering::SeqCst);
                doc % 2 == 0
            },
            5.0,
        );
        let mut docset = AcceptedDocSet::new(wrapped, bits(10, &[2, 3]));
        let two_phase = docset.two_phase().unwrap();
        assert_eq!(two_phase.match_cost(), 6.0);
        assert_eq!(two_phase.approximation().advance(), 1);
        assert!(!two_phase.matches());
        assert_eq!(two_phase.approximation().advance(), 2);
        assert!(two_phase.matches());
        assert_eq!(two_phase.approximation().advance(), 3);
        assert!(!two_phase.matches());
        assert_eq!(evaluations.load(Ordering::SeqCst), 2);
    }
}
