use crate::docset::DocSet;
use crate::query::{Scorer, TwoPhase};
use crate::{DocId, Score};

/// Wraps a `DocSet` and simply returns a constant `Scorer`.
/// The `ConstScorer` is useful if you have a `DocSet` where
/// you needed a scorer.
///
/// The `ConstScorer`'s constant score can be set
/// by calling `.set_score(...)`.
pub struct ConstScorer<TDocSet: DocSet> {
    docset: TDocSet,
    score: Score,
}

impl<TDocSet: DocSet> ConstScorer<TDocSet> {
    /// Creates a new `ConstScorer`.
    pub fn new(docset: TDocSet, score: Score) -> ConstScorer<TDocSet> {
        ConstScorer { docset, score }
    }

    /// Sets the constant score to a different value.
    pub fn set_score(&mut self, score: Score) {
        self.score = score;
    }
}

impl<TDocSet: DocSet> From<TDocSet> for ConstScorer<TDocSet> {
    fn from(docset: TDocSet) -> Self {
        ConstScorer::new(docset, 1.0)
    }
}

impl<TDocSet: DocSet> DocSet for ConstScorer<TDocSet> {
    fn advance(&mut self) -> DocId {
        self.docset.advance()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        self.docset.seek(target)
    }

    fn doc(&self) -> DocId {
        self.docset.doc()
    }

    fn cost(&self) -> u64 {
        self.docset.cost()
    }

    fn two_phase(&mut self) -> Option<&mut dyn TwoPhase> {
        self.docset.two_phase()
    }

    fn count(&mut self) -> u32 {
        self.docset.count()
    }
}

impl<TDocSet: DocSet + 'static> Scorer for ConstScorer<TDocSet> {
    fn score(&mut self) -> Score {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::ConstScorer;
    use crate::docset::{DocSet, TERMINATED};
    use crate::query::{Scorer, TwoPhaseDocSet, VecDocSet};

    #[test]
    fn test_const_scorer() {
        let mut scorer = ConstScorer::new(VecDocSet::from(vec![2, 5]), 3.0);
        assert_eq!(scorer.advance(), 2);
        assert_eq!(scorer.score(), 3.0);
        scorer.set_score(0.5);
        assert_eq!(scorer.seek(3), 5);
        assert_eq!(scorer.score(), 0.5);
        assert_eq!(scorer.advance(), TERMINATED);
    }

    #[test]
    fn test_const_scorer_forwards_two_phase() {
        let mut scorer = ConstScorer::from(VecDocSet::from(vec![1, 2]));
        assert!(scorer.two_phase().is_none());
        let docset = TwoPhaseDocSet::new(VecDocSet::from(vec![1, 2]), |doc| doc == 2, 2.0);
        let mut scorer = ConstScorer::from(docset);
        let two_phase = scorer.two_phase().unwrap();
        assert_eq!(two_phase.match_cost(), 2.0);
        assert_eq!(scorer.advance(), 2);
        assert_eq!(scorer.score(), 1.0);
    }
}
