use crate::docset::DocSet;
use crate::query::{AcceptedDocSet, ConstScorer, Intersection, Scorer, TwoPhase};
use crate::{DocId, Score};

/// Iterates over the query and confirms every document against the filter bits.
pub type QueryFirstScorer = AcceptedDocSet<Box<dyn Scorer>>;

/// Filter iterator taking part in a scored intersection.
///
/// It contributes nothing to the score nor to the frequency: the intersection
/// reports the ones of the query.
pub(crate) struct FilterScorer {
    docset: Box<dyn DocSet>,
}

impl FilterScorer {
    pub(crate) fn new(docset: Box<dyn DocSet>) -> FilterScorer {
        FilterScorer { docset }
    }
}

impl DocSet for FilterScorer {
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
}

impl Scorer for FilterScorer {
    fn score(&mut self) -> Score {
        0.0
    }

    fn freq(&mut self) -> u32 {
        0
    }
}

/// Scorer of a [`FilteredQuery`](super::FilteredQuery) over one segment.
///
/// The variant records the strategy picked for the segment.
pub enum FilteredScorer {
    /// The query scorer, with the filter bits folded into its accept docs.
    RandomAccess(Box<dyn Scorer>),
    /// Intersection of the query scorer with the filter iterator.
    LeapFrog(Intersection<Box<dyn Scorer>>),
    /// The query scorer, confirming every document against the filter bits.
    QueryFirst(QueryFirstScorer),
    /// The filter iterator alone, when the query matches every document.
    MatchAll(ConstScorer<Box<dyn DocSet>>),
}

impl FilteredScorer {
    fn docset(&self) -> &dyn DocSet {
        match self {
            FilteredScorer::RandomAccess(scorer) => scorer,
            FilteredScorer::LeapFrog(intersection) => intersection,
            FilteredScorer::QueryFirst(scorer) => scorer,
            FilteredScorer::MatchAll(scorer) => scorer,
        }
    }

    fn docset_mut(&mut self) -> &mut dyn DocSet {
        match self {
            FilteredScorer::RandomAccess(scorer) => scorer,
            FilteredScorer::LeapFrog(intersection) => intersection,
            FilteredScorer::QueryFirst(scorer) => scorer,
            FilteredScorer::MatchAll(scorer) => scorer,
        }
    }

    /// Name of the strategy used, for logging and debugging.
    pub fn strategy_name(&self) -> &'static str {
        match self {
            FilteredScorer::RandomAccess(_) => "random_access",
            FilteredScorer::LeapFrog(_) => "leap_frog",
            FilteredScorer::QueryFirst(_) => "query_first",
            FilteredScorer::MatchAll(_) => "match_all",
        }
    }
}

impl DocSet for FilteredScorer {
    fn advance(&mut self) -> DocId {
        self.docset_mut().advance()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        self.docset_mut().seek(target)
    }

    fn doc(&self) -> DocId {
        self.docset().doc()
    }

    fn cost(&self) -> u64 {
        self.docset().cost()
    }

    fn two_phase(&mut self) -> Option<&mut dyn TwoPhase> {
        self.docset_mut().two_phase()
    }

    fn count(&mut self) -> u32 {
        self.docset_mut().count()
    }
}

impl Scorer for FilteredScorer {
    fn score(&mut self) -> Score {
        match self {
            FilteredScorer::RandomAccess(scorer) => scorer.score(),
            FilteredScorer::LeapFrog(intersection) => intersection.score(),
            FilteredScorer::QueryFirst(scorer) => scorer.score(),
            FilteredScorer::MatchAll(scorer) => scorer.score(),
        }
    }

    fn freq(&mut self) -> u32 {
        match self {
            FilteredScorer::RandomAccess(scorer) => scorer.freq(),
            FilteredScorer::LeapFrog(intersection) => intersection.freq(),
            FilteredScorer::QueryFirst(scorer) => scorer.freq(),
            FilteredScorer::MatchAll(scorer) => scorer.freq(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{FilterScorer, FilteredScorer, QueryFirstScorer};
    use crate::bits::BitSet;
    use crate::docset::{DocSet, TERMINATED};
    use crate::query::{ConstScorer, Intersection, Scorer, VecDocSet};

    fn query_scorer(docs: Vec<u32>, score: f32) -> Box<dyn Scorer> {
        Box::new(ConstScorer::new(VecDocSet::from(docs), score))
    }

    #[test]
    fn test_filter_scorer_adds_nothing() {
        let filter: Box<dyn Scorer> =
            Box::new(FilterScorer::new(Box::new(VecDocSet::from(vec![2, 4, 6]))));
        let mut scorer = FilteredScorer::LeapFrog(Intersection::new(vec![
            query_scorer(vec![1, 4, 6, 9], 2.5),
            filter,
        ]));
        assert_eq!(scorer.strategy_name(), "leap_frog");
        assert_eq!(scorer.advance(), 4);
        assert_eq!(scorer.score(), 2.5);
        assert_eq!(scorer.freq(), 1);
        assert_eq!(scorer.advance(), 6);
        assert_eq!(scorer.advance(), TERMINATED);
    }

    #[test]
    fn test_query_first_scorer() {
        let mut bitset = BitSet::with_max_value(10);
        bitset.insert(4);
        bitset.insert(9);
        let mut scorer = FilteredScorer::QueryFirst(QueryFirstScorer::new(
            query_scorer(vec![1, 4, 6, 9], 3.0),
            Arc::new(bitset),
        ));
        assert!(scorer.two_phase().is_some());
        assert_eq!(scorer.seek(2), 4);
        assert_eq!(scorer.score(), 3.0);
        assert_eq!(scorer.advance(), 9);
        assert_eq!(scorer.advance(), TERMINATED);
    }
}
