use crate::docset::{DocSet, NOT_STARTED, TERMINATED};
use crate::query::two_phase::{advance_approximation, confirm, match_cost, seek_approximation};
use crate::query::{Scorer, TwoPhase};
use crate::{DocId, Score};

/// Returns the intersection scorer.
///
/// The score associated with the documents is the sum of the
/// score of the `Scorer`s given in argument.
///
/// Returns `None` if no scorer is given.
pub fn intersect_scorers(mut scorers: Vec<Box<dyn Scorer>>) -> Option<Box<dyn Scorer>> {
    if scorers.len() <= 1 {
        return scorers.pop();
    }
    // We know that we have at least 2 elements.
    Some(Box::new(Intersection::new(scorers)))
}

/// Leap-frog over the approximations of the conjuncts.
///
/// The documents it yields are the ones all approximations agree on. None of them
/// has been confirmed yet.
pub struct LeapFrog<TDocSet: DocSet> {
    docsets: Vec<TDocSet>,
    doc: DocId,
}

impl<TDocSet: DocSet> LeapFrog<TDocSet> {
    /// Seeks every conjunct but `candidate_emitter` to the candidate, until they all agree.
    fn go_to_candidate(&mut self, mut candidate: DocId, mut candidate_emitter: usize) -> DocId {
        'outer: loop {
            if candidate == TERMINATED {
                return TERMINATED;
            }
            for (ord, docset) in self.docsets.iter_mut().enumerate() {
                if ord == candidate_emitter {
                    continue;
                }
                let doc = seek_approximation(docset, candidate);
                if doc > candidate {
                    candidate = doc;
                    candidate_emitter = ord;
                    continue 'outer;
                }
            }
            return candidate;
        }
    }
}

impl<TDocSet: DocSet> DocSet for LeapFrog<TDocSet> {
    fn advance(&mut self) -> DocId {
        if self.doc == TERMINATED {
            return TERMINATED;
        }
        let candidate = advance_approximation(&mut self.docsets[0]);
        self.doc = self.go_to_candidate(candidate, 0);
        self.doc
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.doc != NOT_STARTED && self.doc >= target {
            return self.doc;
        }
        let candidate = seek_approximation(&mut self.docsets[0], target);
        self.doc = self.go_to_candidate(candidate, 0);
        self.doc
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn cost(&self) -> u64 {
        self.docsets.iter().map(DocSet::cost).min().unwrap_or(0)
    }
}

/// Creates a `DocSet` that iterate through the intersection of two or more `DocSet`s.
///
/// Iteration leap-frogs over the approximations of the conjuncts. Once every
/// conjunct agrees on a candidate, the two-phase conjuncts are asked to confirm it,
/// cheapest first. The first rejection moves the intersection past the candidate.
///
/// If any conjunct is two-phase, so is the intersection: nesting it into another
/// conjunction keeps confirmation lazy.
pub struct Intersection<TDocSet: DocSet> {
    leap_frog: LeapFrog<TDocSet>,
    // Conjuncts to confirm, by increasing match cost.
    two_phase_ords: Vec<usize>,
    match_cost: f32,
}

impl<TDocSet: DocSet> Intersection<TDocSet> {
    /// Creates an intersection led by its sparsest conjunct.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two docsets are given.
    pub fn new(mut docsets: Vec<TDocSet>) -> Intersection<TDocSet> {
        docsets.sort_by_key(|docset| docset.cost());
        Intersection::in_order(docsets)
    }

    /// Creates an intersection led by the first docset.
    ///
    /// The first docset is the only one moved with `advance`. The others are
    /// only ever sought to its candidates.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two docsets are given.
    pub fn in_order(mut docsets: Vec<TDocSet>) -> Intersection<TDocSet> {
        assert!(
            docsets.len() >= 2,
            "An intersection requires at least two docsets"
        );
        let mut two_phase_costs: Vec<(usize, f32)> = docsets
            .iter_mut()
            .enumerate()
            .filter_map(|(ord, docset)| match_cost(docset).map(|cost| (ord, cost)))
            .collect();
        two_phase_costs.sort_by(|left, right| left.1.total_cmp(&right.1));
        let match_cost: f32 = two_phase_costs.iter().map(|(_, cost)| cost).sum();
        Intersection {
            leap_frog: LeapFrog {
                docsets,
                doc: NOT_STARTED,
            },
            two_phase_ords: two_phase_costs.into_iter().map(|(ord, _)| ord).collect(),
            match_cost,
        }
    }

    /// Returns the conjunct at the given position.
    pub fn docset_mut(&mut self, ord: usize) -> &mut TDocSet {
        &mut self.leap_frog.docsets[ord]
    }

    fn confirm_candidate(&mut self) -> bool {
        for &ord in &self.two_phase_ords {
            if !confirm(&mut self.leap_frog.docsets[ord]) {
                return false;
            }
        }
        true
    }

    fn confirm_or_advance(&mut self, candidate: DocId) -> DocId {
        if candidate == TERMINATED || self.confirm_candidate() {
            candidate
        } else {
            self.advance()
        }
    }
}

impl<TDocSet: DocSet> DocSet for Intersection<TDocSet> {
    fn advance(&mut self) -> DocId {
        loop {
            let candidate = self.leap_frog.advance();
            if candidate == TERMINATED || self.confirm_candidate() {
                return candidate;
            }
        }
    }

    fn seek(&mut self, target: DocId) -> DocId {
        let current = self.leap_frog.doc();
        let candidate = self.leap_frog.seek(target);
        if candidate == current {
            return candidate;
        }
        self.confirm_or_advance(candidate)
    }

    fn doc(&self) -> DocId {
        self.leap_frog.doc()
    }

    fn cost(&self) -> u64 {
        self.leap_frog.cost()
    }

    fn two_phase(&mut self) -> Option<&mut dyn TwoPhase> {
        if self.two_phase_ords.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl<TDocSet: DocSet> TwoPhase for Intersection<TDocSet> {
    fn approximation(&mut self) -> &mut dyn DocSet {
        &mut self.leap_frog
    }

    fn matches(&mut self) -> bool {
        self.confirm_candidate()
    }

    fn match_cost(&self) -> f32 {
        self.match_cost
    }
}

impl<TScorer: Scorer> Scorer for Intersection<TScorer> {
    fn score(&mut self) -> Score {
        self.leap_frog
            .docsets
            .iter_mut()
            .map(Scorer::score)
            .sum::<Score>()
    }

    fn freq(&mut self) -> u32 {
        self.leap_frog.docsets.iter_mut().map(Scorer::freq).sum()
    }
}
