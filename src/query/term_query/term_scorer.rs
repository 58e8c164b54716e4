use std::sync::Arc;

use crate::core::Posting;
use crate::docset::{DocSet, NOT_STARTED, TERMINATED};
use crate::query::{Explanation, Scorer};
use crate::{DocId, Score};

/// Scorer iterating over the postings of a term.
pub struct TermScorer {
    postings: Arc<[Posting]>,
    next: usize,
    doc: DocId,
    boost: Score,
}

impl TermScorer {
    pub(crate) fn new(postings: Arc<[Posting]>, boost: Score) -> TermScorer {
        TermScorer {
            postings,
            next: 0,
            doc: NOT_STARTED,
            boost,
        }
    }

    /// Number of occurrences of the term in the current document.
    pub fn term_freq(&self) -> u32 {
        match self.doc {
            NOT_STARTED | TERMINATED => 0,
            _ => self.postings[self.next - 1].term_freq,
        }
    }

    pub(crate) fn explain(&self) -> Explanation {
        let term_freq = self.term_freq();
        let mut explanation =
            Explanation::new("TermQuery, product of...", self.boost * term_freq as Score);
        explanation.add_const("boost", self.boost);
        explanation.add_const(
            "freq, occurrences of the term within the document",
            term_freq as Score,
        );
        explanation
    }
}

impl DocSet for TermScorer {
    fn advance(&mut self) -> DocId {
        match self.postings.get(self.next) {
            Some(posting) => {
                self.next += 1;
                self.doc = posting.doc;
            }
            None => {
                self.doc = TERMINATED;
            }
        }
        self.doc
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.doc != NOT_STARTED && self.doc >= target {
            return self.doc;
        }
        self.next += self.postings[self.next..].partition_point(|posting| posting.doc < target);
        self.advance()
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn cost(&self) -> u64 {
        self.postings.len() as u64
    }
}

impl Scorer for TermScorer {
    fn score(&mut self) -> Score {
        self.boost * self.term_freq() as Score
    }

    fn freq(&mut self) -> u32 {
        self.term_freq()
    }
}
