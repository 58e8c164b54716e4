use crate::docset::{DocSet, NOT_STARTED, TERMINATED};
use crate::query::Scorer;
use crate::{DocId, Score};

/// Simulate a `Postings` objects from a `Vec` of sorted doc ids.
///
/// Seeking is a binary search over the remaining doc ids.
/// The score is always `1.0`.
#[derive(Clone, Debug)]
pub struct VecDocSet {
    doc_ids: Vec<DocId>,
    next: usize,
    doc: DocId,
}

impl From<Vec<DocId>> for VecDocSet {
    fn from(doc_ids: Vec<DocId>) -> VecDocSet {
        debug_assert!(doc_ids.windows(2).all(|pair| pair[0] < pair[1]));
        VecDocSet {
            doc_ids,
            next: 0,
            doc: NOT_STARTED,
        }
    }
}

impl DocSet for VecDocSet {
    fn advance(&mut self) -> DocId {
        match self.doc_ids.get(self.next) {
            Some(&doc) => {
                self.next += 1;
                self.doc = doc;
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
        self.next += self.doc_ids[self.next..].partition_point(|&doc| doc < target);
        self.advance()
    }

    fn doc(&self) -> DocId {
        self.doc
    }

    fn cost(&self) -> u64 {
        self.doc_ids.len() as u64
    }
}

impl Scorer for VecDocSet {
    fn score(&mut self) -> Score {
        1.0
    }
}
