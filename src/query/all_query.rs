use std::sync::Arc;

use crate::bits::Bits;
use crate::core::SegmentReader;
use crate::docset::{DocSet, NOT_STARTED, TERMINATED};
use crate::error::does_not_match;
use crate::query::{
    AcceptedDocSet, ConstScorer, EnableScoring, Explanation, Query, Scorer, Weight,
};
use crate::{DocId, Score};

/// Query that matches all of the documents.
///
/// All of the document get the score 1.0.
#[derive(Clone, Debug)]
pub struct AllQuery;

impl Query for AllQuery {
    fn weight(&self, _: EnableScoring<'_>) -> crate::Result<Box<dyn Weight>> {
        Ok(Box::new(AllWeight))
    }
}

/// Weight associated with the `AllQuery` query.
pub struct AllWeight;

impl Weight for AllWeight {
    fn scorer(
        &self,
        reader: &SegmentReader,
        boost: Score,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<Box<dyn Scorer>>> {
        let all_scorer = AllScorer::new(reader.max_doc());
        let scorer: Box<dyn Scorer> = match accept_docs {
            Some(accept_docs) => Box::new(ConstScorer::new(
                AcceptedDocSet::new(all_scorer, accept_docs),
                boost,
            )),
            None => Box::new(ConstScorer::new(all_scorer, boost)),
        };
        Ok(Some(scorer))
    }

    fn explain(&self, reader: &SegmentReader, doc: DocId) -> crate::Result<Explanation> {
        if doc >= reader.max_doc() {
            return Err(does_not_match(doc));
        }
        Ok(Explanation::new("AllQuery", 1.0))
    }

    fn count(&self, reader: &SegmentReader) -> crate::Result<u32> {
        Ok(reader.num_docs())
    }
}

/// Scorer associated with the `AllQuery` query.
pub struct AllScorer {
    doc: DocId,
    max_doc: DocId,
}

impl AllScorer {
    /// Creates a scorer over every document of `[0, max_doc)`.
    pub fn new(max_doc: DocId) -> AllScorer {
        AllScorer {
            doc: NOT_STARTED,
            max_doc,
        }
    }
}

impl DocSet for AllScorer {
    #[inline(always)]
    fn advance(&mut self) -> DocId {
        let next = match self.doc {
            NOT_STARTED => 0,
            TERMINATED => return TERMINATED,
            doc => doc + 1,
        };
        self.doc = if next >= self.max_doc { TERMINATED } else { next };
        self.doc
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.doc != NOT_STARTED && self.doc >= target {
            return self.doc;
        }
        self.doc = if target >= self.max_doc {
            TERMINATED
        } else {
            target
        };
        self.doc
    }

    #[inline(always)]
    fn doc(&self) -> DocId {
        self.doc
    }

    fn cost(&self) -> u64 {
        self.max_doc as u64
    }
}

impl Scorer for AllScorer {
    fn score(&mut self) -> Score {
        1.0
    }
}
