use std::sync::Arc;

use super::term_scorer::TermScorer;
use crate::bits::Bits;
use crate::core::SegmentReader;
use crate::docset::DocSet;
use crate::error::does_not_match;
use crate::query::{AcceptedDocSet, Explanation, Scorer, Weight};
use crate::{DocId, Score};

/// Weight associated with a [`TermQuery`](super::TermQuery).
pub struct TermWeight {
    term: String,
}

impl Weight for TermWeight {
    fn scorer(
        &self,
        reader: &SegmentReader,
        boost: Score,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<Box<dyn Scorer>>> {
        let Some(term_scorer) = self.specialized_scorer(reader, boost) else {
            return Ok(None);
        };
        let scorer: Box<dyn Scorer> = match accept_docs {
            Some(accept_docs) => Box::new(AcceptedDocSet::new(term_scorer, accept_docs)),
            None => Box::new(term_scorer),
        };
        Ok(Some(scorer))
    }

    fn explain(&self, reader: &SegmentReader, doc: DocId) -> crate::Result<Explanation> {
        let Some(mut scorer) = self.specialized_scorer(reader, 1.0) else {
            return Err(does_not_match(doc));
        };
        if scorer.seek(doc) != doc {
            return Err(does_not_match(doc));
        }
        Ok(scorer.explain())
    }

    fn count(&self, reader: &SegmentReader) -> crate::Result<u32> {
        if reader.has_deletes() {
            let accept_docs = reader.accept_docs();
            Ok(self
                .scorer(reader, 1.0, accept_docs)?
                .map(|mut scorer| scorer.count())
                .unwrap_or(0))
        } else {
            Ok(reader.doc_freq(&self.term))
        }
    }
}

impl TermWeight {
    pub(crate) fn new(term: String) -> TermWeight {
        TermWeight { term }
    }

    /// Returns the scorer over the postings of the term, `None` if the
    /// segment does not contain the term.
    pub fn specialized_scorer(&self, reader: &SegmentReader, boost: Score) -> Option<TermScorer> {
        let postings = reader.postings(&self.term)?;
        Some(TermScorer::new(postings, boost))
    }
}
