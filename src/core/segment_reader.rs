use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::bits::{AliveBitSet, Bits};
use crate::docset::TERMINATED;
use crate::{DocId, QueryError};

/// Occurrence of a term in a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Posting {
    /// Document containing the term.
    pub doc: DocId,
    /// Number of occurrences of the term in the document. Always strictly positive.
    pub term_freq: u32,
}

/// Entry point to access the data of a segment.
///
/// A segment holds `max_doc` documents, some of which may have been deleted,
/// and the posting lists of its terms. Posting lists are kept in memory and
/// shared: cloning a `SegmentReader` is cheap.
#[derive(Clone)]
pub struct SegmentReader {
    max_doc: DocId,
    alive_bitset_opt: Option<AliveBitSet>,
    postings: HashMap<String, Arc<[Posting]>>,
}

impl SegmentReader {
    /// Returns a builder for a segment of `max_doc` documents.
    pub fn builder(max_doc: DocId) -> SegmentReaderBuilder {
        SegmentReaderBuilder {
            max_doc,
            deleted_docs: Vec::new(),
            postings: HashMap::new(),
        }
    }

    /// Returns the highest document id ever attributed in
    /// this segment + 1.
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    /// Returns the number of alive documents.
    /// Deleted documents are not counted.
    pub fn num_docs(&self) -> DocId {
        self.max_doc - self.num_deleted_docs()
    }

    /// Returns the number of documents that have been
    /// deleted in the segment.
    pub fn num_deleted_docs(&self) -> DocId {
        self.alive_bitset_opt
            .as_ref()
            .map(|alive_bitset| alive_bitset.num_deleted() as DocId)
            .unwrap_or(0)
    }

    /// Returns true iff some of the documents of the segment have been deleted.
    pub fn has_deletes(&self) -> bool {
        self.num_deleted_docs() > 0
    }

    /// Returns the bitset representing the alive documents, if any document
    /// has been deleted.
    pub fn alive_bitset(&self) -> Option<&AliveBitSet> {
        self.alive_bitset_opt.as_ref()
    }

    /// Returns the accept docs to hand to a [`Weight`](crate::query::Weight)
    /// so that deleted documents are excluded.
    ///
    /// `None` means every document is accepted.
    pub fn accept_docs(&self) -> Option<Arc<dyn Bits>> {
        self.alive_bitset_opt
            .clone()
            .map(|alive_bitset| Arc::new(alive_bitset) as Arc<dyn Bits>)
    }

    /// Returns the posting list of a term, `None` if the term does not appear in
    /// the segment.
    ///
    /// Deleted documents are not removed from posting lists.
    pub fn postings(&self, term: &str) -> Option<Arc<[Posting]>> {
        self.postings.get(term).cloned()
    }

    /// Returns the number of documents containing the term.
    ///
    /// Deleted documents are counted.
    pub fn doc_freq(&self, term: &str) -> u32 {
        self.postings
            .get(term)
            .map(|postings| postings.len() as u32)
            .unwrap_or(0)
    }

    /// Returns the terms of the segment, in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }
}

impl fmt::Debug for SegmentReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentReader")
            .field("max_doc", &self.max_doc)
            .field("num_deleted_docs", &self.num_deleted_docs())
            .field("num_terms", &self.postings.len())
            .finish()
    }
}

/// Builds an in-memory [`SegmentReader`].
///
/// ```rust
/// use filtered_query::SegmentReader;
///
/// let reader = SegmentReader::builder(8)
///     .postings("blue", vec![(1, 2), (5, 1)])
///     .unwrap()
///     .deleted_docs(&[5])
///     .build().unwrap();
/// assert_eq!(reader.num_docs(), 7);
/// assert_eq!(reader.doc_freq("blue"), 2);
/// ```
pub struct SegmentReaderBuilder {
    max_doc: DocId,
    deleted_docs: Vec<DocId>,
    postings: HashMap<String, Arc<[Posting]>>,
}

impl SegmentReaderBuilder {
    /// Registers the posting list of `term`, as `(doc, term_freq)` pairs.
    ///
    /// Docs must be strictly increasing and lower than `max_doc`. Term frequencies
    /// must be strictly positive. Registering the same term twice replaces its postings.
    pub fn postings(
        mut self,
        term: impl Into<String>,
        postings: Vec<(DocId, u32)>,
    ) -> crate::Result<SegmentReaderBuilder> {
        let term = term.into();
        let mut previous_doc: Option<DocId> = None;
        for &(doc, term_freq) in &postings {
            if doc >= self.max_doc {
                return Err(QueryError::InvalidArgument(format!(
                    "Posting of term {term:?} references doc {doc} >= max_doc {}",
                    self.max_doc
                )));
            }
            if previous_doc.is_some_and(|previous_doc| previous_doc >= doc) {
                return Err(QueryError::InvalidArgument(format!(
                    "Postings of term {term:?} must be strictly increasing, got doc {doc} after \
                     {previous_doc:?}"
                )));
            }
            if term_freq == 0 {
                return Err(QueryError::InvalidArgument(format!(
                    "Posting of term {term:?} for doc {doc} has a null term frequency"
                )));
            }
            previous_doc = Some(doc);
        }
        let postings: Arc<[Posting]> = postings
            .into_iter()
            .map(|(doc, term_freq)| Posting { doc, term_freq })
            .collect();
        self.postings.insert(term, postings);
        Ok(self)
    }

    /// Marks documents as deleted. Docs greater or equal to `max_doc` are ignored.
    pub fn deleted_docs(mut self, deleted_docs: &[DocId]) -> SegmentReaderBuilder {
        self.deleted_docs.extend_from_slice(deleted_docs);
        self
    }

    /// Builds the segment reader.
    ///
    /// Returns an error if `max_doc` exceeds [`TERMINATED`]: a segment holds at most
    /// 2^31 documents.
    pub fn build(self) -> crate::Result<SegmentReader> {
        if self.max_doc > TERMINATED {
            return Err(QueryError::InvalidArgument(format!(
                "max_doc {} exceeds the maximum number of documents of a segment ({TERMINATED})",
                self.max_doc
            )));
        }
        let alive_bitset = AliveBitSet::from_deleted_docs(&self.deleted_docs, self.max_doc);
        let alive_bitset_opt = if alive_bitset.num_deleted() > 0 {
            Some(alive_bitset)
        } else {
            None
        };
        Ok(SegmentReader {
            max_doc: self.max_doc,
            alive_bitset_opt,
            postings: self.postings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Posting, SegmentReader};
    use crate::docset::TERMINATED;
    use crate::QueryError;

    #[test]
    fn test_segment_reader_without_deletes() {
        let reader = SegmentReader::builder(10)
            .postings("a", vec![(1, 1), (4, 3)])
            .unwrap()
            .build().unwrap();
        assert_eq!(reader.max_doc(), 10);
        assert_eq!(reader.num_docs(), 10);
        assert!(!reader.has_deletes());
        assert!(reader.alive_bitset().is_none());
        assert!(reader.accept_docs().is_none());
        assert_eq!(
            &reader.postings("a").unwrap()[..],
            &[
                Posting { doc: 1, term_freq: 1 },
                Posting { doc: 4, term_freq: 3 }
            ]
        );
        assert!(reader.postings("b").is_none());
        assert_eq!(reader.doc_freq("a"), 2);
        assert_eq!(reader.doc_freq("b"), 0);
        assert_eq!(reader.terms().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_segment_reader_with_deletes() {
        let reader = SegmentReader::builder(10)
            .deleted_docs(&[2, 7])
            .deleted_docs(&[7, 42])
            .build().unwrap();
        assert_eq!(reader.num_deleted_docs(), 2);
        assert_eq!(reader.num_docs(), 8);
        assert!(reader.has_deletes());
        let accept_docs = reader.accept_docs().unwrap();
        assert!(!accept_docs.get(2));
        assert!(accept_docs.get(3));
        assert_eq!(accept_docs.len(), 10);
        assert_eq!(
            format!("{reader:?}"),
            "SegmentReader { max_doc: 10, num_deleted_docs: 2, num_terms: 0 }"
        );
    }

    #[test]
    fn test_segment_reader_rejects_invalid_postings() {
        let unsorted = SegmentReader::builder(10).postings("a", vec![(3, 1), (1, 1)]);
        assert!(matches!(unsorted, Err(QueryError::InvalidArgument(_))));
        let duplicate = SegmentReader::builder(10).postings("a", vec![(3, 1), (3, 1)]);
        assert!(matches!(duplicate, Err(QueryError::InvalidArgument(_))));
        let out_of_range = SegmentReader::builder(10).postings("a", vec![(10, 1)]);
        assert!(matches!(out_of_range, Err(QueryError::InvalidArgument(_))));
        let null_freq = SegmentReader::builder(10).postings("a", vec![(1, 0)]);
        assert!(matches!(null_freq, Err(QueryError::InvalidArgument(_))));
    }

    #[test]
    fn test_segment_reader_max_doc_bound() {
        let too_large = SegmentReader::builder(TERMINATED + 1).build();
        assert!(matches!(too_large, Err(QueryError::InvalidArgument(_))));
        let too_large = SegmentReader::builder(u32::MAX).build();
        assert!(matches!(too_large, Err(QueryError::InvalidArgument(_))));
    }
}
