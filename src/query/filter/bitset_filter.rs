use std::fmt;
use std::sync::Arc;

use super::{DocIdSet, Filter};
use crate::bits::{BitSet, Bits};
use crate::core::SegmentReader;
use crate::query::BitSetDocSet;
use crate::{DocId, QueryError};

/// Produces, for a given segment, the bitset of the documents accepted by a [`BitSetFilter`].
pub trait BitSetProducer: Send + Sync + 'static {
    /// Returns the accepted documents of `reader`, as a bitset of `reader.max_doc()` bits.
    fn produce(&self, reader: &SegmentReader) -> crate::Result<BitSet>;
}

impl<F> BitSetProducer for F
where F: Fn(&SegmentReader) -> crate::Result<BitSet> + Send + Sync + 'static
{
    fn produce(&self, reader: &SegmentReader) -> crate::Result<BitSet> {
        self(reader)
    }
}

/// Filter accepting the documents of a per-segment [`BitSet`].
///
/// Exposes both an iterator and random access over the bitset.
#[derive(Clone)]
pub struct BitSetFilter {
    producer: Arc<dyn BitSetProducer>,
}

impl BitSetFilter {
    /// Creates a filter from a closure producing the bitset of each segment.
    pub fn new<F>(producer: F) -> BitSetFilter
    where F: Fn(&SegmentReader) -> crate::Result<BitSet> + Send + Sync + 'static {
        BitSetFilter::from_producer(Arc::new(producer))
    }

    /// Creates a filter from a [`BitSetProducer`].
    pub fn from_producer(producer: Arc<dyn BitSetProducer>) -> BitSetFilter {
        BitSetFilter { producer }
    }
}

impl fmt::Debug for BitSetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BitSetFilter")
    }
}

impl Filter for BitSetFilter {
    fn doc_id_set(
        &self,
        reader: &SegmentReader,
        accept_docs: Option<Arc<dyn Bits>>,
    ) -> crate::Result<Option<DocIdSet>> {
        let mut bitset = self.producer.produce(reader)?;
        if bitset.max_value() != reader.max_doc() {
            return Err(QueryError::InvalidArgument(format!(
                "Filter bitset covers {} documents, expected max_doc={}",
                bitset.max_value(),
                reader.max_doc()
            )));
        }
        if let Some(accept_docs) = accept_docs {
            let rejected_docs: Vec<DocId> =
                bitset.iter().filter(|&doc| !accept_docs.get(doc)).collect();
            for doc in rejected_docs {
                bitset.remove(doc);
            }
        }
        if bitset.len() == 0 {
            return Ok(None);
        }
        let bitset = Arc::new(bitset);
        Ok(Some(DocIdSet::Both {
            docset: Box::new(BitSetDocSet::from(bitset.clone())),
            bits: bitset,
        }))
    }
}
