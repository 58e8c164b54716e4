use std::sync::Arc;

use crate::bits::{BitSet, TinySet};
use crate::docset::{DocSet, NOT_STARTED, TERMINATED};
use crate::DocId;

/// A `BitSetDocSet` makes it possible to iterate through a bitset as if it was a `DocSet`.
///
/// # Implementation detail
///
/// Skipping is relatively fast here as we can directly point to the
/// right tiny bitset bucket.
pub struct BitSetDocSet {
    docs: Arc<BitSet>,
    cursor_bucket: u32, //< index associated with the current tiny bitset
    cursor_tinybitset: TinySet,
    doc: u32,
}

impl BitSetDocSet {
    fn go_to_bucket(&mut self, bucket_addr: u32) {
        self.cursor_bucket = bucket_addr;
        self.cursor_tinybitset = self.docs.tinyset(bucket_addr);
    }
}

impl From<BitSet> for BitSetDocSet {
    fn from(docs: BitSet) -> BitSetDocSet {
        BitSetDocSet::from(Arc::new(docs))
    }
}

impl From<Arc<BitSet>> for BitSetDocSet {
    fn from(docs: Arc<BitSet>) -> BitSetDocSet {
        let first_tiny_bitset = if docs.num_buckets() == 0 {
            TinySet::empty()
        } else {
            docs.tinyset(0)
        };
        BitSetDocSet {
            docs,
            cursor_bucket: 0,
            cursor_tinybitset: first_tiny_bitset,
            doc: NOT_STARTED,
        }
    }
}

impl DocSet for BitSetDocSet {
    #[inline]
    fn advance(&mut self) -> DocId {
        if self.doc == TERMINATED {
            return TERMINATED;
        }
        loop {
            if let Some(lower) = self.cursor_tinybitset.pop_lowest() {
                self.doc = (self.cursor_bucket * 64u32) | lower;
                return self.doc;
            }
            match self.docs.first_non_empty_bucket(self.cursor_bucket + 1) {
                Some(bucket) => self.go_to_bucket(bucket),
                None => {
                    self.doc = TERMINATED;
                    return TERMINATED;
                }
            }
        }
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.doc != NOT_STARTED && self.doc >= target {
            return self.doc;
        }
        if target >= self.docs.max_value() {
            self.doc = TERMINATED;
            return TERMINATED;
        }
        let target_bucket = target / 64u32;
        if target_bucket != self.cursor_bucket {
            self.go_to_bucket(target_bucket);
        }
        // Mask out the bits lower than our target document.
        self.cursor_tinybitset = self
            .cursor_tinybitset
            .intersect(TinySet::range_greater_or_equal(target % 64u32));
        self.advance()
    }

    /// Returns the current document
    #[inline]
    fn doc(&self) -> DocId {
        self.doc
    }

    /// Number of documents in the bitset.
    fn cost(&self) -> u64 {
        self.docs.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::BitSetDocSet;
    use crate::bits::BitSet;
    use crate::docset::{DocSet, NOT_STARTED, TERMINATED};
    use crate::tests::{collect_docs, generate_nonunique_unsorted, test_seek_against_unoptimized};
    use crate::DocId;

    fn create_docbitset(docs: &[DocId], max_doc: DocId) -> BitSetDocSet {
        let mut docset = BitSet::with_max_value(max_doc);
        for &doc in docs {
            docset.insert(doc);
        }
        BitSetDocSet::from(docset)
    }

    fn test_go_through_sequential(docs: &[DocId]) {
        let mut docset = create_docbitset(docs, 1_000u32);
        for &doc in docs {
            assert_eq!(docset.advance(), doc);
            assert_eq!(docset.doc(), doc);
        }
        assert_eq!(docset.advance(), TERMINATED);
    }

    #[test]
    fn test_docbitset_sequential() {
        test_go_through_sequential(&[]);
        test_go_through_sequential(&[1, 2, 3]);
        test_go_through_sequential(&[1, 2, 3, 4, 5, 63, 64, 65, 100, 101, 102]);
    }

    #[test]
    fn test_docbitset_empty() {
        let mut docset = BitSetDocSet::from(BitSet::with_max_value(0));
        assert_eq!(docset.doc(), NOT_STARTED);
        assert_eq!(docset.advance(), TERMINATED);
        let mut docset = BitSetDocSet::from(BitSet::with_max_value(0));
        assert_eq!(docset.seek(0), TERMINATED);
    }

    #[test]
    fn test_docbitset_seek() {
        let mut docset = create_docbitset(&[1, 2, 3, 5, 7, 8, 9, 100, 1_000], 1_001);
        assert_eq!(docset.seek(0), 1);
        assert_eq!(docset.seek(2), 2);
        assert_eq!(docset.seek(2), 2);
        assert_eq!(docset.seek(4), 5);
        assert_eq!(docset.advance(), 7);
        assert_eq!(docset.seek(9), 9);
        assert_eq!(docset.seek(64), 100);
        assert_eq!(docset.seek(129), 1_000);
        assert_eq!(docset.seek(1_001), TERMINATED);
        assert_eq!(docset.advance(), TERMINATED);
    }

    #[test]
    fn test_docbitset_seek_within_first_bucket() {
        let mut docset = create_docbitset(&[0, 10, 63, 64], 200);
        assert_eq!(docset.seek(11), 63);
        assert_eq!(docset.advance(), 64);
        assert_eq!(docset.advance(), TERMINATED);
    }

    #[test]
    fn test_docbitset_seek_against_unoptimized() {
        let docs = {
            let mut docs = generate_nonunique_unsorted(5_000, 700);
            docs.sort_unstable();
            docs.dedup();
            docs
        };
        test_seek_against_unoptimized(
            || create_docbitset(&docs, 5_000),
            vec![0, 1, 63, 64, 65, 127, 128, 1_000, 4_000, 4_999, 5_000, TERMINATED],
        );
    }

    #[test]
    fn test_docbitset_count_and_cost() {
        let docs: Vec<DocId> = (0..300).filter(|doc| doc % 7 == 3).collect();
        let mut docset = create_docbitset(&docs, 300);
        assert_eq!(docset.cost(), docs.len() as u64);
        assert_eq!(collect_docs(&mut docset), docs);
    }
}
