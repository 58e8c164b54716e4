use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use super::{Collector, SegmentCollector};
use crate::core::SegmentReader;
use crate::{DocAddress, DocId, Score, SegmentOrdinal};

// Rust heap is a max-heap and we need a min heap.
//
// A doc is "greater" when it ranks lower: smaller score, or same score and
// larger address. The top of the heap is therefore the first doc to evict.
struct ComparableDoc<D> {
    score: Score,
    doc: D,
}

impl<D: Ord> PartialOrd for ComparableDoc<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<D: Ord> Ord for ComparableDoc<D> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc.cmp(&other.doc))
    }
}

impl<D: Ord> PartialEq for ComparableDoc<D> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<D: Ord> Eq for ComparableDoc<D> {}

/// Keeps the `limit` best `(score, doc)` pairs pushed into it.
struct TopNComputer<D> {
    limit: usize,
    heap: BinaryHeap<ComparableDoc<D>>,
}

impl<D: Ord> TopNComputer<D> {
    fn new(limit: usize) -> TopNComputer<D> {
        TopNComputer {
            limit,
            heap: BinaryHeap::with_capacity(limit),
        }
    }

    #[inline]
    fn push(&mut self, score: Score, doc: D) {
        let scored_doc = ComparableDoc { score, doc };
        if self.heap.len() < self.limit {
            self.heap.push(scored_doc);
            return;
        }
        if let Some(mut head) = self.heap.peek_mut() {
            if scored_doc < *head {
                *head = scored_doc;
            }
        }
    }

    /// Returns the pairs, best first.
    fn into_sorted_vec(self) -> Vec<(Score, D)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|scored_doc| (scored_doc.score, scored_doc.doc))
            .collect()
    }
}

/// The `TopDocs` collector keeps track of the top `K` documents
/// sorted by their score.
///
/// The implementation is based on a `BinaryHeap`.
/// The theorical complexity for collecting the top `K` out of `n` documents
/// is `O(n log K)`.
///
/// This collector guarantees a stable sorting in case of a tie on the
/// document score: the lowest `DocAddress` comes first.
///
/// ```rust
/// use filtered_query::collector::TopDocs;
/// use filtered_query::query::TermQuery;
/// use filtered_query::{DocAddress, Searcher, SegmentReader};
///
/// let segment = SegmentReader::builder(5)
///     .postings("diary", vec![(1, 1), (3, 2), (4, 1)])
///     .unwrap()
///     .build().unwrap();
/// let searcher = Searcher::new(vec![segment]);
///
/// let top_docs = searcher
///     .search(&TermQuery::new("diary"), &TopDocs::with_limit(2))
///     .unwrap();
///
/// assert_eq!(top_docs[0], (2.0, DocAddress::new(0, 3)));
/// assert_eq!(top_docs[1], (1.0, DocAddress::new(0, 1)));
/// ```
pub struct TopDocs {
    limit: usize,
}

impl fmt::Debug for TopDocs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TopDocs(limit={})", self.limit)
    }
}

impl TopDocs {
    /// Creates a top score collector, with a number of documents equal to "limit".
    ///
    /// # Panics
    /// The method panics if limit is 0
    pub fn with_limit(limit: usize) -> TopDocs {
        assert!(limit >= 1, "Limit must be strictly greater than 0.");
        TopDocs { limit }
    }
}

impl Collector for TopDocs {
    type Fruit = Vec<(Score, DocAddress)>;

    type Child = TopScoreSegmentCollector;

    fn for_segment(
        &self,
        segment_local_id: SegmentOrdinal,
        _reader: &SegmentReader,
    ) -> crate::Result<Self::Child> {
        Ok(TopScoreSegmentCollector {
            segment_ord: segment_local_id,
            top_n: TopNComputer::new(self.limit),
        })
    }

    fn requires_scoring(&self) -> bool {
        true
    }

    fn merge_fruits(
        &self,
        child_fruits: Vec<Vec<(Score, DocAddress)>>,
    ) -> crate::Result<Self::Fruit> {
        let mut top_n = TopNComputer::new(self.limit);
        for (score, doc_address) in child_fruits.into_iter().flatten() {
            top_n.push(score, doc_address);
        }
        Ok(top_n.into_sorted_vec())
    }
}

/// Segment Collector associated to `TopDocs`.
pub struct TopScoreSegmentCollector {
    segment_ord: SegmentOrdinal,
    top_n: TopNComputer<DocId>,
}

impl SegmentCollector for TopScoreSegmentCollector {
    type Fruit = Vec<(Score, DocAddress)>;

    fn collect(&mut self, doc: DocId, score: Score) {
        self.top_n.push(score, doc);
    }

    fn harvest(self) -> Vec<(Score, DocAddress)> {
        let segment_ord = self.segment_ord;
        self.top_n
            .into_sorted_vec()
            .into_iter()
            .map(|(score, doc)| (score, DocAddress::new(segment_ord, doc)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{TopDocs, TopNComputer};
    use crate::collector::{Collector, SegmentCollector};
    use crate::{DocAddress, Score};

    #[test]
    fn test_top_collector_not_at_capacity() {
        let mut segment_collector = TopDocs::with_limit(4).for_segment(0, &reader()).unwrap();
        segment_collector.collect(1, 0.8);
        segment_collector.collect(3, 0.2);
        segment_collector.collect(5, 0.3);
        assert_eq!(
            segment_collector.harvest(),
            vec![
                (0.8, DocAddress::new(0, 1)),
                (0.3, DocAddress::new(0, 5)),
                (0.2, DocAddress::new(0, 3))
            ]
        );
    }

    #[test]
    fn test_top_collector_at_capacity() {
        let mut segment_collector = TopDocs::with_limit(4).for_segment(1, &reader()).unwrap();
        segment_collector.collect(1, 0.8);
        segment_collector.collect(3, 0.2);
        segment_collector.collect(5, 0.3);
        segment_collector.collect(7, 0.9);
        segment_collector.collect(9, -0.2);
        assert_eq!(
            segment_collector.harvest(),
            vec![
                (0.9, DocAddress::new(1, 7)),
                (0.8, DocAddress::new(1, 1)),
                (0.3, DocAddress::new(1, 5)),
                (0.2, DocAddress::new(1, 3))
            ]
        );
    }

    #[test]
    fn test_top_collector_stable_sorting() {
        let mut top_n = TopNComputer::new(2);
        for doc in [4u32, 1, 9, 2] {
            top_n.push(1.0, doc);
        }
        assert_eq!(top_n.into_sorted_vec(), vec![(1.0, 1), (1.0, 2)]);
    }

    #[test]
    fn test_top_docs_merge_fruits() {
        let collector = TopDocs::with_limit(3);
        let merged = collector
            .merge_fruits(vec![
                vec![(3.0, DocAddress::new(0, 5)), (1.0, DocAddress::new(0, 1))],
                vec![],
                vec![
                    (3.0, DocAddress::new(2, 0)),
                    (2.0, DocAddress::new(2, 8)),
                    (0.5, DocAddress::new(2, 9)),
                ],
            ])
            .unwrap();
        let expected: Vec<(Score, DocAddress)> = vec![
            (3.0, DocAddress::new(0, 5)),
            (3.0, DocAddress::new(2, 0)),
            (2.0, DocAddress::new(2, 8)),
        ];
        assert_eq!(merged, expected);
    }

    #[test]
    #[should_panic(expected = "Limit must be strictly greater than 0.")]
    fn test_top_0() {
        TopDocs::with_limit(0);
    }

    fn reader() -> crate::SegmentReader {
        crate::SegmentReader::builder(10).build().unwrap()
    }
}
