use super::Collector;
use crate::collector::SegmentCollector;
use crate::core::SegmentReader;
use crate::{DocId, Score, SegmentOrdinal};

/// `CountCollector` collector only counts how many
/// documents match the query.
///
/// ```rust
/// use filtered_query::collector::Count;
/// use filtered_query::query::{FilteredQuery, PredicateFilter, TermQuery};
/// use filtered_query::{Searcher, SegmentReader};
///
/// let segment = SegmentReader::builder(4)
///     .postings("diary", vec![(1, 1), (3, 1)])
///     .unwrap()
///     .build().unwrap();
/// let searcher = Searcher::new(vec![segment]);
///
/// let query = FilteredQuery::new(
///     Box::new(TermQuery::new("diary")),
///     Box::new(PredicateFilter::new("odd", |doc| doc % 2 == 1)),
/// );
/// let count = searcher.search(&query, &Count).unwrap();
///
/// assert_eq!(count, 2);
/// ```
pub struct Count;

impl Collector for Count {
    type Fruit = usize;

    type Child = SegmentCountCollector;

    fn for_segment(
        &self,
        _: SegmentOrdinal,
        _: &SegmentReader,
    ) -> crate::Result<SegmentCountCollector> {
        Ok(SegmentCountCollector::default())
    }

    fn requires_scoring(&self) -> bool {
        false
    }

    fn merge_fruits(&self, segment_counts: Vec<usize>) -> crate::Result<usize> {
        Ok(segment_counts.into_iter().sum())
    }
}

/// Segment collector associated with [`Count`].
#[derive(Default)]
pub struct SegmentCountCollector {
    count: usize,
}

impl SegmentCollector for SegmentCountCollector {
    type Fruit = usize;

    fn collect(&mut self, _: DocId, _: Score) {
        self.count += 1;
    }

    fn harvest(self) -> usize {
        self.count
    }
}
