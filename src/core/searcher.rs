use crate::collector::Collector;
use crate::core::{Executor, SegmentReader};
use crate::query::{EnableScoring, Explanation, Query};
use crate::{DocAddress, SegmentOrdinal};

/// Holds a list of `SegmentReader`s ready for search.
///
/// It guarantees that the `Segment` will not be removed before
/// the destruction of the `Searcher`.
#[derive(Clone, Debug)]
pub struct Searcher {
    segment_readers: Vec<SegmentReader>,
}

impl Searcher {
    /// Creates a searcher over the given segments.
    ///
    /// The position of a segment in `segment_readers` is its [`SegmentOrdinal`].
    pub fn new(segment_readers: Vec<SegmentReader>) -> Searcher {
        Searcher { segment_readers }
    }

    /// Returns the overall number of documents in the index.
    pub fn num_docs(&self) -> u64 {
        self.segment_readers
            .iter()
            .map(|segment_reader| u64::from(segment_reader.num_docs()))
            .sum::<u64>()
    }

    /// Return the overall number of documents containing
    /// the given term.
    pub fn doc_freq(&self, term: &str) -> u64 {
        self.segment_readers
            .iter()
            .map(|segment_reader| u64::from(segment_reader.doc_freq(term)))
            .sum::<u64>()
    }

    /// Return the list of segment readers
    pub fn segment_readers(&self) -> &[SegmentReader] {
        &self.segment_readers
    }

    /// Returns the segment_reader associated with the given segment_ord
    ///
    /// # Panics
    ///
    /// Panics if no segment has this ordinal.
    pub fn segment_reader(&self, segment_ord: SegmentOrdinal) -> &SegmentReader {
        &self.segment_readers[segment_ord as usize]
    }

    /// Runs a query on the segment readers wrapped by the searcher.
    ///
    /// Search works as follows :
    ///
    ///  First the weight object associated to the query is created.
    ///
    ///  Then, the query loops over the segments and for each segment :
    ///  - setup the collector and informs it that the segment being processed has changed.
    ///  - creates a SegmentCollector for collecting documents associated to the segment
    ///  - creates a `Scorer` object associated for this segment
    ///  - iterate through the matched documents and push them to the segment collector.
    ///
    ///  Finally, the Collector merges each of the child collectors into itself for result
    ///  usability by the caller.
    pub fn search<C: Collector>(&self, query: &dyn Query, collector: &C) -> crate::Result<C::Fruit> {
        self.search_with_executor(query, collector, &Executor::single_thread())
    }

    /// Same as [`search(...)`](Searcher::search) but multithreaded.
    ///
    /// The current implementation is rather naive :
    /// multithreading is by splitting search into as many task
    /// as there are segments.
    ///
    /// It is powerless at making search faster if your index consists in
    /// one large segment.
    ///
    /// Also, keep in my multithreading a single query on several
    /// threads will not improve your throughput. It can actually
    /// hurt it. It will however, decrease the average response time.
    pub fn search_with_executor<C: Collector>(
        &self,
        query: &dyn Query,
        collector: &C,
        executor: &Executor,
    ) -> crate::Result<C::Fruit> {
        let enable_scoring = if collector.requires_scoring() {
            EnableScoring::enabled_from_searcher(self)
        } else {
            EnableScoring::disabled_from_searcher(self)
        };
        let weight = query.weight(enable_scoring)?;
        let segment_readers = self.segment_readers();
        let fruits = executor.map(
            |(segment_ord, segment_reader)| {
                collector.collect_segment(
                    weight.as_ref(),
                    segment_ord as SegmentOrdinal,
                    segment_reader,
                )
            },
            segment_readers.iter().enumerate(),
        )?;
        collector.merge_fruits(fruits)
    }

    /// Returns the number of documents matching the query.
    pub fn count(&self, query: &dyn Query) -> crate::Result<usize> {
        query.count(self)
    }

    /// Returns the explanation of the score of a document for a query.
    pub fn explain(&self, query: &dyn Query, doc_address: DocAddress) -> crate::Result<Explanation> {
        query.explain(self, doc_address)
    }
}

#[cfg(test)]
mod tests {
    use super::Searcher;
    use crate::collector::{Count, TopDocs};
    use crate::core::{Executor, SegmentReader};
    use crate::query::{AllQuery, FilteredQuery, PredicateFilter, TermQuery};
    use crate::DocAddress;

    fn searcher() -> Searcher {
        let segment_readers = (0..4u32)
            .map(|segment_ord| {
                let postings = (0..20u32)
                    .filter(|doc| (doc + segment_ord) % 3 == 0)
                    .map(|doc| (doc, 1 + doc % 4))
                    .collect();
                SegmentReader::builder(20)
                    .postings("a", postings)
                    .unwrap()
                    .deleted_docs(&[segment_ord])
                    .build().unwrap()
            })
            .collect();
        Searcher::new(segment_readers)
    }

    #[test]
    fn test_searcher_stats() {
        let searcher = searcher();
        assert_eq!(searcher.segment_readers().len(), 4);
        assert_eq!(searcher.num_docs(), 4 * 19);
        assert_eq!(searcher.segment_reader(2).max_doc(), 20);
        assert_eq!(searcher.doc_freq("a"), 7 + 7 + 7 + 6);
        assert_eq!(searcher.count(&AllQuery).unwrap(), 76);
    }

    #[test]
    fn test_search_with_executor_matches_single_thread() {
        let searcher = searcher();
        let query = FilteredQuery::new(
            Box::new(TermQuery::new("a")),
            Box::new(PredicateFilter::new("even", |doc| doc % 2 == 0)),
        );
        let collector = (TopDocs::with_limit(100), Count);
        let single_thread = searcher.search(&query, &collector).unwrap();
        let executor = Executor::multi_thread(3, "search-test-").unwrap();
        let multi_thread = searcher
            .search_with_executor(&query, &collector, &executor)
            .unwrap();
        assert_eq!(single_thread, multi_thread);
        assert_eq!(single_thread.0.len(), single_thread.1);
        assert_eq!(searcher.count(&query).unwrap(), single_thread.1);
    }

    #[test]
    fn test_searcher_explain() {
        let searcher = searcher();
        let explanation = searcher
            .explain(&TermQuery::new("a"), DocAddress::new(0, 3))
            .unwrap();
        assert_eq!(explanation.value(), 4.0);
        assert!(searcher
            .explain(&TermQuery::new("a"), DocAddress::new(0, 4))
            .is_err());
    }
}
