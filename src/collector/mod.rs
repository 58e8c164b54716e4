//! # Collectors
//!
//! Collectors define the information you want to extract from the documents matching the queries.
//! We call this information your search "fruit".
//!
//! Your fruit could for instance be:
//! - [the count of matching documents](crate::collector::Count)
//! - [the top 10 documents, by relevancy](crate::collector::TopDocs)
//! - [the set of matching documents](crate::collector::DocSetCollector)
//!
//! ## Combining several collectors
//!
//! A pair of collectors is a collector. Searching with `(TopDocs::with_limit(10), Count)`
//! returns the top documents and the number of hits in a single pass.
//!
//! ## Implementing your own collectors
//!
//! A collector does not see the whole result set at once. The segments of a [`Searcher`]
//! may be searched in parallel: for each segment, the collector creates a
//! [`SegmentCollector`] that receives the matching documents of that segment, in increasing
//! doc id order, together with their score. The per-segment fruits are then merged by
//! [`Collector::merge_fruits`].
//!
//! [`Searcher`]: crate::Searcher

use downcast_rs::impl_downcast;

use crate::core::SegmentReader;
use crate::query::Weight;
use crate::{DocId, Score, SegmentOrdinal};

mod count_collector;
pub use self::count_collector::{Count, SegmentCountCollector};

mod docset_collector;
pub use self::docset_collector::{DocSetChildCollector, DocSetCollector};

mod top_score_collector;
pub use self::top_score_collector::{TopDocs, TopScoreSegmentCollector};


/// `Fruit` is the type for the result of our collection.
/// e.g. `usize` for the `Count` collector.
pub trait Fruit: Send + downcast_rs::Downcast {}

impl<T> Fruit for T where T: Send + downcast_rs::Downcast {}

impl_downcast!(Fruit);

/// Collectors are in charge of collecting and retaining relevant
/// information from the document found and scored by the query.
///
/// For instance,
///
/// - keeping track of the top 10 best documents
/// - computing the number of documents matching the query
///
/// Our search index is in fact a collection of segments, so
/// a `Collector` trait is actually more of a factory to instance
/// `SegmentCollector`s for each segments.
///
/// The collection logic itself is in the `SegmentCollector`.
///
/// Segments are not guaranteed to be visited in any specific order.
pub trait Collector: Sync + Send {
    /// `Fruit` is the type for the result of our collection.
    /// e.g. `usize` for the `Count` collector.
    type Fruit: Fruit;

    /// Type of the `SegmentCollector` associated with this collector.
    type Child: SegmentCollector;

    /// `set_segment` is called before beginning to enumerate
    /// on this segment.
    fn for_segment(
        &self,
        segment_local_id: SegmentOrdinal,
        segment: &SegmentReader,
    ) -> crate::Result<Self::Child>;

    /// Returns true iff the collector requires to compute scores for documents.
    fn requires_scoring(&self) -> bool;

    /// Combines the fruit associated with the collection of each segments
    /// into one fruit.
    fn merge_fruits(
        &self,
        segment_fruits: Vec<<Self::Child as SegmentCollector>::Fruit>,
    ) -> crate::Result<Self::Fruit>;

    /// Created a segment collector and collects the documents matched by `weight`
    /// in the given segment.
    ///
    /// Documents rejected by the accept docs of the segment are never collected.
    fn collect_segment(
        &self,
        weight: &dyn Weight,
        segment_ord: SegmentOrdinal,
        reader: &SegmentReader,
    ) -> crate::Result<<Self::Child as SegmentCollector>::Fruit> {
        let mut segment_collector = self.for_segment(segment_ord, reader)?;
        if self.requires_scoring() {
            weight.for_each(reader, &mut |doc, score| {
                segment_collector.collect(doc, score);
            })?;
        } else {
            weight.for_each_no_score(reader, &mut |doc| {
                segment_collector.collect(doc, 0.0);
            })?;
        }
        Ok(segment_collector.harvest())
    }
}

/// The `SegmentCollector` is the trait in charge of defining the
/// collect operation at the scale of the segment.
///
/// `.collect(doc, score)` will be called for every documents
/// matching the query, in increasing doc id order.
pub trait SegmentCollector: 'static {
    /// `Fruit` is the type for the result of our collection.
    /// e.g. `usize` for the `Count` collector.
    type Fruit: Fruit;

    /// The query pushes the scored document to the collector via this method.
    fn collect(&mut self, doc: DocId, score: Score);

    /// Extract the fruit of the collection from the `SegmentCollector`.
    fn harvest(self) -> Self::Fruit;
}

// -----------------------------------------------
// Tuple implementations.

impl<Left, Right> Collector for (Left, Right)
where
    Left: Collector,
    Right: Collector,
{
    type Fruit = (Left::Fruit, Right::Fruit);
    type Child = (Left::Child, Right::Child);

    fn for_segment(
        &self,
        segment_local_id: SegmentOrdinal,
        segment: &SegmentReader,
    ) -> crate::Result<Self::Child> {
        let left = self.0.for_segment(segment_local_id, segment)?;
        let right = self.1.for_segment(segment_local_id, segment)?;
        Ok((left, right))
    }

    fn requires_scoring(&self) -> bool {
        self.0.requires_scoring() || self.1.requires_scoring()
    }

    fn merge_fruits(
        &self,
        segment_fruits: Vec<<Self::Child as SegmentCollector>::Fruit>,
    ) -> crate::Result<(Left::Fruit, Right::Fruit)> {
        let mut left_fruits = Vec::with_capacity(segment_fruits.len());
        let mut right_fruits = Vec::with_capacity(segment_fruits.len());
        for (left_fruit, right_fruit) in segment_fruits {
            left_fruits.push(left_fruit);
            right_fruits.push(right_fruit);
        }
        Ok((
            self.0.merge_fruits(left_fruits)?,
            self.1.merge_fruits(right_fruits)?,
        ))
    }
}

impl<Left, Right> SegmentCollector for (Left, Right)
where
    Left: SegmentCollector,
    Right: SegmentCollector,
{
    type Fruit = (Left::Fruit, Right::Fruit);

    fn collect(&mut self, doc: DocId, score: Score) {
        self.0.collect(doc, score);
        self.1.collect(doc, score);
    }

    fn harvest(self) -> <Self as SegmentCollector>::Fruit {
        (self.0.harvest(), self.1.harvest())
    }
}
