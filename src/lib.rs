#![doc(test(attr(allow(unused_variables), deny(warnings))))]
#![warn(missing_docs)]
#![allow(
    clippy::len_without_is_empty,
    clippy::derive_partial_eq_without_eq,
    clippy::module_inception
)]

//! # `filtered_query`
//!
//! Execution engine for queries whose matches must additionally satisfy
//! an independently computed filter.
//!
//! Given the lazily produced, strictly increasing doc ids of a scored query
//! and of an unscored filter, the crate computes their intersection without
//! materializing either side, choosing between:
//!
//! - folding the filter into the query as random-access accept docs,
//! - a leap-frog [`Intersection`](query::Intersection) of both iterators,
//! - iterating the query alone and testing each candidate against the filter bits.
//!
//! ```rust
//! use filtered_query::bits::BitSet;
//! use filtered_query::collector::Count;
//! use filtered_query::query::{BitSetFilter, FilteredQuery, TermQuery};
//! use filtered_query::{Searcher, SegmentReader};
//!
//! # fn main() -> filtered_query::Result<()> {
//! let segment = SegmentReader::builder(10)
//!     .postings("diary", vec![(1, 1), (3, 2), (7, 1)])?
//!     .build()?;
//! let searcher = Searcher::new(vec![segment]);
//!
//! // Only even documents are allowed.
//! let filter = BitSetFilter::new(|reader: &SegmentReader| {
//!     let mut bitset = BitSet::with_max_value(reader.max_doc());
//!     for doc in (0..reader.max_doc()).step_by(2) {
//!         bitset.insert(doc);
//!     }
//!     Ok(bitset)
//! });
//! let query = FilteredQuery::new(Box::new(TermQuery::new("diary")), Box::new(filter));
//! assert_eq!(searcher.search(&query, &Count)?, 0);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod bits;
pub mod collector;
mod core;
mod docset;
pub mod error;
pub mod query;

use serde::{Deserialize, Serialize};

pub use self::core::{Executor, Posting, Searcher, SegmentReader, SegmentReaderBuilder};
pub use self::docset::{DocSet, NOT_STARTED, TERMINATED};
pub use crate::error::QueryError;

/// Index-wide result type.
pub type Result<T> = std::result::Result<T, QueryError>;

/// A `u32` identifying a document within a segment.
/// Documents have their `DocId` assigned incrementally,
/// as they are added in the segment.
///
/// At most, a segment can contain 2^31 documents.
pub type DocId = u32;

/// A f32 that represents the relevance of the document to the query.
///
/// This is modelled internally as a `f32`. The larger the number, the more relevant
/// the document to the search query.
pub type Score = f32;

/// A `SegmentOrdinal` identifies a segment, within a `Searcher`.
pub type SegmentOrdinal = u32;

/// `DocAddress` contains all the necessary information
/// to identify a document given a `Searcher` object.
///
/// It consists of an id identifying its segment, and
/// a segment-local `DocId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocAddress {
    /// The segment ordinal id that identifies the segment
    /// hosting the document in the `Searcher` it is called from.
    pub segment_ord: SegmentOrdinal,
    /// The segment-local `DocId`.
    pub doc_id: DocId,
}

impl DocAddress {
    /// Creates a new DocAddress from the segment/docId pair.
    pub fn new(segment_ord: SegmentOrdinal, doc_id: DocId) -> DocAddress {
        DocAddress {
            segment_ord,
            doc_id,
        }
    }
}
