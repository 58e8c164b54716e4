//! Module containing the different query implementations, the scorers and the
//! filtering machinery.

mod accepted_docset;
pub(crate) mod all_query;
mod bitset;
pub(crate) mod bulk_scorer;
mod const_scorer;
mod explanation;
mod filter;
mod filtered_query;
mod intersection;
mod query;
mod scorer;
mod term_query;
pub(crate) mod two_phase;
mod vec_docset;
mod weight;

pub use self::accepted_docset::{AcceptedDocSet, BitsDocSet};
pub use self::all_query::{AllQuery, AllScorer, AllWeight};
pub use self::bitset::BitSetDocSet;
pub use self::bulk_scorer::{BulkScorer, DefaultBulkScorer};
pub use self::const_scorer::ConstScorer;
pub use self::explanation::Explanation;
pub use self::filter::{
    BitSetFilter, BitSetProducer, DocIdSet, Filter, FilterClone, PredicateFilter, QueryFilter,
};
pub use self::filtered_query::{
    FilterStrategy, FilteredBulkScorer, FilteredQuery, FilteredScorer, FilteredWeight,
    LeapFrogLead, QueryFirstBulkScorer, QueryFirstScorer, DEFAULT_DENSITY_FACTOR,
};
pub use self::intersection::{intersect_scorers, Intersection, LeapFrog};
pub use self::query::{EnableScoring, Query, QueryClone};
pub use self::scorer::Scorer;
pub use self::term_query::{TermQuery, TermScorer, TermWeight};
pub use self::two_phase::{TwoPhase, TwoPhaseDocSet};
pub use self::vec_docset::VecDocSet;
pub use self::weight::Weight;
