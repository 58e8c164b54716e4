use serde::{Deserialize, Serialize};

use super::bulk_scorer::{FilteredBulkScorer, QueryFirstBulkScorer};
use super::scorer::{FilterScorer, FilteredScorer};
use crate::bits::Bits;
use crate::core::SegmentReader;
use crate::query::{AcceptedDocSet, DefaultBulkScorer, DocIdSet, Intersection, Scorer, Weight};
use crate::{QueryError, Score};

/// Default `density_factor` of [`FilterStrategy::RandomAccess`]: random access is
/// used as soon as the filter is expected to accept more than 1% of the documents.
pub const DEFAULT_DENSITY_FACTOR: u32 = 100;

fn default_density_factor() -> u32 {
    DEFAULT_DENSITY_FACTOR
}

/// Side of a leap-frog intersection whose `advance` drives the iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapFrogLead {
    /// The filter iterator leads, the query is only sought to its documents.
    #[default]
    Filter,
    /// The query leads, the filter is only sought to its documents.
    Query,
}

/// How a [`FilteredQuery`](super::FilteredQuery) combines its query with its filter.
///
/// The choice is made once per segment, when the scorer is created. All strategies
/// return the same documents with the same scores.
///
/// Strategies can be loaded from a configuration file:
///
/// ```rust
/// use filtered_query::query::{FilterStrategy, LeapFrogLead};
///
/// let strategy: FilterStrategy =
///     serde_json::from_str(r#"{"type": "leap_frog", "lead": "query"}"#).unwrap();
/// assert_eq!(strategy, FilterStrategy::LeapFrog { lead: LeapFrogLead::Query });
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterStrategy {
    /// Folds the filter bits into the query scorer as accept docs when the filter
    /// is dense, that is when `cost * density_factor > max_doc`.
    ///
    /// Sparse filters, and filters without random access, are intersected with
    /// the query, led by the sparser side.
    RandomAccess {
        /// Inverse of the filter density above which random access is used.
        #[serde(default = "default_density_factor")]
        density_factor: u32,
    },
    /// Intersects the query and the filter iterators.
    LeapFrog {
        /// Side driving the intersection.
        #[serde(default)]
        lead: LeapFrogLead,
    },
    /// Iterates over the query and tests every document against the filter bits.
    ///
    /// Falls back to `LeapFrog { lead: Query }` if the filter has no random access.
    QueryFirst,
}

impl Default for FilterStrategy {
    fn default() -> Self {
        FilterStrategy::RandomAccess {
            density_factor: DEFAULT_DENSITY_FACTOR,
        }
    }
}

impl FilterStrategy {
    /// Checks the strategy configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if let FilterStrategy::RandomAccess { density_factor: 0 } = self {
            return Err(QueryError::InvalidArgument(
                "density_factor must be strictly positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns true iff the filter should be consulted through its bits.
    pub fn use_random_access(&self, bits: &dyn Bits, filter_cost: u64) -> bool {
        match *self {
            FilterStrategy::RandomAccess { density_factor } => {
                filter_cost.saturating_mul(u64::from(density_factor)) > u64::from(bits.len())
            }
            FilterStrategy::LeapFrog { .. } => false,
            FilterStrategy::QueryFirst => true,
        }
    }

    /// Creates the scorer of the query restricted to `doc_id_set`.
    ///
    /// `doc_id_set` already excludes the documents rejected by the accept docs of
    /// the segment. Returns `None` if the query does not match any document.
    pub fn filtered_scorer(
        &self,
        reader: &SegmentReader,
        weight: &dyn Weight,
        boost: Score,
        doc_id_set: DocIdSet,
    ) -> crate::Result<Option<FilteredScorer>> {
        match *self {
            FilterStrategy::RandomAccess { .. } => {
                if let Some(bits) = doc_id_set.bits() {
                    if self.use_random_access(bits.as_ref(), doc_id_set.cost()) {
                        debug!(
                            "random access over filter bits (cost={}, max_doc={})",
                            doc_id_set.cost(),
                            bits.len()
                        );
                        let scorer_opt = weight.scorer(reader, boost, Some(bits))?;
                        return Ok(scorer_opt.map(FilteredScorer::RandomAccess));
                    }
                }
                leap_frog(reader, weight, boost, doc_id_set, None)
            }
            FilterStrategy::LeapFrog { lead } => {
                leap_frog(reader, weight, boost, doc_id_set, Some(lead))
            }
            FilterStrategy::QueryFirst => match doc_id_set.bits() {
                Some(bits) => {
                    debug!("query first over filter bits (max_doc={})", bits.len());
                    let scorer_opt = weight.scorer(reader, boost, None)?;
                    Ok(scorer_opt
                        .map(|scorer| FilteredScorer::QueryFirst(AcceptedDocSet::new(scorer, bits))))
                }
                None => leap_frog(reader, weight, boost, doc_id_set, Some(LeapFrogLead::Query)),
            },
        }
    }

    /// Creates the bulk scorer of the query restricted to `doc_id_set`.
    ///
    /// `QueryFirst` scans the query scorer and tests the filter bits in a tight
    /// loop. Other strategies drive their [`FilteredScorer`].
    pub fn filtered_bulk_scorer(
        &self,
        reader: &SegmentReader,
        weight: &dyn Weight,
        boost: Score,
        doc_id_set: DocIdSet,
    ) -> crate::Result<Option<FilteredBulkScorer>> {
        if let FilterStrategy::QueryFirst = self {
            if let Some(bits) = doc_id_set.bits() {
                let scorer_opt = weight.scorer(reader, boost, None)?;
                return Ok(scorer_opt.map(|scorer| {
                    FilteredBulkScorer::QueryFirst(QueryFirstBulkScorer::new(scorer, bits))
                }));
            }
        }
        let scorer_opt = self.filtered_scorer(reader, weight, boost, doc_id_set)?;
        Ok(scorer_opt.map(|scorer| FilteredBulkScorer::Scorer(DefaultBulkScorer::new(scorer))))
    }
}

/// Intersects the query scorer with the filter iterator.
///
/// Without any `lead`, the sparser side leads.
fn leap_frog(
    reader: &SegmentReader,
    weight: &dyn Weight,
    boost: Score,
    doc_id_set: DocIdSet,
    lead: Option<LeapFrogLead>,
) -> crate::Result<Option<FilteredScorer>> {
    let Some(query_scorer) = weight.scorer(reader, boost, None)? else {
        return Ok(None);
    };
    debug!(
        "leap frog (lead={lead:?}, query cost={}, filter cost={})",
        query_scorer.cost(),
        doc_id_set.cost()
    );
    let filter_scorer: Box<dyn Scorer> = Box::new(FilterScorer::new(doc_id_set.into_docset()));
    let intersection = match lead {
        None => Intersection::new(vec![query_scorer, filter_scorer]),
        Some(LeapFrogLead::Query) => Intersection::in_order(vec![query_scorer, filter_scorer]),
        Some(LeapFrogLead::Filter) => Intersection::in_order(vec![filter_scorer, query_scorer]),
    };
    Ok(Some(FilteredScorer::LeapFrog(intersection)))
}
