use std::fmt;

use super::term_weight::TermWeight;
use crate::query::{EnableScoring, Query, Weight};

/// A Term query matches all of the documents
/// containing a specific term.
///
/// The score associated is the number of occurrences of the term
/// in the document, multiplied by the boost.
#[derive(Clone)]
pub struct TermQuery {
    term: String,
}

impl fmt::Debug for TermQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TermQuery({:?})", self.term)
    }
}

impl TermQuery {
    /// Creates a new term query.
    pub fn new(term: impl Into<String>) -> TermQuery {
        TermQuery { term: term.into() }
    }

    /// The `Term` this query is built out of.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns a weight object.
    ///
    /// While `.weight(...)` returns a boxed trait object,
    /// this method return a specific implementation.
    /// This is useful for optimization purpose.
    pub fn specialized_weight(&self) -> TermWeight {
        TermWeight::new(self.term.clone())
    }
}

impl Query for TermQuery {
    fn weight(&self, _enable_scoring: EnableScoring<'_>) -> crate::Result<Box<dyn Weight>> {
        Ok(Box::new(self.specialized_weight()))
    }
}
