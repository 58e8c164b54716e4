use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Score;

/// Object describing the score of a given document.
/// It is organized in trees.
///
/// `.to_pretty_json()` can be useful to print out a human readable
/// representation of this tree when debugging a given score.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Explanation {
    value: Score,
    description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    details: Vec<Explanation>,
}

impl fmt::Debug for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Explanation({})", self.to_pretty_json())
    }
}

impl Explanation {
    /// Creates a new explanation object.
    pub fn new<T: ToString>(description: T, value: Score) -> Explanation {
        Explanation {
            value,
            description: description.to_string(),
            details: Vec::new(),
        }
    }

    /// Returns the value associated with the current node.
    pub fn value(&self) -> Score {
        self.value
    }

    /// Returns the description of the current node.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the children of the current node.
    pub fn details(&self) -> &[Explanation] {
        &self.details
    }

    /// Add some detail, explaining some part of the current node formula.
    ///
    /// Details are treated as child of the current node.
    pub fn add_detail(&mut self, child_explanation: Explanation) {
        self.details.push(child_explanation);
    }

    /// Shortcut for `self.details.push(Explanation::new(name, value));`
    pub fn add_const<T: ToString>(&mut self, name: T, value: Score) {
        self.details.push(Explanation::new(name, value));
    }

    /// Returns an indented json representation of the explanation tree for debug usage.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|err| format!("unserializable explanation: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Explanation;

    #[test]
    fn test_explanation_json() {
        let mut explanation = Explanation::new("FilteredQuery", 2.0);
        explanation.add_const("boost", 2.0);
        let json = explanation.to_pretty_json();
        assert_eq!(
            json,
            r#"{
  "value": 2.0,
  "description": "FilteredQuery",
  "details": [
    {
      "value": 2.0,
      "description": "boost"
    }
  ]
}"#
        );
        let parsed: Explanation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, explanation);
        assert_eq!(parsed.details()[0].description(), "boost");
    }
}
