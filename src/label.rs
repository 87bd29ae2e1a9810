//! Labels of pattern graphs.
//!
//! Host graphs carry concrete string labels. Pattern graphs may additionally
//! carry query labels, which accept a set of concrete labels:
//!
//! | Encoding    | Query label                          |
//! |-------------|--------------------------------------|
//! | `*`, `R`    | [`QueryLabel::Wildcard`]             |
//! | `[a,b,c]`   | [`QueryLabel::List`] of `a`, `b`, `c`  |
//! | `![a,b,c]`  | [`QueryLabel::NotList`] of `a`, `b`, `c` |
//!
//! Query labels are obtained by compiling the string labels of a pattern once,
//! before the search (see [`PatternLabel::compile`]).

mod matcher;

use std::{collections::BTreeSet, fmt, str::FromStr};

use derive_more::Display;
use itertools::Itertools;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use matcher::LabelMatcher;

/// A label that accepts a set of concrete labels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QueryLabel {
    /// Matches any label.
    Wildcard,
    /// Matches the labels in the list.
    List(BTreeSet<String>),
    /// Matches the labels not in the list.
    NotList(BTreeSet<String>),
}

/// The label of a compiled pattern node or edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PatternLabel {
    /// A label matching an identical host label.
    #[display(fmt = "{}", _0)]
    Concrete(String),
    /// A query label.
    #[display(fmt = "{}", _0)]
    Query(QueryLabel),
}

/// Errors when parsing a query label.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LabelParseError {
    /// The input string is empty
    #[error("empty query label")]
    Empty,
    /// Opening and closing brackets do not match
    #[error("unbalanced brackets in query label {0:?}")]
    Unbalanced(String),
    /// The string is a plain label, not a query
    #[error("{0:?} is not a query label")]
    NotAQuery(String),
    /// A list contains an empty member
    #[error("empty member in query label {0:?}")]
    EmptyMember(String),
}

impl QueryLabel {
    /// Whether the concrete `label` is accepted.
    pub fn matches(&self, label: &str) -> bool {
        match self {
            QueryLabel::Wildcard => true,
            QueryLabel::List(allowed) => allowed.contains(label),
            QueryLabel::NotList(forbidden) => !forbidden.contains(label),
        }
    }

    /// A list query label.
    pub fn list<S: Into<String>>(members: impl IntoIterator<Item = S>) -> Self {
        QueryLabel::List(members.into_iter().map_into().collect())
    }

    /// An exclusion list query label.
    pub fn not_list<S: Into<String>>(members: impl IntoIterator<Item = S>) -> Self {
        QueryLabel::NotList(members.into_iter().map_into().collect())
    }
}

impl FromStr for QueryLabel {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "" => return Err(LabelParseError::Empty),
            "*" | "R" => return Ok(QueryLabel::Wildcard),
            _ => {}
        }
        let (negated, rest) = match s.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let Some(rest) = rest.strip_prefix('[') else {
            if s.contains(['[', ']']) {
                return Err(LabelParseError::Unbalanced(s.to_string()));
            }
            return Err(LabelParseError::NotAQuery(s.to_string()));
        };
        let Some(body) = rest.strip_suffix(']') else {
            return Err(LabelParseError::Unbalanced(s.to_string()));
        };
        if body.contains(['[', ']']) {
            return Err(LabelParseError::Unbalanced(s.to_string()));
        }
        let members = body
            .split(',')
            .map(|m| {
                let m = m.trim();
                if m.is_empty() {
                    Err(LabelParseError::EmptyMember(s.to_string()))
                } else {
                    Ok(m.to_string())
                }
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(if negated {
            QueryLabel::NotList(members)
        } else {
            QueryLabel::List(members)
        })
    }
}

impl fmt::Display for QueryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryLabel::Wildcard => write!(f, "*"),
            QueryLabel::List(members) => write!(f, "[{}]", members.iter().join(",")),
            QueryLabel::NotList(members) => write!(f, "![{}]", members.iter().join(",")),
        }
    }
}

impl PatternLabel {
    /// Compile a raw string label.
    ///
    /// Strings that parse as a [`QueryLabel`] become query labels. Anything
    /// else, including malformed queries, is kept as a concrete label.
    pub fn compile(raw: &str) -> Self {
        match raw.parse::<QueryLabel>() {
            Ok(query) => PatternLabel::Query(query),
            Err(LabelParseError::NotAQuery(_)) => PatternLabel::Concrete(raw.to_string()),
            Err(err) => {
                tracing::debug!(label = raw, %err, "malformed query label kept as concrete label");
                PatternLabel::Concrete(raw.to_string())
            }
        }
    }

    /// Compile a label that may already have been compiled.
    ///
    /// Query labels are left untouched; concrete labels are compiled again,
    /// which never changes them as they did not parse as queries before.
    pub fn recompile(self) -> Self {
        match self {
            PatternLabel::Concrete(raw) => Self::compile(&raw),
            query => query,
        }
    }

    /// Whether this is a query label.
    pub fn is_query(&self) -> bool {
        matches!(self, PatternLabel::Query(_))
    }

    /// The concrete label, if any.
    pub fn as_concrete(&self) -> Option<&str> {
        match self {
            PatternLabel::Concrete(s) => Some(s),
            PatternLabel::Query(_) => None,
        }
    }
}

impl From<QueryLabel> for PatternLabel {
    fn from(query: QueryLabel) -> Self {
        PatternLabel::Query(query)
    }
}

impl From<&str> for PatternLabel {
    fn from(s: &str) -> Self {
        PatternLabel::Concrete(s.to_string())
    }
}

impl From<String> for PatternLabel {
    fn from(s: String) -> Self {
        PatternLabel::Concrete(s)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("*", QueryLabel::Wildcard)]
    #[case("R", QueryLabel::Wildcard)]
    #[case("[N,O]", QueryLabel::list(["N", "O"]))]
    #[case("[ N , O ]", QueryLabel::list(["N", "O"]))]
    #[case("![Cl,Br,I]", QueryLabel::not_list(["Cl", "Br", "I"]))]
    #[case("[C]", QueryLabel::list(["C"]))]
    fn test_parse_query(#[case] s: &str, #[case] expected: QueryLabel) {
        assert_eq!(s.parse::<QueryLabel>(), Ok(expected));
    }

    #[rstest]
    #[case("", LabelParseError::Empty)]
    #[case("C", LabelParseError::NotAQuery("C".into()))]
    #[case("[N,O", LabelParseError::Unbalanced("[N,O".into()))]
    #[case("N,O]", LabelParseError::Unbalanced("N,O]".into()))]
    #[case("[[N]]", LabelParseError::Unbalanced("[[N]]".into()))]
    #[case("[N,,O]", LabelParseError::EmptyMember("[N,,O]".into()))]
    #[case("![]", LabelParseError::EmptyMember("![]".into()))]
    fn test_parse_errors(#[case] s: &str, #[case] expected: LabelParseError) {
        assert_eq!(s.parse::<QueryLabel>(), Err(expected));
    }

    #[test]
    fn test_matches() {
        assert!(QueryLabel::Wildcard.matches("Xe"));
        let list = QueryLabel::list(["N", "O"]);
        assert!(list.matches("N"));
        assert!(!list.matches("S"));
        let not_list = QueryLabel::not_list(["N", "O"]);
        assert!(!not_list.matches("O"));
        assert!(not_list.matches("S"));
    }

    #[test]
    fn test_compile_is_permissive() {
        assert_eq!(PatternLabel::compile("C"), PatternLabel::from("C"));
        assert_eq!(PatternLabel::compile("[N,O"), PatternLabel::from("[N,O"));
        assert_eq!(
            PatternLabel::compile("[N,O]"),
            QueryLabel::list(["N", "O"]).into()
        );
    }

    #[test]
    fn test_recompile_is_idempotent() {
        for raw in ["*", "C", "[N,O]", "![S]", "[broken", "-"] {
            let once = PatternLabel::compile(raw);
            assert_eq!(once.clone().recompile(), once);
        }
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["*", "[N,O]", "![Br,Cl]"] {
            let query: QueryLabel = raw.parse().unwrap();
            assert_eq!(query.to_string(), raw);
        }
    }
}
