use super::PatternLabel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decide whether a pattern label is compatible with a host label.
///
/// Node and edge labels are compared with independently chosen matchers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LabelMatcher {
    /// Every pair of labels is compatible.
    Ignore,
    /// Labels must be equal. Query labels never match.
    #[default]
    Exact,
    /// Query labels are evaluated, concrete labels must be equal.
    Wildcard,
}

impl LabelMatcher {
    /// Whether `pattern` accepts `host`.
    #[inline]
    pub fn matches(&self, pattern: &PatternLabel, host: &str) -> bool {
        match (self, pattern) {
            (LabelMatcher::Ignore, _) => true,
            (_, PatternLabel::Concrete(label)) => label == host,
            (LabelMatcher::Exact, PatternLabel::Query(_)) => false,
            (LabelMatcher::Wildcard, PatternLabel::Query(query)) => query.matches(host),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::label::QueryLabel;

    #[rstest]
    #[case(LabelMatcher::Ignore, "C", "O", true)]
    #[case(LabelMatcher::Ignore, "*", "O", true)]
    #[case(LabelMatcher::Exact, "C", "C", true)]
    #[case(LabelMatcher::Exact, "C", "O", false)]
    #[case(LabelMatcher::Exact, "*", "O", false)]
    #[case(LabelMatcher::Wildcard, "C", "C", true)]
    #[case(LabelMatcher::Wildcard, "C", "O", false)]
    #[case(LabelMatcher::Wildcard, "*", "O", true)]
    #[case(LabelMatcher::Wildcard, "[N,O]", "O", true)]
    #[case(LabelMatcher::Wildcard, "[N,O]", "S", false)]
    #[case(LabelMatcher::Wildcard, "![N,O]", "S", true)]
    fn test_label_matchers(
        #[case] matcher: LabelMatcher,
        #[case] pattern: &str,
        #[case] host: &str,
        #[case] expected: bool,
    ) {
        let pattern = PatternLabel::compile(pattern);
        assert_eq!(matcher.matches(&pattern, host), expected);
    }

    #[test]
    fn test_exact_never_accepts_query() {
        let wildcard = PatternLabel::Query(QueryLabel::Wildcard);
        assert!(!LabelMatcher::Exact.matches(&wildcard, "*"));
    }
}
