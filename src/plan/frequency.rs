//! Label rarity estimates for scheduling pattern nodes.

use std::{fmt, iter::FromIterator};

use itertools::Itertools;
use rustc_hash::FxHashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::label::{PatternLabel, QueryLabel};

/// Occurrence counts of element symbols in a reference compound collection.
const ELEMENT_FREQUENCIES: &[(&str, u64)] = &[
    ("C", 2_537_451),
    ("O", 420_375),
    ("N", 381_022),
    ("S", 57_123),
    ("F", 36_542),
    ("Cl", 33_218),
    ("Br", 9_154),
    ("P", 4_276),
    ("I", 2_210),
    ("Si", 1_702),
    ("Na", 1_035),
    ("B", 688),
    ("K", 312),
    ("Se", 237),
    ("Sn", 121),
    ("Li", 88),
    ("Pt", 71),
    ("Fe", 66),
    ("Cu", 63),
    ("Zn", 58),
    ("As", 54),
    ("Co", 41),
    ("Hg", 37),
    ("Ge", 21),
    ("Te", 17),
];

/// Global occurrence counts of labels.
///
/// The count of a pattern label estimates how many host nodes it can match:
/// low counts are rare labels, which constrain the search the most when they
/// are matched first.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "FxHashMap<String, u64>", into = "FxHashMap<String, u64>")
)]
pub struct FrequencyTable {
    counts: FxHashMap<String, u64>,
    total: u64,
}

impl FrequencyTable {
    /// An empty table. Every label has count zero.
    pub fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
            total: 0,
        }
    }

    /// Set the count of `label`, replacing any previous count.
    pub fn insert(&mut self, label: impl Into<String>, count: u64) {
        self.counts.insert(label.into(), count);
        self.total = saturating_sum(self.counts.values().copied());
    }

    /// The count of a concrete label. Unknown labels count zero.
    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// The sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The scheduling priority of a pattern label. Lower is scheduled earlier.
    ///
    /// A wildcard counts as the total; a list as the sum of its members; an
    /// exclusion list as the total minus the sum of its members.
    pub fn priority(&self, label: &PatternLabel) -> u64 {
        match label {
            PatternLabel::Concrete(label) => self.get(label),
            PatternLabel::Query(QueryLabel::Wildcard) => self.total,
            PatternLabel::Query(QueryLabel::List(members)) => self.sum(members),
            PatternLabel::Query(QueryLabel::NotList(members)) => {
                self.total.saturating_sub(self.sum(members))
            }
        }
    }

    fn sum<'a>(&self, labels: impl IntoIterator<Item = &'a String>) -> u64 {
        saturating_sum(labels.into_iter().map(|l| self.get(l)))
    }
}

fn saturating_sum(counts: impl IntoIterator<Item = u64>) -> u64 {
    counts.into_iter().fold(0, u64::saturating_add)
}

impl Default for FrequencyTable {
    /// The built-in element occurrence counts.
    fn default() -> Self {
        ELEMENT_FREQUENCIES.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(label, count)| (label.into(), count))
            .collect::<FxHashMap<String, u64>>()
            .into()
    }
}

impl From<FxHashMap<String, u64>> for FrequencyTable {
    fn from(counts: FxHashMap<String, u64>) -> Self {
        let total = saturating_sum(counts.values().copied());
        Self { counts, total }
    }
}

impl From<FrequencyTable> for FxHashMap<String, u64> {
    fn from(table: FrequencyTable) -> Self {
        table.counts
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .counts
            .iter()
            .sorted_by(|(l1, c1), (l2, c2)| c2.cmp(c1).then(l1.cmp(l2)));
        f.debug_map().entries(entries).finish()
    }
}
