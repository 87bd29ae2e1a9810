//! Search configuration.

use std::{fmt, str::FromStr};

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::plan::FrequencyTable;

/// Seed of the random node priorities, fixed for reproducible search plans.
pub const DEFAULT_RANDOM_SEED: u64 = 0x5eed_1abe;

/// How pattern nodes are prioritised when building a search plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Priority {
    /// Breadth-first traversal in node index order.
    None,
    /// Seeded pseudorandom order.
    Random,
    /// Rarest labels first.
    #[default]
    Frequency,
}

/// Errors when reading a configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Unknown priority name
    #[error("unknown search priority {0:?}, expected one of none, random, frequency")]
    UnknownPriority(String),
    /// Unknown matcher name
    #[error("unknown matcher {0:?}, expected one of simple, fast, vf2")]
    UnknownMatcher(String),
    /// Invalid JSON configuration
    #[cfg(feature = "serde")]
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration of a [`crate::SearchPattern`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// The node ordering heuristic of the search plan.
    pub priority: Priority,
    /// Whether pattern labels are compiled into query labels.
    pub wildcards: bool,
    /// Label counts for [`Priority::Frequency`].
    pub frequencies: FrequencyTable,
    /// Seed for [`Priority::Random`].
    pub random_seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            priority: Priority::default(),
            wildcards: true,
            frequencies: FrequencyTable::default(),
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

impl SearchConfig {
    /// Set the node ordering heuristic.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Enable or disable query label compilation.
    pub fn with_wildcards(mut self, wildcards: bool) -> Self {
        self.wildcards = wildcards;
        self
    }

    /// Replace the label frequency table.
    pub fn with_frequencies(mut self, frequencies: FrequencyTable) -> Self {
        self.frequencies = frequencies;
        self
    }

    /// Set the seed of random priorities.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Read a configuration from JSON. Missing fields take default values.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FromStr for Priority {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Priority::None),
            "random" => Ok(Priority::Random),
            "frequency" => Ok(Priority::Frequency),
            _ => Err(ConfigError::UnknownPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::None => "none",
            Priority::Random => "random",
            Priority::Frequency => "frequency",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_names() {
        for priority in [Priority::None, Priority::Random, Priority::Frequency] {
            assert_eq!(priority.to_string().parse::<Priority>().unwrap(), priority);
        }
        assert_eq!("RANDOM".parse::<Priority>().unwrap(), Priority::Random);
        assert!(matches!(
            "rarest".parse::<Priority>(),
            Err(ConfigError::UnknownPriority(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = SearchConfig::default()
            .with_priority(Priority::Random)
            .with_wildcards(false)
            .with_random_seed(7);
        assert_eq!(config.priority, Priority::Random);
        assert!(!config.wildcards);
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.frequencies, FrequencyTable::default());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let config = SearchConfig::from_json(
            r#"{ "priority": "none", "frequencies": { "C": 4, "O": 2 } }"#,
        )
        .unwrap();
        assert_eq!(config.priority, Priority::None);
        assert!(config.wildcards);
        assert_eq!(config.frequencies.get("C"), 4);
        assert_eq!(config.frequencies.total(), 6);
        assert!(SearchConfig::from_json(r#"{ "priority": "rarest" }"#).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_huge_counts() {
        let config =
            SearchConfig::from_json(r#"{ "frequencies": { "C": 18446744073709551615, "O": 1 } }"#)
                .unwrap();
        assert_eq!(config.frequencies.total(), u64::MAX);
    }
}
