//! Post grouping strategy definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a post's media files are laid out beneath the creator folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingStrategy {
    /// Every file goes straight into the creator folder.
    None,
    /// Every post gets its own folder named after its title.
    All,
    /// Only posts with more than one media item get their own folder (default).
    #[default]
    Dynamic,
}

impl fmt::Display for GroupingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingStrategy::None => write!(f, "none"),
            GroupingStrategy::All => write!(f, "all"),
            GroupingStrategy::Dynamic => write!(f, "dynamic"),
        }
    }
}

impl FromStr for GroupingStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(GroupingStrategy::None),
            "all" => Ok(GroupingStrategy::All),
            "dynamic" => Ok(GroupingStrategy::Dynamic),
            _ => Err(format!("Unknown grouping strategy: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_strategy_parse() {
        assert_eq!("none".parse(), Ok(GroupingStrategy::None));
        assert_eq!("ALL".parse(), Ok(GroupingStrategy::All));
        assert_eq!("Dynamic".parse(), Ok(GroupingStrategy::Dynamic));
        assert!("per-post".parse::<GroupingStrategy>().is_err());
    }

    #[test]
    fn test_grouping_strategy_display_roundtrips() {
        for strategy in [
            GroupingStrategy::None,
            GroupingStrategy::All,
            GroupingStrategy::Dynamic,
        ] {
            assert_eq!(strategy.to_string().parse(), Ok(strategy));
        }
    }
}
