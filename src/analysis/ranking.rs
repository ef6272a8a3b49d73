use serde::{Deserialize, Serialize};

use crate::error::ForestError;
use crate::models::CountrySnapshot;

/// Which end of the 2000-2010 change to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopDirection {
    /// Largest forest loss first (`delta_percent > 0`)
    Loss,
    /// Largest forest gain first (`delta_percent < 0`)
    Gain,
}

impl std::fmt::Display for TopDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopDirection::Loss => write!(f, "loss"),
            TopDirection::Gain => write!(f, "gain"),
        }
    }
}

impl std::str::FromStr for TopDirection {
    type Err = ForestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "loss" | "deforestation" => Ok(TopDirection::Loss),
            "gain" | "reforestation" => Ok(TopDirection::Gain),
            _ => Err(ForestError::ParseError(format!(
                "Unknown direction: '{s}'. Use loss or gain"
            ))),
        }
    }
}

/// The `n` countries with the largest loss or gain, ties kept in input order.
pub fn top_countries(
    snapshots: &[CountrySnapshot],
    n: usize,
    direction: TopDirection,
) -> Vec<CountrySnapshot> {
    let mut selected: Vec<&CountrySnapshot> = snapshots
        .iter()
        .filter(|s| match direction {
            TopDirection::Loss => s.is_loss(),
            TopDirection::Gain => s.is_gain(),
        })
        .collect();

    // sort_by is stable
    match direction {
        TopDirection::Loss => selected.sort_by(|a, b| b.delta_percent.total_cmp(&a.delta_percent)),
        TopDirection::Gain => selected.sort_by(|a, b| a.delta_percent.total_cmp(&b.delta_percent)),
    }

    selected.into_iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(country: &str, delta: f64) -> CountrySnapshot {
        CountrySnapshot {
            country: country.to_string(),
            area_km2: 100.0,
            forest_percent_2000: 50.0,
            forest_percent_2010: 50.0 - delta,
            delta_percent: delta,
            delta_area_km2: delta,
        }
    }

    fn sample() -> Vec<CountrySnapshot> {
        vec![
            snap("A", 3.0),
            snap("B", -1.0),
            snap("C", 7.5),
            snap("D", 0.0),
            snap("E", 3.0),
            snap("F", -4.0),
            snap("G", 1.0),
            snap("H", 9.0),
            snap("I", 2.0),
        ]
    }

    fn names(v: &[CountrySnapshot]) -> Vec<&str> {
        v.iter().map(|s| s.country.as_str()).collect()
    }

    #[test]
    fn test_top_loss_descending_with_stable_ties() {
        let top = top_countries(&sample(), 5, TopDirection::Loss);
        assert_eq!(names(&top), vec!["H", "C", "A", "E", "I"]);
    }

    #[test]
    fn test_top_loss_excludes_non_positive() {
        let top = top_countries(&sample(), 100, TopDirection::Loss);
        assert_eq!(top.len(), 6);
        assert!(top.iter().all(|s| s.delta_percent > 0.0));
    }

    #[test]
    fn test_top_gain_most_negative_first() {
        let top = top_countries(&sample(), 10, TopDirection::Gain);
        assert_eq!(names(&top), vec!["F", "B"]);
    }

    #[test]
    fn test_zero_limit() {
        assert!(top_countries(&sample(), 0, TopDirection::Loss).is_empty());
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("LOSS".parse::<TopDirection>().unwrap(), TopDirection::Loss);
        assert_eq!(
            "reforestation".parse::<TopDirection>().unwrap(),
            TopDirection::Gain
        );
        assert!("sideways".parse::<TopDirection>().is_err());
    }
}
