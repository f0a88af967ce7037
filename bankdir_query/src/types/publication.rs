//! Publication editions and their recency ordering.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Earliest publication year accepted at the parameter boundary.
pub const MIN_YEAR: i32 = 1900;
/// Latest publication year accepted at the parameter boundary.
pub const MAX_YEAR: i32 = 2100;

/// Edition season. Every state publishes a spring edition; some also
/// publish a supplemental fall edition later in the same year.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Fall,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Fall => "fall",
        }
    }

    /// Capitalized name for display ("Spring", "Fall").
    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Fall => "Fall",
        }
    }

    /// Position within a year when listing newest first: fall (1) before spring (2).
    pub fn recency_rank(&self) -> u8 {
        match self {
            Season::Fall => 1,
            Season::Spring => 2,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Season {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spring" => Ok(Season::Spring),
            "fall" => Ok(Season::Fall),
            _ => Err(Error::UnknownSeason(s.to_string())),
        }
    }
}

/// A (year, season) edition. The state is carried by whatever scoped the
/// lookup (a state's publications or one institution's publications).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Publication {
    pub year: i32,
    pub season: Season,
}

impl Publication {
    pub fn new(year: i32, season: Season) -> Self {
        Self { year, season }
    }

    /// Display label, e.g. "Fall 2019".
    pub fn label(&self) -> String {
        format!("{} {}", self.season.label(), self.year)
    }
}

impl std::fmt::Display for Publication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.season.label(), self.year)
    }
}

/// Chronological order: by year, and within a year spring precedes fall.
/// `max()` over a set of publications therefore yields the most recent one.
impl Ord for Publication {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| other.season.recency_rank().cmp(&self.season.recency_rank()))
    }
}

impl PartialOrd for Publication {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Comparator for newest-first listings: year descending, fall ahead of spring.
pub fn newest_first(a: &Publication, b: &Publication) -> Ordering {
    b.cmp(a)
}

/// Sort newest first and drop duplicate (year, season) pairs.
pub fn sort_newest_first(publications: &mut Vec<Publication>) {
    publications.sort_by(newest_first);
    publications.dedup();
}
