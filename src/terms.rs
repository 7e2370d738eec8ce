use std::fmt;
use std::str::FromStr;

pub use fixed_map::Key;
use fixed_map::Map as FixedMap;
use serde::{Deserialize, Serialize};

use crate::membership::Triangle;

/// The linguistic terms every arrival variable is described with.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Key, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Low, Level::Medium, Level::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known term
#[derive(Debug, PartialEq)]
pub struct UnknownLevel;

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(UnknownLevel)
    }
}

/// Term name to membership function mapping for a single variable.
pub struct Terms(pub(crate) FixedMap<Level, Triangle>);

impl Default for Terms {
    fn default() -> Self {
        Self::new()
    }
}

impl Terms {
    pub fn new() -> Self {
        Self(FixedMap::new())
    }

    pub fn insert(&mut self, key: Level, value: Triangle) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: Level) -> Option<&Triangle> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Level, &Triangle)> {
        self.0.iter()
    }
}

impl FromIterator<(Level, Triangle)> for Terms {
    fn from_iter<I: IntoIterator<Item = (Level, Triangle)>>(iter: I) -> Self {
        let mut terms = Terms::new();

        for (key, value) in iter {
            terms.insert(key, value);
        }

        terms
    }
}

#[test]
fn test_level_parsing() {
    assert_eq!("low".parse(), Ok(Level::Low));
    assert_eq!(" Medium ".parse(), Ok(Level::Medium));
    assert_eq!("HIGH".parse(), Ok(Level::High));
    assert_eq!("extreme".parse::<Level>(), Err(UnknownLevel));
    assert_eq!(Level::High.to_string(), "high");
}

#[test]
fn test_terms_are_unique_per_level() {
    let mut terms = Terms::new();

    terms.insert(Level::Low, Triangle::new(0., 0., 50.).unwrap());
    terms.insert(Level::Low, Triangle::new(0., 0., 40.).unwrap());
    terms.insert(Level::High, Triangle::new(50., 100., 100.).unwrap());

    assert_eq!(terms.len(), 2);
    assert_eq!(terms.get(Level::Low).map(Triangle::c), Some(40.));
    assert!(terms.get(Level::Medium).is_none());
}
