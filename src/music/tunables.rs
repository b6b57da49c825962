//! Tunable recommendation constraints.
//!
//! A constraint key is `{min|max|target}_<attribute>`, e.g. `min_energy` or
//! `target_tempo`. Values are passed through to the backend unvalidated.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TunableAttribute {
    Valence,
    Acousticness,
    Danceability,
    DurationMs,
    Energy,
    Instrumentalness,
    Key,
    Liveness,
    Loudness,
    Mode,
    Popularity,
    Speechiness,
    Tempo,
    TimeSignature,
}

impl TunableAttribute {
    pub const ALL: [TunableAttribute; 14] = [
        TunableAttribute::Valence,
        TunableAttribute::Acousticness,
        TunableAttribute::Danceability,
        TunableAttribute::DurationMs,
        TunableAttribute::Energy,
        TunableAttribute::Instrumentalness,
        TunableAttribute::Key,
        TunableAttribute::Liveness,
        TunableAttribute::Loudness,
        TunableAttribute::Mode,
        TunableAttribute::Popularity,
        TunableAttribute::Speechiness,
        TunableAttribute::Tempo,
        TunableAttribute::TimeSignature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TunableAttribute::Valence => "valence",
            TunableAttribute::Acousticness => "acousticness",
            TunableAttribute::Danceability => "danceability",
            TunableAttribute::DurationMs => "duration_ms",
            TunableAttribute::Energy => "energy",
            TunableAttribute::Instrumentalness => "instrumentalness",
            TunableAttribute::Key => "key",
            TunableAttribute::Liveness => "liveness",
            TunableAttribute::Loudness => "loudness",
            TunableAttribute::Mode => "mode",
            TunableAttribute::Popularity => "popularity",
            TunableAttribute::Speechiness => "speechiness",
            TunableAttribute::Tempo => "tempo",
            TunableAttribute::TimeSignature => "time_signature",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    Min,
    Max,
    Target,
}

impl Bound {
    pub const ALL: [Bound; 3] = [Bound::Min, Bound::Max, Bound::Target];

    pub fn prefix(&self) -> &'static str {
        match self {
            Bound::Min => "min",
            Bound::Max => "max",
            Bound::Target => "target",
        }
    }
}

/// A `{bound}_{attribute}` constraint key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TunableKey {
    pub bound: Bound,
    pub attribute: TunableAttribute,
}

impl TunableKey {
    pub fn new(bound: Bound, attribute: TunableAttribute) -> Self {
        Self { bound, attribute }
    }

    /// Parse a key such as `max_duration_ms`. Returns None for anything
    /// outside the naming convention.
    pub fn parse(key: &str) -> Option<Self> {
        let (prefix, attribute) = key.split_once('_')?;
        let bound = Bound::ALL.iter().copied().find(|b| b.prefix() == prefix)?;
        let attribute = TunableAttribute::from_name(attribute)?;
        Some(Self { bound, attribute })
    }

    /// Every valid key, grouped by attribute.
    pub fn all() -> impl Iterator<Item = TunableKey> {
        TunableAttribute::ALL.into_iter().flat_map(|attribute| {
            Bound::ALL
                .into_iter()
                .map(move |bound| TunableKey { bound, attribute })
        })
    }
}

impl fmt::Display for TunableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.bound.prefix(), self.attribute.as_str())
    }
}

/// A set of tunable constraints, one value per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TunableConstraints {
    values: BTreeMap<TunableKey, f64>,
}

impl TunableConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: TunableKey, value: f64) {
        self.values.insert(key, value);
    }

    /// Builder-style insert.
    pub fn with(mut self, bound: Bound, attribute: TunableAttribute, value: f64) -> Self {
        self.insert(TunableKey::new(bound, attribute), value);
        self
    }

    pub fn get(&self, key: &TunableKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TunableKey, &f64)> {
        self.values.iter()
    }

    /// Query parameters in key order. Whole numbers are rendered without a
    /// fractional part so integer attributes (`key`, `mode`, ...) stay integers.
    pub fn query_params(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(key, value)| (key.to_string(), format_value(*value)))
            .collect()
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
