//! Filter and sort selections made by a browsing user.
//!
//! [`FilterState`] is a plain value: callers rebuild it on every change and
//! the query engine only ever reads it. The selector enums parse from and
//! render to stable kebab-case tokens so they can travel through CLI flags,
//! query strings or JSON without a bespoke mapping.
//!
//! # Examples
//! ```
//! use pokedex_core::{LegendaryFilter, SortOption};
//!
//! assert_eq!(SortOption::TotalStatsDesc.as_str(), "total-stats-desc");
//! assert_eq!("mythical".parse(), Ok(LegendaryFilter::Mythical));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token accepted for "no generation filter".
pub const ALL_GENERATIONS: &str = "all";

/// Error returned when a selector token is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseSelectorError {
    /// Which selector was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseSelectorError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// The complete set of user-selected query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterState {
    /// Free-text search term; blank matches everything.
    pub search: String,
    /// Types a record must all carry; empty disables the filter.
    pub types: BTreeSet<String>,
    /// Generation restriction.
    pub generation: GenerationFilter,
    /// Legendary-status restriction.
    pub legendary: LegendaryFilter,
    /// Result ordering.
    pub sort: SortOption,
}

impl FilterState {
    /// Replace the search term.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Replace the selected types.
    #[must_use]
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the generation selector.
    #[must_use]
    pub fn with_generation(mut self, generation: GenerationFilter) -> Self {
        self.generation = generation;
        self
    }

    /// Replace the legendary selector.
    #[must_use]
    pub fn with_legendary(mut self, legendary: LegendaryFilter) -> Self {
        self.legendary = legendary;
        self
    }

    /// Replace the sort option.
    #[must_use]
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }
}

/// Generation selector: everything, or one specific tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", from = "String"))]
pub enum GenerationFilter {
    /// No restriction.
    #[default]
    All,
    /// Records tagged with exactly this generation.
    Only(String),
}

impl GenerationFilter {
    /// Whether a record tagged with `generation` passes the selector.
    pub fn matches(&self, generation: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => generation == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for GenerationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_GENERATIONS),
            Self::Only(tag) => f.write_str(tag),
        }
    }
}

impl From<String> for GenerationFilter {
    fn from(value: String) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_GENERATIONS) {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<GenerationFilter> for String {
    fn from(value: GenerationFilter) -> Self {
        value.to_string()
    }
}

impl FromStr for GenerationFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

/// Legendary-status selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LegendaryFilter {
    /// No restriction.
    #[default]
    All,
    /// Only records flagged legendary.
    Legendary,
    /// Only records flagged mythical.
    Mythical,
    /// Records flagged neither legendary nor mythical.
    NonLegendary,
}

impl LegendaryFilter {
    /// Return the selector as its kebab-case token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Legendary => "legendary",
            Self::Mythical => "mythical",
            Self::NonLegendary => "non-legendary",
        }
    }

    /// Whether a record with the given flags passes the selector.
    pub const fn matches(self, is_legendary: bool, is_mythical: bool) -> bool {
        match self {
            Self::All => true,
            Self::Legendary => is_legendary,
            Self::Mythical => is_mythical,
            Self::NonLegendary => !is_legendary && !is_mythical,
        }
    }
}

impl fmt::Display for LegendaryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegendaryFilter {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "legendary" => Ok(Self::Legendary),
            "mythical" => Ok(Self::Mythical),
            "non-legendary" => Ok(Self::NonLegendary),
            _ => Err(ParseSelectorError::new("legendary filter", s)),
        }
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SortOption {
    /// Ascending identifier.
    #[default]
    IdAsc,
    /// Descending identifier.
    IdDesc,
    /// Case-insensitive display name.
    NameAsc,
    /// Highest total stats first.
    TotalStatsDesc,
}

impl SortOption {
    /// Return the option as its kebab-case token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IdAsc => "id-asc",
            Self::IdDesc => "id-desc",
            Self::NameAsc => "name-asc",
            Self::TotalStatsDesc => "total-stats-desc",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id-asc" => Ok(Self::IdAsc),
            "id-desc" => Ok(Self::IdDesc),
            "name-asc" => Ok(Self::NameAsc),
            "total-stats-desc" => Ok(Self::TotalStatsDesc),
            _ => Err(ParseSelectorError::new("sort option", s)),
        }
    }
}
