//! The loaded dataset and the collections derived from it.
//!
//! A [`Catalogue`] is built once at startup and shared by reference. The type
//! and generation lists are computed during construction so every consumer
//! sees the same values without recomputing them.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{FilterState, Record, autocomplete_suggestions, filter_and_sort};

/// Errors returned when building a [`Catalogue`].
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Two records share an identifier.
    #[error("duplicate record id {id}")]
    DuplicateId {
        /// The repeated identifier.
        id: u32,
    },
    /// A record carries the reserved identifier `0`.
    #[error("invalid record id {id} for {name:?}; ids must be positive")]
    InvalidId {
        /// The rejected identifier.
        id: u32,
        /// Slug of the offending record.
        name: String,
    },
    /// The dataset could not be decoded.
    #[cfg(feature = "serde")]
    #[error("failed to parse dataset: {source}")]
    ParseDataset {
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable record collection with derived lookup lists.
///
/// # Examples
///
/// ```
/// use pokedex_core::{Catalogue, Record};
///
/// # fn main() -> Result<(), pokedex_core::CatalogueError> {
/// let catalogue = Catalogue::new(vec![
///     Record { id: 7, name: "squirtle".to_owned(), types: vec!["water".to_owned()], ..Record::default() },
///     Record { id: 4, name: "charmander".to_owned(), types: vec!["fire".to_owned()], ..Record::default() },
/// ])?;
/// assert_eq!(catalogue.records().first().map(|r| r.id), Some(4));
/// assert_eq!(catalogue.types(), ["fire", "water"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    records: Vec<Record>,
    types: Vec<String>,
    generations: Vec<String>,
}

impl Catalogue {
    /// Sort `records` by id and derive the lookup lists.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::InvalidId`] when a record has id `0` and
    /// [`CatalogueError::DuplicateId`] when two records share an id.
    pub fn new(mut records: Vec<Record>) -> Result<Self, CatalogueError> {
        if let Some(record) = records.iter().find(|record| record.id == 0) {
            return Err(CatalogueError::InvalidId {
                id: record.id,
                name: record.name.clone(),
            });
        }
        records.sort_by_key(|record| record.id);
        if let Some(pair) = records.windows(2).find(|pair| is_duplicate_pair(pair)) {
            let id = pair.first().map_or(0, |record| record.id);
            return Err(CatalogueError::DuplicateId { id });
        }
        let types = distinct(records.iter().flat_map(|record| record.types.iter()));
        let generations = distinct(
            records
                .iter()
                .filter_map(|record| record.generation.as_ref()),
        );
        Ok(Self {
            records,
            types,
            generations,
        })
    }

    /// Decode a JSON dataset array and build a catalogue from it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::ParseDataset`] for malformed JSON, plus the
    /// validation errors of [`Catalogue::new`].
    #[cfg(feature = "serde")]
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, CatalogueError> {
        let records: Vec<Record> = serde_json::from_reader(reader)
            .map_err(|source| CatalogueError::ParseDataset { source })?;
        Self::new(records)
    }

    /// Every record in ascending id order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct type names, sorted.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Distinct generation tags, sorted.
    pub fn generations(&self) -> &[String] {
        &self.generations
    }

    /// Number of records.
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalogue holds no records.
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    pub fn get(&self, id: u32) -> Option<&Record> {
        self.records
            .binary_search_by_key(&id, |record| record.id)
            .ok()
            .and_then(|index| self.records.get(index))
    }

    /// Look up a record by its slug, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        let wanted = name.trim();
        self.records
            .iter()
            .find(|record| record.name.eq_ignore_ascii_case(wanted))
    }

    /// The records immediately before and after `id` in id order.
    ///
    /// Detail pages use this for previous/next navigation. Returns
    /// `(None, None)` when `id` is not in the catalogue.
    pub fn neighbours(&self, id: u32) -> (Option<&Record>, Option<&Record>) {
        let Ok(index) = self.records.binary_search_by_key(&id, |record| record.id) else {
            return (None, None);
        };
        let previous = index
            .checked_sub(1)
            .and_then(|before| self.records.get(before));
        let next = index
            .checked_add(1)
            .and_then(|after| self.records.get(after));
        (previous, next)
    }

    /// Run [`filter_and_sort`] over the catalogue.
    pub fn search(&self, state: &FilterState) -> Vec<&Record> {
        filter_and_sort(&self.records, state)
    }

    /// Run [`autocomplete_suggestions`] over the catalogue.
    pub fn suggest(&self, query: &str, max: usize) -> Vec<&Record> {
        autocomplete_suggestions(&self.records, query, max)
    }
}

fn is_duplicate_pair(pair: &[Record]) -> bool {
    match pair {
        [left, right] => left.id == right.id,
        _ => false,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
