//! Core domain types and the query engine for the Pokedex catalogue.
//!
//! Records are immutable once loaded. The query engine borrows a record slice
//! and a [`FilterState`] and returns an ordered selection without touching
//! the collection, so results are deterministic for identical inputs.
//!
//! # Examples
//!
//! ```
//! use pokedex_core::{Catalogue, FilterState, Record, SortOption, Stat};
//!
//! # fn main() -> Result<(), pokedex_core::CatalogueError> {
//! let catalogue = Catalogue::new(vec![
//!     Record {
//!         id: 1,
//!         name: "bulbasaur".to_owned(),
//!         stats: vec![Stat::new("hp", 45)],
//!         ..Record::default()
//!     },
//!     Record {
//!         id: 4,
//!         name: "charmander".to_owned(),
//!         stats: vec![Stat::new("hp", 39), Stat::new("speed", 65)],
//!         ..Record::default()
//!     },
//! ])?;
//! let strongest = catalogue.search(&FilterState::default().with_sort(SortOption::TotalStatsDesc));
//! assert_eq!(strongest.first().map(|r| r.id), Some(4));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod catalogue;
mod filter;
mod query;
mod record;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use catalogue::{Catalogue, CatalogueError};
pub use filter::{
    ALL_GENERATIONS, FilterState, GenerationFilter, LegendaryFilter, ParseSelectorError,
    SortOption,
};
pub use query::{autocomplete_suggestions, filter_and_sort, normalise_query};
pub use record::{
    Ability, EvolutionNode, LEVEL_UP_METHOD, Move, Record, Sprites, Stat, humanize,
};
