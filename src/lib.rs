//! Facade crate for the Pokedex catalogue engine.
//!
//! This crate re-exports the core record and query types, and exposes the
//! ingestion pipeline behind the `ingest` feature.

#![forbid(unsafe_code)]

pub use pokedex_core::{
    ALL_GENERATIONS, Ability, Catalogue, CatalogueError, EvolutionNode, FilterState,
    GenerationFilter, LegendaryFilter, Move, ParseSelectorError, Record, SortOption, Sprites, Stat,
    autocomplete_suggestions, filter_and_sort, humanize, normalise_query,
};

#[cfg(feature = "ingest")]
pub use pokedex_data::{
    CatalogueSource, HttpCatalogueSource, HttpCatalogueSourceConfig, IngestError, IngestOptions,
    IngestReport, SourceBuildError, TransportError, collect_records, ingest, write_dataset,
};
