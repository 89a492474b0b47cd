//! Offline ingestion for the Pokedex catalogue.
//!
//! Responsibilities:
//! - Define the [`CatalogueSource`] trait and its HTTP implementation.
//! - Turn fetched resources into [`pokedex_core::Record`] values.
//! - Run the bounded worker pool and write the dataset file.
//!
//! Boundaries:
//! - Query semantics live in `pokedex-core`; nothing here filters or ranks.
//! - Only the index URL is built locally; detail URLs come from responses.
//!
//! Invariants:
//! - Each index entry is claimed by exactly one worker.
//! - A failed entry is retried once, then dropped without aborting the run.
//! - The written dataset is sorted by id.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use pokedex_data::{HttpCatalogueSource, IngestOptions, ingest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpCatalogueSource::new("https://pokeapi.co/api/v2")?;
//! let options = IngestOptions::default().with_limit(151).with_concurrency(10);
//! let report = ingest(&source, &options, Utf8Path::new("data/pokemon.json")).await?;
//! println!("wrote {} records", report.written);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod dataset;
mod error;
mod extract;
mod pipeline;
pub mod resources;
mod source;

#[doc(hidden)]
pub mod test_support;

pub use dataset::write_dataset;
pub use error::{IngestError, TransportError};
pub use extract::{
    FetchedItem, MAX_LEVEL_UP_MOVES, MAX_LOCATIONS, MAX_OTHER_MOVES, build_record,
    evolution_nodes, extract_moves, flavor_text, location_names, normalise_flavor_text,
    species_id_from_url,
};
pub use pipeline::{
    DEFAULT_CONCURRENCY, DEFAULT_LIMIT, DEFAULT_RETRY_BACKOFF, DEFAULT_THROTTLE, Harvest,
    IngestOptions, IngestReport, collect_records, ingest,
};
pub use source::{
    CatalogueSource, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    HttpCatalogueSource, HttpCatalogueSourceConfig, SourceBuildError,
};
