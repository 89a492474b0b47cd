//! Search and suggest commands over a dataset file.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use pokedex_core::{Catalogue, FilterState, GenerationFilter, LegendaryFilter, Record, SortOption};
use serde::Serialize;

use crate::CliError;

/// Default number of autocomplete suggestions.
pub(crate) const DEFAULT_SUGGESTIONS: usize = 10;

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct SearchArgs {
    /// Dataset file written by `ingest`.
    #[arg(value_name = "dataset")]
    pub(crate) dataset: Utf8PathBuf,
    /// Case-insensitive substring of the name, a type or an ability.
    #[arg(long, value_name = "text", default_value = "")]
    pub(crate) term: String,
    /// Required type; repeat to require several.
    #[arg(long = "type", value_name = "type")]
    pub(crate) types: Vec<String>,
    /// Generation tag such as `generation-i`, or `all`.
    #[arg(long, value_name = "tag", default_value_t = GenerationFilter::All)]
    pub(crate) generation: GenerationFilter,
    /// One of `all`, `legendary`, `mythical`, `non-legendary`.
    #[arg(long, value_name = "tier", default_value_t = LegendaryFilter::All)]
    pub(crate) legendary: LegendaryFilter,
    /// One of `id-asc`, `id-desc`, `name-asc`, `total-stats-desc`.
    #[arg(long, value_name = "order", default_value_t = SortOption::IdAsc)]
    pub(crate) sort: SortOption,
}

impl SearchArgs {
    fn filter_state(&self) -> FilterState {
        FilterState::default()
            .with_search(self.term.as_str())
            .with_types(self.types.iter().map(String::as_str))
            .with_generation(self.generation.clone())
            .with_legendary(self.legendary)
            .with_sort(self.sort)
    }
}

/// CLI arguments for the `suggest` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct SuggestArgs {
    /// Dataset file written by `ingest`.
    #[arg(value_name = "dataset")]
    pub(crate) dataset: Utf8PathBuf,
    /// Partial name to complete.
    #[arg(value_name = "query")]
    pub(crate) query: String,
    /// Maximum number of suggestions.
    #[arg(long, value_name = "count", default_value_t = DEFAULT_SUGGESTIONS)]
    pub(crate) max: usize,
}

/// One autocomplete entry.
#[derive(Debug, Serialize)]
struct Suggestion<'a> {
    id: u32,
    name: &'a str,
    display_name: String,
}

impl<'a> From<&'a Record> for Suggestion<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            id: record.id,
            name: &record.name,
            display_name: record.display_name(),
        }
    }
}

pub(crate) fn run_search(args: &SearchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let catalogue = load_catalogue(&args.dataset)?;
    let results = catalogue.search(&args.filter_state());
    write_json(writer, &results)
}

pub(crate) fn run_suggest(args: &SuggestArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let catalogue = load_catalogue(&args.dataset)?;
    let suggestions: Vec<Suggestion<'_>> = catalogue
        .suggest(&args.query, args.max)
        .into_iter()
        .map(Suggestion::from)
        .collect();
    write_json(writer, &suggestions)
}

/// Load and validate the dataset at `path`.
pub(crate) fn load_catalogue(path: &Utf8Path) -> Result<Catalogue, CliError> {
    match pokedex_fs::is_regular_file(path) {
        Ok(true) => {}
        Ok(false) => {
            return Err(CliError::DatasetNotFile {
                path: path.to_path_buf(),
            });
        }
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(CliError::MissingDataset {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(CliError::OpenDataset {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    let file = pokedex_fs::open_file(path).map_err(|source| CliError::OpenDataset {
        path: path.to_path_buf(),
        source,
    })?;
    Catalogue::from_reader(BufReader::new(file)).map_err(|source| CliError::LoadDataset {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
