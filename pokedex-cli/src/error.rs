//! Error types emitted by the Pokedex CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use pokedex_core::CatalogueError;
use pokedex_data::{IngestError, SourceBuildError};
use thiserror::Error;

/// Errors emitted by the Pokedex CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A numeric option resolved to zero.
    #[error("{field} must be positive (set --{field} or {env})")]
    NonPositive {
        /// Flag name.
        field: &'static str,
        /// Environment variable that also sets it.
        env: &'static str,
    },
    /// The catalogue API client could not be built.
    #[error("failed to build catalogue source for {base_url:?}: {source}")]
    BuildSource {
        /// Configured API root.
        base_url: String,
        /// Construction failure.
        #[source]
        source: SourceBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The ingestion run failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),
    /// The dataset path does not exist.
    #[error("dataset {path:?} does not exist")]
    MissingDataset {
        /// Requested dataset path.
        path: Utf8PathBuf,
    },
    /// The dataset path exists but is not a file.
    #[error("dataset {path:?} exists but is not a file")]
    DatasetNotFile {
        /// Requested dataset path.
        path: Utf8PathBuf,
    },
    /// The dataset could not be opened or inspected.
    #[error("failed to open dataset {path:?}: {source}")]
    OpenDataset {
        /// Requested dataset path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The dataset could not be loaded into a catalogue.
    #[error("failed to load dataset {path:?}: {source}")]
    LoadDataset {
        /// Requested dataset path.
        path: Utf8PathBuf,
        /// Decode or validation failure.
        #[source]
        source: CatalogueError,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
