//! Ingest command implementation for the Pokedex CLI.

use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use pokedex_data::{
    CatalogueSource, DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, DEFAULT_LIMIT, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, HttpCatalogueSource, HttpCatalogueSourceConfig, IngestOptions,
    IngestReport, ingest,
};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CONCURRENCY, ARG_LIMIT, ARG_TIMEOUT_SECS, CliError, ENV_CONCURRENCY, ENV_LIMIT,
    ENV_TIMEOUT_SECS,
};

/// Default dataset location.
pub(crate) const DEFAULT_OUTPUT: &str = "data/pokemon.json";

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Build the dataset file from the remote catalogue API. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Fetch the catalogue and write the dataset"
)]
#[ortho_config(prefix = "POKEDEX")]
pub(crate) struct IngestArgs {
    /// Number of index entries to fetch.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Number of concurrent workers.
    #[arg(long = ARG_CONCURRENCY, value_name = "count")]
    #[serde(default)]
    pub(crate) concurrency: Option<usize>,
    /// Where to write the dataset.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Root of the catalogue API.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// User agent sent with every request.
    #[arg(long, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
}

impl IngestArgs {
    pub(crate) fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Resolved `ingest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IngestConfig {
    pub(crate) options: IngestOptions,
    pub(crate) output: Utf8PathBuf,
    pub(crate) source: HttpCatalogueSourceConfig,
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let limit = positive(args.limit.unwrap_or(DEFAULT_LIMIT), ARG_LIMIT, ENV_LIMIT)?;
        let concurrency = positive(
            args.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
            ARG_CONCURRENCY,
            ENV_CONCURRENCY,
        )?;
        let timeout_secs = args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(CliError::NonPositive {
                field: ARG_TIMEOUT_SECS,
                env: ENV_TIMEOUT_SECS,
            });
        }
        let source = HttpCatalogueSourceConfig::new(
            args.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
        )
        .with_timeout(Duration::from_secs(timeout_secs))
        .with_user_agent(
            args.user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
        );
        Ok(Self {
            options: IngestOptions::default()
                .with_limit(limit)
                .with_concurrency(concurrency),
            output: args
                .output
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT)),
            source,
        })
    }
}

const fn positive(value: usize, field: &'static str, env: &'static str) -> Result<usize, CliError> {
    if value == 0 {
        Err(CliError::NonPositive { field, env })
    } else {
        Ok(value)
    }
}

pub(crate) fn run_ingest(args: IngestArgs) -> Result<IngestReport, CliError> {
    let config = args.into_config()?;
    let source = HttpCatalogueSource::with_config(config.source.clone()).map_err(|source| {
        CliError::BuildSource {
            base_url: config.source.base_url.clone(),
            source,
        }
    })?;
    execute_ingest(&config, &source)
}

/// Run the pipeline against `source` on a dedicated runtime.
pub(crate) fn execute_ingest<S: CatalogueSource + ?Sized>(
    config: &IngestConfig,
    source: &S,
) -> Result<IngestReport, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let report = runtime.block_on(ingest(source, &config.options, &config.output))?;
    info!(
        "ingested {} of {} entries into {}",
        report.written, report.requested, report.output_path
    );
    if !report.dropped.is_empty() {
        warn!("dropped after retry: {}", report.dropped.join(", "));
    }
    Ok(report)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<IngestConfig, CliError> {
    let merged = IngestArgs::merge_from_layers(layers).map_err(CliError::from)?;
    IngestConfig::try_from(merged)
}
