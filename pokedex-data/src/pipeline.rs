//! The ingestion run: index fetch, worker pool and dataset write.
//!
//! Workers are futures polled together on the calling task. Each one claims
//! the next index position from a shared atomic cursor, so an entry is
//! fetched by at most one worker. Per-item failures are retried once after a
//! fixed backoff and then dropped; only an index failure aborts the run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use futures_util::future::join_all;
use log::{debug, error, info, warn};
use pokedex_core::Record;

use crate::extract::{FetchedItem, build_record};
use crate::resources::NamedResource;
use crate::{CatalogueSource, IngestError, TransportError, write_dataset};

/// Default number of index entries to ingest.
pub const DEFAULT_LIMIT: usize = 151;
/// Default worker pool size.
pub const DEFAULT_CONCURRENCY: usize = 10;
/// Default pause before retrying a failed item.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);
/// Default pause a worker takes after every claimed item.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(100);

/// Tuning knobs for an ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Number of index entries to request.
    pub limit: usize,
    /// Maximum number of concurrent workers.
    pub concurrency: usize,
    /// Pause before the single retry of a failed item.
    pub retry_backoff: Duration,
    /// Pause after every claimed item, successful or not.
    pub throttle: Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            throttle: DEFAULT_THROTTLE,
        }
    }
}

impl IngestOptions {
    /// Set the number of entries to request.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the worker pool size.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the retry backoff.
    #[must_use]
    pub const fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Set the per-item throttle.
    #[must_use]
    pub const fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Check that the limit and pool size are positive.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidOptions`] naming the offending option.
    pub const fn validate(&self) -> Result<(), IngestError> {
        if self.limit == 0 {
            return Err(IngestError::InvalidOptions {
                reason: "limit must be positive",
            });
        }
        if self.concurrency == 0 {
            return Err(IngestError::InvalidOptions {
                reason: "concurrency must be positive",
            });
        }
        Ok(())
    }
}

/// Records gathered by a run, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Harvest {
    /// Number of entries the index returned.
    pub requested: usize,
    /// Successfully fetched records in ascending id order.
    pub records: Vec<Record>,
    /// Names of entries that failed twice, in index order.
    pub dropped: Vec<String>,
}

/// Summary of a completed ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of entries the index returned.
    pub requested: usize,
    /// Number of records written.
    pub written: usize,
    /// Names of entries that were dropped.
    pub dropped: Vec<String>,
    /// Where the dataset was written.
    pub output_path: Utf8PathBuf,
}

/// Fetch every index entry through `source` and return the sorted records.
///
/// # Errors
///
/// Returns [`IngestError::InvalidOptions`] for a zero limit or pool size and
/// [`IngestError::FetchIndex`] when the index cannot be listed. Per-item
/// failures never surface here; they appear in [`Harvest::dropped`].
pub async fn collect_records<S: CatalogueSource + ?Sized>(
    source: &S,
    options: &IngestOptions,
) -> Result<Harvest, IngestError> {
    options.validate()?;
    let index = source
        .fetch_index(options.limit)
        .await
        .map_err(|source| IngestError::FetchIndex { source })?;
    let workers = options.concurrency.min(index.len());
    info!(
        "fetched index of {} entries; starting {workers} workers",
        index.len()
    );

    let cursor = AtomicUsize::new(0);
    let outcomes = join_all(
        (0..workers).map(|worker| run_worker(source, &index, &cursor, options, worker)),
    )
    .await;

    let mut slots: Vec<Option<Record>> = vec![None; index.len()];
    for (position, record) in outcomes.into_iter().flatten() {
        if let Some(slot) = slots.get_mut(position) {
            *slot = record;
        }
    }
    let dropped = index
        .iter()
        .zip(&slots)
        .filter(|(_, slot)| slot.is_none())
        .map(|(entry, _)| entry.name.clone())
        .collect();
    let mut records: Vec<Record> = slots.into_iter().flatten().collect();
    records.sort_by_key(|record| record.id);

    Ok(Harvest {
        requested: index.len(),
        records,
        dropped,
    })
}

/// Run a full ingestion and write the dataset to `output`.
///
/// # Errors
///
/// Propagates [`collect_records`] errors, plus
/// [`IngestError::SerialiseDataset`] and [`IngestError::WriteDataset`] when
/// the file cannot be produced. Nothing is written if the index fetch fails.
pub async fn ingest<S: CatalogueSource + ?Sized>(
    source: &S,
    options: &IngestOptions,
    output: &Utf8Path,
) -> Result<IngestReport, IngestError> {
    let harvest = collect_records(source, options).await?;
    write_dataset(output, &harvest.records)?;
    info!(
        "wrote {} of {} records to {output}",
        harvest.records.len(),
        harvest.requested
    );
    Ok(IngestReport {
        requested: harvest.requested,
        written: harvest.records.len(),
        dropped: harvest.dropped,
        output_path: output.to_path_buf(),
    })
}

async fn run_worker<S: CatalogueSource + ?Sized>(
    source: &S,
    index: &[NamedResource],
    cursor: &AtomicUsize,
    options: &IngestOptions,
    worker: usize,
) -> Vec<(usize, Option<Record>)> {
    let mut outcomes = Vec::new();
    loop {
        let position = cursor.fetch_add(1, Ordering::Relaxed);
        let Some(entry) = index.get(position) else {
            break;
        };
        debug!("worker {worker} claimed {} at position {position}", entry.name);
        let record = fetch_with_retry(source, entry, options.retry_backoff).await;
        outcomes.push((position, record));
        tokio::time::sleep(options.throttle).await;
    }
    outcomes
}

async fn fetch_with_retry<S: CatalogueSource + ?Sized>(
    source: &S,
    entry: &NamedResource,
    backoff: Duration,
) -> Option<Record> {
    match fetch_item(source, entry).await {
        Ok(item) => return Some(build_record(&item)),
        Err(err) => warn!("fetching {} failed, retrying in {backoff:?}: {err}", entry.name),
    }
    tokio::time::sleep(backoff).await;
    match fetch_item(source, entry).await {
        Ok(item) => Some(build_record(&item)),
        Err(err) => {
            error!("dropping {} after retry: {err}", entry.name);
            None
        }
    }
}

async fn fetch_item<S: CatalogueSource + ?Sized>(
    source: &S,
    entry: &NamedResource,
) -> Result<FetchedItem, TransportError> {
    let pokemon = source.fetch_pokemon(&entry.url).await?;
    let species = source.fetch_species(&pokemon.species.url).await?;
    let chain = match species.evolution_chain.as_ref() {
        Some(link) => Some(source.fetch_evolution_chain(&link.url).await?),
        None => None,
    };
    let encounters = if pokemon.location_area_encounters.is_empty() {
        Vec::new()
    } else {
        source
            .fetch_encounters(&pokemon.location_area_encounters)
            .await?
    };
    Ok(FetchedItem {
        pokemon,
        species,
        chain,
        encounters,
    })
}
