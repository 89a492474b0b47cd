//! In-memory catalogue source for tests.
//!
//! [`StubCatalogueSource`] serves canned resources keyed by URL and can be
//! scripted to fail a given number of times, which is how the retry
//! behaviour of the worker pool is exercised without a network.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;

use crate::resources::{
    ChainLink, EncounterResource, EvolutionChainResource, NamedResource, PokemonResource,
    ResourceLink, SpeciesResource, StatEntry, TypeSlot,
};
use crate::{CatalogueSource, TransportError};

const STUB_BASE_URL: &str = "https://pokeapi.test/api/v2";

/// Stub [`CatalogueSource`] backed by in-memory resources.
#[derive(Debug, Default)]
pub struct StubCatalogueSource {
    index: Vec<NamedResource>,
    pokemon: HashMap<String, PokemonResource>,
    species: HashMap<String, SpeciesResource>,
    chains: HashMap<String, EvolutionChainResource>,
    encounters: HashMap<String, Vec<EncounterResource>>,
    failures: RefCell<HashMap<String, usize>>,
    requests: RefCell<HashMap<String, usize>>,
    index_fails: Cell<bool>,
}

impl StubCatalogueSource {
    /// Build a source listing one single-stage creature per `(id, name)`
    /// pair, in the given index order.
    ///
    /// Each creature has one `normal` type, an `hp` stat of ten times its id
    /// and one encounter area named after it.
    #[must_use]
    pub fn with_creatures(creatures: &[(u32, &str)]) -> Self {
        let mut source = Self::default();
        for &(id, name) in creatures {
            source.insert(id, name);
        }
        source
    }

    fn insert(&mut self, id: u32, name: &str) {
        let detail_url = pokemon_url(id);
        let species_url = Self::species_url(id);
        let chain_url = format!("{STUB_BASE_URL}/evolution-chain/{id}/");
        let encounters_url = format!("{detail_url}encounters");

        self.index.push(NamedResource::new(name, detail_url.as_str()));
        self.pokemon.insert(
            detail_url,
            PokemonResource {
                id,
                name: name.to_owned(),
                types: vec![TypeSlot {
                    slot: 1,
                    kind: NamedResource::new("normal", format!("{STUB_BASE_URL}/type/1/")),
                }],
                stats: vec![StatEntry {
                    base_stat: id.saturating_mul(10),
                    stat: NamedResource::new("hp", format!("{STUB_BASE_URL}/stat/1/")),
                }],
                species: NamedResource::new(name, species_url.as_str()),
                location_area_encounters: encounters_url.clone(),
                ..PokemonResource::default()
            },
        );
        self.species.insert(
            species_url.clone(),
            SpeciesResource {
                evolution_chain: Some(ResourceLink {
                    url: chain_url.clone(),
                }),
                generation: Some(NamedResource::new(
                    "generation-i",
                    format!("{STUB_BASE_URL}/generation/1/"),
                )),
                ..SpeciesResource::default()
            },
        );
        self.chains.insert(
            chain_url,
            EvolutionChainResource {
                chain: ChainLink {
                    species: Some(NamedResource::new(name, species_url)),
                    evolves_to: Vec::new(),
                },
            },
        );
        self.encounters.insert(
            encounters_url,
            vec![EncounterResource {
                location_area: NamedResource::new(
                    format!("{name}-meadow"),
                    format!("{STUB_BASE_URL}/location-area/{id}/"),
                ),
            }],
        );
    }

    /// Species URL the stub serves for `id`.
    #[must_use]
    pub fn species_url(id: u32) -> String {
        format!("{STUB_BASE_URL}/pokemon-species/{id}/")
    }

    /// Make the next `times` requests for `url` fail, whichever resource it
    /// names.
    pub fn fail_url(&self, url: impl Into<String>, times: usize) {
        self.failures.borrow_mut().insert(url.into(), times);
    }

    /// Make the next `times` base-detail requests for `id` fail.
    pub fn fail_pokemon(&self, id: u32, times: usize) {
        self.fail_url(pokemon_url(id), times);
    }

    /// Make every index request fail.
    pub fn fail_index(&self) {
        self.index_fails.set(true);
    }

    /// Number of base-detail requests made for `id`, failed ones included.
    #[must_use]
    pub fn pokemon_requests(&self, id: u32) -> usize {
        self.requests_for(&pokemon_url(id))
    }

    /// Number of requests made for `url`, failed ones included.
    #[must_use]
    pub fn requests_for(&self, url: &str) -> usize {
        self.requests.borrow().get(url).copied().unwrap_or_default()
    }

    fn serve<T: Clone>(&self, table: &HashMap<String, T>, url: &str) -> Result<T, TransportError> {
        *self.requests.borrow_mut().entry(url.to_owned()).or_default() += 1;
        if let Some(remaining) = self.failures.borrow_mut().get_mut(url)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(TransportError::Http {
                url: url.to_owned(),
                status: 503,
                message: "scripted failure".to_owned(),
            });
        }
        table.get(url).cloned().ok_or_else(|| TransportError::Http {
            url: url.to_owned(),
            status: 404,
            message: "no stub resource".to_owned(),
        })
    }
}

fn pokemon_url(id: u32) -> String {
    format!("{STUB_BASE_URL}/pokemon/{id}/")
}

#[async_trait(?Send)]
impl CatalogueSource for StubCatalogueSource {
    async fn fetch_index(&self, limit: usize) -> Result<Vec<NamedResource>, TransportError> {
        if self.index_fails.get() {
            return Err(TransportError::Network {
                url: format!("{STUB_BASE_URL}/pokemon?limit={limit}"),
                message: "connection refused".to_owned(),
                timed_out: false,
            });
        }
        Ok(self.index.iter().take(limit).cloned().collect())
    }

    async fn fetch_pokemon(&self, url: &str) -> Result<PokemonResource, TransportError> {
        self.serve(&self.pokemon, url)
    }

    async fn fetch_species(&self, url: &str) -> Result<SpeciesResource, TransportError> {
        self.serve(&self.species, url)
    }

    async fn fetch_evolution_chain(
        &self,
        url: &str,
    ) -> Result<EvolutionChainResource, TransportError> {
        self.serve(&self.chains, url)
    }

    async fn fetch_encounters(&self, url: &str) -> Result<Vec<EncounterResource>, TransportError> {
        self.serve(&self.encounters, url)
    }
}

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics if the runtime cannot be created.
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|err| panic!("failed to build Tokio runtime: {err}"))
        .block_on(future)
}
