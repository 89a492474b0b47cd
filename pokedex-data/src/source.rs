//! Catalogue sources: the trait the worker pool fetches through and its HTTP
//! implementation.
//!
//! Only the index URL is built locally. Every other resource is reached
//! through a URL embedded in a previous response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::TransportError;
use crate::resources::{
    EncounterResource, EvolutionChainResource, IndexPage, NamedResource, PokemonResource,
    SpeciesResource,
};

/// Default catalogue API root.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
/// Default user agent for catalogue requests.
pub const DEFAULT_USER_AGENT: &str = "pokedex-ingest/0.1";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches the resources an ingestion run needs.
#[async_trait(?Send)]
pub trait CatalogueSource {
    /// List the first `limit` entries of the index.
    async fn fetch_index(&self, limit: usize) -> Result<Vec<NamedResource>, TransportError>;
    /// Fetch the base detail at `url`.
    async fn fetch_pokemon(&self, url: &str) -> Result<PokemonResource, TransportError>;
    /// Fetch the species detail at `url`.
    async fn fetch_species(&self, url: &str) -> Result<SpeciesResource, TransportError>;
    /// Fetch the evolution chain at `url`.
    async fn fetch_evolution_chain(
        &self,
        url: &str,
    ) -> Result<EvolutionChainResource, TransportError>;
    /// Fetch the location encounters at `url`.
    async fn fetch_encounters(&self, url: &str) -> Result<Vec<EncounterResource>, TransportError>;
}

/// Errors raised while constructing an [`HttpCatalogueSource`].
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The base URL is not an absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Configuration for [`HttpCatalogueSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCatalogueSourceConfig {
    /// API root, for example `"https://pokeapi.co/api/v2"`.
    pub base_url: String,
    /// Deadline applied to every request.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpCatalogueSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpCatalogueSourceConfig {
    /// Create a configuration for the given API root.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP implementation of [`CatalogueSource`].
#[derive(Debug, Clone)]
pub struct HttpCatalogueSource {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl HttpCatalogueSource {
    /// Create a source for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not absolute or the client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceBuildError> {
        Self::with_config(HttpCatalogueSourceConfig::new(base_url))
    }

    /// Create a source from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not absolute or the client fails to
    /// build.
    pub fn with_config(config: HttpCatalogueSourceConfig) -> Result<Self, SourceBuildError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|source| SourceBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(SourceBuildError::HttpClient)?;
        Ok(Self {
            client,
            base_url,
            user_agent: config.user_agent,
        })
    }

    /// The index URL for the first `limit` entries.
    fn index_url(&self, limit: usize) -> String {
        format!("{}/pokemon?limit={limit}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TransportError> {
        let body = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, url))?
            .bytes()
            .await
            .map_err(|err| convert_reqwest_error(&err, url))?;
        serde_json::from_slice(&body).map_err(|err| TransportError::Decode {
            url: url.to_owned(),
            message: err.to_string(),
        })
    }
}

#[async_trait(?Send)]
impl CatalogueSource for HttpCatalogueSource {
    async fn fetch_index(&self, limit: usize) -> Result<Vec<NamedResource>, TransportError> {
        let page: IndexPage = self.get_json(&self.index_url(limit)).await?;
        Ok(page.results)
    }

    async fn fetch_pokemon(&self, url: &str) -> Result<PokemonResource, TransportError> {
        self.get_json(url).await
    }

    async fn fetch_species(&self, url: &str) -> Result<SpeciesResource, TransportError> {
        self.get_json(url).await
    }

    async fn fetch_evolution_chain(
        &self,
        url: &str,
    ) -> Result<EvolutionChainResource, TransportError> {
        self.get_json(url).await
    }

    async fn fetch_encounters(&self, url: &str) -> Result<Vec<EncounterResource>, TransportError> {
        self.get_json(url).await
    }
}

fn convert_reqwest_error(error: &reqwest::Error, url: &str) -> TransportError {
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }
    if error.is_decode() {
        return TransportError::Decode {
            url: url.to_owned(),
            message: error.to_string(),
        };
    }
    TransportError::Network {
        url: url.to_owned(),
        message: error.to_string(),
        timed_out: error.is_timeout(),
    }
}
