use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    error::DexError,
    protocol::{RawEntity, RawEvolutionChain, RawNameIndex, RawSpecies},
};
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";
const USER_AGENT: &str = concat!("pokedex/", env!("CARGO_PKG_VERSION"));

/// Read-only access to the external resource families.
///
/// Implementations perform exactly one request per call and never cache.
#[async_trait]
pub trait DexGateway: Send + Sync {
    async fn fetch_entity(&self, key: &str) -> Result<RawEntity, DexError>;
    async fn fetch_species(&self, url: &str) -> Result<RawSpecies, DexError>;
    async fn fetch_evolution_chain(&self, url: &str) -> Result<RawEvolutionChain, DexError>;
    async fn fetch_name_index(&self, limit: u32) -> Result<Vec<String>, DexError>;
}

pub struct HttpGateway {
    http: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build http client")?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> anyhow::Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url =
            Url::parse(trimmed).with_context(|| format!("invalid api base url: {trimmed}"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("api base url must be hierarchical: {trimmed}"));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resource_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn entity_url(&self, key: &str) -> Url {
        self.resource_url(&["pokemon", key])
    }

    pub fn name_index_url(&self, limit: u32) -> Url {
        let mut url = self.resource_url(&["pokemon"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, url: Url) -> Result<T, DexError> {
        debug!("gateway: GET {url}");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| DexError::network(resource, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DexError::not_found(resource, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| DexError::network(resource, err.to_string()))?;
        serde_json::from_slice(&body).map_err(|err| DexError::malformed(resource, err.to_string()))
    }
}

fn parse_linked_url(resource: &str, raw: &str) -> Result<Url, DexError> {
    Url::parse(raw).map_err(|err| DexError::malformed(resource, format!("bad url {raw}: {err}")))
}

#[async_trait]
impl DexGateway for HttpGateway {
    async fn fetch_entity(&self, key: &str) -> Result<RawEntity, DexError> {
        let resource = format!("pokemon/{key}");
        self.get_json(&resource, self.entity_url(key)).await
    }

    async fn fetch_species(&self, url: &str) -> Result<RawSpecies, DexError> {
        let url = parse_linked_url("pokemon-species", url)?;
        self.get_json("pokemon-species", url).await
    }

    async fn fetch_evolution_chain(&self, url: &str) -> Result<RawEvolutionChain, DexError> {
        let url = parse_linked_url("evolution-chain", url)?;
        self.get_json("evolution-chain", url).await
    }

    async fn fetch_name_index(&self, limit: u32) -> Result<Vec<String>, DexError> {
        let index: RawNameIndex = self
            .get_json("pokemon index", self.name_index_url(limit))
            .await?;
        Ok(index
            .results
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
