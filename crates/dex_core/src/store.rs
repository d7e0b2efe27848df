use std::sync::Arc;

use shared::{
    error::DexError,
    protocol::{RawEntity, RawEvolutionChain, RawSpecies},
};

use crate::{
    cache::{normalize_key, ResponseCache},
    gateway::DexGateway,
};

/// Gateway fronted by one cache per record kind.
pub struct DexStore {
    gateway: Arc<dyn DexGateway>,
    entities: ResponseCache<RawEntity>,
    species: ResponseCache<RawSpecies>,
    chains: ResponseCache<RawEvolutionChain>,
}

impl DexStore {
    pub fn new(gateway: Arc<dyn DexGateway>, capacity: Option<usize>) -> Self {
        Self {
            gateway,
            entities: ResponseCache::new("entity", capacity),
            species: ResponseCache::new("species", capacity),
            chains: ResponseCache::new("evolution-chain", capacity),
        }
    }

    /// Looks an entity up by name or numeric id.
    ///
    /// A fetched entity is also cached under its canonical name and id, so a later
    /// lookup through the other alias is served without a request.
    pub async fn entity(&self, key: &str) -> Result<Arc<RawEntity>, DexError> {
        let key = normalize_key(key);
        let gateway = Arc::clone(&self.gateway);
        let entity = self
            .entities
            .get_or_fetch(&key, |key| async move { gateway.fetch_entity(&key).await })
            .await?;

        let id = entity.id.to_string();
        self.entities
            .insert_aliases(&[entity.name.as_str(), id.as_str()], &entity)
            .await;
        Ok(entity)
    }

    pub async fn species(&self, url: &str) -> Result<Arc<RawSpecies>, DexError> {
        let gateway = Arc::clone(&self.gateway);
        self.species
            .get_or_fetch(url, |url| async move { gateway.fetch_species(&url).await })
            .await
    }

    pub async fn evolution_chain(&self, url: &str) -> Result<Arc<RawEvolutionChain>, DexError> {
        let gateway = Arc::clone(&self.gateway);
        self.chains
            .get_or_fetch(url, |url| async move {
                gateway.fetch_evolution_chain(&url).await
            })
            .await
    }

    /// Uncached: the index is loaded once per session by the controller.
    pub async fn name_index(&self, limit: u32) -> Result<Vec<String>, DexError> {
        self.gateway.fetch_name_index(limit).await
    }

    pub async fn cached_entities(&self) -> usize {
        self.entities.len().await
    }
}
