//! In-memory gateway used by the unit tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    error::DexError,
    protocol::{
        NamedResource, RawArtwork, RawChainLink, RawEntity, RawEvolutionChain, RawOtherSprites,
        RawSpecies, RawSprites, RawStat, RawTypeSlot, UrlResource,
    },
};

use crate::gateway::DexGateway;

pub const SPECIES_BASE: &str = "https://fixture.test/pokemon-species";
pub const CHAIN_BASE: &str = "https://fixture.test/evolution-chain";

pub fn species_url(id: u32) -> String {
    format!("{SPECIES_BASE}/{id}/")
}

pub fn chain_url(id: u32) -> String {
    format!("{CHAIN_BASE}/{id}/")
}

pub fn named(name: &str) -> NamedResource {
    NamedResource {
        name: name.to_string(),
        url: String::new(),
    }
}

pub fn entity(id: u32, name: &str, types: &[&str]) -> RawEntity {
    RawEntity {
        id,
        name: name.to_string(),
        height: 4,
        weight: 60,
        types: types
            .iter()
            .enumerate()
            .map(|(slot, kind)| RawTypeSlot {
                slot: slot as u8 + 1,
                kind: named(kind),
            })
            .collect(),
        stats: vec![
            RawStat {
                base_stat: 20 + id,
                effort: 0,
                stat: named("hp"),
            },
            RawStat {
                base_stat: 55,
                effort: 2,
                stat: named("speed"),
            },
        ],
        abilities: Vec::new(),
        moves: Vec::new(),
        sprites: RawSprites {
            front_default: Some(format!("https://img.test/{id}.png")),
            other: Some(RawOtherSprites {
                official_artwork: Some(RawArtwork {
                    front_default: Some(format!("https://art.test/{id}.png")),
                }),
            }),
        },
        species: Some(NamedResource {
            name: name.to_string(),
            url: species_url(id),
        }),
    }
}

pub fn species(name: &str, chain: Option<String>) -> RawSpecies {
    RawSpecies {
        name: name.to_string(),
        evolution_chain: chain.map(|url| UrlResource { url }),
    }
}

pub fn link(name: &str, children: Vec<RawChainLink>) -> RawChainLink {
    RawChainLink {
        species: named(name),
        evolves_to: children,
    }
}

pub fn chain(id: u32, root: RawChainLink) -> RawEvolutionChain {
    RawEvolutionChain { id, chain: root }
}

#[derive(Default)]
pub struct FixtureGateway {
    entities: HashMap<String, RawEntity>,
    species: HashMap<String, RawSpecies>,
    chains: HashMap<String, RawEvolutionChain>,
    names: Option<Vec<String>>,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FixtureGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, raw: RawEntity) -> Self {
        self.entities.insert(raw.id.to_string(), raw.clone());
        self.entities.insert(raw.name.clone(), raw);
        self
    }

    /// Adds `mon-{id}` entities with no species link for every id in the range.
    pub fn with_range(mut self, lo: u32, hi: u32) -> Self {
        for id in lo..=hi {
            let mut raw = entity(id, &format!("mon-{id}"), &["normal"]);
            raw.species = None;
            self = self.with_entity(raw);
        }
        self
    }

    pub fn with_species(mut self, url: String, raw: RawSpecies) -> Self {
        self.species.insert(url, raw);
        self
    }

    pub fn with_chain(mut self, url: String, raw: RawEvolutionChain) -> Self {
        self.chains.insert(url, raw);
        self
    }

    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names = Some(names.iter().map(|name| name.to_string()).collect());
        self
    }

    pub fn with_delay(mut self, key: &str, millis: u64) -> Self {
        self.delays
            .insert(key.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    async fn record(&self, call: String, key: &str) -> Result<(), DexError> {
        self.calls.lock().expect("calls lock").push(call.clone());
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(key) {
            return Err(DexError::network(call, "fixture failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl DexGateway for FixtureGateway {
    async fn fetch_entity(&self, key: &str) -> Result<RawEntity, DexError> {
        self.record(format!("entity:{key}"), key).await?;
        self.entities
            .get(key)
            .cloned()
            .ok_or_else(|| DexError::not_found(format!("pokemon/{key}"), 404))
    }

    async fn fetch_species(&self, url: &str) -> Result<RawSpecies, DexError> {
        self.record(format!("species:{url}"), url).await?;
        self.species
            .get(url)
            .cloned()
            .ok_or_else(|| DexError::not_found("pokemon-species", 404))
    }

    async fn fetch_evolution_chain(&self, url: &str) -> Result<RawEvolutionChain, DexError> {
        self.record(format!("chain:{url}"), url).await?;
        self.chains
            .get(url)
            .cloned()
            .ok_or_else(|| DexError::not_found("evolution-chain", 404))
    }

    async fn fetch_name_index(&self, _limit: u32) -> Result<Vec<String>, DexError> {
        self.record("index".to_string(), "index").await?;
        self.names
            .clone()
            .ok_or_else(|| DexError::network("pokemon index", "fixture has no index"))
    }
}

/// Pikachu (no chain), the bulbasaur line, and eevee branching into two stages.
pub fn sample_gateway() -> FixtureGateway {
    FixtureGateway::new()
        .with_entity(entity(25, "pikachu", &["electric"]))
        .with_species(species_url(25), species("pikachu", None))
        .with_entity(entity(1, "bulbasaur", &["grass", "poison"]))
        .with_entity(entity(2, "ivysaur", &["grass", "poison"]))
        .with_entity(entity(3, "venusaur", &["grass", "poison"]))
        .with_species(species_url(1), species("bulbasaur", Some(chain_url(1))))
        .with_species(species_url(2), species("ivysaur", Some(chain_url(1))))
        .with_species(species_url(3), species("venusaur", Some(chain_url(1))))
        .with_chain(
            chain_url(1),
            chain(
                1,
                link(
                    "bulbasaur",
                    vec![link("ivysaur", vec![link("venusaur", Vec::new())])],
                ),
            ),
        )
        .with_entity(entity(133, "eevee", &["normal"]))
        .with_entity(entity(134, "vaporeon", &["water"]))
        .with_species(species_url(133), species("eevee", Some(chain_url(67))))
        .with_chain(
            chain_url(67),
            chain(
                67,
                link(
                    "eevee",
                    vec![
                        link("vaporeon", Vec::new()),
                        link("jolteon", Vec::new()),
                    ],
                ),
            ),
        )
}
