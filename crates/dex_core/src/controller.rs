//! View-state controller: the single writer of [`ApplicationState`].
//!
//! Every transition runs under one lock that is never held across a network
//! call, so entry points interleave only while fetching. Each fetch captures the
//! generation of its mode when it starts and commits only if that generation is
//! still current when it finishes; superseded results are dropped.

use std::sync::Arc;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{NormalizedEntity, ViewMode},
    region::{RegionCatalog, RegionDefinition, ALL_REGIONS, MAX_KNOWN_ID},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    gateway::DexGateway,
    normalize::load_normalized,
    paginator::{fetch_page, BrowseState},
    store::DexStore,
    ControllerConfig,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationState {
    pub mode: ViewMode,
    pub current: Option<NormalizedEntity>,
    pub region: String,
    pub browse: BrowseState,
    pub entity_loading: bool,
    pub region_loading: bool,
    pub last_error: Option<String>,
    pub known_names: usize,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self {
            mode: ViewMode::Idle,
            current: None,
            region: ALL_REGIONS.to_string(),
            browse: BrowseState::default(),
            entity_loading: false,
            region_loading: false,
            last_error: None,
            known_names: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    StateChanged(Box<ApplicationState>),
    Error(String),
}

struct ControllerInner {
    state: ApplicationState,
    name_index: Vec<String>,
    entity_generation: u64,
    browse_generation: u64,
    rng: StdRng,
}

impl ControllerInner {
    fn leave_browse(&mut self) {
        self.browse_generation += 1;
        self.state.browse.clear_progress();
        self.state.region_loading = false;
    }

    fn set_mode(&mut self, mode: ViewMode) {
        if self.state.mode == ViewMode::Browse && mode != ViewMode::Browse {
            self.leave_browse();
        }
        if mode != ViewMode::Entry {
            self.state.current = None;
        }
        self.state.mode = mode;
    }
}

pub struct DexController {
    store: DexStore,
    regions: RegionCatalog,
    config: ControllerConfig,
    inner: Mutex<ControllerInner>,
    events: broadcast::Sender<ControllerEvent>,
}

impl DexController {
    pub fn new(gateway: Arc<dyn DexGateway>, config: ControllerConfig) -> Arc<Self> {
        Self::with_rng(gateway, config, StdRng::from_entropy())
    }

    pub fn with_rng(
        gateway: Arc<dyn DexGateway>,
        config: ControllerConfig,
        rng: StdRng,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            store: DexStore::new(gateway, config.cache_capacity),
            regions: RegionCatalog::standard(),
            config,
            inner: Mutex::new(ControllerInner {
                state: ApplicationState::default(),
                name_index: Vec::new(),
                entity_generation: 0,
                browse_generation: 0,
                rng,
            }),
            events,
        })
    }

    pub fn regions(&self) -> &RegionCatalog {
        &self.regions
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ApplicationState {
        self.inner.lock().await.state.clone()
    }

    fn publish(&self, state: &ApplicationState) {
        let _ = self
            .events
            .send(ControllerEvent::StateChanged(Box::new(state.clone())));
    }

    fn record_error(&self, state: &mut ApplicationState, message: String) {
        state.last_error = Some(message.clone());
        let _ = self.events.send(ControllerEvent::Error(message));
    }

    fn region(&self, key: &str) -> Option<RegionDefinition> {
        self.regions.get(key).cloned()
    }

    async fn reject_unknown_region(&self, region_key: &str) {
        warn!("controller: unknown region key={region_key}");
        let mut guard = self.inner.lock().await;
        self.record_error(
            &mut guard.state,
            format!("Unknown region \"{}\".", region_key.trim()),
        );
        self.publish(&guard.state);
    }

    /// Loads the name index used for random picks and suggestions.
    ///
    /// Best-effort: on failure the index stays empty.
    pub async fn load_name_index(&self) {
        match self.store.name_index(self.config.name_index_limit).await {
            Ok(names) => {
                info!("controller: name index loaded count={}", names.len());
                let mut guard = self.inner.lock().await;
                guard.state.known_names = names.len();
                guard.name_index = names;
                self.publish(&guard.state);
            }
            Err(err) => warn!("controller: name index unavailable err={err}"),
        }
    }

    /// Names from the index starting with `prefix`, in index order.
    pub async fn suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        let guard = self.inner.lock().await;
        guard
            .name_index
            .iter()
            .filter(|name| name.starts_with(&prefix))
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn search(&self, query: &str) {
        let key = query.trim().to_lowercase();
        if key.is_empty() {
            debug!("controller: ignoring blank search");
            return;
        }

        let generation = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            inner.entity_generation += 1;
            inner.state.entity_loading = true;
            inner.state.current = None;
            if inner.state.mode == ViewMode::Entry {
                inner.state.mode = ViewMode::Idle;
            }
            self.publish(&inner.state);
            inner.entity_generation
        };

        info!("controller: search query={key}");
        let result = load_normalized(&self.store, &key).await;

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        if inner.entity_generation != generation {
            debug!("controller: discarding stale search query={key}");
            return;
        }

        inner.state.entity_loading = false;
        match result {
            Ok(entity) => {
                inner.set_mode(ViewMode::Entry);
                inner.state.current = Some(entity);
                inner.state.last_error = None;
            }
            Err(err) => {
                warn!("controller: search failed query={key} err={err}");
                inner.set_mode(ViewMode::Idle);
                self.record_error(&mut inner.state, err.user_message());
            }
        }
        self.publish(&inner.state);
    }

    /// Searches a random entity, drawn from the selected region, else from the
    /// name index, else from every known id.
    pub async fn pick_random(&self) {
        let key = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            let region = (!inner.state.region.eq_ignore_ascii_case(ALL_REGIONS))
                .then(|| self.region(&inner.state.region))
                .flatten();

            if let Some(region) = region {
                inner.state.browse.ensure_keys(&region);
                inner.state.browse.keys.choose(&mut inner.rng).cloned()
            } else if let Some(name) = inner.name_index.choose(&mut inner.rng) {
                Some(name.clone())
            } else {
                Some(inner.rng.gen_range(1..=MAX_KNOWN_ID).to_string())
            }
        };

        match key {
            Some(key) => self.search(&key).await,
            None => debug!("controller: random pick found no candidates"),
        }
    }

    /// Steps the current entry by `delta` ids, never below id 1.
    pub async fn browse_relative(&self, delta: i64) {
        let target = {
            let guard = self.inner.lock().await;
            match (&guard.state.mode, &guard.state.current) {
                (ViewMode::Entry, Some(current)) => Some(current.id.offset(delta)),
                _ => None,
            }
        };

        match target {
            Some(id) => self.search(&id.to_string()).await,
            None => debug!("controller: relative browse ignored outside entry mode"),
        }
    }

    pub async fn enter_browse(&self, region_key: &str) {
        let Some(region) = self.region(region_key) else {
            self.reject_unknown_region(region_key).await;
            return;
        };

        {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            inner.entity_generation += 1;
            inner.state.entity_loading = false;
            inner.leave_browse();
            inner.set_mode(ViewMode::Browse);
            inner.state.region = region.key.clone();
            inner.state.browse.ensure_keys(&region);
            inner.state.last_error = None;
            self.publish(&inner.state);
        }

        info!("controller: browsing region={}", region.key);
        self.fetch_next_page().await;
    }

    pub async fn load_more_browse(&self) {
        self.fetch_next_page().await;
    }

    pub async fn change_region(&self, region_key: &str) {
        let Some(region) = self.region(region_key) else {
            self.reject_unknown_region(region_key).await;
            return;
        };

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        inner.browse_generation += 1;
        inner.state.region = region.key;
        inner.state.browse = BrowseState::default();
        inner.state.region_loading = false;
        self.publish(&inner.state);
    }

    pub async fn clear(&self) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        inner.entity_generation += 1;
        inner.browse_generation += 1;
        inner.state.mode = ViewMode::Idle;
        inner.state.current = None;
        inner.state.browse = BrowseState::default();
        inner.state.entity_loading = false;
        inner.state.region_loading = false;
        inner.state.last_error = None;
        self.publish(&inner.state);
    }

    async fn fetch_next_page(&self) {
        let (generation, keys, cursor) = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            let state = &mut inner.state;
            if state.mode != ViewMode::Browse || state.region_loading || !state.browse.has_more()
            {
                debug!(
                    "controller: page fetch skipped mode={:?} loading={} more={}",
                    state.mode,
                    state.region_loading,
                    state.browse.has_more()
                );
                return;
            }
            state.region_loading = true;
            self.publish(state);
            (
                inner.browse_generation,
                state.browse.keys.clone(),
                state.browse.cursor,
            )
        };

        let result = fetch_page(
            &self.store,
            &keys,
            cursor,
            self.config.page_size,
            self.config.browse_preview,
        )
        .await;

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        if inner.browse_generation != generation {
            debug!("controller: discarding stale page cursor={cursor}");
            return;
        }

        inner.state.region_loading = false;
        match result {
            Ok(page) => {
                debug!(
                    "controller: page loaded cursor={cursor} count={}",
                    page.summaries.len()
                );
                inner.state.browse.append_page(page);
            }
            Err(err) => {
                warn!("controller: page failed cursor={cursor} err={err}");
                self.record_error(
                    &mut inner.state,
                    format!("Could not load more Pokémon. {}", err.user_message()),
                );
            }
        }
        self.publish(&inner.state);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
