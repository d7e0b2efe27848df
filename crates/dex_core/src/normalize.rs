use futures::future::join_all;
use shared::{
    domain::{AbilityEntry, BrowseSummary, EntityId, EvolutionStage, NormalizedEntity, StatValue},
    error::DexError,
    labels::stat_label,
    protocol::RawEntity,
};
use tracing::{debug, warn};

use crate::{evolution::resolve_evolutions, store::DexStore};

/// Number of evolution names kept in a browse preview.
pub const EVOLUTION_PREVIEW_LEN: usize = 3;

/// Official artwork first, then the default sprite.
pub fn entity_image(raw: &RawEntity) -> Option<String> {
    raw.sprites
        .official_artwork()
        .or(raw.sprites.front_default.as_deref())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

fn type_names(raw: &RawEntity) -> Vec<String> {
    raw.types.iter().map(|slot| slot.kind.name.clone()).collect()
}

/// Maps a raw entity into the view model. Evolutions are left empty.
pub fn normalize(raw: &RawEntity) -> NormalizedEntity {
    NormalizedEntity {
        id: EntityId(raw.id),
        name: raw.name.to_lowercase(),
        types: type_names(raw),
        stats: raw
            .stats
            .iter()
            .map(|stat| StatValue {
                name: stat.stat.name.clone(),
                label: stat_label(&stat.stat.name),
                value: stat.base_stat,
            })
            .collect(),
        abilities: raw
            .abilities
            .iter()
            .map(|slot| AbilityEntry {
                name: slot.ability.name.clone(),
                is_hidden: slot.is_hidden,
            })
            .collect(),
        moves: raw
            .moves
            .iter()
            .map(|slot| slot.move_ref.name.clone())
            .collect(),
        height: raw.height,
        weight: raw.weight,
        image: entity_image(raw),
        evolutions: Vec::new(),
    }
}

pub fn summarize(raw: &RawEntity) -> BrowseSummary {
    BrowseSummary {
        id: EntityId(raw.id),
        name: raw.name.to_lowercase(),
        types: type_names(raw),
        image: entity_image(raw),
        hp: raw
            .stats
            .iter()
            .find(|stat| stat.stat.name == "hp")
            .map(|stat| stat.base_stat)
            .unwrap_or(0),
        evolution_preview: None,
    }
}

/// Looks up every stage concurrently for its image; a failed lookup keeps the
/// stage with no image.
pub async fn attach_evolution_images(store: &DexStore, names: Vec<String>) -> Vec<EvolutionStage> {
    let lookups = names.into_iter().map(|name| async move {
        let image = match store.entity(&name).await {
            Ok(raw) => entity_image(&raw),
            Err(err) => {
                warn!("normalize: stage image suppressed stage={name} err={err}");
                None
            }
        };
        EvolutionStage { name, image }
    });
    join_all(lookups).await
}

pub async fn evolution_names(store: &DexStore, raw: &RawEntity) -> Vec<String> {
    match raw.species.as_ref() {
        Some(species) if !species.url.is_empty() => resolve_evolutions(store, &species.url).await,
        _ => Vec::new(),
    }
}

/// Fetches `key` and builds the complete render-ready entity.
///
/// Only the primary fetch can fail; evolution data is best-effort.
pub async fn load_normalized(store: &DexStore, key: &str) -> Result<NormalizedEntity, DexError> {
    let raw = store.entity(key).await?;
    let mut entity = normalize(&raw);

    let names = evolution_names(store, &raw).await;
    entity.evolutions = attach_evolution_images(store, names).await;
    debug!(
        "normalize: loaded id={} name={} stages={}",
        entity.id,
        entity.name,
        entity.evolutions.len()
    );
    Ok(entity)
}

/// Browse card for `key`, optionally with a truncated evolution preview.
pub async fn load_summary(
    store: &DexStore,
    key: &str,
    with_preview: bool,
) -> Result<BrowseSummary, DexError> {
    let raw = store.entity(key).await?;
    let mut summary = summarize(&raw);
    if with_preview {
        let mut names = evolution_names(store, &raw).await;
        names.truncate(EVOLUTION_PREVIEW_LEN);
        summary.evolution_preview = Some(names);
    }
    Ok(summary)
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
