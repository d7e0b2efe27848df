use std::sync::Arc;

use shared::{
    domain::EvolutionNode,
    error::DexError,
    protocol::{RawChainLink, RawEvolutionChain},
};
use tracing::warn;

use crate::store::DexStore;

/// Resolves the evolution line of a species as a flat, pre-order list of names.
///
/// Branches are linearized: a root `A` evolving into `[B, C]` yields `[A, B, C]`.
/// Lookup failures degrade to an empty list.
pub async fn resolve_evolutions(store: &DexStore, species_url: &str) -> Vec<String> {
    match resolve_evolution_tree(store, species_url).await {
        Some(tree) => flatten_tree(&tree),
        None => Vec::new(),
    }
}

/// Same lookup as [`resolve_evolutions`] but keeps the branch structure.
pub async fn resolve_evolution_tree(store: &DexStore, species_url: &str) -> Option<EvolutionNode> {
    match fetch_chain(store, species_url).await {
        Ok(Some(chain)) => Some(tree_from_link(&chain.chain)),
        Ok(None) => None,
        Err(err) => {
            warn!("evolution: lookup suppressed species_url={species_url} err={err}");
            None
        }
    }
}

async fn fetch_chain(
    store: &DexStore,
    species_url: &str,
) -> Result<Option<Arc<RawEvolutionChain>>, DexError> {
    let species = store
        .species(species_url)
        .await
        .map_err(|err| DexError::EnrichmentFailure(err.to_string()))?;
    let Some(chain_ref) = species.evolution_chain.as_ref() else {
        return Ok(None);
    };
    let chain = store
        .evolution_chain(&chain_ref.url)
        .await
        .map_err(|err| DexError::EnrichmentFailure(err.to_string()))?;
    Ok(Some(chain))
}

pub fn tree_from_link(link: &RawChainLink) -> EvolutionNode {
    EvolutionNode {
        name: link.species.name.clone(),
        children: link.evolves_to.iter().map(tree_from_link).collect(),
    }
}

pub fn flatten_tree(node: &EvolutionNode) -> Vec<String> {
    let mut names = Vec::new();
    push_preorder(node, &mut names);
    names
}

fn push_preorder(node: &EvolutionNode, names: &mut Vec<String>) {
    names.push(node.name.clone());
    for child in &node.children {
        push_preorder(child, names);
    }
}

#[cfg(test)]
#[path = "tests/evolution_tests.rs"]
mod tests;
