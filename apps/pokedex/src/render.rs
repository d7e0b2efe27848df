//! Plain-text projection of the controller state.

use std::fmt::Write as _;

use dex_core::ApplicationState;
use shared::{
    domain::{BrowseSummary, NormalizedEntity, ViewMode},
    labels::{capitalize, stat_fraction, type_badge},
    region::RegionCatalog,
};

const STAT_BAR_WIDTH: usize = 20;
const MOVE_PREVIEW: usize = 8;

pub fn render(state: &ApplicationState, regions: &RegionCatalog) -> String {
    let mut out = String::new();

    match state.mode {
        ViewMode::Idle => render_idle(&mut out, state),
        ViewMode::Entry => {
            if let Some(entity) = &state.current {
                render_entity(&mut out, entity);
            }
        }
        ViewMode::Browse => render_browse(&mut out, state, regions),
    }

    if let Some(error) = &state.last_error {
        let _ = writeln!(out, "! {error}");
    }
    out
}

fn render_idle(out: &mut String, state: &ApplicationState) {
    if state.entity_loading {
        let _ = writeln!(out, "Loading…");
        return;
    }
    let _ = writeln!(out, "No Pokémon selected");
    let _ = writeln!(
        out,
        "Search by name or ID, pick a random one, or browse a region."
    );
}

fn display_name(name: &str) -> String {
    name.split('-').map(capitalize).collect::<Vec<_>>().join(" ")
}

fn badges(types: &[String]) -> String {
    types
        .iter()
        .map(|kind| type_badge(kind))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn stat_bar(value: u32) -> String {
    let filled = (stat_fraction(value) * STAT_BAR_WIDTH as f32).round() as usize;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(STAT_BAR_WIDTH.saturating_sub(filled))
    )
}

fn render_entity(out: &mut String, entity: &NormalizedEntity) {
    let _ = writeln!(out, "#{:03} {}", entity.id.0, display_name(&entity.name));
    if !entity.types.is_empty() {
        let _ = writeln!(out, "{}", badges(&entity.types));
    }
    let _ = writeln!(
        out,
        "Height {:.1} m · Weight {:.1} kg",
        entity.height as f32 / 10.0,
        entity.weight as f32 / 10.0
    );
    if let Some(image) = &entity.image {
        let _ = writeln!(out, "Image {image}");
    }

    if !entity.stats.is_empty() {
        let _ = writeln!(out, "\nBase stats");
        for stat in &entity.stats {
            let _ = writeln!(
                out,
                "  {:<8} {} {:>3}",
                stat.label,
                stat_bar(stat.value),
                stat.value
            );
        }
    }

    if !entity.abilities.is_empty() {
        let abilities = entity
            .abilities
            .iter()
            .map(|ability| {
                let name = display_name(&ability.name);
                if ability.is_hidden {
                    format!("{name} (hidden)")
                } else {
                    name
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "\nAbilities  {abilities}");
    }

    if !entity.evolutions.is_empty() {
        let line = entity
            .evolutions
            .iter()
            .map(|stage| display_name(&stage.name))
            .collect::<Vec<_>>()
            .join(" → ");
        let _ = writeln!(out, "Evolutions {line}");
    }

    if !entity.moves.is_empty() {
        let shown = entity
            .moves
            .iter()
            .take(MOVE_PREVIEW)
            .map(|name| display_name(name))
            .collect::<Vec<_>>()
            .join(", ");
        let more = entity.moves.len().saturating_sub(MOVE_PREVIEW);
        if more > 0 {
            let _ = writeln!(out, "Moves      {shown} (+{more} more)");
        } else {
            let _ = writeln!(out, "Moves      {shown}");
        }
    }
}

fn render_summary(out: &mut String, summary: &BrowseSummary) {
    let _ = write!(
        out,
        "  #{:03} {:<14} HP {:>3}  {}",
        summary.id.0,
        display_name(&summary.name),
        summary.hp,
        badges(&summary.types)
    );
    if let Some(preview) = &summary.evolution_preview {
        if !preview.is_empty() {
            let _ = write!(out, "  [{}]", preview.join(" → "));
        }
    }
    out.push('\n');
}

fn render_browse(out: &mut String, state: &ApplicationState, regions: &RegionCatalog) {
    let label = regions
        .get(&state.region)
        .map(|region| region.label.clone())
        .unwrap_or_else(|| state.region.clone());
    let _ = writeln!(
        out,
        "{label}: showing {} of {}",
        state.browse.summaries.len(),
        state.browse.keys.len()
    );
    for summary in &state.browse.summaries {
        render_summary(out, summary);
    }
    if state.region_loading {
        let _ = writeln!(out, "Loading more…");
    } else if state.browse.has_more() {
        let _ = writeln!(out, "(more available)");
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
