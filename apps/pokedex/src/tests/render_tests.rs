use shared::domain::{AbilityEntry, EntityId, EvolutionStage, StatValue};

use super::*;

fn pikachu() -> NormalizedEntity {
    NormalizedEntity {
        id: EntityId(25),
        name: "pikachu".to_string(),
        types: vec!["electric".to_string()],
        stats: vec![StatValue {
            name: "hp".to_string(),
            label: "HP".to_string(),
            value: 35,
        }],
        abilities: vec![
            AbilityEntry {
                name: "static".to_string(),
                is_hidden: false,
            },
            AbilityEntry {
                name: "lightning-rod".to_string(),
                is_hidden: true,
            },
        ],
        moves: (0..10).map(|i| format!("move-{i}")).collect(),
        height: 4,
        weight: 60,
        image: None,
        evolutions: vec![
            EvolutionStage {
                name: "pichu".to_string(),
                image: None,
            },
            EvolutionStage {
                name: "pikachu".to_string(),
                image: None,
            },
        ],
    }
}

#[test]
fn idle_state_prompts_for_a_search() {
    let text = render(&ApplicationState::default(), &RegionCatalog::standard());
    assert!(text.contains("No Pokémon selected"));
}

#[test]
fn entry_state_lists_details() {
    let state = ApplicationState {
        mode: ViewMode::Entry,
        current: Some(pikachu()),
        ..ApplicationState::default()
    };

    let text = render(&state, &RegionCatalog::standard());

    assert!(text.starts_with("#025 Pikachu\n"));
    assert!(text.contains("⚡ Electric"));
    assert!(text.contains("Height 0.4 m · Weight 6.0 kg"));
    assert!(text.contains("Lightning Rod (hidden)"));
    assert!(text.contains("Evolutions Pichu → Pikachu"));
    assert!(text.contains("(+2 more)"));
}

#[test]
fn stat_bar_scales_to_max_base_stat() {
    assert_eq!(stat_bar(0), "░".repeat(20));
    assert_eq!(stat_bar(255), "█".repeat(20));
    assert_eq!(stat_bar(300), "█".repeat(20));
}

#[test]
fn browse_state_shows_progress_and_error() {
    let mut state = ApplicationState {
        mode: ViewMode::Browse,
        region: "kanto".to_string(),
        last_error: Some("Could not load more Pokémon.".to_string()),
        ..ApplicationState::default()
    };
    state.browse.keys = (1..=151).map(|id| id.to_string()).collect();
    state.browse.summaries.push(BrowseSummary {
        id: EntityId(1),
        name: "bulbasaur".to_string(),
        types: vec!["grass".to_string()],
        image: None,
        hp: 45,
        evolution_preview: Some(vec!["bulbasaur".to_string(), "ivysaur".to_string()]),
    });

    let text = render(&state, &RegionCatalog::standard());

    assert!(text.starts_with("Kanto (1–151): showing 1 of 151"));
    assert!(text.contains("#001 Bulbasaur"));
    assert!(text.contains("[bulbasaur → ivysaur]"));
    assert!(text.contains("(more available)"));
    assert!(text.contains("! Could not load more Pokémon."));
}
