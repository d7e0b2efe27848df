//! Display labels for stats and creature types.

/// Upper bound used when scaling a base stat into a bar.
pub const MAX_BASE_STAT: u32 = 255;

const STAT_LABELS: &[(&str, &str)] = &[
    ("hp", "HP"),
    ("attack", "Attack"),
    ("defense", "Defense"),
    ("special-attack", "Sp. Atk"),
    ("special-defense", "Sp. Def"),
    ("speed", "Speed"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMeta {
    pub key: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
}

const TYPE_META: &[TypeMeta] = &[
    TypeMeta { key: "normal", label: "Normal", emoji: "⚪" },
    TypeMeta { key: "fire", label: "Fire", emoji: "🔥" },
    TypeMeta { key: "water", label: "Water", emoji: "💧" },
    TypeMeta { key: "electric", label: "Electric", emoji: "⚡" },
    TypeMeta { key: "grass", label: "Grass", emoji: "🌿" },
    TypeMeta { key: "ice", label: "Ice", emoji: "❄️" },
    TypeMeta { key: "fighting", label: "Fighting", emoji: "🥊" },
    TypeMeta { key: "poison", label: "Poison", emoji: "☠️" },
    TypeMeta { key: "ground", label: "Ground", emoji: "🟤" },
    TypeMeta { key: "flying", label: "Flying", emoji: "🕊️" },
    TypeMeta { key: "psychic", label: "Psychic", emoji: "🔮" },
    TypeMeta { key: "bug", label: "Bug", emoji: "🐞" },
    TypeMeta { key: "rock", label: "Rock", emoji: "🪨" },
    TypeMeta { key: "ghost", label: "Ghost", emoji: "👻" },
    TypeMeta { key: "dragon", label: "Dragon", emoji: "🐉" },
    TypeMeta { key: "dark", label: "Dark", emoji: "🌑" },
    TypeMeta { key: "steel", label: "Steel", emoji: "🔩" },
    TypeMeta { key: "fairy", label: "Fairy", emoji: "🧚" },
];

pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn stat_label(name: &str) -> String {
    STAT_LABELS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| capitalize(name))
}

pub fn type_meta(name: &str) -> Option<&'static TypeMeta> {
    TYPE_META.iter().find(|meta| meta.key == name)
}

/// Badge text for a type, e.g. `🔥 Fire`; unknown types fall back to the capitalized name.
pub fn type_badge(name: &str) -> String {
    match type_meta(name) {
        Some(meta) => format!("{} {}", meta.emoji, meta.label),
        None => capitalize(name),
    }
}

/// Fraction of [`MAX_BASE_STAT`], capped at 1.0.
pub fn stat_fraction(value: u32) -> f32 {
    (value as f32 / MAX_BASE_STAT as f32).min(1.0)
}
