use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);
    };
}

id_newtype!(EntityId);

impl EntityId {
    /// Smallest identifier the service hands out.
    pub const MIN: EntityId = EntityId(1);

    /// Moves `delta` steps away, never going below [`EntityId::MIN`].
    pub fn offset(self, delta: i64) -> EntityId {
        let target = i64::from(self.0).saturating_add(delta).max(i64::from(Self::MIN.0));
        EntityId(u32::try_from(target).unwrap_or(u32::MAX))
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    pub name: String,
    pub label: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityEntry {
    pub name: String,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Branch-preserving view of an evolution chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub name: String,
    pub children: Vec<EvolutionNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntity {
    pub id: EntityId,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<StatValue>,
    pub abilities: Vec<AbilityEntry>,
    pub moves: Vec<String>,
    pub height: u32,
    pub weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub evolutions: Vec<EvolutionStage>,
}

impl NormalizedEntity {
    pub fn stat(&self, name: &str) -> Option<u32> {
        self.stats
            .iter()
            .find(|stat| stat.name == name)
            .map(|stat| stat.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseSummary {
    pub id: EntityId,
    pub name: String,
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub hp: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolution_preview: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Idle,
    Entry,
    Browse,
}
