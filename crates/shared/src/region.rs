use serde::{Deserialize, Serialize};

/// Region key that spans every known identifier.
pub const ALL_REGIONS: &str = "all";

/// Highest identifier covered by the region catalog.
pub const MAX_KNOWN_ID: u32 = 1010;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDefinition {
    pub key: String,
    pub label: String,
    pub lo: u32,
    pub hi: u32,
}

impl RegionDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, lo: u32, hi: u32) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            lo,
            hi,
        }
    }

    pub fn len(&self) -> usize {
        if self.hi < self.lo {
            0
        } else {
            (self.hi - self.lo) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: u32) -> bool {
        (self.lo..=self.hi).contains(&id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCatalog {
    regions: Vec<RegionDefinition>,
}

impl RegionCatalog {
    pub fn new(regions: Vec<RegionDefinition>) -> Self {
        Self { regions }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            RegionDefinition::new(ALL_REGIONS, "All regions", 1, MAX_KNOWN_ID),
            RegionDefinition::new("kanto", "Kanto (1–151)", 1, 151),
            RegionDefinition::new("johto", "Johto (152–251)", 152, 251),
            RegionDefinition::new("hoenn", "Hoenn (252–386)", 252, 386),
            RegionDefinition::new("sinnoh", "Sinnoh (387–493)", 387, 493),
            RegionDefinition::new("unova", "Unova (494–649)", 494, 649),
            RegionDefinition::new("kalos", "Kalos (650–721)", 650, 721),
            RegionDefinition::new("alola", "Alola (722–809)", 722, 809),
            RegionDefinition::new("galar", "Galar (810–898)", 810, 898),
            RegionDefinition::new("paldea", "Paldea (899–1010)", 899, MAX_KNOWN_ID),
        ])
    }

    pub fn get(&self, key: &str) -> Option<&RegionDefinition> {
        let key = key.trim();
        self.regions
            .iter()
            .find(|region| region.key.eq_ignore_ascii_case(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionDefinition> {
        self.regions.iter()
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
