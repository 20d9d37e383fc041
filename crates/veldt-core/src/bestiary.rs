//! Creature templates and the explicit template registry.
//!
//! The registry is built from a static table (or deserialized configuration)
//! mapping creature identifiers to stat blocks and AI/loot descriptors.
//! Resolving loot or running AI is out of scope here; the descriptors are
//! carried as data for the collaborators that do.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{BEAST_BAND, FLYER_BAND, VERMIN_BAND};

/// Broad creature category. Drives the vertical placement band so creatures
/// land on plausible terrain without per-scene terrain maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureClass {
    /// Small ground vermin — lowest band.
    Vermin,
    /// Larger ground beasts.
    Beast,
    /// Airborne creatures — upper band.
    Flyer,
}

impl CreatureClass {
    /// Vertical placement band as a fraction range of scene height.
    pub fn vertical_band(self) -> (f64, f64) {
        match self {
            Self::Vermin => VERMIN_BAND,
            Self::Beast => BEAST_BAND,
            Self::Flyer => FLYER_BAND,
        }
    }
}

/// Horizontal facing of a creature sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Combat stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureStats {
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub accuracy: u32,
}

/// AI descriptor consumed by the (external) behavior collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiProfile {
    pub behavior: String,
    pub attack_style: String,
}

/// One loot table entry: item id plus drop chance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_id: String,
    pub chance: f64,
}

/// Loot descriptor consumed by the (external) loot collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootProfile {
    pub table: String,
    pub items: Vec<LootEntry>,
}

/// A creature template. Many instances may share one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub id: String,
    pub name: String,
    pub class: CreatureClass,
    pub level: u32,
    /// Stats are optional; a template without them spawns with no hp pool.
    pub stats: Option<CreatureStats>,
    pub ai: AiProfile,
    pub loot: LootProfile,
    pub entrance_desc: Option<String>,
    pub short_desc: String,
}

/// Registry of creature templates, keyed by template id.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    by_id: HashMap<String, CreatureTemplate>,
}

impl TemplateRegistry {
    /// Registry holding the built-in bestiary.
    pub fn builtin() -> Self {
        Self::from_templates(builtin_templates())
    }

    /// Build a registry from an explicit template list. Later duplicates
    /// replace earlier ones.
    pub fn from_templates(templates: Vec<CreatureTemplate>) -> Self {
        let mut by_id = HashMap::new();
        for template in templates {
            by_id.insert(template.id.clone(), template);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&CreatureTemplate> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// The built-in bestiary.
pub fn builtin_templates() -> Vec<CreatureTemplate> {
    vec![
        CreatureTemplate {
            id: "slagrat".into(),
            name: "Slag Rat".into(),
            class: CreatureClass::Vermin,
            level: 1,
            stats: Some(CreatureStats {
                max_hp: 12,
                attack: 3,
                defense: 1,
                speed: 2,
                accuracy: 70,
            }),
            ai: AiProfile {
                behavior: "aggressive".into(),
                attack_style: "bite".into(),
            },
            loot: LootProfile {
                table: "measly".into(),
                items: vec![
                    LootEntry {
                        item_id: "contaminated_rat_meat".into(),
                        chance: 0.11,
                    },
                    LootEntry {
                        item_id: "slag_fur_scrap".into(),
                        chance: 0.20,
                    },
                ],
            },
            entrance_desc: Some(
                "A blistered, hairless rat scurries forward from a pile of slag.".into(),
            ),
            short_desc: "A blistered slag rat twitches nearby.".into(),
        },
        CreatureTemplate {
            id: "rust_hound".into(),
            name: "Rust Hound".into(),
            class: CreatureClass::Beast,
            level: 3,
            stats: Some(CreatureStats {
                max_hp: 34,
                attack: 7,
                defense: 4,
                speed: 4,
                accuracy: 80,
            }),
            ai: AiProfile {
                behavior: "territorial".into(),
                attack_style: "maul".into(),
            },
            loot: LootProfile {
                table: "scrap".into(),
                items: vec![LootEntry {
                    item_id: "oxidized_hide".into(),
                    chance: 0.35,
                }],
            },
            entrance_desc: Some("A rust-matted hound pads out of the haze, hackles up.".into()),
            short_desc: "A rust hound circles at the edge of sight.".into(),
        },
        CreatureTemplate {
            id: "cinder_moth".into(),
            name: "Cinder Moth".into(),
            class: CreatureClass::Flyer,
            level: 2,
            stats: Some(CreatureStats {
                max_hp: 8,
                attack: 2,
                defense: 0,
                speed: 6,
                accuracy: 60,
            }),
            ai: AiProfile {
                behavior: "skittish".into(),
                attack_style: "scorch".into(),
            },
            loot: LootProfile {
                table: "measly".into(),
                items: vec![LootEntry {
                    item_id: "ember_dust".into(),
                    chance: 0.25,
                }],
            },
            entrance_desc: None,
            short_desc: "A cinder moth drifts overhead, shedding sparks.".into(),
        },
    ]
}
