//! Settings: size tiers, dungeon themes and map style
//!
//! The built-in defaults ship four themes. A JSON settings file can override
//! any top-level key; keys it omits keep their defaults. Settings are only
//! read, never written back.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::dungeon::ContentType;
use crate::error::{ConfigError, DelveError};

/// Dungeon size tier
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum SizeTier {
    Small,
    #[default]
    Medium,
    Large,
}

/// Fixed constants for a size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeConfig {
    pub min_rooms: usize,
    pub max_rooms: usize,
    /// Grid is `grid_size` x `grid_size` cells
    pub grid_size: usize,
    /// Rendered pixel size of one cell
    pub cell_size: u32,
}

impl SizeTier {
    pub const fn config(self) -> SizeConfig {
        match self {
            SizeTier::Small => SizeConfig {
                min_rooms: 5,
                max_rooms: 8,
                grid_size: 24,
                cell_size: 20,
            },
            SizeTier::Medium => SizeConfig {
                min_rooms: 8,
                max_rooms: 12,
                grid_size: 32,
                cell_size: 16,
            },
            SizeTier::Large => SizeConfig {
                min_rooms: 12,
                max_rooms: 20,
                grid_size: 48,
                cell_size: 12,
            },
        }
    }
}

/// Content tables for one dungeon theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub name: String,
    pub possible_rooms: Vec<String>,
    pub possible_traps: Vec<String>,
    pub possible_minor_hazards: Vec<String>,
    pub possible_solo_monsters: Vec<String>,
    #[serde(rename = "possibleNPCs")]
    pub possible_npcs: Vec<String>,
    pub possible_monster_mobs: Vec<String>,
    pub possible_major_hazards: Vec<String>,
    pub possible_treasures: Vec<String>,
    pub possible_boss_monsters: Vec<String>,
}

impl ThemeConfig {
    /// Content strings for a category. `Empty` has none.
    pub fn content_list(&self, content_type: ContentType) -> &[String] {
        match content_type {
            ContentType::Empty => &[],
            ContentType::Trap => &self.possible_traps,
            ContentType::MinorHazard => &self.possible_minor_hazards,
            ContentType::SoloMonster => &self.possible_solo_monsters,
            ContentType::Npc => &self.possible_npcs,
            ContentType::MonsterMob => &self.possible_monster_mobs,
            ContentType::MajorHazard => &self.possible_major_hazards,
            ContentType::Treasure => &self.possible_treasures,
            ContentType::BossMonster => &self.possible_boss_monsters,
        }
    }

    /// Every list must have at least one entry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.possible_rooms.is_empty() {
            return Err(ConfigError::EmptyContentList {
                theme: self.name.clone(),
                category: "rooms".to_string(),
            });
        }
        for content_type in ContentType::ALL {
            if content_type != ContentType::Empty && self.content_list(content_type).is_empty() {
                return Err(ConfigError::EmptyContentList {
                    theme: self.name.clone(),
                    category: content_type.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// How doors are drawn on the map
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DoorStyle {
    #[default]
    Line,
    Gap,
    None,
}

/// Map styling options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapStyle {
    pub wall_color: String,
    pub floor_color: String,
    pub corridor_color: String,
    pub grid_color: String,
    pub text_color: String,
    /// Tint rooms by content type
    pub use_colors: bool,
    pub door_style: DoorStyle,
    pub show_grid: bool,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            wall_color: "#4a9ebd".to_string(),
            floor_color: "#ffffff".to_string(),
            corridor_color: "#cccccc".to_string(),
            grid_color: "#cccccc".to_string(),
            text_color: "#000000".to_string(),
            use_colors: true,
            door_style: DoorStyle::Line,
            show_grid: true,
        }
    }
}

/// Generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dungeon_types: BTreeMap<String, ThemeConfig>,
    pub default_dungeon_type: String,
    pub map_style: MapStyle,
}

impl Settings {
    /// Parse settings from JSON, filling omitted keys from the defaults
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dungeon_types.values().try_for_each(ThemeConfig::validate)
    }

    /// Look up a theme by its key
    pub fn theme(&self, key: &str) -> Result<&ThemeConfig, DelveError> {
        self.dungeon_types
            .get(key)
            .ok_or_else(|| DelveError::UnknownDungeonType(key.to_string()))
    }

    /// Theme keys in sorted order
    pub fn theme_keys(&self) -> impl Iterator<Item = &str> {
        self.dungeon_types.keys().map(String::as_str)
    }
}

impl Default for Settings {
    fn default() -> Self {
        let themes = [
            theme(
                "Cave",
                &[
                    "Cavern",
                    "Grotto",
                    "Tunnel",
                    "Chamber",
                    "Pool",
                    "Crevasse",
                    "Stalagmite Forest",
                ],
                &["Pit Trap", "Rock Fall", "Poison Gas", "Slippery Slope"],
                &["Slippery Ground", "Low Ceiling", "Unstable Floor"],
                &["Cave Bear", "Giant Bat", "Slime", "Troll"],
                &["Lost Miner", "Hermit", "Cultist", "Refugee"],
                &["Goblins", "Kobolds", "Giant Spiders", "Bats"],
                &["Underground River", "Lava Flow", "Collapsing Ceiling"],
                &[
                    "Gem Vein",
                    "Ancient Cache",
                    "Forgotten Equipment",
                    "Crystal Formation",
                ],
                &["Dragon", "Giant", "Chimera", "Elder Slime"],
            ),
            theme(
                "Tomb",
                &[
                    "Crypt",
                    "Burial Chamber",
                    "Sarcophagus Room",
                    "Ceremonial Hall",
                    "Treasure Vault",
                ],
                &[
                    "Poison Dart",
                    "Swinging Blade",
                    "Collapsing Floor",
                    "Curse Tablet",
                ],
                &["Cobwebs", "Crumbling Stairs", "Faded Inscriptions"],
                &["Mummy", "Skeleton Warrior", "Cursed Statue", "Ghost"],
                &[
                    "Archaeologist",
                    "Tomb Robber",
                    "Cursed Noble",
                    "Death Priest",
                ],
                &["Skeletons", "Zombies", "Scarabs", "Animated Objects"],
                &["Soul-draining Mist", "Time Loop", "Magical Ward"],
                &[
                    "Royal Jewelry",
                    "Ancient Artifacts",
                    "Ceremonial Weapons",
                    "Burial Masks",
                ],
                &["Lich", "Mummy Lord", "Death Knight", "Ancient Guardian"],
            ),
            theme(
                "Deep Tunnels",
                &[
                    "Mine Shaft",
                    "Excavated Chamber",
                    "Natural Cavity",
                    "Crossroads",
                    "Storage Room",
                ],
                &[
                    "Mining Explosives",
                    "Elevator Malfunction",
                    "Flood Trap",
                    "Cave-in",
                ],
                &["Poor Air Quality", "Rickety Supports", "Narrow Passage"],
                &["Giant Worm", "Rock Elemental", "Deep One", "Cave Fisher"],
                &[
                    "Lost Explorer",
                    "Mad Miner",
                    "Deep Cult Priest",
                    "Escaped Slave",
                ],
                &["Duergar", "Troglodytes", "Hook Horrors", "Myconids"],
                &[
                    "Bottomless Chasm",
                    "Toxic Spore Cloud",
                    "Underground Lake",
                ],
                &[
                    "Rare Minerals",
                    "Dwarven Artifact",
                    "Forgotten Cache",
                    "Ancient Technology",
                ],
                &["Purple Worm", "Stone Titan", "Mind Flayer", "Beholder"],
            ),
            theme(
                "Ruins",
                &[
                    "Collapsed Hall",
                    "Overgrown Chamber",
                    "Broken Tower",
                    "Former Library",
                    "Throne Room",
                ],
                &[
                    "Collapsing Wall",
                    "Hidden Pitfall",
                    "Ancient Magic Rune",
                    "Animated Statue",
                ],
                &[
                    "Crumbling Floor",
                    "Overgrown Vegetation",
                    "Unstable Archway",
                ],
                &["Gargoyle", "Animated Armor", "Phase Spider", "Wraith"],
                &[
                    "Historian",
                    "Treasure Hunter",
                    "Cultist Leader",
                    "Trapped Spirit",
                ],
                &[
                    "Bandits",
                    "Cultists",
                    "Animated Objects",
                    "Restless Dead",
                ],
                &["Magical Anomaly", "Reality Warp", "Time Distortion"],
                &[
                    "Ancient Library",
                    "Royal Treasury",
                    "Magical Artifacts",
                    "Historical Records",
                ],
                &[
                    "Ancient Construct",
                    "Forgotten Deity",
                    "Archmage Ghost",
                    "Demonic Entity",
                ],
            ),
        ];

        Self {
            dungeon_types: themes
                .into_iter()
                .map(|theme| (theme.name.clone(), theme))
                .collect(),
            default_dungeon_type: "Cave".to_string(),
            map_style: MapStyle::default(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn theme(
    name: &str,
    rooms: &[&str],
    traps: &[&str],
    minor_hazards: &[&str],
    solo_monsters: &[&str],
    npcs: &[&str],
    monster_mobs: &[&str],
    major_hazards: &[&str],
    treasures: &[&str],
    boss_monsters: &[&str],
) -> ThemeConfig {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    ThemeConfig {
        name: name.to_string(),
        possible_rooms: owned(rooms),
        possible_traps: owned(traps),
        possible_minor_hazards: owned(minor_hazards),
        possible_solo_monsters: owned(solo_monsters),
        possible_npcs: owned(npcs),
        possible_monster_mobs: owned(monster_mobs),
        possible_major_hazards: owned(major_hazards),
        possible_treasures: owned(treasures),
        possible_boss_monsters: owned(boss_monsters),
    }
}
