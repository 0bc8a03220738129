//! Room content categories and the weighted content roll

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::config::{SizeTier, ThemeConfig};
use crate::rng::DungeonRng;

/// Narrative category assigned to a room
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
pub enum ContentType {
    #[default]
    Empty,
    Trap,
    #[strum(serialize = "Minor Hazard")]
    #[serde(rename = "Minor Hazard")]
    MinorHazard,
    #[strum(serialize = "Solo Monster")]
    #[serde(rename = "Solo Monster")]
    SoloMonster,
    #[strum(serialize = "NPC")]
    #[serde(rename = "NPC")]
    Npc,
    #[strum(serialize = "Monster Mob")]
    #[serde(rename = "Monster Mob")]
    MonsterMob,
    #[strum(serialize = "Major Hazard")]
    #[serde(rename = "Major Hazard")]
    MajorHazard,
    Treasure,
    #[strum(serialize = "Boss Monster")]
    #[serde(rename = "Boss Monster")]
    BossMonster,
}

impl ContentType {
    /// All content types, in roll order
    pub const ALL: [ContentType; 9] = [
        ContentType::Empty,
        ContentType::Trap,
        ContentType::MinorHazard,
        ContentType::SoloMonster,
        ContentType::Npc,
        ContentType::MonsterMob,
        ContentType::MajorHazard,
        ContentType::Treasure,
        ContentType::BossMonster,
    ];

    /// Relative weight of this category for a dungeon of the given size.
    /// Bosses get rarer as dungeons grow.
    pub const fn weight(self, size: SizeTier) -> u32 {
        match self {
            ContentType::Empty => 15,
            ContentType::Trap => 10,
            ContentType::MinorHazard => 15,
            ContentType::SoloMonster => 10,
            ContentType::Npc => 10,
            ContentType::MonsterMob => 15,
            ContentType::MajorHazard => 5,
            ContentType::Treasure => 15,
            ContentType::BossMonster => match size {
                SizeTier::Small => 5,
                SizeTier::Medium => 3,
                SizeTier::Large => 2,
            },
        }
    }

    /// Roll a content type: one uniform draw against cumulative weights
    pub fn roll(size: SizeTier, rng: &mut DungeonRng) -> ContentType {
        let total: u32 = Self::ALL.iter().map(|c| c.weight(size)).sum();
        let roll = rng.unit() * f64::from(total);

        let mut cumulative = 0u32;
        for content in Self::ALL {
            cumulative += content.weight(size);
            if roll < f64::from(cumulative) {
                return content;
            }
        }
        ContentType::Empty
    }
}

/// Pick a concrete content string for a category from the theme's lists
///
/// `Empty` rooms always read "Empty room". A category whose list is empty
/// falls back to the category name.
pub fn pick_content(
    content_type: ContentType,
    theme: &ThemeConfig,
    rng: &mut DungeonRng,
) -> String {
    if content_type == ContentType::Empty {
        return "Empty room".to_string();
    }
    rng.choose(theme.content_list(content_type))
        .cloned()
        .unwrap_or_else(|| content_type.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use std::collections::HashMap;
    use std::str::FromStr;

    #[test]
    fn test_display_names() {
        assert_eq!(ContentType::MinorHazard.to_string(), "Minor Hazard");
        assert_eq!(ContentType::Npc.to_string(), "NPC");
        assert_eq!(ContentType::BossMonster.to_string(), "Boss Monster");
        assert_eq!(
            ContentType::from_str("Monster Mob").unwrap(),
            ContentType::MonsterMob
        );
    }

    #[test]
    fn test_serde_names_match_display() {
        for content in ContentType::ALL {
            let json = serde_json::to_string(&content).unwrap();
            assert_eq!(json, format!("\"{content}\""));
        }
    }

    #[test]
    fn test_boss_weight_by_size() {
        assert_eq!(ContentType::BossMonster.weight(SizeTier::Small), 5);
        assert_eq!(ContentType::BossMonster.weight(SizeTier::Medium), 3);
        assert_eq!(ContentType::BossMonster.weight(SizeTier::Large), 2);
        let small: u32 = ContentType::ALL.iter().map(|c| c.weight(SizeTier::Small)).sum();
        assert_eq!(small, 100);
    }

    #[test]
    fn test_roll_covers_every_category() {
        let mut rng = DungeonRng::new(99);
        let mut seen: HashMap<ContentType, u32> = HashMap::new();
        for _ in 0..5000 {
            *seen.entry(ContentType::roll(SizeTier::Small, &mut rng)).or_default() += 1;
        }
        for content in ContentType::ALL {
            assert!(seen.contains_key(&content), "{content} never rolled");
        }
        // Empty (15%) should clearly outnumber Major Hazard (5%)
        assert!(seen[&ContentType::Empty] > seen[&ContentType::MajorHazard]);
    }

    #[test]
    fn test_pick_content_uses_theme_lists() {
        let settings = Settings::default();
        let cave = settings.dungeon_types.get("Cave").unwrap();
        let mut rng = DungeonRng::new(5);

        let empty = pick_content(ContentType::Empty, cave, &mut rng);
        assert_eq!(empty, "Empty room");
        for _ in 0..20 {
            let boss = pick_content(ContentType::BossMonster, cave, &mut rng);
            assert!(cave.possible_boss_monsters.contains(&boss));
        }
    }

    #[test]
    fn test_pick_content_empty_list_falls_back() {
        let mut theme = Settings::default().dungeon_types["Tomb"].clone();
        theme.possible_traps.clear();
        let mut rng = DungeonRng::new(5);
        assert_eq!(pick_content(ContentType::Trap, &theme, &mut rng), "Trap");
    }
}
