//! Game master's guide in Markdown

use delve_core::{ContentType, DungeonRng, Room};
use strum::IntoEnumIterator;

use crate::palette::legend_label;

/// Opening sentences per theme
const CAVE_BASES: [&str; 4] = [
    "A damp cavern with stalactites hanging from the ceiling.",
    "A narrow passage that opens into a wider space.",
    "A rocky chamber with evidence of recent seismic activity.",
    "A cave with luminescent fungi providing dim light.",
];

const TOMB_BASES: [&str; 4] = [
    "Ancient stone walls inscribed with forgotten symbols.",
    "A burial chamber with ornate carvings depicting the deceased's life.",
    "A dusty room with sarcophagi lining the walls.",
    "A ceremonial space with faded murals depicting ancient rites.",
];

const DEEP_TUNNELS_BASES: [&str; 4] = [
    "A mine shaft reinforced with aged wooden supports.",
    "A tunnel that shows signs of both natural formation and artificial expansion.",
    "An excavated chamber with abandoned mining equipment.",
    "A dark passage with veins of unusual minerals in the walls.",
];

const RUINS_BASES: [&str; 4] = [
    "Crumbling stone walls partially reclaimed by nature.",
    "A once-grand chamber now exposed to the elements.",
    "The remains of what appears to have been an important structure.",
    "Ancient architecture that has withstood the test of time, though barely.",
];

const EMPTY_SENTENCE: &str =
    "The room appears to be empty, though careful inspection might reveal subtle details or clues.";

/// Base descriptions for a theme name; unknown themes read like caves
fn base_descriptions(dungeon_type: &str) -> &'static [&'static str] {
    match dungeon_type {
        "Tomb" => &TOMB_BASES,
        "Deep Tunnels" => &DEEP_TUNNELS_BASES,
        "Ruins" => &RUINS_BASES,
        _ => &CAVE_BASES,
    }
}

/// Sentence describing what occupies a room
fn content_sentence(room: &Room) -> String {
    let content = room.content.to_lowercase();
    match room.content_type {
        ContentType::Empty => EMPTY_SENTENCE.to_string(),
        ContentType::Trap => format!(
            "There's a {content} here that might be triggered if adventurers aren't careful."
        ),
        ContentType::MinorHazard => {
            format!("Be wary of the {content} that makes traversing this area more difficult.")
        }
        ContentType::SoloMonster => format!("A {content} has made this place its lair."),
        ContentType::Npc => {
            format!("A {content} can be found here, perhaps with information or a request.")
        }
        ContentType::MonsterMob => {
            format!("A group of {content} have claimed this area as their territory.")
        }
        ContentType::MajorHazard => {
            format!("The {content} presents a significant danger to anyone entering this area.")
        }
        ContentType::Treasure => {
            format!("This area contains {content} that might interest the adventurers.")
        }
        ContentType::BossMonster => {
            format!("Beware! A powerful {content} awaits those who enter here.")
        }
    }
}

/// Legend name for a content type
fn legend_name(content_type: ContentType) -> String {
    match content_type {
        ContentType::Empty => "Empty Room".to_string(),
        other => other.to_string(),
    }
}

/// Writes the Markdown guide for a dungeon
#[derive(Debug, Clone, Copy, Default)]
pub struct GuideComposer;

impl GuideComposer {
    /// Compose the guide. Base descriptions are drawn from `rng`, so the
    /// same seed gives the same text.
    pub fn compose(&self, rooms: &[Room], dungeon_type: &str, rng: &mut DungeonRng) -> String {
        let mut guide = format!("# {dungeon_type} Dungeon Master's Guide\n\n");

        guide.push_str("## Legend\n");
        for content_type in ContentType::iter() {
            let label = legend_label(content_type);
            let name = legend_name(content_type);
            guide.push_str(&format!("- {label}: {name}\n"));
        }
        guide.push('\n');

        guide.push_str("## Room Details\n\n");

        let mut sorted: Vec<&Room> = rooms.iter().collect();
        sorted.sort_by_key(|room| room.id);

        let bases = base_descriptions(dungeon_type);
        for room in sorted {
            let connections = if room.connections.is_empty() {
                "None".to_string()
            } else {
                let ids: Vec<String> = room.connections.iter().map(u32::to_string).collect();
                format!("Connects to rooms {}", ids.join(", "))
            };
            let base = rng.choose(bases).copied().unwrap_or(CAVE_BASES[0]);

            let id = room.id;
            let flavor = &room.room_type;
            let content_type = room.content_type;
            let content = &room.content;
            let detail = content_sentence(room);
            guide.push_str(&format!("### Room {id}: {flavor}\n"));
            guide.push_str(&format!("**Content**: {content_type} - {content}\n"));
            guide.push_str(&format!("**Connections**: {connections}\n\n"));
            guide.push_str(&format!("**Suggested Description**: {base} {detail}\n\n"));
        }

        log::debug!("composed guide for {} rooms", rooms.len());
        guide
    }
}
