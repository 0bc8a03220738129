//! Content colors shared by the map tint and the guide legend

use delve_core::ContentType;

/// Tint used for rooms of a content type
pub const fn content_color(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Empty => "#ffffff",
        ContentType::Trap => "#ff9999",
        ContentType::MinorHazard => "#ffcc99",
        ContentType::SoloMonster => "#ffff99",
        ContentType::Npc => "#99ff99",
        ContentType::MonsterMob => "#99ccff",
        ContentType::MajorHazard => "#ff99ff",
        ContentType::Treasure => "#ffcc00",
        ContentType::BossMonster => "#ff6666",
    }
}

/// Plain-language name of the tint, for the legend
pub const fn legend_label(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Empty => "White",
        ContentType::Trap => "Light Red",
        ContentType::MinorHazard => "Light Orange",
        ContentType::SoloMonster => "Light Yellow",
        ContentType::Npc => "Light Green",
        ContentType::MonsterMob => "Light Blue",
        ContentType::MajorHazard => "Light Purple",
        ContentType::Treasure => "Gold",
        ContentType::BossMonster => "Red",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_colors_are_distinct() {
        let colors: HashSet<_> = ContentType::ALL.iter().map(|&c| content_color(c)).collect();
        assert_eq!(colors.len(), ContentType::ALL.len());
        assert_eq!(content_color(ContentType::Treasure), "#ffcc00");
        assert_eq!(legend_label(ContentType::BossMonster), "Red");
    }
}
