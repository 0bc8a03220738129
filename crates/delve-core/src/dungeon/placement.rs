//! Room placement
//!
//! Rooms are dropped at random positions and kept only when their footprint,
//! grown by a buffer, lands on untouched rock. Each accepted room gets a
//! flavor name and a rolled content category from the theme.

use crate::config::{SizeTier, ThemeConfig};
use crate::rng::DungeonRng;

use super::content::{ContentType, pick_content};
use super::grid::Grid;
use super::room::{ROOM_SHAPES, Room, RoomId, RoomShape};

/// Attempts per room before placement gives up
pub const PLACEMENT_RETRIES: u32 = 50;

/// Minimum distance between a room and the grid edge
pub const EDGE_PADDING: i32 = 3;

/// Solid cells required around every room
pub const ROOM_BUFFER: i32 = 2;

/// Fewest rooms a dungeon asks for
pub const MIN_ROOM_TARGET: usize = 3;

/// Number of rooms to aim for at a given size
pub fn room_count(size: SizeTier, rng: &mut DungeonRng) -> usize {
    let config = size.config();
    let spread = config.max_rooms.saturating_sub(config.min_rooms) as u32;
    (config.min_rooms + rng.rn2(spread) as usize).max(MIN_ROOM_TARGET)
}

/// Pick a shape by cumulative probability
pub fn select_room_shape(rng: &mut DungeonRng) -> &'static RoomShape {
    let total: f64 = ROOM_SHAPES.iter().map(|s| s.probability).sum();
    let roll = rng.unit() * total;

    let mut cumulative = 0.0;
    for shape in &ROOM_SHAPES {
        cumulative += shape.probability;
        if roll <= cumulative {
            return shape;
        }
    }
    &ROOM_SHAPES[0]
}

/// Check that a rectangle plus `buffer` cells around it is entirely solid.
/// Buffer cells outside the grid are ignored.
pub fn is_area_free(grid: &Grid, x: i32, y: i32, width: i32, height: i32, buffer: i32) -> bool {
    for cy in (y - buffer)..(y + height + buffer) {
        for cx in (x - buffer)..(x + width + buffer) {
            if grid.in_bounds(cx, cy) && grid.is_open(cx, cy) {
                return false;
            }
        }
    }
    true
}

/// Place up to `target` rooms on the grid, opening their footprints.
///
/// Placement stops at the first room that cannot be fitted within
/// [`PLACEMENT_RETRIES`] attempts, so ids stay dense.
pub fn place_rooms(
    grid: &mut Grid,
    target: usize,
    theme: &ThemeConfig,
    size: SizeTier,
    rng: &mut DungeonRng,
) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::with_capacity(target);
    let grid_size = grid.size() as i32;

    for index in 0..target {
        let id = (index + 1) as RoomId;
        let mut placed = None;

        for _ in 0..PLACEMENT_RETRIES {
            let shape = select_room_shape(rng);
            let max_x = grid_size - shape.width - EDGE_PADDING;
            let max_y = grid_size - shape.height - EDGE_PADDING;
            let x = rng.rn2((max_x - EDGE_PADDING).max(0) as u32) as i32 + EDGE_PADDING;
            let y = rng.rn2((max_y - EDGE_PADDING).max(0) as u32) as i32 + EDGE_PADDING;

            if is_area_free(grid, x, y, shape.width, shape.height, ROOM_BUFFER) {
                placed = Some(Room::from_shape(id, x, y, shape));
                break;
            }
        }

        let Some(mut room) = placed else {
            log::debug!(
                "room {id} not placed after {PLACEMENT_RETRIES} tries, stopping at {} rooms",
                rooms.len()
            );
            break;
        };

        for (x, y) in room.cells() {
            grid.open(x, y);
        }
        dress_room(&mut room, &rooms, target, theme, size, rng);
        log::debug!(
            "placed room {} ({}, {}) at ({}, {}): {}",
            room.id,
            room.shape,
            room.room_type,
            room.x,
            room.y,
            room.content_type
        );
        rooms.push(room);
    }

    rooms
}

/// Give a fresh room its flavor name and content
fn dress_room(
    room: &mut Room,
    placed: &[Room],
    target: usize,
    theme: &ThemeConfig,
    size: SizeTier,
    rng: &mut DungeonRng,
) {
    room.room_type = rng
        .choose(&theme.possible_rooms)
        .cloned()
        .unwrap_or_else(|| "Chamber".to_string());

    room.content_type = ContentType::roll(size, rng);
    room.content = pick_content(room.content_type, theme, rng);

    // Keep bosses rare: a second boss usually becomes a mob
    let has_boss = placed
        .iter()
        .any(|r| r.content_type == ContentType::BossMonster);
    if room.content_type == ContentType::BossMonster
        && has_boss
        && (target < 8 || rng.chance(0.7))
    {
        room.content_type = ContentType::MonsterMob;
        room.content = pick_content(ContentType::MonsterMob, theme, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use strum::IntoEnumIterator;

    fn cave() -> ThemeConfig {
        Settings::default().dungeon_types["Cave"].clone()
    }

    #[test]
    fn test_room_count_bounds() {
        let mut rng = DungeonRng::new(11);
        for size in SizeTier::iter() {
            let config = size.config();
            for _ in 0..200 {
                let n = room_count(size, &mut rng);
                assert!(n >= config.min_rooms);
                assert!(n < config.max_rooms);
            }
        }
    }

    #[test]
    fn test_select_room_shape_distribution() {
        let mut rng = DungeonRng::new(3);
        let mut small_squares = 0;
        let mut tall_rectangles = 0;
        for _ in 0..4000 {
            match select_room_shape(&mut rng).name {
                "small-square" => small_squares += 1,
                "medium-rectangle-v" => tall_rectangles += 1,
                _ => {}
            }
        }
        assert!(small_squares > tall_rectangles * 2);
        assert!(tall_rectangles > 0);
    }

    #[test]
    fn test_is_area_free() {
        let mut grid = Grid::new(12);
        assert!(is_area_free(&grid, 0, 0, 3, 3, 2));
        grid.open(6, 6);
        assert!(!is_area_free(&grid, 3, 3, 2, 2, 2));
        assert!(is_area_free(&grid, 0, 0, 2, 2, 2));
        // buffer reaching off the grid is fine
        assert!(is_area_free(&grid, 10, 0, 2, 2, 2));
    }

    #[test]
    fn test_place_rooms_respects_buffer_and_padding() {
        let theme = cave();
        for seed in 0..20 {
            let mut rng = DungeonRng::new(seed);
            let mut grid = Grid::new(32);
            let rooms = place_rooms(&mut grid, 12, &theme, SizeTier::Medium, &mut rng);

            assert!(!rooms.is_empty());
            for (i, room) in rooms.iter().enumerate() {
                assert_eq!(room.id as usize, i + 1);
                assert!(room.x >= EDGE_PADDING && room.y >= EDGE_PADDING);
                assert!(room.right() <= 32 - EDGE_PADDING);
                assert!(room.bottom() <= 32 - EDGE_PADDING);
                assert!(theme.possible_rooms.contains(&room.room_type));
                for other in &rooms[i + 1..] {
                    assert!(!room.overlaps(other, ROOM_BUFFER));
                }
            }

            let footprint: usize = rooms.iter().map(|r| (r.width * r.height) as usize).sum();
            assert_eq!(grid.count_open(), footprint);
        }
    }

    #[test]
    fn test_boss_throttled_in_small_dungeons() {
        let theme = cave();
        for seed in 0..200 {
            let mut rng = DungeonRng::new(seed);
            let mut grid = Grid::new(24);
            let rooms = place_rooms(&mut grid, 7, &theme, SizeTier::Small, &mut rng);
            let bosses = rooms
                .iter()
                .filter(|r| r.content_type == ContentType::BossMonster)
                .count();
            assert!(bosses <= 1, "seed {seed} placed {bosses} bosses");
        }
    }

    #[test]
    fn test_boss_throttle_in_larger_dungeons() {
        let theme = cave();
        let mut boss_room = Room::new(1, 3, 3, 2, 2);
        boss_room.content_type = ContentType::BossMonster;
        let placed = vec![boss_room];

        let second_bosses = |target: usize| {
            let mut rng = DungeonRng::new(17);
            (0..5000)
                .filter(|_| {
                    let mut room = Room::new(2, 10, 10, 2, 2);
                    let size = SizeTier::Small;
                    dress_room(&mut room, &placed, target, &theme, size, &mut rng);
                    room.content_type == ContentType::BossMonster
                })
                .count()
        };

        // below 8 rooms a second boss is always demoted
        assert_eq!(second_bosses(7), 0);
        // from 8 rooms up about 30% of the 5% boss rolls survive
        let kept = second_bosses(12);
        assert!(kept > 0, "no second boss ever kept");
        assert!(kept < 125, "{kept} second bosses kept");
    }

    #[test]
    fn test_content_comes_from_theme() {
        let theme = cave();
        let mut rng = DungeonRng::new(8);
        let mut grid = Grid::new(48);
        let rooms = place_rooms(&mut grid, 15, &theme, SizeTier::Large, &mut rng);
        for room in &rooms {
            if room.content_type == ContentType::Empty {
                assert_eq!(room.content, "Empty room");
            } else {
                let choices = theme.content_list(room.content_type);
                assert!(choices.contains(&room.content));
            }
        }
    }

    #[test]
    fn test_placement_stops_when_full() {
        let theme = cave();
        let mut rng = DungeonRng::new(1);
        let mut grid = Grid::new(12);
        let rooms = place_rooms(&mut grid, 20, &theme, SizeTier::Small, &mut rng);
        assert!(rooms.len() < 20);
    }
}
