//! Dungeon generation pipeline
//!
//! Runs the stages in order:
//! 1. Place rooms and roll their content
//! 2. Join them with corridors
//! 3. Assign doors
//! 4. Normalize the grid
//!
//! Generation never fails. Anything that fell short is reported in
//! [`Diagnostics`].

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::config::{Settings, SizeTier, ThemeConfig};
use crate::error::DelveError;
use crate::rng::DungeonRng;

use super::corridor::connect_rooms;
use super::doors::assign_doors;
use super::grid::Grid;
use super::normalize::normalize;
use super::placement::{place_rooms, room_count};
use super::room::{Room, RoomId};
use super::router::{LShapedRouter, Router};

/// What to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Theme key in [`Settings::dungeon_types`]
    pub dungeon_type: String,
    pub size: SizeTier,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            dungeon_type: "Cave".to_string(),
            size: SizeTier::Medium,
        }
    }
}

/// A finished dungeon
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dungeon {
    /// Theme display name
    pub dungeon_type: String,
    pub size: SizeTier,
    pub seed: u64,
    pub rooms: Vec<Room>,
    pub grid: Grid,
}

impl Dungeon {
    pub fn grid_size(&self) -> usize {
        self.grid.size()
    }

    /// Rendered pixel size of one cell
    pub fn cell_size(&self) -> u32 {
        self.size.config().cell_size
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// Whether every room can be reached from the first over `connections`
    pub fn is_connected(&self) -> bool {
        let Some(first) = self.rooms.first() else {
            return true;
        };
        let mut seen: HashSet<RoomId> = HashSet::from([first.id]);
        let mut queue: VecDeque<RoomId> = VecDeque::from([first.id]);
        while let Some(id) = queue.pop_front() {
            let Some(room) = self.room(id) else {
                continue;
            };
            for &next in &room.connections {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        self.rooms.iter().all(|room| seen.contains(&room.id))
    }
}

/// Shortfalls and repairs from one generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub requested_rooms: usize,
    pub placed_rooms: usize,
    /// Rooms joined without a corridor because none could be routed
    pub isolated_rooms: usize,
    pub loop_edges: usize,
    pub collapsed_cells: usize,
    pub pruned_cells: usize,
    /// Doors whose target had to be reassigned
    pub repaired_doors: usize,
    /// (room, connection) pairs left without a door
    pub unsatisfied_connections: usize,
    /// Rooms connected in the graph that no open walk reaches
    pub unreachable_rooms: usize,
}

impl Diagnostics {
    /// True when the run produced everything it asked for
    pub fn is_clean(&self) -> bool {
        self.placed_rooms == self.requested_rooms
            && self.isolated_rooms == 0
            && self.repaired_doors == 0
            && self.unsatisfied_connections == 0
            && self.unreachable_rooms == 0
    }
}

/// A dungeon and the report of how it was built
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub dungeon: Dungeon,
    pub diagnostics: Diagnostics,
}

/// Generate a dungeon with the default L-shaped corridors
pub fn generate(
    options: &GenerateOptions,
    settings: &Settings,
    rng: &mut DungeonRng,
) -> Result<Generation, DelveError> {
    generate_with_router(options, settings, &LShapedRouter, rng)
}

/// Generate a dungeon routing corridors with `router`
pub fn generate_with_router<R: Router + ?Sized>(
    options: &GenerateOptions,
    settings: &Settings,
    router: &R,
    rng: &mut DungeonRng,
) -> Result<Generation, DelveError> {
    let theme = settings.theme(&options.dungeon_type)?;
    Ok(build_dungeon(theme, options.size, router, rng))
}

/// Run every stage for an already-resolved theme
pub fn build_dungeon<R: Router + ?Sized>(
    theme: &ThemeConfig,
    size: SizeTier,
    router: &R,
    rng: &mut DungeonRng,
) -> Generation {
    let config = size.config();
    let requested_rooms = room_count(size, rng);
    let mut grid = Grid::new(config.grid_size);

    log::debug!(
        "generating {} {} dungeon, seed {}, {} rooms requested",
        size,
        theme.name,
        rng.seed(),
        requested_rooms
    );

    let mut rooms = place_rooms(&mut grid, requested_rooms, theme, size, rng);
    if rooms.len() < requested_rooms {
        log::info!(
            "placed {} of {} requested rooms",
            rooms.len(),
            requested_rooms
        );
    }

    let connect = connect_rooms(&mut rooms, &mut grid, router, rng);
    let unsatisfied_connections = assign_doors(&mut rooms, &grid, rng);
    let normalized = normalize(&mut grid, &mut rooms);

    let diagnostics = Diagnostics {
        requested_rooms,
        placed_rooms: rooms.len(),
        isolated_rooms: connect.isolated_rooms,
        loop_edges: connect.loop_edges,
        collapsed_cells: normalized.collapsed_cells,
        pruned_cells: normalized.pruned_cells,
        repaired_doors: normalized.repaired_doors,
        unsatisfied_connections,
        unreachable_rooms: normalized.unreachable_rooms,
    };
    log::info!(
        "generated {} dungeon with {} rooms ({} loop corridors)",
        theme.name,
        rooms.len(),
        connect.loop_edges
    );

    Generation {
        dungeon: Dungeon {
            dungeon_type: theme.name.clone(),
            size,
            seed: rng.seed(),
            rooms,
            grid,
        },
        diagnostics,
    }
}
