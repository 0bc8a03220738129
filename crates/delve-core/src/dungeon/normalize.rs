//! Grid normalization
//!
//! Runs after doors are placed:
//! 1. Side-by-side corridor stretches are collapsed to a single cell
//! 2. The grid is rebuilt from rooms, routes and doors, then dead ends are
//!    pruned
//! 3. Door references to missing rooms are repaired
//! 4. Rooms cut off from the first room over open cells are reported
//!
//! Cells removed from the grid are also removed from the routes so the grid
//! can always be derived from the rooms alone.

use std::collections::{HashSet, VecDeque};

use super::grid::{DIRECTIONS, Grid};
use super::room::{Room, RoomId};
use super::router::Point;

/// Upper bound on dead-end pruning sweeps
pub const MAX_PRUNE_PASSES: usize = 10;

/// Cells and references touched by normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub collapsed_cells: usize,
    pub pruned_cells: usize,
    pub repaired_doors: usize,
    /// Rooms no open walk reaches from the first room
    pub unreachable_rooms: usize,
}

/// Room footprints and door cells, for classifying grid cells
struct Fixtures {
    footprints: Grid,
    doors: HashSet<Point>,
}

impl Fixtures {
    fn new(rooms: &[Room], size: usize) -> Self {
        let mut footprints = Grid::new(size);
        for (x, y) in rooms.iter().flat_map(Room::cells) {
            footprints.open(x, y);
        }
        let doors = rooms
            .iter()
            .flat_map(|room| room.doors.iter().map(|d| (d.x, d.y)))
            .collect();
        Self { footprints, doors }
    }

    fn is_room(&self, x: i32, y: i32) -> bool {
        self.footprints.is_open(x, y)
    }

    fn is_door(&self, x: i32, y: i32) -> bool {
        self.doors.contains(&(x, y))
    }

    /// Open and not part of a room
    fn is_corridor(&self, grid: &Grid, x: i32, y: i32) -> bool {
        grid.is_open(x, y) && !self.is_room(x, y)
    }
}

/// Run the three normalization passes, then report rooms cut off from the first
pub fn normalize(grid: &mut Grid, rooms: &mut [Room]) -> NormalizeReport {
    let collapsed_cells = enforce_corridor_width(grid, rooms);
    rebuild_grid(grid, rooms);
    let pruned_cells = prune_dead_ends(grid, rooms);
    let repaired_doors = validate_door_connections(rooms);

    let unreachable = find_unreachable_rooms(grid, rooms);
    if !unreachable.is_empty() {
        log::warn!("rooms {unreachable:?} cannot be walked to from the first room");
    }

    let report = NormalizeReport {
        collapsed_cells,
        pruned_cells,
        repaired_doors,
        unreachable_rooms: unreachable.len(),
    };
    log::debug!("normalized grid: {report:?}");
    report
}

/// Maximal runs of consecutive indices in `0..len` satisfying `pred`,
/// as `(start, length)`
fn runs(len: i32, pred: impl Fn(i32) -> bool) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    let mut start = None;
    for i in 0..=len {
        match (start, i < len && pred(i)) {
            (None, true) => start = Some(i),
            (Some(s), false) => {
                out.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    out
}

/// Collapse side-by-side corridor stretches to one cell.
///
/// Row scan: cells of vertical stretches (corridor above and below) that
/// sit next to each other in a row are cut down to the run's middle cell.
/// The column scan does the same for horizontal stretches. Door cells are
/// never removed. Returns the number of cells closed.
pub fn enforce_corridor_width(grid: &mut Grid, rooms: &mut [Room]) -> usize {
    let fixtures = Fixtures::new(rooms, grid.size());
    let size = grid.size() as i32;
    let mut removed: HashSet<Point> = HashSet::new();

    let snapshot = grid.clone();
    let vertical = |x: i32, y: i32| {
        fixtures.is_corridor(&snapshot, x, y)
            && fixtures.is_corridor(&snapshot, x, y - 1)
            && fixtures.is_corridor(&snapshot, x, y + 1)
    };
    for y in 0..size {
        for (start, len) in runs(size, |x| vertical(x, y)) {
            let keep = start + len / 2;
            for x in start..start + len {
                if x != keep && !fixtures.is_door(x, y) {
                    grid.close(x, y);
                    removed.insert((x, y));
                }
            }
        }
    }

    let snapshot = grid.clone();
    let horizontal = |x: i32, y: i32| {
        fixtures.is_corridor(&snapshot, x, y)
            && fixtures.is_corridor(&snapshot, x - 1, y)
            && fixtures.is_corridor(&snapshot, x + 1, y)
    };
    for x in 0..size {
        for (start, len) in runs(size, |y| horizontal(x, y)) {
            let keep = start + len / 2;
            for y in start..start + len {
                if y != keep && !fixtures.is_door(x, y) {
                    grid.close(x, y);
                    removed.insert((x, y));
                }
            }
        }
    }

    drop_from_paths(rooms, &removed);
    removed.len()
}

/// Grid implied by rooms, their routes and their doors
pub fn derive_grid(rooms: &[Room], size: usize) -> Grid {
    let mut grid = Grid::new(size);
    for room in rooms {
        for (x, y) in room.cells() {
            grid.open(x, y);
        }
        for coord in room.path_cells() {
            grid.open(coord.x, coord.y);
        }
        for door in &room.doors {
            grid.open(door.x, door.y);
        }
    }
    grid
}

/// Reset the grid to exactly what the rooms describe
pub fn rebuild_grid(grid: &mut Grid, rooms: &[Room]) {
    *grid = derive_grid(rooms, grid.size());
}

/// Remove corridor cells with at most one open neighbour and no room next
/// to them, sweeping until nothing changes or the pass limit is reached.
/// Returns the number of cells closed.
pub fn prune_dead_ends(grid: &mut Grid, rooms: &mut [Room]) -> usize {
    let fixtures = Fixtures::new(rooms, grid.size());
    let mut removed: HashSet<Point> = HashSet::new();

    for pass in 0..MAX_PRUNE_PASSES {
        let dead: Vec<Point> = grid
            .open_cells()
            .filter(|&(x, y)| {
                !fixtures.is_room(x, y)
                    && !fixtures.is_door(x, y)
                    && grid.open_neighbors(x, y) <= 1
                    && !DIRECTIONS
                        .iter()
                        .any(|(dx, dy)| fixtures.is_room(x + dx, y + dy))
            })
            .collect();
        if dead.is_empty() {
            log::trace!("dead-end pruning settled after {pass} passes");
            break;
        }
        for (x, y) in dead {
            grid.close(x, y);
            removed.insert((x, y));
        }
    }

    drop_from_paths(rooms, &removed);
    removed.len()
}

fn drop_from_paths(rooms: &mut [Room], removed: &HashSet<Point>) {
    if removed.is_empty() {
        return;
    }
    for info in rooms.iter_mut().flat_map(|room| room.paths_to.iter_mut()) {
        info.path.retain(|coord| !removed.contains(&coord.pos()));
    }
}

/// Point doors that reference a missing room, or their own room, at the
/// first other room. Returns the number of doors repaired.
pub fn validate_door_connections(rooms: &mut [Room]) -> usize {
    let ids: Vec<RoomId> = rooms.iter().map(|room| room.id).collect();
    let mut repaired = 0;

    for room in rooms.iter_mut() {
        let owner = room.id;
        let Some(fallback) = ids.iter().copied().find(|&id| id != owner) else {
            continue;
        };
        for door in &mut room.doors {
            if door.connects_to == owner || !ids.contains(&door.connects_to) {
                log::warn!(
                    "door at ({}, {}) of room {} referenced room {}, reassigned to room {}",
                    door.x,
                    door.y,
                    owner,
                    door.connects_to,
                    fallback
                );
                door.connects_to = fallback;
                repaired += 1;
            }
        }
    }
    repaired
}

/// Ids of rooms with no footprint cell reachable from the first room by
/// stepping between open cells
pub fn find_unreachable_rooms(grid: &Grid, rooms: &[Room]) -> Vec<RoomId> {
    let Some(first) = rooms.first() else {
        return Vec::new();
    };
    let start = (first.x, first.y);
    let mut seen: HashSet<Point> = HashSet::from([start]);
    let mut queue: VecDeque<Point> = VecDeque::from([start]);
    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in DIRECTIONS {
            let next = (x + dx, y + dy);
            if grid.is_open(next.0, next.1) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    rooms
        .iter()
        .filter(|room| !seen.contains(&(room.x, room.y)))
        .map(|room| room.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::room::{Door, PathCoordinate, Wall};

    fn path(cells: &[(i32, i32)]) -> Vec<PathCoordinate> {
        cells.iter().map(|&(x, y)| PathCoordinate::new(x, y)).collect()
    }

    #[test]
    fn test_runs() {
        let open = [false, true, true, false, true, false, true, true, true];
        assert_eq!(runs(9, |i| open[i as usize]), vec![(1, 2), (4, 1), (6, 3)]);
        assert!(runs(0, |_| true).is_empty());
    }

    #[test]
    fn test_straight_corridor_survives() {
        let mut rooms = vec![Room::new(1, 2, 2, 2, 2), Room::new(2, 10, 2, 2, 2)];
        let route = path(&[(4, 2), (5, 2), (6, 2), (7, 2), (8, 2), (9, 2)]);
        rooms[0].connect_to(2, route.clone());
        rooms[1].connect_to(1, route.into_iter().rev().collect());
        let mut grid = derive_grid(&rooms, 16);
        let before = grid.count_open();

        let report = normalize(&mut grid, &mut rooms);
        assert_eq!(report, NormalizeReport::default());
        assert_eq!(grid.count_open(), before);
    }

    #[test]
    fn test_parallel_vertical_corridors_merge() {
        let mut rooms = vec![Room::new(1, 3, 1, 3, 2), Room::new(2, 3, 10, 3, 2)];
        // two side-by-side vertical routes from room 1 down to room 2
        let left = path(&[(3, 3), (3, 4), (3, 5), (3, 6), (3, 7), (3, 8), (3, 9)]);
        let right = path(&[(4, 3), (4, 4), (4, 5), (4, 6), (4, 7), (4, 8), (4, 9)]);
        rooms[0].connect_to(2, left);
        rooms[0].connect_to(2, right);
        let mut grid = derive_grid(&rooms, 16);

        let collapsed = enforce_corridor_width(&mut grid, &mut rooms);
        // rows 4..=8 have both columns in a vertical stretch; column 4 kept
        assert_eq!(collapsed, 5);
        for y in 4..=8 {
            assert!(!grid.is_open(3, y));
            assert!(grid.is_open(4, y));
        }
        assert_eq!(grid, derive_grid(&rooms, 16));
    }

    #[test]
    fn test_doors_are_never_removed() {
        let mut rooms = vec![Room::new(1, 3, 1, 3, 2), Room::new(2, 3, 10, 3, 2)];
        let left = path(&[(3, 3), (3, 4), (3, 5), (3, 6), (3, 7), (3, 8), (3, 9)]);
        let right = path(&[(4, 3), (4, 4), (4, 5), (4, 6), (4, 7), (4, 8), (4, 9)]);
        rooms[0].connect_to(2, left);
        rooms[0].connect_to(2, right);
        rooms[0].doors.push(Door {
            x: 3,
            y: 5,
            is_horizontal: false,
            connects_to: 2,
            wall: Wall::Bottom,
        });
        let mut grid = derive_grid(&rooms, 16);
        enforce_corridor_width(&mut grid, &mut rooms);
        assert!(grid.is_open(3, 5));
    }

    #[test]
    fn test_prune_dead_end_spur() {
        let mut rooms = vec![Room::new(1, 2, 2, 2, 2), Room::new(2, 10, 2, 2, 2)];
        let route = path(&[(4, 2), (5, 2), (6, 2), (7, 2), (8, 2), (9, 2)]);
        rooms[0].connect_to(2, route);
        // spur hanging off the corridor
        rooms[1].connect_to(1, path(&[(6, 3), (6, 4), (6, 5)]));
        let mut grid = derive_grid(&rooms, 16);

        let pruned = prune_dead_ends(&mut grid, &mut rooms);
        assert_eq!(pruned, 3);
        assert!(!grid.is_open(6, 5));
        assert!(grid.is_open(6, 2));
        assert!(rooms[1].paths_to[0].path.is_empty());
        assert_eq!(grid, derive_grid(&rooms, 16));
    }

    #[test]
    fn test_prune_stops_at_pass_limit() {
        let mut rooms = vec![Room::new(1, 2, 2, 2, 2)];
        let tail: Vec<(i32, i32)> = (0..30).map(|y| (20, y)).collect();
        rooms[0].connect_to(1, path(&tail));
        let mut grid = derive_grid(&rooms, 32);
        let pruned = prune_dead_ends(&mut grid, &mut rooms);
        // both ends erode by one cell per pass
        assert_eq!(pruned, 2 * MAX_PRUNE_PASSES);
        assert_eq!(rooms[0].paths_to[0].path.len(), 30 - 2 * MAX_PRUNE_PASSES);
    }

    #[test]
    fn test_unreachable_rooms_found() {
        let mut rooms = vec![
            Room::new(1, 2, 2, 2, 2),
            Room::new(2, 10, 2, 2, 2),
            Room::new(3, 2, 10, 2, 2),
        ];
        let route = path(&[(4, 2), (5, 2), (6, 2), (7, 2), (8, 2), (9, 2)]);
        rooms[0].connect_to(2, route);
        // joined in the graph, but nothing was dug
        rooms[0].connect_to(3, Vec::new());
        let grid = derive_grid(&rooms, 16);
        assert_eq!(find_unreachable_rooms(&grid, &rooms), vec![3]);

        let mut cut = grid.clone();
        cut.close(6, 2);
        assert_eq!(find_unreachable_rooms(&cut, &rooms), vec![2, 3]);
        assert!(find_unreachable_rooms(&grid, &[]).is_empty());
    }

    #[test]
    fn test_normalize_reports_unreachable_rooms() {
        let mut rooms = vec![Room::new(1, 2, 2, 2, 2), Room::new(2, 10, 2, 2, 2)];
        rooms[0].connect_to(2, Vec::new());
        rooms[1].connect_to(1, Vec::new());
        let mut grid = derive_grid(&rooms, 16);
        let report = normalize(&mut grid, &mut rooms);
        assert_eq!(report.unreachable_rooms, 1);
    }

    #[test]
    fn test_validate_door_connections() {
        let mut rooms = vec![
            Room::new(1, 2, 2, 2, 2),
            Room::new(2, 8, 2, 2, 2),
            Room::new(3, 2, 8, 2, 2),
        ];
        let door = |connects_to| Door {
            x: 4,
            y: 2,
            is_horizontal: false,
            connects_to,
            wall: Wall::Right,
        };
        rooms[0].doors = vec![door(1)];
        rooms[1].doors = vec![door(42)];
        rooms[2].doors = vec![door(2)];

        assert_eq!(validate_door_connections(&mut rooms), 2);
        assert_eq!(rooms[0].doors[0].connects_to, 2);
        assert_eq!(rooms[1].doors[0].connects_to, 1);
        assert_eq!(rooms[2].doors[0].connects_to, 2);
    }
}
