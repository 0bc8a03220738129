//! Corridor network construction
//!
//! Rooms are joined greedily, always taking the shortest corridor between
//! the connected set and the rest, until every room is reached. A few
//! short extra corridors are then added so the map has loops.

use crate::rng::DungeonRng;

use super::grid::Grid;
use super::room::{PathCoordinate, Room, Wall};
use super::router::{Point, RouteMap, Router};

/// Extra loop corridors must be shorter than this
pub const LOOP_ROUTE_LIMIT: usize = 15;

/// What the connection stage had to settle for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectReport {
    /// Rooms joined without a corridor because no route existed
    pub isolated_rooms: usize,
    /// Loop corridors added after the spanning phase
    pub loop_edges: usize,
}

/// Solid in-bounds cells just outside a room's walls, falling back to the
/// four diagonal corners when every wall cell is taken
pub fn find_potential_exits(room: &Room, grid: &Grid) -> Vec<Point> {
    let usable = |&(x, y): &Point| grid.in_bounds(x, y) && !grid.is_open(x, y);

    let exits: Vec<Point> = Wall::ALL
        .iter()
        .flat_map(|&wall| room.wall_cells(wall))
        .filter(usable)
        .collect();
    if !exits.is_empty() {
        return exits;
    }
    room.corner_cells().into_iter().filter(usable).collect()
}

/// Shortest route between two rooms' exits; empty when there is none
pub fn find_best_path<R: Router + ?Sized>(
    a: &Room,
    b: &Room,
    map: &RouteMap<'_>,
    router: &R,
    rng: &mut DungeonRng,
) -> Vec<PathCoordinate> {
    let exits_a = find_potential_exits(a, map.occupancy);
    let exits_b = find_potential_exits(b, map.occupancy);
    router.best_route(&exits_a, &exits_b, map, rng)
}

/// Open every cell of a route
pub fn mark_path_on_grid(path: &[PathCoordinate], grid: &mut Grid) {
    for coord in path {
        grid.open(coord.x, coord.y);
    }
}

/// Record an edge both ways; the far room stores the route reversed
fn link(rooms: &mut [Room], i: usize, j: usize, path: Vec<PathCoordinate>) {
    let (id_i, id_j) = (rooms[i].id, rooms[j].id);
    let mut reversed = path.clone();
    reversed.reverse();
    rooms[i].connect_to(id_j, path);
    rooms[j].connect_to(id_i, reversed);
}

fn footprint_grid(rooms: &[Room], size: usize) -> Grid {
    let mut footprints = Grid::new(size);
    for (x, y) in rooms.iter().flat_map(Room::cells) {
        footprints.open(x, y);
    }
    footprints
}

/// Join all rooms into one connected graph, then add loop corridors.
///
/// Routes are dug into `grid` as they are chosen, so later routes see the
/// earlier ones.
pub fn connect_rooms<R: Router + ?Sized>(
    rooms: &mut [Room],
    grid: &mut Grid,
    router: &R,
    rng: &mut DungeonRng,
) -> ConnectReport {
    let mut report = ConnectReport::default();
    if rooms.len() <= 1 {
        return report;
    }

    let footprints = footprint_grid(rooms, grid.size());
    let mut connected = vec![false; rooms.len()];
    connected[0] = true;

    for _ in 1..rooms.len() {
        let mut best: Option<(usize, usize, Vec<PathCoordinate>)> = None;
        {
            let map = RouteMap {
                occupancy: grid,
                footprints: &footprints,
            };
            for i in (0..rooms.len()).filter(|&i| connected[i]) {
                for j in (0..rooms.len()).filter(|&j| !connected[j]) {
                    let path = find_best_path(&rooms[i], &rooms[j], &map, router, rng);
                    if path.is_empty() {
                        continue;
                    }
                    if best.as_ref().is_none_or(|(_, _, b)| path.len() < b.len()) {
                        best = Some((i, j, path));
                    }
                }
            }
        }

        match best {
            Some((i, j, path)) => {
                log::debug!(
                    "corridor {} -> {} ({} cells)",
                    rooms[i].id,
                    rooms[j].id,
                    path.len()
                );
                mark_path_on_grid(&path, grid);
                link(rooms, i, j, path);
                connected[j] = true;
            }
            None => {
                let (i, j) = nearest_unconnected(rooms, &connected);
                log::warn!(
                    "no corridor reaches room {}; joining it to room {} without one",
                    rooms[j].id,
                    rooms[i].id
                );
                link(rooms, i, j, Vec::new());
                connected[j] = true;
                report.isolated_rooms += 1;
            }
        }
    }

    let extra = rooms.len() / 5 + 1;
    for _ in 0..extra {
        let mut best: Option<(usize, usize, Vec<PathCoordinate>)> = None;
        {
            let map = RouteMap {
                occupancy: grid,
                footprints: &footprints,
            };
            for i in 0..rooms.len() {
                for j in (i + 1)..rooms.len() {
                    if rooms[i].is_connected_to(rooms[j].id) {
                        continue;
                    }
                    let path = find_best_path(&rooms[i], &rooms[j], &map, router, rng);
                    if path.is_empty() || path.len() >= LOOP_ROUTE_LIMIT {
                        continue;
                    }
                    if best.as_ref().is_none_or(|(_, _, b)| path.len() < b.len()) {
                        best = Some((i, j, path));
                    }
                }
            }
        }

        if let Some((i, j, path)) = best {
            log::debug!(
                "loop corridor {} -> {} ({} cells)",
                rooms[i].id,
                rooms[j].id,
                path.len()
            );
            mark_path_on_grid(&path, grid);
            link(rooms, i, j, path);
            report.loop_edges += 1;
        }
    }

    report
}

/// The (connected, unconnected) pair whose centers are closest
fn nearest_unconnected(rooms: &[Room], connected: &[bool]) -> (usize, usize) {
    let mut best = (0, 0, f64::INFINITY);
    for (i, a) in rooms.iter().enumerate().filter(|(i, _)| connected[*i]) {
        for (j, b) in rooms.iter().enumerate().filter(|(j, _)| !connected[*j]) {
            let (bx, by) = b.center();
            let distance = a.center_distance(bx, by);
            if distance < best.2 {
                best = (i, j, distance);
            }
        }
    }
    (best.0, best.1)
}
