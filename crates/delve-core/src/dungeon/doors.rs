//! Door assignment
//!
//! Each wall of a room gets at most one door, placed on a corridor cell
//! directly outside it. Doors leading to a connected room win over
//! arbitrary ones.

use std::collections::BTreeSet;

use crate::rng::DungeonRng;

use super::grid::Grid;
use super::room::{Door, Room, RoomId, Wall};

/// A door cell must be an in-bounds open cell
pub fn is_valid_door_location(grid: &Grid, x: i32, y: i32) -> bool {
    grid.is_open(x, y)
}

/// Which room a door cell leads to.
///
/// The first other room whose perimeter holds the cell wins, otherwise the
/// nearest other room by center distance.
pub fn find_connected_room_id(x: i32, y: i32, owner: RoomId, rooms: &[Room]) -> Option<RoomId> {
    let others = || rooms.iter().filter(|room| room.id != owner);

    if let Some(room) = others().find(|room| room.is_on_perimeter(x, y)) {
        return Some(room.id);
    }
    let (fx, fy) = (f64::from(x), f64::from(y));
    others()
        .map(|room| (room.id, room.center_distance(fx, fy)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Door chosen for one wall, and the connection it serves if any
#[derive(Debug, Clone, Copy)]
struct WallSlot {
    door: Door,
    serves: Option<RoomId>,
}

fn wall_candidates(room: &Room, wall: Wall, grid: &Grid, rooms: &[Room]) -> Vec<Door> {
    room.wall_cells(wall)
        .into_iter()
        .filter(|&(x, y)| is_valid_door_location(grid, x, y))
        .filter_map(|(x, y)| {
            find_connected_room_id(x, y, room.id, rooms).map(|connects_to| Door {
                x,
                y,
                is_horizontal: wall.is_horizontal(),
                connects_to,
                wall,
            })
        })
        .collect()
}

fn door_towards(options: &[Door], target: RoomId) -> Option<Door> {
    options.iter().copied().find(|door| door.connects_to == target)
}

/// Try to give `target` a door after the first pass missed it.
///
/// Takes a wall whose door serves nobody, or frees a wall by moving the
/// connection it serves onto such a wall.
fn retrofit(slots: &mut [Option<WallSlot>; 4], candidates: &[Vec<Door>], target: RoomId) -> bool {
    let is_free = |slot: &Option<WallSlot>| slot.is_none_or(|s| s.serves.is_none());

    for w in 0..slots.len() {
        if is_free(&slots[w]) {
            if let Some(door) = door_towards(&candidates[w], target) {
                slots[w] = Some(WallSlot { door, serves: Some(target) });
                return true;
            }
        }
    }

    for w in 0..slots.len() {
        let Some(WallSlot { serves: Some(served), .. }) = slots[w] else {
            continue;
        };
        let Some(door) = door_towards(&candidates[w], target) else {
            continue;
        };
        let moved = (0..slots.len()).find_map(|w2| {
            (w2 != w && is_free(&slots[w2]))
                .then(|| door_towards(&candidates[w2], served).map(|d| (w2, d)))
                .flatten()
        });
        if let Some((w2, moved_door)) = moved {
            slots[w2] = Some(WallSlot { door: moved_door, serves: Some(served) });
            slots[w] = Some(WallSlot { door, serves: Some(target) });
            return true;
        }
    }
    false
}

/// Assign doors to every room, replacing any doors already present.
///
/// Returns how many (room, connection) pairs ended up with no door.
pub fn assign_doors(rooms: &mut [Room], grid: &Grid, rng: &mut DungeonRng) -> usize {
    let mut unsatisfied_total = 0;

    for index in 0..rooms.len() {
        let room = &rooms[index];
        let candidates: Vec<Vec<Door>> = Wall::ALL
            .iter()
            .map(|&wall| wall_candidates(room, wall, grid, rooms))
            .collect();
        let mut pending: BTreeSet<RoomId> = room.connections.iter().copied().collect();
        let mut slots: [Option<WallSlot>; 4] = [None; 4];

        for (slot, options) in slots.iter_mut().zip(&candidates) {
            let connecting: Vec<Door> = options
                .iter()
                .copied()
                .filter(|door| pending.contains(&door.connects_to))
                .collect();
            if let Some(&door) = rng.choose(&connecting) {
                pending.remove(&door.connects_to);
                *slot = Some(WallSlot { door, serves: Some(door.connects_to) });
            } else if let Some(&door) = rng.choose(options) {
                *slot = Some(WallSlot { door, serves: None });
            }
        }

        pending.retain(|&target| !retrofit(&mut slots, &candidates, target));

        if !pending.is_empty() {
            log::debug!("room {} has no door towards {:?}", rooms[index].id, pending);
        }
        unsatisfied_total += pending.len();
        rooms[index].doors = slots.iter().flatten().map(|slot| slot.door).collect();
    }

    mark_door_cells(rooms);
    unsatisfied_total
}

/// Flag route cells that coincide with one of the owning room's doors
pub fn mark_door_cells(rooms: &mut [Room]) {
    for room in rooms.iter_mut() {
        let doors: Vec<(i32, i32)> = room.doors.iter().map(|d| (d.x, d.y)).collect();
        for coord in room.paths_to.iter_mut().flat_map(|info| info.path.iter_mut()) {
            coord.is_door = doors.contains(&coord.pos());
        }
    }
}
