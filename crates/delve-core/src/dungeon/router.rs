//! Corridor routing
//!
//! A [`Router`] turns a pair of exit cells into a corridor route. The
//! default [`LShapedRouter`] draws one bend and ignores obstacles;
//! [`BfsRouter`] searches around room footprints.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::rng::DungeonRng;

use super::grid::{DIRECTIONS, Grid};
use super::room::PathCoordinate;

/// Grid cell as `(x, y)`
pub type Point = (i32, i32);

/// What a router may look at while routing
#[derive(Debug, Clone, Copy)]
pub struct RouteMap<'a> {
    /// Current occupancy, rooms and corridors dug so far
    pub occupancy: &'a Grid,
    /// Room footprint cells only
    pub footprints: &'a Grid,
}

/// Strategy for digging a corridor between two exit cells
pub trait Router {
    /// Route from `start` to `end`, both included. An empty route means the
    /// router found no way through.
    fn route(
        &self,
        start: Point,
        end: Point,
        map: &RouteMap<'_>,
        rng: &mut DungeonRng,
    ) -> Vec<PathCoordinate>;

    /// Shortest non-empty route over every pairing of the two exit sets,
    /// or an empty route when none exists.
    fn best_route(
        &self,
        exits_a: &[Point],
        exits_b: &[Point],
        map: &RouteMap<'_>,
        rng: &mut DungeonRng,
    ) -> Vec<PathCoordinate> {
        let mut best: Vec<PathCoordinate> = Vec::new();
        for &a in exits_a {
            for &b in exits_b {
                let route = self.route(a, b, map, rng);
                if !route.is_empty() && (best.is_empty() || route.len() < best.len()) {
                    best = route;
                }
            }
        }
        best
    }
}

/// One straight leg then one perpendicular leg, in a random order
#[derive(Debug, Clone, Copy, Default)]
pub struct LShapedRouter;

impl LShapedRouter {
    fn walk_x(path: &mut Vec<PathCoordinate>, from: i32, to: i32, y: i32, grid: &Grid) {
        let step = if from < to { 1 } else { -1 };
        let mut x = from;
        while x != to {
            x += step;
            if grid.in_bounds(x, y) {
                path.push(PathCoordinate::new(x, y));
            }
        }
    }

    fn walk_y(path: &mut Vec<PathCoordinate>, from: i32, to: i32, x: i32, grid: &Grid) {
        let step = if from < to { 1 } else { -1 };
        let mut y = from;
        while y != to {
            y += step;
            if grid.in_bounds(x, y) {
                path.push(PathCoordinate::new(x, y));
            }
        }
    }
}

impl Router for LShapedRouter {
    fn route(
        &self,
        start: Point,
        end: Point,
        map: &RouteMap<'_>,
        rng: &mut DungeonRng,
    ) -> Vec<PathCoordinate> {
        let grid = map.occupancy;
        let mut path = vec![PathCoordinate::new(start.0, start.1)];

        if rng.coin() {
            Self::walk_x(&mut path, start.0, end.0, start.1, grid);
            Self::walk_y(&mut path, start.1, end.1, end.0, grid);
        } else {
            Self::walk_y(&mut path, start.1, end.1, start.0, grid);
            Self::walk_x(&mut path, start.0, end.0, end.1, grid);
        }

        if path.last().map(PathCoordinate::pos) != Some(end) {
            path.push(PathCoordinate::new(end.0, end.1));
        }
        path
    }
}

/// Shortest-path router that never crosses a room footprint.
///
/// Among routes of equal length it prefers the one with fewer bends.
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsRouter;

/// Direction slot for cells entered from nowhere (route sources)
const NO_DIR: usize = DIRECTIONS.len();
const DIR_SLOTS: usize = DIRECTIONS.len() + 1;

impl BfsRouter {
    fn passable(map: &RouteMap<'_>, (x, y): Point) -> bool {
        map.occupancy.in_bounds(x, y) && !map.footprints.is_open(x, y)
    }

    /// Multi-source search from any of `sources` to the nearest of `targets`.
    /// Cost is (steps, bends) compared lexicographically; search state is a
    /// cell plus the direction it was entered from.
    fn search(sources: &[Point], targets: &[Point], map: &RouteMap<'_>) -> Vec<PathCoordinate> {
        let size = map.occupancy.size();
        let cell_index = |(x, y): Point| y as usize * size + x as usize;

        let mut is_target = vec![false; size * size];
        let mut any_target = false;
        for &target in targets.iter().filter(|&&p| Self::passable(map, p)) {
            is_target[cell_index(target)] = true;
            any_target = true;
        }
        if !any_target {
            return Vec::new();
        }

        let states = size * size * DIR_SLOTS;
        let mut best: Vec<Option<(u32, u32)>> = vec![None; states];
        let mut parent: Vec<Option<usize>> = vec![None; states];
        let mut heap = BinaryHeap::new();

        for &source in sources.iter().filter(|&&p| Self::passable(map, p)) {
            let state = cell_index(source) * DIR_SLOTS + NO_DIR;
            best[state] = Some((0, 0));
            heap.push(Reverse(((0u32, 0u32), state)));
        }

        while let Some(Reverse((cost, state))) = heap.pop() {
            if best[state].is_some_and(|c| c < cost) {
                continue;
            }
            let cell = state / DIR_SLOTS;
            let dir = state % DIR_SLOTS;
            if is_target[cell] {
                return Self::unwind(state, &parent, size);
            }

            let point = ((cell % size) as i32, (cell / size) as i32);
            for (next_dir, (dx, dy)) in DIRECTIONS.iter().enumerate() {
                let next = (point.0 + dx, point.1 + dy);
                if !Self::passable(map, next) {
                    continue;
                }
                let bend = u32::from(dir != NO_DIR && dir != next_dir);
                let next_cost = (cost.0 + 1, cost.1 + bend);
                let next_state = cell_index(next) * DIR_SLOTS + next_dir;
                if best[next_state].is_none_or(|c| next_cost < c) {
                    best[next_state] = Some(next_cost);
                    parent[next_state] = Some(state);
                    heap.push(Reverse((next_cost, next_state)));
                }
            }
        }

        Vec::new()
    }

    fn unwind(mut state: usize, parent: &[Option<usize>], size: usize) -> Vec<PathCoordinate> {
        let to_coord = |state: usize| {
            let cell = state / DIR_SLOTS;
            PathCoordinate::new((cell % size) as i32, (cell / size) as i32)
        };
        let mut path = vec![to_coord(state)];
        while let Some(prev) = parent[state] {
            path.push(to_coord(prev));
            state = prev;
        }
        path.reverse();
        path
    }
}

impl Router for BfsRouter {
    fn route(
        &self,
        start: Point,
        end: Point,
        map: &RouteMap<'_>,
        _rng: &mut DungeonRng,
    ) -> Vec<PathCoordinate> {
        Self::search(&[start], &[end], map)
    }

    fn best_route(
        &self,
        exits_a: &[Point],
        exits_b: &[Point],
        map: &RouteMap<'_>,
        _rng: &mut DungeonRng,
    ) -> Vec<PathCoordinate> {
        Self::search(exits_a, exits_b, map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_continuous(path: &[PathCoordinate]) -> bool {
        path.windows(2)
            .all(|w| (w[0].x - w[1].x).abs() + (w[0].y - w[1].y).abs() == 1)
    }

    #[test]
    fn test_l_shaped_route() {
        let grid = Grid::new(20);
        let map = RouteMap {
            occupancy: &grid,
            footprints: &grid,
        };
        let mut rng = DungeonRng::new(4);
        for _ in 0..20 {
            let path = LShapedRouter.route((2, 3), (7, 9), &map, &mut rng);
            assert_eq!(path.len(), 5 + 6 + 1);
            assert_eq!(path.first().unwrap().pos(), (2, 3));
            assert_eq!(path.last().unwrap().pos(), (7, 9));
            assert!(is_continuous(&path));
            let bends = path
                .windows(3)
                .filter(|w| (w[0].x == w[1].x) != (w[1].x == w[2].x))
                .count();
            assert_eq!(bends, 1);
        }
    }

    #[test]
    fn test_l_shaped_same_point() {
        let grid = Grid::new(10);
        let map = RouteMap {
            occupancy: &grid,
            footprints: &grid,
        };
        let path = LShapedRouter.route((4, 4), (4, 4), &map, &mut DungeonRng::new(1));
        assert_eq!(path, vec![PathCoordinate::new(4, 4)]);
    }

    #[test]
    fn test_best_route_picks_shortest_pair() {
        let grid = Grid::new(20);
        let map = RouteMap {
            occupancy: &grid,
            footprints: &grid,
        };
        let mut rng = DungeonRng::new(9);
        let path = LShapedRouter.best_route(&[(0, 0), (5, 5)], &[(5, 8), (15, 15)], &map, &mut rng);
        assert_eq!(path.len(), 4);
        assert!(LShapedRouter.best_route(&[], &[(1, 1)], &map, &mut rng).is_empty());
    }

    #[test]
    fn test_bfs_avoids_rooms() {
        let grid = Grid::new(12);
        let mut footprints = Grid::new(12);
        // wall of room cells across column 5, gap at row 10
        for y in 0..10 {
            footprints.open(5, y);
        }
        let map = RouteMap {
            occupancy: &grid,
            footprints: &footprints,
        };
        let path = BfsRouter.route((3, 2), (7, 2), &map, &mut DungeonRng::new(0));
        assert!(!path.is_empty());
        assert!(is_continuous(&path));
        assert!(path.iter().all(|c| !footprints.is_open(c.x, c.y)));
        assert!(path.iter().any(|c| c.pos() == (5, 10)));
        // 2 right, 8 down, 2 right... shortest is 4 + 2 * 8 steps
        assert_eq!(path.len(), 4 + 16 + 1);
    }

    #[test]
    fn test_bfs_unreachable() {
        let grid = Grid::new(8);
        let mut footprints = Grid::new(8);
        for y in 0..8 {
            footprints.open(4, y);
        }
        let map = RouteMap {
            occupancy: &grid,
            footprints: &footprints,
        };
        let mut rng = DungeonRng::new(0);
        assert!(BfsRouter.route((1, 1), (6, 6), &map, &mut rng).is_empty());
    }

    #[test]
    fn test_bfs_prefers_fewer_bends() {
        let grid = Grid::new(10);
        let map = RouteMap {
            occupancy: &grid,
            footprints: &grid,
        };
        let path = BfsRouter.route((1, 1), (5, 4), &map, &mut DungeonRng::new(0));
        assert_eq!(path.len(), 8);
        let bends = path
            .windows(3)
            .filter(|w| (w[0].x == w[1].x) != (w[1].x == w[2].x))
            .count();
        assert_eq!(bends, 1);
    }

    #[test]
    fn test_bfs_best_route_multi_source() {
        let grid = Grid::new(16);
        let map = RouteMap {
            occupancy: &grid,
            footprints: &grid,
        };
        let starts = [(0, 0), (6, 6)];
        let goals = [(6, 9), (15, 0)];
        let mut rng = DungeonRng::new(0);
        let path = BfsRouter.best_route(&starts, &goals, &map, &mut rng);
        assert_eq!(path.first().unwrap().pos(), (6, 6));
        assert_eq!(path.last().unwrap().pos(), (6, 9));
        assert_eq!(path.len(), 4);
    }
}
