//! Dungeon layout
//!
//! Contains the grid, room model, and the generation stages: placement,
//! corridor routing, door assignment and normalization.

mod content;
mod corridor;
mod doors;
mod generation;
mod grid;
mod normalize;
mod placement;
mod room;
mod router;

pub use content::{ContentType, pick_content};
pub use corridor::{
    ConnectReport, LOOP_ROUTE_LIMIT, connect_rooms, find_best_path, find_potential_exits,
    mark_path_on_grid,
};
pub use doors::{assign_doors, find_connected_room_id, is_valid_door_location, mark_door_cells};
pub use generation::{
    Diagnostics, Dungeon, GenerateOptions, Generation, build_dungeon, generate,
    generate_with_router,
};
pub use grid::{DIRECTIONS, Grid};
pub use normalize::{
    MAX_PRUNE_PASSES, NormalizeReport, derive_grid, enforce_corridor_width,
    find_unreachable_rooms, normalize, prune_dead_ends, rebuild_grid, validate_door_connections,
};
pub use placement::{
    EDGE_PADDING, MIN_ROOM_TARGET, PLACEMENT_RETRIES, ROOM_BUFFER, is_area_free, place_rooms,
    room_count, select_room_shape,
};
pub use room::{Door, PathCoordinate, PathInfo, ROOM_SHAPES, Room, RoomId, RoomShape, Wall};
pub use router::{BfsRouter, LShapedRouter, Point, RouteMap, Router};
