//! Rooms, doors and corridor paths
//!
//! A room is an axis-aligned rectangle of open cells. Rooms are created once
//! by placement and never move; later stages only append connections, paths
//! and doors to them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::content::ContentType;

/// Room identifier: 1-based and dense over a dungeon
pub type RoomId = u32;

/// One wall of a rectangular room
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Wall {
    Top,
    Bottom,
    Left,
    Right,
}

impl Wall {
    /// Walls in door-assignment order
    pub const ALL: [Wall; 4] = [Wall::Top, Wall::Bottom, Wall::Left, Wall::Right];

    /// Top and bottom walls run horizontally
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Wall::Top | Wall::Bottom)
    }
}

/// A door in the cell just outside one of a room's walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Door {
    pub x: i32,
    pub y: i32,
    pub is_horizontal: bool,
    pub connects_to: RoomId,
    pub wall: Wall,
}

/// One cell along a corridor route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathCoordinate {
    pub x: i32,
    pub y: i32,
    pub is_door: bool,
}

impl PathCoordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            is_door: false,
        }
    }

    pub const fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// Corridor route from the owning room to another room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathInfo {
    pub room_id: RoomId,
    pub path: Vec<PathCoordinate>,
}

/// Room footprint template with its selection weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomShape {
    pub name: &'static str,
    pub width: i32,
    pub height: i32,
    pub probability: f64,
}

/// Shapes placement draws from, in cumulative sampling order
pub const ROOM_SHAPES: [RoomShape; 7] = [
    RoomShape {
        name: "small-square",
        width: 2,
        height: 2,
        probability: 0.25,
    },
    RoomShape {
        name: "medium-square",
        width: 3,
        height: 3,
        probability: 0.20,
    },
    RoomShape {
        name: "large-square",
        width: 4,
        height: 4,
        probability: 0.10,
    },
    RoomShape {
        name: "small-rectangle-h",
        width: 3,
        height: 2,
        probability: 0.15,
    },
    RoomShape {
        name: "medium-rectangle-h",
        width: 4,
        height: 3,
        probability: 0.10,
    },
    RoomShape {
        name: "small-rectangle-v",
        width: 2,
        height: 3,
        probability: 0.15,
    },
    RoomShape {
        name: "medium-rectangle-v",
        width: 3,
        height: 4,
        probability: 0.05,
    },
];

/// A placed room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    /// Left column of the footprint
    pub x: i32,
    /// Top row of the footprint
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Ids of rooms this one is joined to, in the order edges were added
    pub connections: Vec<RoomId>,
    /// Flavor name drawn from the theme, e.g. "Grotto"
    #[serde(rename = "type")]
    pub room_type: String,
    pub content: String,
    pub content_type: ContentType,
    /// Name of the shape template the room was cut from
    pub shape: String,
    pub doors: Vec<Door>,
    pub paths_to: Vec<PathInfo>,
}

impl Room {
    /// Create an empty room with no connections or content
    pub fn new(id: RoomId, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            connections: Vec::new(),
            room_type: String::new(),
            content: String::new(),
            content_type: ContentType::Empty,
            shape: String::new(),
            doors: Vec::new(),
            paths_to: Vec::new(),
        }
    }

    /// Create a room cut from a shape template
    pub fn from_shape(id: RoomId, x: i32, y: i32, shape: &RoomShape) -> Self {
        let mut room = Self::new(id, x, y, shape.width, shape.height);
        room.shape = shape.name.to_string();
        room
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Geometric center, possibly between cells
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Euclidean distance from the room's center to a point
    pub fn center_distance(&self, x: f64, y: f64) -> f64 {
        let (cx, cy) = self.center();
        (x - cx).hypot(y - cy)
    }

    /// Whether a cell lies directly outside one of the walls (corners excluded)
    pub fn is_on_perimeter(&self, x: i32, y: i32) -> bool {
        self.wall_of(x, y).is_some()
    }

    /// Which wall a cell sits directly outside of, if any
    pub fn wall_of(&self, x: i32, y: i32) -> Option<Wall> {
        let along_x = x >= self.x && x < self.right();
        let along_y = y >= self.y && y < self.bottom();
        if along_x && y == self.y - 1 {
            Some(Wall::Top)
        } else if along_x && y == self.bottom() {
            Some(Wall::Bottom)
        } else if along_y && x == self.x - 1 {
            Some(Wall::Left)
        } else if along_y && x == self.right() {
            Some(Wall::Right)
        } else {
            None
        }
    }

    /// Check if this room, grown by `buffer` cells on every side, overlaps
    /// the other room's footprint
    pub fn overlaps(&self, other: &Room, buffer: i32) -> bool {
        let (x1, y1) = (self.x - buffer, self.y - buffer);
        let (x2, y2) = (self.right() + buffer, self.bottom() + buffer);

        !(x2 <= other.x || x1 >= other.right() || y2 <= other.y || y1 >= other.bottom())
    }

    /// Footprint cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }

    /// Cells directly outside a wall, in increasing coordinate order
    pub fn wall_cells(&self, wall: Wall) -> Vec<(i32, i32)> {
        match wall {
            Wall::Top => (self.x..self.right()).map(|x| (x, self.y - 1)).collect(),
            Wall::Bottom => (self.x..self.right()).map(|x| (x, self.bottom())).collect(),
            Wall::Left => (self.y..self.bottom()).map(|y| (self.x - 1, y)).collect(),
            Wall::Right => (self.y..self.bottom()).map(|y| (self.right(), y)).collect(),
        }
    }

    /// The four diagonal cells just outside the corners
    pub fn corner_cells(&self) -> [(i32, i32); 4] {
        [
            (self.x - 1, self.y - 1),
            (self.right(), self.y - 1),
            (self.x - 1, self.bottom()),
            (self.right(), self.bottom()),
        ]
    }

    pub fn is_connected_to(&self, id: RoomId) -> bool {
        self.connections.contains(&id)
    }

    /// Record an edge to another room along with its corridor route
    pub fn connect_to(&mut self, id: RoomId, path: Vec<PathCoordinate>) {
        self.connections.push(id);
        self.paths_to.push(PathInfo { room_id: id, path });
    }

    pub fn door_on(&self, wall: Wall) -> Option<&Door> {
        self.doors.iter().find(|door| door.wall == wall)
    }

    /// Every corridor cell on this room's recorded routes
    pub fn path_cells(&self) -> impl Iterator<Item = &PathCoordinate> + '_ {
        self.paths_to.iter().flat_map(|info| info.path.iter())
    }
}
