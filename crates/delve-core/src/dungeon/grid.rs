//! Occupancy grid
//!
//! A square boolean matrix where `true` means open (room floor, corridor or
//! door) and `false` means solid rock. Reads outside the grid report solid;
//! writes outside the grid are discarded.

use std::fmt;

use serde::{Serialize, Serializer};

/// Von Neumann neighbourhood offsets
pub const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Square occupancy grid, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an all-solid grid of `size` x `size` cells
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.size + x as usize)
    }

    /// Whether a cell is open. Out-of-bounds cells are solid.
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    /// Set a cell. Out-of-bounds writes are ignored.
    pub fn set_open(&mut self, x: i32, y: i32, open: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = open;
        }
    }

    pub fn open(&mut self, x: i32, y: i32) {
        self.set_open(x, y, true);
    }

    pub fn close(&mut self, x: i32, y: i32) {
        self.set_open(x, y, false);
    }

    pub fn count_open(&self) -> usize {
        self.cells.iter().filter(|&&open| open).count()
    }

    /// Coordinates of all open cells, row by row
    pub fn open_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, open)| **open)
            .map(|(i, _)| ((i % self.size) as i32, (i / self.size) as i32))
    }

    /// Number of open von Neumann neighbours
    pub fn open_neighbors(&self, x: i32, y: i32) -> usize {
        DIRECTIONS
            .iter()
            .filter(|(dx, dy)| self.is_open(x + dx, y + dy))
            .count()
    }

    /// One string per row, `.` for open and `#` for solid
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| row.iter().map(|&open| glyph(open)).collect())
            .collect()
    }
}

fn glyph(open: bool) -> char {
    if open { '.' } else { '#' }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.rows().serialize(serializer)
    }
}
