//! SVG floorplan rendering
//!
//! One rect per grid cell, colored by what the cell is, with optional
//! content tints, door marks, grid lines and room numbers on top. The
//! output depends only on the inputs, so re-rendering the same dungeon
//! gives byte-identical SVG.

use std::collections::HashMap;
use std::fmt;

use delve_core::dungeon::Door;
use delve_core::{DoorStyle, Dungeon, Grid, MapStyle, Room};

use crate::palette::content_color;

/// Space around the map, in pixels
pub const PADDING: u32 = 10;

/// Opacity of the content tint laid over room floors
const TINT_OPACITY: &str = "0.3";

/// What a grid cell shows as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellRole {
    Wall,
    Floor,
    Corridor,
}

/// Renders dungeons to SVG with a fixed map style
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer<'a> {
    style: &'a MapStyle,
}

impl<'a> SvgRenderer<'a> {
    pub fn new(style: &'a MapStyle) -> Self {
        Self { style }
    }

    /// Render rooms over a grid, `cell_size` pixels per cell
    pub fn render(&self, rooms: &[Room], grid: &Grid, cell_size: u32) -> String {
        let map = SvgMap::new(self.style, rooms, grid, cell_size);
        log::debug!(
            "rendering {}x{} map with {} rooms",
            grid.size(),
            grid.size(),
            rooms.len()
        );
        map.to_string()
    }

    pub fn render_dungeon(&self, dungeon: &Dungeon) -> String {
        self.render(&dungeon.rooms, &dungeon.grid, dungeon.cell_size())
    }
}

/// Pixel quantity printed without a trailing `.0`
#[derive(Debug, Clone, Copy)]
struct Px(f64);

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}", self.0 as i64)
        } else {
            let text = format!("{:.2}", self.0);
            f.write_str(text.trim_end_matches('0').trim_end_matches('.'))
        }
    }
}

/// Attribute-safe text
struct Attr<'a>(&'a str);

impl fmt::Display for Attr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                _ => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}

/// One rendering pass over a dungeon
struct SvgMap<'a> {
    style: &'a MapStyle,
    rooms: &'a [Room],
    grid: &'a Grid,
    cell_size: u32,
    /// Room owning each footprint cell
    owners: HashMap<(i32, i32), &'a Room>,
    /// Door at each door cell, first one wins
    doors: Vec<&'a Door>,
}

impl<'a> SvgMap<'a> {
    fn new(style: &'a MapStyle, rooms: &'a [Room], grid: &'a Grid, cell_size: u32) -> Self {
        let owners = rooms
            .iter()
            .flat_map(|room| room.cells().map(move |cell| (cell, room)))
            .collect();

        let mut doors: Vec<&Door> = Vec::new();
        for door in rooms.iter().flat_map(|room| room.doors.iter()) {
            if !doors.iter().any(|d| (d.x, d.y) == (door.x, door.y)) {
                doors.push(door);
            }
        }

        Self {
            style,
            rooms,
            grid,
            cell_size,
            owners,
            doors,
        }
    }

    fn cell(&self) -> f64 {
        f64::from(self.cell_size)
    }

    fn extent(&self) -> u32 {
        self.grid.size() as u32 * self.cell_size + PADDING * 2
    }

    /// Top-left pixel of a grid cell
    fn origin(&self, x: i32, y: i32) -> (Px, Px) {
        let pad = f64::from(PADDING);
        (
            Px(f64::from(x) * self.cell() + pad),
            Px(f64::from(y) * self.cell() + pad),
        )
    }

    fn role(&self, x: i32, y: i32) -> CellRole {
        if !self.grid.is_open(x, y) {
            CellRole::Wall
        } else if self.owners.contains_key(&(x, y)) {
            CellRole::Floor
        } else {
            CellRole::Corridor
        }
    }

    fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let size = self.grid.size() as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| (x, y)))
    }

    fn write_cell_rect(
        &self,
        f: &mut fmt::Formatter<'_>,
        x: i32,
        y: i32,
        extra: &str,
    ) -> fmt::Result {
        let (px, py) = self.origin(x, y);
        let size = Px(self.cell());
        write!(
            f,
            r#"<rect x="{px}" y="{py}" width="{size}" height="{size}"{extra} />"#
        )
    }

    fn write_cells(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = [
            (CellRole::Wall, "walls", &self.style.wall_color),
            (CellRole::Floor, "floors", &self.style.floor_color),
            (CellRole::Corridor, "corridors", &self.style.corridor_color),
        ];
        for (role, class, color) in groups {
            write!(f, r#"<g class="{class}" fill="{}">"#, Attr(color))?;
            for (x, y) in self.cells().filter(|&(x, y)| self.role(x, y) == role) {
                self.write_cell_rect(f, x, y, "")?;
            }
            f.write_str("</g>")?;
        }
        Ok(())
    }

    fn write_tints(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"<g class="tints">"#)?;
        for room in self.rooms {
            let tint = format!(
                r#" fill="{}" opacity="{TINT_OPACITY}""#,
                content_color(room.content_type)
            );
            for (x, y) in room.cells() {
                self.write_cell_rect(f, x, y, &tint)?;
            }
        }
        f.write_str("</g>")
    }

    fn write_doors(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style.door_style {
            DoorStyle::None => Ok(()),
            DoorStyle::Gap => {
                write!(
                    f,
                    r#"<g class="doors" fill="{}">"#,
                    Attr(&self.style.floor_color)
                )?;
                for door in &self.doors {
                    self.write_cell_rect(f, door.x, door.y, "")?;
                }
                f.write_str("</g>")
            }
            DoorStyle::Line => {
                write!(
                    f,
                    r#"<g class="doors" stroke="{}" stroke-width="{}" stroke-linecap="round">"#,
                    Attr(&self.style.wall_color),
                    Px(self.cell() / 4.0)
                )?;
                let cell = self.cell();
                for door in &self.doors {
                    let (Px(x), Px(y)) = self.origin(door.x, door.y);
                    // perpendicular to the wall the door sits on
                    let (x1, y1, x2, y2) = if door.is_horizontal {
                        (x + cell / 2.0, y, x + cell / 2.0, y + cell)
                    } else {
                        (x, y + cell / 2.0, x + cell, y + cell / 2.0)
                    };
                    write!(
                        f,
                        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" />"#,
                        Px(x1),
                        Px(y1),
                        Px(x2),
                        Px(y2)
                    )?;
                }
                f.write_str("</g>")
            }
        }
    }

    fn write_grid_lines(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = PADDING;
        let far = self.extent() - PADDING;
        write!(
            f,
            r#"<g class="grid" stroke="{}" stroke-width="0.5">"#,
            Attr(&self.style.grid_color)
        )?;
        for i in 0..=self.grid.size() as u32 {
            let at = i * self.cell_size + PADDING;
            write!(f, r#"<line x1="{at}" y1="{pad}" x2="{at}" y2="{far}" />"#)?;
            write!(f, r#"<line x1="{pad}" y1="{at}" x2="{far}" y2="{at}" />"#)?;
        }
        f.write_str("</g>")
    }

    fn write_labels(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<g class="labels" font-family="Arial" font-size="{}" font-weight="bold" text-anchor="middle" dominant-baseline="central" fill="{}">"#,
            Px(self.cell() * 0.6),
            Attr(&self.style.text_color)
        )?;
        let pad = f64::from(PADDING);
        for room in self.rooms {
            let (cx, cy) = room.center();
            write!(
                f,
                r#"<text x="{}" y="{}">{}</text>"#,
                Px(cx * self.cell() + pad),
                Px(cy * self.cell() + pad),
                room.id
            )?;
        }
        f.write_str("</g>")
    }
}

impl fmt::Display for SvgMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extent = self.extent();
        write!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{extent}" height="{extent}" viewBox="0 0 {extent} {extent}">"#
        )?;
        write!(
            f,
            r#"<rect x="0" y="0" width="{extent}" height="{extent}" fill="{}" />"#,
            Attr(&self.style.floor_color)
        )?;

        self.write_cells(f)?;
        if self.style.use_colors {
            self.write_tints(f)?;
        }
        self.write_doors(f)?;
        if self.style.show_grid {
            self.write_grid_lines(f)?;
        }
        self.write_labels(f)?;

        f.write_str("</svg>")
    }
}
