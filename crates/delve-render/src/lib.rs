//! delve-render: presentation for generated dungeons
//!
//! Turns a finished dungeon into an SVG floorplan and a Markdown guide for
//! the game master. Both read the dungeon and never modify it.

pub mod guide;
pub mod palette;
pub mod svg;

pub use guide::GuideComposer;
pub use palette::{content_color, legend_label};
pub use svg::SvgRenderer;
