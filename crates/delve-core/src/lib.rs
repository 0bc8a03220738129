//! delve-core: layout engine for tabletop dungeon floorplans
//!
//! Places rooms on a square grid, joins them into one connected graph of
//! corridors, assigns doors and normalizes the result. Everything random
//! draws from a single seeded [`DungeonRng`], so a seed reproduces a
//! dungeon exactly.
//!
//! This crate does no I/O beyond reading settings files; rendering lives in
//! `delve-render`.

pub mod config;
pub mod dungeon;
pub mod error;

mod rng;

pub use config::{DoorStyle, MapStyle, Settings, SizeConfig, SizeTier, ThemeConfig};
pub use dungeon::{
    ContentType, Diagnostics, Dungeon, GenerateOptions, Generation, Grid, Room, RoomId, Router,
    generate, generate_with_router,
};
pub use error::{ConfigError, DelveError};
pub use rng::DungeonRng;
