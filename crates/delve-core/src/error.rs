//! Error types
//!
//! Generation itself never fails; errors only come from resolving options
//! against settings and from reading settings files.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read settings file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("dungeon type '{theme}' has no entries for {category}")]
    EmptyContentList { theme: String, category: String },
}

/// Top-level error for the generation entry points
#[derive(Error, Debug)]
pub enum DelveError {
    #[error("unknown dungeon type '{0}'")]
    UnknownDungeonType(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
