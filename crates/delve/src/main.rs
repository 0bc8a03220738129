//! delve: tabletop dungeon generator
//!
//! Generates a dungeon and writes its SVG map, Markdown guide and JSON dump.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use log::LevelFilter;
use thiserror::Error;

use delve_core::{
    DelveError, DoorStyle, DungeonRng, GenerateOptions, Generation, MapStyle, Settings, SizeTier,
    generate,
};
use delve_render::{GuideComposer, SvgRenderer};

/// Generate tabletop dungeon floorplans
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(author, version, long_about = None)]
#[command(about = "Delve - draw a dungeon for your next session")]
struct Args {
    /// Dungeon theme (e.g., Cave, Tomb, "Deep Tunnels", Ruins)
    #[arg(short = 't', long = "type")]
    dungeon_type: Option<String>,

    /// Size tier (small/medium/large)
    #[arg(short = 's', long = "size", default_value = "medium")]
    size: String,

    /// Seed for a reproducible dungeon
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Settings file (JSON) overriding the built-in themes and style
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Write the SVG map here
    #[arg(long = "svg")]
    svg: Option<PathBuf>,

    /// Write the Markdown guide here
    #[arg(long = "guide")]
    guide: Option<PathBuf>,

    /// Write the dungeon as JSON here
    #[arg(long = "json")]
    json: Option<PathBuf>,

    /// Door drawing (line/gap/none)
    #[arg(long = "door-style")]
    door_style: Option<String>,

    /// Don't tint rooms by content
    #[arg(long = "no-colors")]
    no_colors: bool,

    /// Don't draw grid lines
    #[arg(long = "no-grid")]
    no_grid: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Delve(#[from] DelveError),

    #[error("invalid size '{0}' (expected small, medium or large)")]
    InvalidSize(String),

    #[error("invalid door style '{0}' (expected line, gap or none)")]
    InvalidDoorStyle(String),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize dungeon: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("delve: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let settings = match &args.config {
        Some(path) => Settings::load(path).map_err(DelveError::from)?,
        None => Settings::default(),
    };
    let options = GenerateOptions {
        dungeon_type: args
            .dungeon_type
            .clone()
            .unwrap_or_else(|| settings.default_dungeon_type.clone()),
        size: SizeTier::from_str(&args.size)
            .map_err(|_| CliError::InvalidSize(args.size.clone()))?,
    };
    let style = map_style(args, &settings)?;

    let mut rng = match args.seed {
        Some(seed) => DungeonRng::new(seed),
        None => DungeonRng::from_entropy(),
    };
    log::info!("seed {}", rng.seed());

    let generation = generate(&options, &settings, &mut rng)?;
    report(&generation);

    let dungeon = &generation.dungeon;
    let guide = GuideComposer.compose(&dungeon.rooms, &dungeon.dungeon_type, &mut rng);

    if let Some(path) = &args.svg {
        write_output(path, &SvgRenderer::new(&style).render_dungeon(dungeon))?;
    }
    if let Some(path) = &args.guide {
        write_output(path, &guide)?;
    }
    if let Some(path) = &args.json {
        write_output(path, &serde_json::to_string_pretty(&generation)?)?;
    }
    if args.svg.is_none() && args.guide.is_none() && args.json.is_none() {
        print!("{guide}");
    }
    Ok(())
}

/// Settings style with command-line overrides applied
fn map_style(args: &Args, settings: &Settings) -> Result<MapStyle, CliError> {
    let mut style = settings.map_style.clone();
    if let Some(door_style) = &args.door_style {
        style.door_style = DoorStyle::from_str(door_style)
            .map_err(|_| CliError::InvalidDoorStyle(door_style.clone()))?;
    }
    if args.no_colors {
        style.use_colors = false;
    }
    if args.no_grid {
        style.show_grid = false;
    }
    Ok(style)
}

fn report(generation: &Generation) {
    let diagnostics = &generation.diagnostics;
    log::info!(
        "{} rooms, seed {}",
        generation.dungeon.rooms.len(),
        generation.dungeon.seed
    );
    if !diagnostics.is_clean() {
        log::warn!("generation fell short: {diagnostics:?}");
    }
}

fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "delve",
            "--type",
            "Deep Tunnels",
            "--size",
            "Large",
            "--seed",
            "7",
            "--door-style",
            "gap",
            "--no-grid",
        ])
        .unwrap();
        assert_eq!(args.dungeon_type.as_deref(), Some("Deep Tunnels"));
        assert_eq!(args.seed, Some(7));
        assert!(args.no_grid);
        assert!(!args.no_colors);

        let style = map_style(&args, &Settings::default()).unwrap();
        assert_eq!(style.door_style, DoorStyle::Gap);
        assert!(!style.show_grid);
        assert!(style.use_colors);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["delve"]).unwrap();
        assert_eq!(args.size, "medium");
        assert!(args.dungeon_type.is_none());
        let style = map_style(&args, &Settings::default()).unwrap();
        assert_eq!(style, MapStyle::default());
    }

    #[test]
    fn test_bad_door_style() {
        let args = Args::try_parse_from(["delve", "--door-style", "portcullis"]).unwrap();
        assert!(matches!(
            map_style(&args, &Settings::default()),
            Err(CliError::InvalidDoorStyle(ref s)) if s == "portcullis"
        ));
    }

    #[test]
    fn test_bad_size_and_type() {
        let args = Args::try_parse_from(["delve", "--size", "huge"]).unwrap();
        assert!(matches!(run(&args), Err(CliError::InvalidSize(_))));

        let args = Args::try_parse_from(["delve", "--type", "Moon Base", "--seed", "1"]).unwrap();
        assert!(matches!(
            run(&args),
            Err(CliError::Delve(DelveError::UnknownDungeonType(_)))
        ));
    }

    #[test]
    fn test_writes_outputs() {
        let dir = std::env::temp_dir().join(format!("delve-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let svg = dir.join("map.svg");
        let guide = dir.join("guide.md");
        let json = dir.join("dungeon.json");

        let args = Args::try_parse_from([
            "delve",
            "--seed",
            "11",
            "--svg",
            svg.to_str().unwrap(),
            "--guide",
            guide.to_str().unwrap(),
            "--json",
            json.to_str().unwrap(),
        ])
        .unwrap();
        run(&args).unwrap();

        let map = fs::read_to_string(&svg).unwrap();
        assert!(map.starts_with("<svg"));
        let text = fs::read_to_string(&guide).unwrap();
        assert!(text.starts_with("# Cave Dungeon Master's Guide"));
        let raw = fs::read_to_string(&json).unwrap();
        let dump: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(dump["dungeon"]["seed"], 11);

        fs::remove_dir_all(&dir).unwrap();
    }
}
