//! Command-line configuration.

use std::{path::PathBuf, time::Duration};

use log::LevelFilter;

use crate::{
    engine::EngineSettings,
    pathfinding::{Algorithm, DEFAULT_FRAME_DELAY_MS},
};

/// Smallest maze side length the engine accepts.
pub const MIN_SIZE: usize = 5;

/// Largest maze side length the engine accepts.
pub const MAX_SIZE: usize = 50;

/// Side length used when none is given.
pub const DEFAULT_SIZE: usize = 15;

/// Side lengths offered by the options menu, in cycling order.
pub const SIZE_PRESETS: [usize; 8] = [5, 10, 15, 20, 25, 30, 40, 50];

/// Clamps a requested side length into the supported range.
#[must_use]
pub fn clamp_size(size: usize) -> usize {
    size.clamp(MIN_SIZE, MAX_SIZE)
}

/// Returns the preset following `size` in [`SIZE_PRESETS`], wrapping around after the largest.
#[must_use]
pub fn next_size_preset(size: usize) -> usize {
    SIZE_PRESETS
        .into_iter()
        .find(|&preset| preset > size)
        .unwrap_or(MIN_SIZE)
}

/// Terminal maze generator, solver and path-tracing game.
#[derive(Debug, clap::Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of cells along each side of the maze (clamped to 5..=50).
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    pub size: usize,

    /// Seed for maze generation; a random one is drawn when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Search algorithm used when solving.
    #[arg(short, long, value_enum, default_value_t = Algorithm::Bfs)]
    pub algorithm: Algorithm,

    /// Delay between two revealed cells of the solving animation.
    #[arg(long, default_value_t = DEFAULT_FRAME_DELAY_MS)]
    pub frame_delay_ms: u64,

    /// Append log records to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Most verbose level written to the log file.
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    /// Print one solved maze to stdout instead of starting the interface.
    #[arg(long)]
    pub headless: bool,
}

impl Cli {
    /// Turns the parsed arguments into engine settings, drawing a seed if none was given.
    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            size: clamp_size(self.size),
            seed: self.seed.unwrap_or_else(rand::random),
            algorithm: self.algorithm,
            frame_delay: Duration::from_millis(self.frame_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;

    #[test]
    fn test_clamp_size() {
        assert_eq!(clamp_size(0), MIN_SIZE);
        assert_eq!(clamp_size(12), 12);
        assert_eq!(clamp_size(usize::MAX), MAX_SIZE);
    }

    #[test]
    fn test_next_size_preset_cycles() {
        assert_eq!(next_size_preset(5), 10);
        assert_eq!(next_size_preset(12), 15);
        assert_eq!(next_size_preset(50), 5);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["mazeforge"]).expect("defaults should parse");

        assert_eq!(cli.size, DEFAULT_SIZE);
        assert_eq!(cli.algorithm, Algorithm::Bfs);
        assert_eq!(cli.log_level, LevelFilter::Info);
        assert!(!cli.headless);
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_cli_settings_clamp_and_keep_seed() {
        let cli = Cli::try_parse_from([
            "mazeforge",
            "--size",
            "500",
            "--seed",
            "42",
            "--algorithm",
            "astar",
            "--frame-delay-ms",
            "0",
        ])
        .expect("arguments should parse");
        let settings = cli.settings();

        assert_eq!(settings.size, MAX_SIZE);
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.algorithm, Algorithm::AStar);
        assert!(settings.frame_delay.is_zero());
    }

    #[test]
    fn test_cli_rejects_unknown_algorithm() {
        let result = Cli::try_parse_from(["mazeforge", "--algorithm", "dfs"]);

        assert!(result.is_err());
    }
}
