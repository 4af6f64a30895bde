//! Maze generation, solving and path tracing for the terminal.
//!
//! The library builds perfect mazes with a seeded recursive backtracker, solves them with
//! breadth-first search or A*, replays the search as a timed animation, and validates paths traced
//! by hand. [`engine::MazeEngine`] ties all of it together; [`App`] puts it behind a Ratatui
//! interface driven by keyboard and mouse, and [`print_solution`] renders it without one.

#![expect(
    clippy::cargo_common_metadata,
    reason = "The crate is not published, so it carries no repository or readme."
)]

mod app;
pub mod config;
pub mod drawing;
pub mod engine;
mod events;
pub mod logging;
pub mod maze;
pub mod pathfinding;
pub mod raster;
mod types;
mod ui;

pub use app::{print_solution, run_guarded, App};
