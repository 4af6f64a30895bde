//! Maze engine module.
//!
//! This module contains [`MazeEngine`], the single owner of the maze, the random generator, the
//! solving animation and the traced path. Every user-facing operation goes through it, and every
//! operation that changes the maze or the path state first invalidates the running animation so
//! that nothing stale is ever revealed over a new grid.

use std::{
    error::Error,
    fmt,
    time::{Duration, Instant},
};

use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

use crate::{
    config::{self, DEFAULT_SIZE},
    drawing::{Extension, PathError, PathRecorder},
    maze::{Maze, Position},
    pathfinding::{Algorithm, Animation, AnimationToken, Solution, DEFAULT_FRAME_DELAY_MS},
};

/// Initial configuration of a [`MazeEngine`].
#[expect(
    clippy::module_name_repetitions,
    reason = "The settings are re-exported and read as a standalone name by the binary."
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineSettings {
    /// Side length of the first maze, clamped on use.
    pub size: usize,
    /// Seed of the maze generator.
    pub seed: u64,
    /// Algorithm selected at start.
    pub algorithm: Algorithm,
    /// Delay between two revealed animation steps.
    pub frame_delay: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            seed: 0,
            algorithm: Algorithm::Bfs,
            frame_delay: Duration::from_millis(DEFAULT_FRAME_DELAY_MS),
        }
    }
}

/// Figures reported after a solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveReport {
    /// Algorithm that produced the solution.
    pub algorithm: Algorithm,
    /// Number of cells the solver settled.
    pub nodes_visited: usize,
    /// Number of cells on the path, entrance and exit included.
    pub path_length: usize,
    /// Wall-clock time spent inside the solver.
    pub elapsed: Duration,
}

impl SolveReport {
    /// Solver time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

impl fmt::Display for SolveReport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}: {} nodes visited, path of {} cells, {:.3} ms",
            self.algorithm,
            self.nodes_visited,
            self.path_length,
            self.elapsed_ms()
        )
    }
}

/// Operation requested in a state that does not allow it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsageError {
    /// Solving was requested while draw mode is on.
    DrawModeActive,
    /// A resize past the supported range was requested while the maze already has the limit size.
    SizeAtLimit {
        /// Current, and limit, side length.
        size: usize,
    },
}

impl fmt::Display for UsageError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DrawModeActive => formatter.write_str("turn draw mode off before solving"),
            Self::SizeAtLimit { size } => {
                write!(formatter, "the maze is already at its size limit of {size}")
            }
        }
    }
}

impl Error for UsageError {}

/// Message shown to the user after the last operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Nothing happened yet.
    Ready,
    /// A new maze was generated.
    Generated {
        /// Side length of the new maze.
        size: usize,
    },
    /// The maze was solved.
    Solved(SolveReport),
    /// Draw mode was switched on.
    DrawModeOn,
    /// Draw mode was switched off.
    DrawModeOff,
    /// The traced path goes from entrance to exit.
    PathValid {
        /// Number of moves in the traced path.
        steps: usize,
    },
    /// The traced path was rejected.
    PathInvalid(PathError),
    /// An operation was refused.
    Rejected(UsageError),
    /// Solutions and traced paths were cleared.
    Cleared,
}

impl fmt::Display for Status {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => formatter.write_str("ready"),
            Self::Generated { size } => write!(formatter, "generated a {size}x{size} maze"),
            Self::Solved(report) => write!(formatter, "{report}"),
            Self::DrawModeOn => formatter.write_str("draw mode on: drag from the entrance to the exit"),
            Self::DrawModeOff => formatter.write_str("draw mode off"),
            Self::PathValid { steps } => write!(formatter, "solved by hand in {steps} steps"),
            Self::PathInvalid(error) => write!(formatter, "invalid path: {error}"),
            Self::Rejected(error) => write!(formatter, "{error}"),
            Self::Cleared => formatter.write_str("cleared"),
        }
    }
}

/// Owned maze engine.
///
/// The engine holds the maze together with the state derived from it: the last solution and its
/// animation, and the path traced by hand. Grid-mutating operations always cancel the animation
/// and drop derived state before touching the grid.
#[expect(
    clippy::module_name_repetitions,
    reason = "`MazeEngine` reads better than a bare `Engine` at the call sites."
)]
#[derive(Debug)]
pub struct MazeEngine {
    /// Current labyrinth.
    maze: Maze,
    /// Generator feeding the recursive backtracker.
    rng: ChaCha8Rng,
    /// Seed the generator was created from.
    seed: u64,
    /// Algorithm used by the next solve.
    algorithm: Algorithm,
    /// Whether pointer input traces a path.
    draw_mode: bool,
    /// Path traced by hand.
    recorder: PathRecorder,
    /// Reveal of the last solution.
    animation: Animation,
    /// Token the current animation must match to keep running.
    epoch: AnimationToken,
    /// Figures of the last solve.
    last_report: Option<SolveReport>,
    /// Message for the user.
    status: Status,
}

impl Default for MazeEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl MazeEngine {
    /// Builds an engine and generates its first maze.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        let size = config::clamp_size(settings.size);
        let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
        let maze = Maze::generate(size, &mut rng);
        log::info!(
            "engine started with a {size}x{size} maze, seed {}, {}",
            settings.seed,
            settings.algorithm
        );

        Self {
            maze,
            rng,
            seed: settings.seed,
            algorithm: settings.algorithm,
            draw_mode: false,
            recorder: PathRecorder::new(),
            animation: Animation::new(settings.frame_delay),
            epoch: AnimationToken::default(),
            last_report: None,
            status: Status::Ready,
        }
    }

    /// Resizes the grid and generates a new maze.
    ///
    /// Sizes outside the supported range are clamped rather than refused. When clamping lands on
    /// the current size the maze and its derived state are kept, and the status says why.
    pub fn set_size(&mut self, size: usize) {
        let clamped = config::clamp_size(size);
        if clamped != size {
            if clamped == self.maze.size() {
                log::warn!("requested size {size} ignored, maze already at {clamped}");
                self.status = Status::Rejected(UsageError::SizeAtLimit { size: clamped });
                return;
            }
            log::warn!("requested size {size} clamped to {clamped}");
        }

        self.generate_sized(clamped);
    }

    /// Generates a new maze of the current size.
    pub fn generate(&mut self) {
        self.generate_sized(self.maze.size());
    }

    /// Drops derived state and carves a new maze of the given, already clamped, size.
    fn generate_sized(&mut self, size: usize) {
        self.reset_derived_state();
        self.maze = Maze::generate(size, &mut self.rng);
        debug_assert!(self.maze.is_perfect(), "generated maze must be a spanning tree");

        log::info!("generated a {size}x{size} maze");
        self.status = Status::Generated { size };
    }

    /// Solves the maze, starts the reveal animation, and reports the figures.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::DrawModeActive`] while draw mode is on; nothing else changes in that
    /// case apart from the status message.
    pub fn solve(&mut self, algorithm: Algorithm) -> Result<SolveReport, UsageError> {
        if self.draw_mode {
            log::warn!("solve with {algorithm} refused while draw mode is on");
            self.status = Status::Rejected(UsageError::DrawModeActive);
            return Err(UsageError::DrawModeActive);
        }

        self.reset_derived_state();
        self.algorithm = algorithm;

        let started = Instant::now();
        let solution = algorithm.solve(&self.maze);
        let report = Self::report(algorithm, &solution, started.elapsed());

        self.animation.start(self.epoch, &solution);
        log::info!("{report}");
        self.last_report = Some(report);
        self.status = Status::Solved(report);

        Ok(report)
    }

    /// Builds the report of a finished solve.
    fn report(algorithm: Algorithm, solution: &Solution, elapsed: Duration) -> SolveReport {
        SolveReport {
            algorithm,
            nodes_visited: solution.visited_order.len(),
            path_length: solution.path.len(),
            elapsed,
        }
    }

    /// Cancels the animation and clears both the solution and the traced path.
    ///
    /// Calling it again right away changes nothing.
    pub fn clear_path(&mut self) {
        self.reset_derived_state();
        log::debug!("cleared solution and traced path");
        self.status = Status::Cleared;
    }

    /// Switches draw mode on or off, or flips it when `on` is `None`.
    ///
    /// Changing the mode clears the current solution and traced path.
    pub fn toggle_draw_mode(&mut self, on: Option<bool>) {
        let enabled = on.unwrap_or(!self.draw_mode);
        if enabled == self.draw_mode {
            return;
        }

        self.reset_derived_state();
        self.draw_mode = enabled;
        log::debug!("draw mode {}", if enabled { "on" } else { "off" });
        self.status = if enabled {
            Status::DrawModeOn
        } else {
            Status::DrawModeOff
        };
    }

    /// Starts tracing at the given cell. Ignored outside draw mode or outside the grid.
    pub fn pointer_down(&mut self, position: Position) {
        if !self.draw_mode || !self.maze.contains(position) {
            return;
        }

        self.recorder.begin(position);
    }

    /// Feeds the cell under the pointer while tracing.
    ///
    /// Illegal moves are dropped silently; see [`PathRecorder::extend`].
    pub fn pointer_move(&mut self, position: Position) -> Extension {
        if !self.draw_mode {
            return Extension::Rejected;
        }

        self.recorder.extend(&self.maze, position)
    }

    /// Ends tracing and validates the traced path.
    ///
    /// Returns `None` when no trace was in progress. The verdict is also stored as the status
    /// message.
    pub fn pointer_up(&mut self) -> Option<Result<(), PathError>> {
        if !self.draw_mode || !self.recorder.is_active() {
            return None;
        }

        let verdict = self.recorder.finish(&self.maze);
        self.status = match verdict {
            Ok(()) => {
                let steps = self.recorder.cells().len().saturating_sub(1);
                log::info!("traced path accepted, {steps} steps");
                Status::PathValid { steps }
            }
            Err(error) => {
                log::debug!("traced path rejected: {error}");
                Status::PathInvalid(error)
            }
        };

        Some(verdict)
    }

    /// Reveals the animation steps that became due.
    pub fn tick(&mut self) -> usize {
        self.animation.update(self.epoch)
    }

    /// Reveals the rest of the animation at once.
    pub fn fast_forward(&mut self) {
        self.animation.finish(self.epoch);
    }

    /// Invalidates the running animation and drops the solution and the traced path.
    fn reset_derived_state(&mut self) {
        self.epoch = self.epoch.next();
        self.animation.cancel();
        self.recorder.clear();
        self.last_report = None;
    }

    /// Current labyrinth.
    #[must_use]
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Side length of the current maze.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.maze.size()
    }

    /// Seed the engine generator was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Algorithm used by the next solve.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Selects the algorithm used by the next solve.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    /// Whether pointer input traces a path.
    #[must_use]
    pub const fn draw_mode(&self) -> bool {
        self.draw_mode
    }

    /// Cells traced by hand.
    #[must_use]
    pub fn drawn_path(&self) -> &[Position] {
        self.recorder.cells()
    }

    /// Message describing the last operation.
    #[must_use]
    pub const fn status(&self) -> &Status {
        &self.status
    }

    /// Figures of the last solve, while its solution is still shown.
    #[must_use]
    pub const fn last_report(&self) -> Option<&SolveReport> {
        self.last_report.as_ref()
    }

    /// Reveal of the last solution.
    #[must_use]
    pub const fn animation(&self) -> &Animation {
        &self.animation
    }
}
