//! Manual path tracing and validation.
//!
//! While draw mode is active the user drags across the maze and the cells under the pointer are
//! recorded here. Steps that would jump over a cell or pass through a wall are dropped on the spot;
//! once the pointer is released the whole recording is checked from entrance to exit.

use std::{error::Error, fmt};

use crate::maze::{Maze, Position};

/// Reason a traced path was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathError {
    /// Nothing was traced.
    Empty,
    /// The path does not begin on the entrance.
    WrongStart {
        /// First traced cell.
        found: Position,
    },
    /// The path does not end on the exit.
    WrongEnd {
        /// Last traced cell.
        found: Position,
    },
    /// Two consecutive cells do not share an edge.
    NonAdjacentStep {
        /// Cell the step leaves.
        from: Position,
        /// Cell the step enters.
        to: Position,
    },
    /// Two consecutive cells are separated by a wall.
    WallCrossingStep {
        /// Cell the step leaves.
        from: Position,
        /// Cell the step enters.
        to: Position,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => formatter.write_str("no path drawn, drag from the entrance to the exit"),
            Self::WrongStart { found } => {
                write!(formatter, "path must start at the entrance, not at {found}")
            }
            Self::WrongEnd { found } => write!(formatter, "path must end at the exit, not at {found}"),
            Self::NonAdjacentStep { from, to } => {
                write!(formatter, "step from {from} to {to} skips over cells")
            }
            Self::WallCrossingStep { from, to } => {
                write!(formatter, "step from {from} to {to} goes through a wall")
            }
        }
    }
}

impl Error for PathError {}

/// Checks a traced path from end to end.
///
/// The checks run in a fixed order (empty path, start cell, every step, end cell) so the same
/// maze and the same sequence always produce the same verdict.
///
/// # Errors
///
/// Returns the first [`PathError`] the sequence runs into.
pub fn validate_path(maze: &Maze, cells: &[Position]) -> Result<(), PathError> {
    let (Some(&first), Some(&last)) = (cells.first(), cells.last()) else {
        return Err(PathError::Empty);
    };

    if first != maze.entrance() {
        return Err(PathError::WrongStart { found: first });
    }

    for pair in cells.windows(2) {
        let [from, to] = *pair else {
            continue;
        };
        if !from.is_adjacent(to) {
            return Err(PathError::NonAdjacentStep { from, to });
        }
        if !maze.can_move(from, to) {
            return Err(PathError::WallCrossingStep { from, to });
        }
    }

    if last != maze.exit() {
        return Err(PathError::WrongEnd { found: last });
    }

    Ok(())
}

/// Outcome of feeding a cell to [`PathRecorder::extend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extension {
    /// The cell was appended.
    Appended,
    /// The pointer went back to the previous cell and the last one was dropped.
    Retracted,
    /// The cell is already the last one recorded.
    Unchanged,
    /// The move was not legal and the cell was ignored.
    Rejected,
}

impl Extension {
    /// Returns whether the recording changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Appended | Self::Retracted)
    }
}

/// Recording buffer for a single drag gesture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathRecorder {
    /// Cells recorded so far, in drag order.
    cells: Vec<Position>,
    /// Whether a drag is in progress.
    active: bool,
}

impl PathRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: Vec::new(),
            active: false,
        }
    }

    /// Starts a new recording at `position`, discarding the previous one.
    ///
    /// The first cell is not checked here; a path that does not start on the entrance is reported
    /// when the recording is finished.
    pub fn begin(&mut self, position: Position) {
        self.cells.clear();
        self.cells.push(position);
        self.active = true;
    }

    /// Feeds the cell currently under the pointer.
    ///
    /// The cell is appended only if it shares an edge with the last recorded cell and no wall
    /// blocks that edge. Moving back onto the second-to-last cell retracts the last one.
    pub fn extend(&mut self, maze: &Maze, position: Position) -> Extension {
        if !self.active {
            return Extension::Rejected;
        }
        let Some(&last) = self.cells.last() else {
            return Extension::Rejected;
        };

        if last == position {
            return Extension::Unchanged;
        }
        if self.cells.len() >= 2 && self.cells.get(self.cells.len() - 2) == Some(&position) {
            let _ = self.cells.pop();
            return Extension::Retracted;
        }
        if !maze.can_move(last, position) {
            return Extension::Rejected;
        }

        self.cells.push(position);
        Extension::Appended
    }

    /// Ends the drag and validates the recording.
    ///
    /// # Errors
    ///
    /// Returns the [`PathError`] describing the first rule the recording breaks.
    pub fn finish(&mut self, maze: &Maze) -> Result<(), PathError> {
        self.active = false;
        validate_path(maze, &self.cells)
    }

    /// Drops the recording.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.active = false;
    }

    /// Cells recorded so far.
    #[must_use]
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }
}
