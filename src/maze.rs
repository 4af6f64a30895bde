//! Maze grid model and generation module.
//!
//! This module contains the square grid of cells that makes up a labyrinth, the wall bookkeeping
//! between neighbouring cells, and the recursive backtracker used to carve a perfect maze out of a
//! fully walled grid.

use std::{collections::VecDeque, fmt};

use rand::Rng;

/// Location of a cell in the grid.
///
/// The `x` coordinate is the column and the `y` coordinate is the row, with the origin at the
/// top-left corner of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Column of the cell.
    pub x: usize,
    /// Row of the cell.
    pub y: usize,
}

impl Position {
    /// Builds a new position from a column and a row.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the position one step away in the given direction.
    ///
    /// This function does not know about grid bounds, it only refuses to step below zero. Callers
    /// that need an in-bounds neighbour should go through [`Maze::neighbor`] instead.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        let Some(x) = self.x.checked_add_signed(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add_signed(dy) else {
            return None;
        };

        Some(Self { x, y })
    }

    /// Returns the direction leading from this position to a grid-adjacent one.
    ///
    /// Positions that are not exactly one orthogonal step apart have no direction between them.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| self.step(direction) == Some(other))
    }

    /// Returns whether both positions share an edge of the grid.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self.direction_to(other).is_some()
    }

    /// Manhattan distance between two positions.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal movement directions.
///
/// The declaration order (up, right, down, left) is also the order in which neighbours are
/// enumerated by the generator and the solvers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the row above.
    Up,
    /// Towards the next column.
    Right,
    /// Towards the row below.
    Down,
    /// Towards the previous column.
    Left,
}

impl Direction {
    /// All directions in enumeration order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Returns the direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Returns the `(dx, dy)` offset of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Boundary flags of a single cell.
///
/// A `true` flag means the wall on that side is standing.
#[expect(
    clippy::struct_excessive_bools,
    reason = "Each flag maps to one physical side of a square cell."
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Walls {
    /// Wall shared with the cell above.
    pub top: bool,
    /// Wall shared with the cell to the right.
    pub right: bool,
    /// Wall shared with the cell below.
    pub bottom: bool,
    /// Wall shared with the cell to the left.
    pub left: bool,
}

impl Walls {
    /// Returns a set of walls with every side standing.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }

    /// Returns whether the wall on the given side is standing.
    #[must_use]
    pub const fn get(self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }

    /// Knocks down the wall on the given side.
    fn open(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.top = false,
            Direction::Right => self.right = false,
            Direction::Down => self.bottom = false,
            Direction::Left => self.left = false,
        }
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::closed()
    }
}

/// A single square of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Where the cell sits in the grid.
    pub position: Position,
    /// Which of its four sides are walled off.
    pub walls: Walls,
}

/// Square labyrinth of `size × size` cells.
///
/// The entrance is always the top-left cell and the exit always the bottom-right one. Walls are
/// kept symmetric: knocking one down updates both cells sharing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    /// Number of cells along each side of the grid.
    size: usize,
    /// Row-major storage of every cell.
    cells: Vec<Cell>,
}

impl Maze {
    /// Builds a fully walled grid of `size × size` cells.
    ///
    /// A size of zero is raised to one so that entrance and exit always exist.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let cells = (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .map(|position| Cell {
                position,
                walls: Walls::closed(),
            })
            .collect();

        Self { size, cells }
    }

    /// Generates a perfect maze with the recursive backtracker, choosing neighbours with `rng`.
    #[must_use]
    pub fn generate<R: Rng>(size: usize, rng: &mut R) -> Self {
        Self::generate_with(size, |candidates| rng.gen_range(0..candidates))
    }

    /// Generates a perfect maze with the recursive backtracker, choosing neighbours with `choose`.
    ///
    /// The closure receives the number of unvisited neighbours of the cell on top of the stack
    /// (always at least one) and returns the index of the one to carve into. Neighbours are listed
    /// in [`Direction::ALL`] order. Out-of-range answers are clamped to the last candidate.
    ///
    /// Walls are only knocked down towards cells that were never visited before, so the resulting
    /// passages form a spanning tree over the whole grid.
    #[must_use]
    pub fn generate_with<F: FnMut(usize) -> usize>(size: usize, mut choose: F) -> Self {
        let mut maze = Self::new(size);
        let mut visited = vec![false; maze.cells.len()];

        let entrance = maze.entrance();
        if let Some(flag) = maze.index(entrance).and_then(|idx| visited.get_mut(idx)) {
            *flag = true;
        }
        let mut stack = vec![entrance];

        while let Some(&current) = stack.last() {
            let candidates: Vec<Position> = Direction::ALL
                .into_iter()
                .filter_map(|direction| maze.neighbor(current, direction))
                .filter(|&next| {
                    maze.index(next)
                        .and_then(|idx| visited.get(idx))
                        .is_some_and(|seen| !seen)
                })
                .collect();

            let Some(last) = candidates.len().checked_sub(1) else {
                // Dead end, backtrack.
                let _ = stack.pop();
                continue;
            };
            let Some(&next) = candidates.get(choose(candidates.len()).min(last)) else {
                continue;
            };

            maze.remove_wall_between(current, next);
            if let Some(flag) = maze.index(next).and_then(|idx| visited.get_mut(idx)) {
                *flag = true;
            }
            stack.push(next);
        }

        maze
    }

    /// Number of cells along each side.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The entrance cell, always `(0, 0)`.
    #[must_use]
    pub const fn entrance(&self) -> Position {
        Position::new(0, 0)
    }

    /// The exit cell, always `(size - 1, size - 1)`.
    #[must_use]
    pub const fn exit(&self) -> Position {
        Position::new(self.size - 1, self.size - 1)
    }

    /// Returns whether the position lies inside the grid.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x < self.size && position.y < self.size
    }

    /// Row-major index of an in-bounds position.
    pub(crate) const fn index(&self, position: Position) -> Option<usize> {
        if self.contains(position) {
            Some(position.y * self.size + position.x)
        } else {
            None
        }
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell at the given position, if it exists.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).and_then(|idx| self.cells.get(idx))
    }

    /// Returns whether a wall stands on the given side of a cell.
    ///
    /// Positions outside the grid are treated as solid rock.
    #[must_use]
    pub fn has_wall(&self, position: Position, direction: Direction) -> bool {
        self.cell(position)
            .is_none_or(|cell| cell.walls.get(direction))
    }

    /// Returns the in-bounds grid neighbour in the given direction, ignoring walls.
    #[must_use]
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        position
            .step(direction)
            .filter(|&next| self.contains(position) && self.contains(next))
    }

    /// Returns the neighbours reachable from a cell without crossing a wall.
    pub fn open_neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            if self.has_wall(position, direction) {
                None
            } else {
                self.neighbor(position, direction)
            }
        })
    }

    /// Returns whether a single step from `from` to `to` is legal.
    ///
    /// Both cells must be inside the grid, share an edge, and have no wall between them.
    #[must_use]
    pub fn can_move(&self, from: Position, to: Position) -> bool {
        self.contains(from)
            && self.contains(to)
            && from
                .direction_to(to)
                .is_some_and(|direction| !self.has_wall(from, direction))
    }

    /// Knocks down the wall on one side of a cell and the matching wall of its neighbour.
    ///
    /// Border walls have no neighbour behind them and are left standing.
    pub fn remove_wall(&mut self, position: Position, direction: Direction) {
        let Some(next) = self.neighbor(position, direction) else {
            return;
        };
        let (Some(here), Some(there)) = (self.index(position), self.index(next)) else {
            return;
        };

        if let Some(cell) = self.cells.get_mut(here) {
            cell.walls.open(direction);
        }
        if let Some(cell) = self.cells.get_mut(there) {
            cell.walls.open(direction.opposite());
        }
    }

    /// Knocks down the wall separating two grid-adjacent cells, picking the side from their
    /// relative offset. Non-adjacent pairs are ignored.
    pub fn remove_wall_between(&mut self, from: Position, to: Position) {
        if let Some(direction) = from.direction_to(to) {
            self.remove_wall(from, direction);
        }
    }

    /// Number of interior walls that have been knocked down.
    ///
    /// A perfect maze over `n × n` cells has exactly `n * n - 1` passages.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter(|&direction| {
                        !cell.walls.get(direction)
                            && self.neighbor(cell.position, direction).is_some()
                    })
                    .count()
            })
            .sum()
    }

    /// Flood-fills the passage graph from `start` and returns the step distance to every cell.
    ///
    /// Cells that cannot be reached hold `None`. The result is indexed in row-major order, like
    /// [`Maze::cells`].
    #[must_use]
    pub fn distances_from(&self, start: Position) -> Vec<Option<usize>> {
        let mut distances = vec![None; self.cells.len()];
        let Some(first) = self.index(start).and_then(|idx| distances.get_mut(idx)) else {
            return distances;
        };
        *first = Some(0);

        let mut queue = VecDeque::from([(start, 0_usize)]);
        while let Some((current, distance)) = queue.pop_front() {
            for next in self.open_neighbors(current) {
                if let Some(slot) = self.index(next).and_then(|idx| distances.get_mut(idx)) {
                    if slot.is_none() {
                        *slot = Some(distance + 1);
                        queue.push_back((next, distance + 1));
                    }
                }
            }
        }

        distances
    }

    /// Returns whether the passages form a spanning tree over every cell.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.passage_count() + 1 == self.cells.len()
            && self
                .distances_from(self.entrance())
                .iter()
                .all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng as _;
    use rand_chacha::ChaCha8Rng;

    /// Builds the 4x4 maze obtained by always carving into the first candidate neighbour.
    fn first_neighbor_maze() -> Maze {
        Maze::generate_with(4, |_| 0)
    }

    #[test]
    fn test_new_maze_is_fully_walled() {
        let maze = Maze::new(3);

        assert_eq!(maze.size(), 3);
        assert_eq!(maze.cell_count(), 9);
        assert!(maze.cells().iter().all(|cell| cell.walls == Walls::closed()));
        assert_eq!(maze.passage_count(), 0);
    }

    #[test]
    fn test_new_maze_zero_size_is_raised() {
        let maze = Maze::new(0);

        assert_eq!(maze.size(), 1);
        assert_eq!(maze.entrance(), maze.exit());
        assert!(maze.is_perfect());
    }

    #[test]
    fn test_index_matches_cell_order() {
        let maze = Maze::new(4);

        for (idx, cell) in maze.cells().iter().enumerate() {
            assert_eq!(maze.index(cell.position), Some(idx));
        }
        assert_eq!(maze.index(Position::new(4, 0)), None);
        assert_eq!(maze.index(Position::new(0, 4)), None);
    }

    #[test]
    fn test_entrance_and_exit() {
        let maze = Maze::new(7);

        assert_eq!(maze.entrance(), Position::new(0, 0));
        assert_eq!(maze.exit(), Position::new(6, 6));
    }

    #[test]
    fn test_remove_wall_is_symmetric() {
        let mut maze = Maze::new(3);
        maze.remove_wall(Position::new(1, 1), Direction::Up);

        assert!(!maze.has_wall(Position::new(1, 1), Direction::Up));
        assert!(!maze.has_wall(Position::new(1, 0), Direction::Down));
        assert!(maze.can_move(Position::new(1, 1), Position::new(1, 0)));
        assert!(maze.can_move(Position::new(1, 0), Position::new(1, 1)));
        assert_eq!(maze.passage_count(), 1);
    }

    #[test]
    fn test_remove_border_wall_is_ignored() {
        let mut maze = Maze::new(3);
        maze.remove_wall(Position::new(0, 0), Direction::Left);
        maze.remove_wall(Position::new(2, 2), Direction::Down);

        assert!(maze.has_wall(Position::new(0, 0), Direction::Left));
        assert!(maze.has_wall(Position::new(2, 2), Direction::Down));
        assert_eq!(maze.passage_count(), 0);
    }

    #[test]
    fn test_can_move_rejects_non_adjacent_and_out_of_bounds() {
        let mut maze = Maze::new(3);
        maze.remove_wall_between(Position::new(0, 0), Position::new(1, 0));
        maze.remove_wall_between(Position::new(1, 0), Position::new(2, 0));

        assert!(!maze.can_move(Position::new(0, 0), Position::new(2, 0)));
        assert!(!maze.can_move(Position::new(0, 0), Position::new(1, 1)));
        assert!(!maze.can_move(Position::new(2, 0), Position::new(3, 0)));
        assert!(!maze.can_move(Position::new(0, 0), Position::new(0, 0)));
    }

    #[test]
    fn test_direction_helpers() {
        let origin = Position::new(1, 1);

        assert_eq!(origin.direction_to(Position::new(1, 0)), Some(Direction::Up));
        assert_eq!(origin.direction_to(Position::new(2, 1)), Some(Direction::Right));
        assert_eq!(origin.direction_to(Position::new(1, 2)), Some(Direction::Down));
        assert_eq!(origin.direction_to(Position::new(0, 1)), Some(Direction::Left));
        assert_eq!(origin.direction_to(Position::new(2, 2)), None);
        assert_eq!(Position::new(0, 0).step(Direction::Up), None);
        assert_eq!(Position::new(0, 3).manhattan(Position::new(4, 0)), 7);

        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn test_first_neighbor_layout() {
        let maze = first_neighbor_maze();

        // The carve runs along the top row, down the right column, then snakes back.
        let expected_passages = [
            ((0, 0), (1, 0)),
            ((1, 0), (2, 0)),
            ((2, 0), (3, 0)),
            ((3, 0), (3, 1)),
            ((3, 1), (3, 2)),
            ((3, 2), (3, 3)),
            ((3, 3), (2, 3)),
            ((2, 3), (2, 2)),
            ((2, 2), (2, 1)),
            ((2, 1), (1, 1)),
            ((1, 1), (1, 2)),
            ((1, 2), (1, 3)),
            ((1, 3), (0, 3)),
            ((0, 3), (0, 2)),
            ((0, 2), (0, 1)),
        ];
        for ((fx, fy), (tx, ty)) in expected_passages {
            assert!(
                maze.can_move(Position::new(fx, fy), Position::new(tx, ty)),
                "expected a passage between ({fx}, {fy}) and ({tx}, {ty})"
            );
        }

        assert_eq!(maze.passage_count(), 15);
        assert!(maze.has_wall(Position::new(1, 0), Direction::Down));
        assert!(maze.is_perfect());
    }

    #[test]
    fn test_out_of_range_choice_is_clamped() {
        let maze = Maze::generate_with(5, |_| usize::MAX);

        assert!(maze.is_perfect());
    }

    #[test]
    fn test_same_seed_same_maze() {
        let first = Maze::generate(12, &mut ChaCha8Rng::seed_from_u64(7));
        let second = Maze::generate(12, &mut ChaCha8Rng::seed_from_u64(7));

        assert_eq!(first, second);
    }

    #[test]
    fn test_distances_from_unreachable_cells() {
        let mut maze = Maze::new(2);
        maze.remove_wall_between(Position::new(0, 0), Position::new(1, 0));

        let distances = maze.distances_from(maze.entrance());

        assert_eq!(distances, vec![Some(0), Some(1), None, None]);
        assert!(!maze.is_perfect());
    }

    proptest! {
        #[test]
        fn generated_mazes_are_spanning_trees(size in 1_usize..=24, seed in any::<u64>()) {
            let maze = Maze::generate(size, &mut ChaCha8Rng::seed_from_u64(seed));

            prop_assert_eq!(maze.passage_count(), size * size - 1);
            prop_assert!(maze
                .distances_from(maze.entrance())
                .iter()
                .all(Option::is_some));
        }

        #[test]
        fn walls_stay_symmetric(size in 2_usize..=16, seed in any::<u64>()) {
            let maze = Maze::generate(size, &mut ChaCha8Rng::seed_from_u64(seed));

            for cell in maze.cells() {
                for direction in Direction::ALL {
                    if let Some(next) = maze.neighbor(cell.position, direction) {
                        prop_assert_eq!(
                            maze.has_wall(cell.position, direction),
                            maze.has_wall(next, direction.opposite())
                        );
                    }
                }
            }
        }
    }
}
