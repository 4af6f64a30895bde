//! Character raster of a maze.
//!
//! A maze of `n × n` cells is laid out on a `(2n + 1) × (2n + 1)` grid of tiles: cells sit on odd
//! coordinates, the tiles between two cells are either a wall or an open passage, and the tiles on
//! even coordinates in both axes are always wall corners. The terminal interface draws this raster
//! point by point and the headless mode prints it.

use std::fmt;

use color_eyre::eyre::Result;

use crate::maze::{Maze, Position};

/// Content of a single raster tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    /// Solid wall or corner.
    Wall,
    /// A cell or a knocked-down wall between two cells.
    Open,
}

/// Tile grid view of a maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Number of tiles per row and per column.
    side: usize,
    /// Row-major tiles.
    tiles: Vec<Tile>,
    /// Entrance cell of the source maze.
    entrance: Position,
    /// Exit cell of the source maze.
    exit: Position,
}

impl Raster {
    /// Lays out the tiles of a maze.
    #[must_use]
    pub fn from_maze(maze: &Maze) -> Self {
        let side = maze.size() * 2 + 1;
        let mut tiles = vec![Tile::Wall; side * side];

        for cell in maze.cells() {
            let (col, row) = cell_to_raster(cell.position);
            let mut open = vec![(col, row)];
            if maze.can_move(cell.position, Position::new(cell.position.x + 1, cell.position.y)) {
                open.push((col + 1, row));
            }
            if maze.can_move(cell.position, Position::new(cell.position.x, cell.position.y + 1)) {
                open.push((col, row + 1));
            }

            for (col, row) in open {
                if let Some(tile) = tiles.get_mut(row * side + col) {
                    *tile = Tile::Open;
                }
            }
        }

        Self {
            side,
            tiles,
            entrance: maze.entrance(),
            exit: maze.exit(),
        }
    }

    /// Number of tiles per row and per column.
    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    /// The tile at a raster coordinate.
    #[must_use]
    pub fn tile(&self, col: usize, row: usize) -> Option<Tile> {
        if col >= self.side || row >= self.side {
            return None;
        }

        self.tiles.get(row * self.side + col).copied()
    }

    /// Raster coordinates of every wall tile.
    #[must_use]
    pub fn wall_coords(&self) -> Vec<(usize, usize)> {
        (0..self.side)
            .flat_map(|row| (0..self.side).map(move |col| (col, row)))
            .filter(|&(col, row)| self.tile(col, row) == Some(Tile::Wall))
            .collect()
    }

    /// Renders the raster as text, marking the cells of `path` and the passages between them.
    ///
    /// Walls are `#`, open tiles are blank, the entrance is `S`, the exit is `E`, and the path is
    /// drawn with `.`.
    #[must_use]
    pub fn render(&self, path: &[Position]) -> String {
        let trail = trail_coords(path);
        let entrance = cell_to_raster(self.entrance);
        let exit = cell_to_raster(self.exit);

        let mut out = String::with_capacity((self.side + 1) * self.side);
        for row in 0..self.side {
            for col in 0..self.side {
                let symbol = if (col, row) == entrance {
                    'S'
                } else if (col, row) == exit {
                    'E'
                } else if self.tile(col, row) == Some(Tile::Wall) {
                    '#'
                } else if trail.contains(&(col, row)) {
                    '.'
                } else {
                    ' '
                };
                out.push(symbol);
            }
            out.push('\n');
        }

        out
    }
}

impl fmt::Display for Raster {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.render(&[]))
    }
}

/// Raster coordinate `(col, row)` of a cell.
#[must_use]
pub const fn cell_to_raster(position: Position) -> (usize, usize) {
    (position.x * 2 + 1, position.y * 2 + 1)
}

/// Cell sitting on a raster coordinate, if the coordinate is a cell rather than a wall slot.
#[must_use]
pub const fn raster_to_cell(col: usize, row: usize) -> Option<Position> {
    if col % 2 == 1 && row % 2 == 1 {
        Some(Position::new(col / 2, row / 2))
    } else {
        None
    }
}

/// Raster coordinates covering a sequence of cells, including the tiles between consecutive
/// adjacent cells so the trail reads as a continuous line.
#[must_use]
pub fn trail_coords(cells: &[Position]) -> Vec<(usize, usize)> {
    let mut coords: Vec<(usize, usize)> = cells.iter().copied().map(cell_to_raster).collect();

    for pair in cells.windows(2) {
        if let [from, to] = pair {
            if from.is_adjacent(*to) {
                let (from_col, from_row) = cell_to_raster(*from);
                let (to_col, to_row) = cell_to_raster(*to);
                coords.push(((from_col + to_col) / 2, (from_row + to_row) / 2));
            }
        }
    }

    coords
}

/// Transforms raster coordinates to canvas coordinates centred on the origin.
///
/// This function converts raster coordinates (col, row) to screen coordinates (x, y) using the
/// transformation formulas: y = (n - 1) / 2 - row for rows (the canvas y axis points up) and
/// x = col - (n - 1) / 2 for columns, where n is the raster side.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
pub fn transform_raster_to_screen_coords(
    raster_coords: &[(usize, usize)],
    side: usize,
) -> Result<Vec<(f64, f64)>> {
    let side_n = f64::from(u16::try_from(side)?);

    raster_coords
        .iter()
        .map(|&(col, row)| {
            let screen_y = (side_n - 1.) / 2. - f64::from(u16::try_from(row)?);
            let screen_x = f64::from(u16::try_from(col)?) - (side_n - 1.) / 2.;

            Ok((screen_x, screen_y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_maze_raster_is_walls_around_cells() {
        let raster = Raster::from_maze(&Maze::new(2));

        assert_eq!(raster.side(), 5);
        assert_eq!(raster.to_string(), "#####\n#S# #\n#####\n# #E#\n#####\n");
    }

    #[test]
    fn test_first_neighbor_maze_render() {
        let maze = Maze::generate_with(4, |_| 0);
        let raster = Raster::from_maze(&maze);
        let path = crate::pathfinding::bfs(&maze).path;

        let expected = "\
#########
#S......#
#######.#
# #   #.#
# # # #.#
# # # #.#
# # # #.#
#   #  E#
#########
";
        assert_eq!(raster.render(&path), expected);
    }

    #[test]
    fn test_wall_count_of_perfect_maze() {
        let maze = Maze::generate_with(6, |count| count / 2);
        let raster = Raster::from_maze(&maze);

        // Cells plus one passage per spanning-tree edge are open; the rest is wall.
        let open = maze.cell_count() + maze.passage_count();
        assert_eq!(raster.wall_coords().len(), raster.side() * raster.side() - open);
    }

    #[test]
    fn test_raster_cell_conversion() {
        assert_eq!(cell_to_raster(Position::new(2, 3)), (5, 7));
        assert_eq!(raster_to_cell(5, 7), Some(Position::new(2, 3)));
        assert_eq!(raster_to_cell(4, 7), None);
        assert_eq!(raster_to_cell(0, 0), None);
    }

    #[test]
    fn test_trail_includes_passages() {
        let trail = trail_coords(&[Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)]);

        assert_eq!(trail, vec![(1, 1), (3, 1), (3, 3), (2, 1), (3, 2)]);
    }

    #[test]
    fn test_transform_centres_raster() {
        let coords = transform_raster_to_screen_coords(&[(0, 0), (4, 4), (2, 2)], 5)
            .expect("coordinates should convert");

        assert_eq!(coords, vec![(-2.0, 2.0), (2.0, -2.0), (0.0, 0.0)]);
    }

    #[test]
    fn test_tile_out_of_bounds() {
        let raster = Raster::from_maze(&Maze::new(1));

        assert_eq!(raster.tile(1, 1), Some(Tile::Open));
        assert_eq!(raster.tile(3, 0), None);
    }
}
