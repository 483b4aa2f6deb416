use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

use crate::types::Cell;

/// Read-only wall geometry consumed by motion and steering.
pub trait Walls {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn is_wall(&self, x: i32, y: i32) -> bool;

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }

    /// Wall or outside the grid.
    fn is_blocked(&self, cell: Cell) -> bool {
        !self.in_bounds(cell.x, cell.y) || self.is_wall(cell.x, cell.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MazeError {
    Empty,
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    UnknownTile {
        row: usize,
        col: usize,
        tile: char,
    },
    MissingPlayerStart,
    DuplicatePlayerStart {
        first: Cell,
        second: Cell,
    },
    Unreachable {
        cell: Cell,
    },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "level has no rows"),
            Self::RowLengthMismatch {
                row,
                expected,
                actual,
            } => write!(
                f,
                "line length mismatch at row {row}: {actual} != {expected}"
            ),
            Self::UnknownTile { row, col, tile } => {
                write!(f, "unknown tile {tile:?} at ({col},{row})")
            }
            Self::MissingPlayerStart => write!(f, "level has no player start"),
            Self::DuplicatePlayerStart { first, second } => write!(
                f,
                "level has two player starts: ({},{}) and ({},{})",
                first.x, first.y, second.x, second.y
            ),
            Self::Unreachable { cell } => write!(
                f,
                "cell ({},{}) is unreachable from the player start",
                cell.x, cell.y
            ),
        }
    }
}

impl std::error::Error for MazeError {}

#[derive(Clone, Debug)]
pub struct Maze {
    width: i32,
    height: i32,
    tiles: Vec<Vec<Tile>>,
    dots: BTreeSet<Cell>,
    power_items: BTreeSet<Cell>,
    player_start: Cell,
    ghost_homes: Vec<Cell>,
}

impl Maze {
    /// Parses the text level format: `W` wall, `.` dot, `P` power item,
    /// `S` player start, `G` adversary home, space or `-` bare floor.
    pub fn parse(source: &str) -> Result<Self, MazeError> {
        let lines: Vec<&str> = source
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(MazeError::Empty);
        };
        let expected = first.chars().count();

        let mut tiles = Vec::with_capacity(lines.len());
        let mut dots = BTreeSet::new();
        let mut power_items = BTreeSet::new();
        let mut player_start: Option<Cell> = None;
        let mut ghost_homes = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            let actual = line.chars().count();
            if actual != expected {
                return Err(MazeError::RowLengthMismatch {
                    row,
                    expected,
                    actual,
                });
            }
            let mut out = Vec::with_capacity(expected);
            for (col, tile) in line.chars().enumerate() {
                let cell = Cell::new(col as i32, row as i32);
                match tile {
                    'W' => {
                        out.push(Tile::Wall);
                        continue;
                    }
                    '.' => {
                        dots.insert(cell);
                    }
                    'P' => {
                        power_items.insert(cell);
                    }
                    'S' => {
                        if let Some(first) = player_start {
                            return Err(MazeError::DuplicatePlayerStart {
                                first,
                                second: cell,
                            });
                        }
                        player_start = Some(cell);
                    }
                    'G' => ghost_homes.push(cell),
                    ' ' | '-' => {}
                    _ => return Err(MazeError::UnknownTile { row, col, tile }),
                }
                out.push(Tile::Open);
            }
            tiles.push(out);
        }

        let player_start = player_start.ok_or(MazeError::MissingPlayerStart)?;
        let maze = Self {
            width: expected as i32,
            height: tiles.len() as i32,
            tiles,
            dots,
            power_items,
            player_start,
            ghost_homes,
        };
        maze.check_reachability()?;
        Ok(maze)
    }

    fn check_reachability(&self) -> Result<(), MazeError> {
        let reachable = self.reachable_from(self.player_start);
        let required = self
            .dots
            .iter()
            .chain(self.power_items.iter())
            .chain(self.ghost_homes.iter());
        for cell in required {
            if !reachable.contains(cell) {
                return Err(MazeError::Unreachable { cell: *cell });
            }
        }
        Ok(())
    }

    fn reachable_from(&self, start: Cell) -> HashSet<Cell> {
        let mut out = HashSet::new();
        if self.is_blocked(start) {
            return out;
        }
        let mut queue = VecDeque::new();
        out.insert(start);
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            for next in [
                Cell::new(cell.x - 1, cell.y),
                Cell::new(cell.x + 1, cell.y),
                Cell::new(cell.x, cell.y - 1),
                Cell::new(cell.x, cell.y + 1),
            ] {
                if self.is_blocked(next) {
                    continue;
                }
                if out.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        out
    }

    pub fn player_start(&self) -> Cell {
        self.player_start
    }

    /// Home cell for the `index`-th adversary; homes are reused in order when
    /// the level declares fewer than needed.
    pub fn ghost_home(&self, index: usize) -> Cell {
        if self.ghost_homes.is_empty() {
            return self.player_start;
        }
        self.ghost_homes[index % self.ghost_homes.len()]
    }

    /// Bottom-left interior cell.
    pub fn retreat_corner(&self) -> Cell {
        Cell::new(1.min(self.width - 1), (self.height - 2).max(0))
    }

    pub fn collect_dot(&mut self, cell: Cell) -> bool {
        self.dots.remove(&cell)
    }

    pub fn collect_power_item(&mut self, cell: Cell) -> bool {
        self.power_items.remove(&cell)
    }

    pub fn has_power_item(&self, cell: Cell) -> bool {
        self.power_items.contains(&cell)
    }

    pub fn remaining_dots(&self) -> usize {
        self.dots.len()
    }

    pub fn remaining_power_items(&self) -> usize {
        self.power_items.len()
    }

    pub fn is_cleared(&self) -> bool {
        self.dots.is_empty() && self.power_items.is_empty()
    }
}

impl Walls for Maze {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_wall(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return true;
        }
        self.tiles
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .map(|tile| *tile == Tile::Wall)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_LEVEL;

    const SMALL: &str = "\
WWWWW
WS.PW
W.W.W
WG..W
WWWWW
";

    #[test]
    fn parses_tiles_items_and_spawns() {
        let maze = Maze::parse(SMALL).expect("small level parses");
        assert_eq!(maze.width(), 5);
        assert_eq!(maze.height(), 5);
        assert_eq!(maze.player_start(), Cell::new(1, 1));
        assert_eq!(maze.ghost_home(0), Cell::new(1, 3));
        assert_eq!(maze.ghost_home(3), Cell::new(1, 3));
        assert_eq!(maze.remaining_dots(), 5);
        assert_eq!(maze.remaining_power_items(), 1);
        assert!(maze.is_wall(0, 0));
        assert!(maze.is_wall(2, 2));
        assert!(!maze.is_wall(1, 1));
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let maze = Maze::parse(SMALL).expect("small level parses");
        assert!(maze.is_wall(-1, 1));
        assert!(maze.is_wall(5, 1));
        assert!(maze.is_blocked(Cell::new(1, 99)));
    }

    #[test]
    fn collecting_removes_each_item_once() {
        let mut maze = Maze::parse(SMALL).expect("small level parses");
        assert!(maze.collect_dot(Cell::new(2, 1)));
        assert!(!maze.collect_dot(Cell::new(2, 1)));
        assert!(!maze.collect_dot(Cell::new(3, 1)));
        assert!(maze.collect_power_item(Cell::new(3, 1)));
        assert!(!maze.collect_power_item(Cell::new(3, 1)));
        assert!(!maze.is_cleared());
        for cell in [Cell::new(1, 2), Cell::new(3, 2), Cell::new(2, 3), Cell::new(3, 3)] {
            maze.collect_dot(cell);
        }
        assert!(maze.is_cleared());
    }

    #[test]
    fn mismatched_rows_fail_fast() {
        let err = Maze::parse("WWW\nWS\nWWW\n").expect_err("ragged level rejected");
        assert_eq!(
            err,
            MazeError::RowLengthMismatch {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_missing_start_unknown_tiles_and_empty_input() {
        assert_eq!(Maze::parse("\n\n").unwrap_err(), MazeError::Empty);
        assert_eq!(
            Maze::parse("WWW\nW.W\nWWW").unwrap_err(),
            MazeError::MissingPlayerStart
        );
        assert_eq!(
            Maze::parse("WWW\nWSX\nWWW").unwrap_err(),
            MazeError::UnknownTile {
                row: 1,
                col: 2,
                tile: 'X'
            }
        );
        assert!(matches!(
            Maze::parse("WWWW\nWSSW\nWWWW").unwrap_err(),
            MazeError::DuplicatePlayerStart { .. }
        ));
    }

    #[test]
    fn walled_off_dot_is_unreachable() {
        let err = Maze::parse("WWWWW\nWS.WW\nWWW.W\nWWWWW").expect_err("isolated dot");
        assert_eq!(err, MazeError::Unreachable { cell: Cell::new(3, 2) });
        assert!(err.to_string().contains("unreachable"));
    }

    #[test]
    fn missing_homes_fall_back_to_player_start() {
        let maze = Maze::parse("WWWW\nWS.W\nWWWW").expect("level parses");
        assert_eq!(maze.ghost_home(2), maze.player_start());
    }

    #[test]
    fn bundled_level_is_well_formed() {
        let maze = Maze::parse(DEFAULT_LEVEL).expect("bundled level parses");
        assert_eq!(maze.width(), 21);
        assert_eq!(maze.height(), 21);
        assert_eq!(maze.remaining_power_items(), 4);
        assert_eq!(maze.retreat_corner(), Cell::new(1, 19));
        for index in 0..4 {
            let home = maze.ghost_home(index);
            assert!(!maze.is_wall(home.x, home.y));
        }
    }
}
