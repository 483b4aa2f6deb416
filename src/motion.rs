//! Sub-cell motion along the grid and wall collision at cell granularity.
//!
//! Positions are integer sub-cell units with the origin at the top-left of
//! cell (0,0). An entity covers one full cell, so its trailing edge sits at
//! `position + cell_size - 1` on each axis.

use crate::maze::Walls;
use crate::types::{Cell, Direction};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn at_cell(cell: Cell, cell_size: i32) -> Self {
        Self {
            x: cell.x * cell_size,
            y: cell.y * cell_size,
        }
    }

    pub fn cell(self, cell_size: i32) -> Cell {
        Cell::new(self.x.div_euclid(cell_size), self.y.div_euclid(cell_size))
    }

    /// Offset from the owning cell's origin, each axis in `0..cell_size`.
    pub fn offset(self, cell_size: i32) -> (i32, i32) {
        (self.x.rem_euclid(cell_size), self.y.rem_euclid(cell_size))
    }

    pub fn is_aligned(self, cell_size: i32) -> bool {
        self.offset(cell_size) == (0, 0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Allowed,
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProposedStep {
    pub position: Position,
    pub crosses_cell: bool,
}

/// Proposed position after moving `speed` units along `dir`.
///
/// A step never carries past the next cell boundary, so entities always land
/// exactly on alignment before they can turn.
pub fn propose(position: Position, dir: Direction, speed: i32, cell_size: i32) -> ProposedStep {
    let (dx, dy) = dir.delta();
    let (ox, oy) = position.offset(cell_size);
    let room = match dir {
        Direction::Right => cell_size - ox,
        Direction::Down => cell_size - oy,
        Direction::Left if ox > 0 => ox,
        Direction::Up if oy > 0 => oy,
        Direction::Left | Direction::Up => cell_size,
        Direction::None => 0,
    };
    let distance = speed.max(0).min(room);
    let next = Position {
        x: position.x + dx * distance,
        y: position.y + dy * distance,
    };
    ProposedStep {
        position: next,
        crosses_cell: next.cell(cell_size) != position.cell(cell_size),
    }
}

/// Leading-corner check for up/left; leading and trailing corner for
/// right/down.
pub fn check<W: Walls + ?Sized>(
    walls: &W,
    proposed: Position,
    dir: Direction,
    cell_size: i32,
) -> Collision {
    let lead = proposed.cell(cell_size);
    let blocked = match dir {
        Direction::Up | Direction::Left => walls.is_blocked(lead),
        Direction::Right => {
            let trail = Position {
                x: proposed.x + cell_size - 1,
                y: proposed.y,
            };
            walls.is_blocked(lead) || walls.is_blocked(trail.cell(cell_size))
        }
        Direction::Down => {
            let trail = Position {
                x: proposed.x,
                y: proposed.y + cell_size - 1,
            };
            walls.is_blocked(lead) || walls.is_blocked(trail.cell(cell_size))
        }
        Direction::None => false,
    };
    if blocked {
        Collision::Blocked
    } else {
        Collision::Allowed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Stayed,
    Moved,
    Entered(Cell),
    Blocked,
}

/// Proposes, checks and commits one step. A blocked step snaps back to the
/// origin of the current cell.
pub fn advance<W: Walls + ?Sized>(
    walls: &W,
    position: &mut Position,
    dir: Direction,
    speed: i32,
    cell_size: i32,
) -> StepOutcome {
    if dir == Direction::None || speed <= 0 {
        return StepOutcome::Stayed;
    }
    let step = propose(*position, dir, speed, cell_size);
    match check(walls, step.position, dir, cell_size) {
        Collision::Blocked => {
            *position = Position::at_cell(position.cell(cell_size), cell_size);
            StepOutcome::Blocked
        }
        Collision::Allowed => {
            *position = step.position;
            if step.crosses_cell {
                StepOutcome::Entered(step.position.cell(cell_size))
            } else {
                StepOutcome::Moved
            }
        }
    }
}

/// Whether the neighbouring cell in `dir` can be entered from `cell`.
pub fn can_enter<W: Walls + ?Sized>(walls: &W, cell: Cell, dir: Direction) -> bool {
    dir != Direction::None && !walls.is_blocked(cell.step(dir, 1))
}
