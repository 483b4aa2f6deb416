use crate::constants::STARTING_LIVES;
use crate::maze::{Maze, Walls};
use crate::motion::{self, Position, StepOutcome};
use crate::types::{Cell, Direction, PlayerView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pickup {
    Dot,
    PowerItem,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub position: Position,
    pub dir: Direction,
    pub queued: Option<Direction>,
    pub score: u32,
    pub lives: u32,
    /// Capture reward multiplier; 1 after each power item, doubled per capture.
    pub multiplier: u32,
    pub alive: bool,
    spawn: Cell,
    speed: i32,
    cell_size: i32,
}

impl Player {
    pub fn new(spawn: Cell, speed: i32, cell_size: i32) -> Self {
        Self {
            position: Position::at_cell(spawn, cell_size),
            dir: Direction::Right,
            queued: None,
            score: 0,
            lives: STARTING_LIVES,
            multiplier: 1,
            alive: true,
            spawn,
            speed,
            cell_size,
        }
    }

    pub fn cell(&self) -> Cell {
        self.position.cell(self.cell_size)
    }

    pub fn is_aligned(&self) -> bool {
        self.position.is_aligned(self.cell_size)
    }

    /// Buffers one pending turn, replacing any earlier one.
    pub fn queue_turn(&mut self, dir: Direction) {
        if dir == Direction::None {
            return;
        }
        self.queued = Some(dir);
    }

    /// Moves one tick. A queued turn is consumed at the first aligned tick:
    /// taken if the neighbouring cell is open, dropped otherwise.
    pub fn advance<W: Walls + ?Sized>(&mut self, walls: &W) -> StepOutcome {
        if !self.alive {
            return StepOutcome::Stayed;
        }
        if self.is_aligned() {
            if let Some(turn) = self.queued.take() {
                if motion::can_enter(walls, self.cell(), turn) {
                    self.dir = turn;
                }
            }
        }
        motion::advance(walls, &mut self.position, self.dir, self.speed, self.cell_size)
    }

    pub fn collect(
        &mut self,
        maze: &mut Maze,
        cell: Cell,
        dot_score: u32,
        power_item_score: u32,
    ) -> Option<Pickup> {
        if maze.collect_dot(cell) {
            self.score = self.score.saturating_add(dot_score);
            return Some(Pickup::Dot);
        }
        if maze.collect_power_item(cell) {
            self.score = self.score.saturating_add(power_item_score);
            self.multiplier = 1;
            return Some(Pickup::PowerItem);
        }
        None
    }

    /// Credits one capture and doubles the multiplier. Returns the points.
    pub fn award_capture(&mut self, base_score: u32) -> u32 {
        let points = base_score.saturating_mul(self.multiplier);
        self.score = self.score.saturating_add(points);
        self.multiplier = self.multiplier.saturating_mul(2);
        points
    }

    /// Returns whether any lives remain.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives > 0
    }

    /// Back to spawn; score and lives are kept.
    pub fn reset(&mut self) {
        self.position = Position::at_cell(self.spawn, self.cell_size);
        self.dir = Direction::Right;
        self.queued = None;
        self.multiplier = 1;
        self.alive = true;
    }

    pub fn view(&self) -> PlayerView {
        let cell = self.cell();
        PlayerView {
            x: cell.x,
            y: cell.y,
            sub_x: self.position.x,
            sub_y: self.position.y,
            dir: self.dir,
            queued_dir: self.queued,
            score: self.score,
            lives: self.lives,
            multiplier: self.multiplier,
            alive: self.alive,
        }
    }
}
