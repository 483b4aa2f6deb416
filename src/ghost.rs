use crate::constants::vulnerable_speed;
use crate::motion::Position;
use crate::player::Player;
use crate::types::{Cell, Direction, GhostKind, GhostMode, GhostView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    None,
    PlayerCaught,
    GhostCaptured { points: u32 },
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub kind: GhostKind,
    pub position: Position,
    pub dir: Direction,
    pub home: Cell,
    pub target: Cell,
    mode: GhostMode,
    vulnerable_ticks: u32,
    base_speed: i32,
    cell_size: i32,
}

impl Ghost {
    pub fn new(kind: GhostKind, home: Cell, base_speed: i32, cell_size: i32) -> Self {
        Self {
            kind,
            position: Position::at_cell(home, cell_size),
            dir: Direction::Left,
            home,
            target: home,
            mode: GhostMode::Normal,
            vulnerable_ticks: 0,
            base_speed,
            cell_size,
        }
    }

    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    pub fn vulnerable_ticks(&self) -> u32 {
        self.vulnerable_ticks
    }

    pub fn cell(&self) -> Cell {
        self.position.cell(self.cell_size)
    }

    pub fn is_aligned(&self) -> bool {
        self.position.is_aligned(self.cell_size)
    }

    pub fn speed(&self) -> i32 {
        match self.mode {
            GhostMode::Vulnerable => vulnerable_speed(self.base_speed),
            GhostMode::Normal | GhostMode::Returning => self.base_speed,
        }
    }

    /// Power-item broadcast. Restarts the countdown if already vulnerable;
    /// ignored while returning home. Returns whether the signal took effect.
    pub fn frighten(&mut self, ticks: u32) -> bool {
        match self.mode {
            GhostMode::Returning => false,
            GhostMode::Normal | GhostMode::Vulnerable => {
                self.mode = GhostMode::Vulnerable;
                self.vulnerable_ticks = ticks;
                true
            }
        }
    }

    /// Per-tick countdown. A countdown of `n` keeps the ghost vulnerable for
    /// `n` calls; the next call returns it to normal. Returns `true` on that
    /// transition.
    pub fn tick_timer(&mut self) -> bool {
        if self.mode != GhostMode::Vulnerable {
            return false;
        }
        if self.vulnerable_ticks == 0 {
            self.mode = GhostMode::Normal;
            return true;
        }
        self.vulnerable_ticks -= 1;
        false
    }

    /// Ends the trip home once the ghost stands on its home cell.
    pub fn check_home(&mut self) -> bool {
        if self.mode == GhostMode::Returning && self.cell() == self.home {
            self.mode = GhostMode::Normal;
            return true;
        }
        false
    }

    /// Resolves a meeting with the player: sharing a cell, or `swapped` when
    /// both traded cells during this tick's motion.
    pub fn resolve_contact(
        &mut self,
        player: &mut Player,
        base_score: u32,
        swapped: bool,
    ) -> Contact {
        if !player.alive || (self.cell() != player.cell() && !swapped) {
            return Contact::None;
        }
        match self.mode {
            GhostMode::Normal => {
                player.alive = false;
                Contact::PlayerCaught
            }
            GhostMode::Vulnerable => {
                self.mode = GhostMode::Returning;
                self.vulnerable_ticks = 0;
                let points = player.award_capture(base_score);
                Contact::GhostCaptured { points }
            }
            GhostMode::Returning => Contact::None,
        }
    }

    pub fn reset(&mut self) {
        self.position = Position::at_cell(self.home, self.cell_size);
        self.dir = Direction::Left;
        self.target = self.home;
        self.mode = GhostMode::Normal;
        self.vulnerable_ticks = 0;
    }

    pub fn view(&self) -> GhostView {
        let cell = self.cell();
        GhostView {
            kind: self.kind,
            x: cell.x,
            y: cell.y,
            sub_x: self.position.x,
            sub_y: self.position.y,
            dir: self.dir,
            mode: self.mode,
            vulnerable_ticks: self.vulnerable_ticks,
            home: self.home,
            target: self.target,
        }
    }
}
