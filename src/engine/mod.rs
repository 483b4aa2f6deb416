use std::fmt;

use crate::constants::{
    CELL_SIZE, DOT_SCORE, GHOST_CAPTURE_BASE_SCORE, GHOST_SPEED, PLAYER_SPEED, POWER_ITEM_SCORE,
    VULNERABLE_TICKS,
};
use crate::ghost::{Contact, Ghost};
use crate::maze::Maze;
use crate::motion::StepOutcome;
use crate::player::{Pickup, Player};
use crate::rng::Rng;
use crate::types::{Cell, Direction, GhostKind, RuntimeEvent, Snapshot};

mod contact_system;
mod ghost_system;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    pub cell_size: i32,
    pub player_speed: i32,
    pub ghost_speed: i32,
    pub vulnerable_ticks: u32,
    pub capture_base_score: u32,
    pub dot_score: u32,
    pub power_item_score: u32,
    /// Leader cell the flanker assumes when no leader is on the board.
    pub leader_fallback: Cell,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            player_speed: PLAYER_SPEED,
            ghost_speed: GHOST_SPEED,
            vulnerable_ticks: VULNERABLE_TICKS,
            capture_base_score: GHOST_CAPTURE_BASE_SCORE,
            dot_score: DOT_SCORE,
            power_item_score: POWER_ITEM_SCORE,
            leader_fallback: Cell::ORIGIN,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionsError {
    ZeroCellSize,
    ZeroSpeed,
    SpeedExceedsCell { speed: i32, cell_size: i32 },
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCellSize => write!(f, "cell size must be positive"),
            Self::ZeroSpeed => write!(f, "speeds must be positive"),
            Self::SpeedExceedsCell { speed, cell_size } => write!(
                f,
                "speed {speed} exceeds cell size {cell_size}"
            ),
        }
    }
}

impl std::error::Error for OptionsError {}

impl EngineOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.cell_size <= 0 {
            return Err(OptionsError::ZeroCellSize);
        }
        for speed in [self.player_speed, self.ghost_speed] {
            if speed <= 0 {
                return Err(OptionsError::ZeroSpeed);
            }
            if speed > self.cell_size {
                return Err(OptionsError::SpeedExceedsCell {
                    speed,
                    cell_size: self.cell_size,
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct GameEngine {
    options: EngineOptions,
    maze: Maze,
    initial_maze: Maze,
    rng: Rng,
    player: Player,
    ghosts: Vec<Ghost>,
    events: Vec<RuntimeEvent>,
    tick_counter: u64,
    level_complete: bool,
}

impl GameEngine {
    pub fn new(maze: Maze, seed: u32, options: EngineOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        let player = Player::new(maze.player_start(), options.player_speed, options.cell_size);
        let ghosts = GhostKind::ROSTER
            .iter()
            .enumerate()
            .map(|(index, kind)| {
                Ghost::new(
                    *kind,
                    maze.ghost_home(index),
                    options.ghost_speed,
                    options.cell_size,
                )
            })
            .collect();

        Ok(Self {
            options,
            initial_maze: maze.clone(),
            maze,
            rng: Rng::new(seed),
            player,
            ghosts,
            events: Vec::new(),
            tick_counter: 0,
            level_complete: false,
        })
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn tick(&self) -> u64 {
        self.tick_counter
    }

    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }

    pub fn is_player_alive(&self) -> bool {
        self.player.alive
    }

    pub fn lives(&self) -> u32 {
        self.player.lives
    }

    pub fn queue_turn(&mut self, dir: Direction) {
        self.player.queue_turn(dir);
    }

    /// Runs one tick. Does nothing once the player is dead or the level is
    /// cleared, until the caller resets.
    pub fn step(&mut self) {
        if !self.player.alive || self.level_complete {
            return;
        }
        self.tick_counter += 1;

        let player_before = self.player.cell();
        let ghosts_before: Vec<Cell> = self.ghosts.iter().map(Ghost::cell).collect();
        self.update_player();
        self.update_ghosts();
        self.resolve_contacts(player_before, &ghosts_before);
        self.tick_timers();

        if self.maze.is_cleared() {
            self.level_complete = true;
            self.events.push(RuntimeEvent::LevelCleared);
        }
    }

    /// Puts the player and every ghost back on their spawn cells in normal
    /// mode with cleared timers. Score, lives and the maze are untouched.
    pub fn reset_actors(&mut self) {
        self.player.reset();
        for ghost in &mut self.ghosts {
            ghost.reset();
        }
    }

    /// Restores every collectible from the level as loaded and resets actors.
    pub fn restart_level(&mut self) {
        self.maze = self.initial_maze.clone();
        self.level_complete = false;
        self.reset_actors();
    }

    /// Decrements a life after a death and resets actors if any remain.
    /// Returns whether play can continue.
    pub fn respawn_after_death(&mut self) -> bool {
        if self.player.alive {
            return true;
        }
        if !self.player.lose_life() {
            return false;
        }
        self.reset_actors();
        true
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let snapshot = Snapshot {
            tick: self.tick_counter,
            player: self.player.view(),
            ghosts: self.ghosts.iter().map(Ghost::view).collect(),
            dots_left: self.maze.remaining_dots(),
            power_items_left: self.maze.remaining_power_items(),
            level_complete: self.level_complete,
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    fn update_player(&mut self) {
        let StepOutcome::Entered(cell) = self.player.advance(&self.maze) else {
            return;
        };
        let pickup = self.player.collect(
            &mut self.maze,
            cell,
            self.options.dot_score,
            self.options.power_item_score,
        );
        match pickup {
            Some(Pickup::Dot) => self.events.push(RuntimeEvent::DotEaten {
                x: cell.x,
                y: cell.y,
            }),
            Some(Pickup::PowerItem) => {
                self.events.push(RuntimeEvent::PowerItemTaken {
                    x: cell.x,
                    y: cell.y,
                });
                self.frighten_ghosts();
            }
            None => {}
        }
    }

    fn frighten_ghosts(&mut self) {
        let ticks = self.options.vulnerable_ticks;
        for ghost in &mut self.ghosts {
            ghost.frighten(ticks);
        }
        self.events.push(RuntimeEvent::GhostsFrightened { ticks });
    }
}
