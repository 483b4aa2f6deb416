use super::*;
use crate::maze::Walls;
use crate::motion;
use crate::steering::choose_direction;
use crate::targeting::{self, TargetContext};

impl GameEngine {
    pub(super) fn update_ghosts(&mut self) {
        // Leader position is read once, before anyone moves this tick.
        let leader_cell = self
            .ghosts
            .iter()
            .find(|ghost| ghost.kind == GhostKind::Blinky)
            .map(Ghost::cell);
        let player_cell = self.player.cell();
        let player_dir = self.player.dir;
        let retreat_corner = self.maze.retreat_corner();
        let (width, height) = (self.maze.width(), self.maze.height());
        let cell_size = self.options.cell_size;

        for ghost in &mut self.ghosts {
            if ghost.check_home() {
                self.events.push(RuntimeEvent::GhostRecovered { kind: ghost.kind });
            }

            let ctx = TargetContext {
                kind: ghost.kind,
                mode: ghost.mode(),
                ghost_cell: ghost.cell(),
                home: ghost.home,
                player_cell,
                player_dir,
                leader_cell,
                leader_fallback: self.options.leader_fallback,
                retreat_corner,
                width,
                height,
            };
            ghost.target = targeting::target(&ctx, &mut self.rng);

            if ghost.is_aligned() {
                ghost.dir = choose_direction(&self.maze, ghost.cell(), ghost.dir, ghost.target);
            }
            let speed = ghost.speed();
            let _ = motion::advance(&self.maze, &mut ghost.position, ghost.dir, speed, cell_size);

            if ghost.check_home() {
                self.events.push(RuntimeEvent::GhostRecovered { kind: ghost.kind });
            }
        }
    }
}
