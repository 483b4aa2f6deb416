use super::*;

impl GameEngine {
    /// Settles meetings in roster order once everyone has moved. A ghost and
    /// the player that traded cells this tick met head-on.
    pub(super) fn resolve_contacts(&mut self, player_before: Cell, ghosts_before: &[Cell]) {
        let base_score = self.options.capture_base_score;
        let player_after = self.player.cell();
        for (ghost, ghost_before) in self.ghosts.iter_mut().zip(ghosts_before) {
            let swapped = player_before == ghost.cell() && *ghost_before == player_after;
            match ghost.resolve_contact(&mut self.player, base_score, swapped) {
                Contact::PlayerCaught => {
                    self.events.push(RuntimeEvent::PlayerCaught { by: ghost.kind });
                }
                Contact::GhostCaptured { points } => {
                    self.events.push(RuntimeEvent::GhostCaptured {
                        kind: ghost.kind,
                        points,
                    });
                }
                Contact::None => {}
            }
        }
    }

    pub(super) fn tick_timers(&mut self) {
        for ghost in &mut self.ghosts {
            if ghost.tick_timer() {
                self.events.push(RuntimeEvent::GhostCalmed { kind: ghost.kind });
            }
        }
    }
}
