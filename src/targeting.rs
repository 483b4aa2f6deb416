use crate::constants::{AMBUSH_LOOKAHEAD, FLANK_LOOKAHEAD, RETREAT_DISTANCE};
use crate::rng::RandomSource;
use crate::types::{Cell, Direction, GhostKind, GhostMode};

/// Everything one adversary may look at when picking its target cell.
#[derive(Clone, Copy, Debug)]
pub struct TargetContext {
    pub kind: GhostKind,
    pub mode: GhostMode,
    pub ghost_cell: Cell,
    pub home: Cell,
    pub player_cell: Cell,
    pub player_dir: Direction,
    /// Live cell of the flanker's leader, when one is modelled.
    pub leader_cell: Option<Cell>,
    /// Stand-in for a missing leader. Defaults to the maze origin, which is a
    /// simplification rather than a pursuit rule.
    pub leader_fallback: Cell,
    pub retreat_corner: Cell,
    pub width: i32,
    pub height: i32,
}

pub fn target<R: RandomSource + ?Sized>(ctx: &TargetContext, rng: &mut R) -> Cell {
    match ctx.mode {
        GhostMode::Returning => ctx.home,
        GhostMode::Vulnerable => flee_target(ctx.width, ctx.height, rng),
        GhostMode::Normal => match ctx.kind {
            GhostKind::Blinky => ctx.player_cell,
            GhostKind::Pinky => ambush_target(ctx.player_cell, ctx.player_dir),
            GhostKind::Inky => flank_target(
                ctx.player_cell,
                ctx.player_dir,
                ctx.leader_cell.unwrap_or(ctx.leader_fallback),
            ),
            GhostKind::Clyde => {
                distance_switch_target(ctx.ghost_cell, ctx.player_cell, ctx.retreat_corner)
            }
        },
    }
}

pub fn ambush_target(player_cell: Cell, player_dir: Direction) -> Cell {
    player_cell.step(player_dir, AMBUSH_LOOKAHEAD)
}

/// Doubles the leader-to-pivot vector, pivot being two cells ahead of the player.
pub fn flank_target(player_cell: Cell, player_dir: Direction, leader: Cell) -> Cell {
    let pivot = player_cell.step(player_dir, FLANK_LOOKAHEAD);
    Cell::new(
        pivot.x + (pivot.x - leader.x),
        pivot.y + (pivot.y - leader.y),
    )
}

/// Chases while strictly farther than the threshold, retreats otherwise.
pub fn distance_switch_target(ghost_cell: Cell, player_cell: Cell, retreat_corner: Cell) -> Cell {
    if ghost_cell.distance(player_cell) > RETREAT_DISTANCE {
        player_cell
    } else {
        retreat_corner
    }
}

/// Fresh uniform in-bounds cell on every call.
pub fn flee_target<R: RandomSource + ?Sized>(width: i32, height: i32, rng: &mut R) -> Cell {
    Cell::new(
        rng.int(0, (width - 1).max(0)),
        rng.int(0, (height - 1).max(0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{Rng, ScriptedRandom};

    fn context(kind: GhostKind) -> TargetContext {
        TargetContext {
            kind,
            mode: GhostMode::Normal,
            ghost_cell: Cell::new(1, 1),
            home: Cell::new(10, 9),
            player_cell: Cell::new(10, 10),
            player_dir: Direction::Right,
            leader_cell: Some(Cell::new(6, 10)),
            leader_fallback: Cell::ORIGIN,
            retreat_corner: Cell::new(1, 19),
            width: 21,
            height: 21,
        }
    }

    #[test]
    fn direct_chaser_targets_player_cell() {
        let mut rng = Rng::new(1);
        assert_eq!(target(&context(GhostKind::Blinky), &mut rng), Cell::new(10, 10));
    }

    #[test]
    fn ambusher_leads_player_by_four_cells() {
        let player = Cell::new(10, 10);
        assert_eq!(ambush_target(player, Direction::Right), Cell::new(14, 10));
        assert_eq!(ambush_target(player, Direction::Left), Cell::new(6, 10));
        assert_eq!(ambush_target(player, Direction::Up), Cell::new(10, 6));
        assert_eq!(ambush_target(player, Direction::Down), Cell::new(10, 14));
        assert_eq!(ambush_target(player, Direction::None), player);
    }

    #[test]
    fn flanker_doubles_leader_vector() {
        // pivot = (12,10); leader (6,10) -> vector (6,0) -> target (18,10)
        let mut rng = Rng::new(1);
        assert_eq!(target(&context(GhostKind::Inky), &mut rng), Cell::new(18, 10));

        let mut ctx = context(GhostKind::Inky);
        ctx.player_dir = Direction::Up;
        ctx.leader_cell = Some(Cell::new(12, 12));
        // pivot = (10,8); vector (-2,-4) -> target (8,4)
        assert_eq!(target(&ctx, &mut rng), Cell::new(8, 4));
    }

    #[test]
    fn flanker_uses_configured_fallback_when_leader_missing() {
        let mut rng = Rng::new(1);
        let mut ctx = context(GhostKind::Inky);
        ctx.leader_cell = None;
        // pivot (12,10) doubled from origin
        assert_eq!(target(&ctx, &mut rng), Cell::new(24, 20));

        ctx.leader_fallback = Cell::new(12, 10);
        assert_eq!(target(&ctx, &mut rng), Cell::new(12, 10));
    }

    #[test]
    fn distance_switch_boundary_is_strict() {
        let corner = Cell::new(1, 19);
        let player = Cell::new(10, 10);
        assert_eq!(distance_switch_target(Cell::new(2, 10), player, corner), corner);
        assert_eq!(distance_switch_target(Cell::new(1, 10), player, corner), player);
        // 6-8-10 triangle: exactly 10 > 8
        assert_eq!(distance_switch_target(Cell::new(4, 2), player, corner), player);
        // exactly 8 retreats
        assert_eq!(distance_switch_target(Cell::new(10, 2), player, corner), corner);
    }

    #[test]
    fn clyde_reads_its_own_distance() {
        let mut rng = Rng::new(1);
        let mut ctx = context(GhostKind::Clyde);
        assert_eq!(target(&ctx, &mut rng), ctx.player_cell);
        ctx.ghost_cell = Cell::new(9, 10);
        assert_eq!(target(&ctx, &mut rng), ctx.retreat_corner);
    }

    #[test]
    fn returning_overrides_every_identity() {
        let mut rng = Rng::new(1);
        for kind in GhostKind::ROSTER {
            let mut ctx = context(kind);
            ctx.mode = GhostMode::Returning;
            assert_eq!(target(&ctx, &mut rng), ctx.home);
        }
    }

    #[test]
    fn vulnerable_targets_are_redrawn_each_call() {
        let mut scripted = ScriptedRandom::new(vec![3, 4, 17, 2]);
        let mut ctx = context(GhostKind::Blinky);
        ctx.mode = GhostMode::Vulnerable;
        assert_eq!(target(&ctx, &mut scripted), Cell::new(3, 4));
        assert_eq!(target(&ctx, &mut scripted), Cell::new(17, 2));
    }

    #[test]
    fn flee_targets_stay_in_bounds() {
        for seed in 0..200u32 {
            let mut rng = Rng::new(seed);
            for _ in 0..20 {
                let cell = flee_target(21, 15, &mut rng);
                assert!((0..21).contains(&cell.x));
                assert!((0..15).contains(&cell.y));
            }
        }
    }
}
