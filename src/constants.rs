pub const TICK_RATE: u32 = 60;

/// Sub-cell units per grid cell.
pub const CELL_SIZE: i32 = 20;

pub const PLAYER_SPEED: i32 = 2;
pub const GHOST_SPEED: i32 = 2;

pub const VULNERABLE_TICKS: u32 = 600;

pub const AMBUSH_LOOKAHEAD: i32 = 4;
pub const FLANK_LOOKAHEAD: i32 = 2;
pub const RETREAT_DISTANCE: f32 = 8.0;

pub const GHOST_CAPTURE_BASE_SCORE: u32 = 200;
pub const DOT_SCORE: u32 = 10;
pub const POWER_ITEM_SCORE: u32 = 50;

pub const STARTING_LIVES: u32 = 3;

pub const DEFAULT_LEVEL: &str = include_str!("../levels/level1.txt");

pub fn vulnerable_speed(base_speed: i32) -> i32 {
    (base_speed / 2).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vulnerable_speed_halves_and_never_stalls() {
        assert_eq!(vulnerable_speed(GHOST_SPEED), 1);
        assert_eq!(vulnerable_speed(4), 2);
        assert_eq!(vulnerable_speed(1), 1);
    }

    #[test]
    fn vulnerability_window_is_ten_seconds_at_tick_rate() {
        assert_eq!(VULNERABLE_TICKS, TICK_RATE * 10);
    }
}
