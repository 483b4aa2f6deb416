use crate::maze::Walls;
use crate::motion::can_enter;
use crate::types::{Cell, Direction};

/// Picks the open neighbour closest to `target`, never reversing unless the
/// reversal is the only way out. Ties go to the earlier entry of
/// [`Direction::STEERING_ORDER`]. Falls back to `current` when the cell is
/// sealed on all four sides.
pub fn choose_direction<W: Walls + ?Sized>(
    walls: &W,
    cell: Cell,
    current: Direction,
    target: Cell,
) -> Direction {
    let reverse = current.opposite();
    let open: Vec<Direction> = Direction::STEERING_ORDER
        .into_iter()
        .filter(|dir| can_enter(walls, cell, *dir))
        .collect();
    if open.is_empty() {
        return current;
    }

    let forward: Vec<Direction> = open
        .iter()
        .copied()
        .filter(|dir| reverse == Direction::None || *dir != reverse)
        .collect();
    let candidates = if forward.is_empty() { open } else { forward };

    let mut best: Option<(i64, Direction)> = None;
    for dir in candidates {
        let dist = cell.step(dir, 1).distance_squared(target);
        if best.map(|(best_dist, _)| dist < best_dist).unwrap_or(true) {
            best = Some((dist, dir));
        }
    }
    best.map(|(_, dir)| dir).unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Maze;

    // Plus-shaped junction at (2,2) with a dead end pocket at (5,1).
    fn junction() -> Maze {
        Maze::parse(
            "\
WWWWWWW
WW-WW-W
W-S---W
WW-WWWW
WWWWWWW",
        )
        .expect("junction parses")
    }

    #[test]
    fn picks_neighbour_closest_to_target() {
        let maze = junction();
        let here = Cell::new(2, 2);
        assert_eq!(
            choose_direction(&maze, here, Direction::Right, Cell::new(2, 0)),
            Direction::Up
        );
        assert_eq!(
            choose_direction(&maze, here, Direction::Left, Cell::new(2, 9)),
            Direction::Down
        );
    }

    #[test]
    fn never_reverses_while_another_exit_exists() {
        let maze = junction();
        let here = Cell::new(2, 2);
        // Target lies straight behind a ghost heading right.
        let dir = choose_direction(&maze, here, Direction::Right, Cell::new(0, 2));
        assert_ne!(dir, Direction::Left);
    }

    #[test]
    fn reverses_out_of_dead_end() {
        let maze = junction();
        let pocket = Cell::new(5, 1);
        assert_eq!(
            choose_direction(&maze, pocket, Direction::Up, Cell::new(0, 0)),
            Direction::Down
        );
    }

    #[test]
    fn ties_follow_right_up_left_down_order() {
        let maze = junction();
        let here = Cell::new(2, 2);
        // From (2,2) heading nowhere, the target sits on the junction itself:
        // every neighbour is at distance 1.
        assert_eq!(
            choose_direction(&maze, here, Direction::None, here),
            Direction::Right
        );
        // Right excluded as reversal of Left.
        assert_eq!(
            choose_direction(&maze, here, Direction::Left, here),
            Direction::Up
        );
    }

    #[test]
    fn sealed_cell_keeps_current_direction() {
        let maze = Maze::parse("WWW\nWSW\nWWW").expect("sealed cell parses");
        assert_eq!(
            choose_direction(&maze, Cell::new(1, 1), Direction::Left, Cell::ORIGIN),
            Direction::Left
        );
    }

    #[test]
    fn reversal_only_when_forward_exits_blocked() {
        let maze = junction();
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                let cell = Cell::new(x, y);
                if maze.is_blocked(cell) {
                    continue;
                }
                for current in Direction::STEERING_ORDER {
                    for target in [Cell::ORIGIN, Cell::new(6, 4), Cell::new(3, 0)] {
                        let dir = choose_direction(&maze, cell, current, target);
                        if dir == current.opposite() {
                            let forward_open = Direction::STEERING_ORDER
                                .into_iter()
                                .filter(|d| *d != current.opposite())
                                .any(|d| can_enter(&maze, cell, d));
                            assert!(!forward_open, "reversed at {cell:?} heading {current:?}");
                        }
                    }
                }
            }
        }
    }
}
