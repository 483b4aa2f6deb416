use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// Evaluation order for adversary steering; earlier entries win ties.
    pub const STEERING_ORDER: [Direction; 4] = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    /// Unit step in grid coordinates; y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::None => (0, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction, cells: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx * cells,
            y: self.y + dy * cells,
        }
    }

    pub fn distance_squared(self, other: Cell) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Cell) -> f32 {
        (self.distance_squared(other) as f32).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostKind {
    /// Direct chaser; also the flanker's leader.
    Blinky,
    /// Ambusher.
    Pinky,
    /// Flanker.
    Inky,
    /// Distance-switching.
    Clyde,
}

impl GhostKind {
    pub const ROSTER: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    Normal,
    Vulnerable,
    Returning,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "subX")]
    pub sub_x: i32,
    #[serde(rename = "subY")]
    pub sub_y: i32,
    pub dir: Direction,
    #[serde(rename = "queuedDir")]
    pub queued_dir: Option<Direction>,
    pub score: u32,
    pub lives: u32,
    pub multiplier: u32,
    pub alive: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub kind: GhostKind,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "subX")]
    pub sub_x: i32,
    #[serde(rename = "subY")]
    pub sub_y: i32,
    pub dir: Direction,
    pub mode: GhostMode,
    #[serde(rename = "vulnerableTicks")]
    pub vulnerable_ticks: u32,
    pub home: Cell,
    pub target: Cell,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    DotEaten {
        x: i32,
        y: i32,
    },
    PowerItemTaken {
        x: i32,
        y: i32,
    },
    GhostsFrightened {
        ticks: u32,
    },
    GhostCaptured {
        kind: GhostKind,
        points: u32,
    },
    GhostRecovered {
        kind: GhostKind,
    },
    GhostCalmed {
        kind: GhostKind,
    },
    PlayerCaught {
        by: GhostKind,
    },
    LevelCleared,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    #[serde(rename = "dotsLeft")]
    pub dots_left: usize,
    #[serde(rename = "powerItemsLeft")]
    pub power_items_left: usize,
    #[serde(rename = "levelComplete")]
    pub level_complete: bool,
    pub events: Vec<RuntimeEvent>,
}
