use std::ops::{Add, Neg};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// A heading on the grid. `None` is the zero vector: standing still.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// Enumeration order used for adversary tie-breaks.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0, -1),
            Direction::Down => Vec2::new(0, 1),
            Direction::Left => Vec2::new(-1, 0),
            Direction::Right => Vec2::new(1, 0),
            Direction::None => Vec2::ZERO,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Direction::None
    }

    /// Accepts axis-aligned unit vectors only.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    /// Maps a keyboard key name (arrow keys and WASD) to a heading.
    pub fn parse_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Self::Up),
            "ArrowDown" | "s" | "S" => Some(Self::Down),
            "ArrowLeft" | "a" | "A" => Some(Self::Left),
            "ArrowRight" | "d" | "D" => Some(Self::Right),
            _ => None,
        }
    }

    /// Classifies a swipe by its dominant axis.
    pub fn from_swipe(dx: f32, dy: f32) -> Self {
        if dx == 0.0 && dy == 0.0 {
            return Direction::None;
        }
        if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    Normal,
    Frightened,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Idle,
    Running,
    Won,
    Lost,
}

impl MatchPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchPhase::Won | MatchPhase::Lost)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Won,
    Lost,
}

#[derive(Clone, Debug, Serialize)]
pub struct MazeView {
    pub width: i32,
    pub height: i32,
    pub walls: Vec<Vec2>,
    pub dots: Vec<Vec2>,
    #[serde(rename = "powerPellets")]
    pub power_pellets: Vec<Vec2>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    #[serde(rename = "mouthPhase")]
    pub mouth_phase: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub mode: GhostMode,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    MatchStarted,
    ScoreChanged {
        score: u32,
    },
    LivesChanged {
        lives: u32,
    },
    DotEaten {
        x: i32,
        y: i32,
    },
    PelletEaten {
        x: i32,
        y: i32,
    },
    PowerModeStarted {
        #[serde(rename = "durationMs")]
        duration_ms: u64,
    },
    PowerModeEnded,
    GhostEaten {
        name: String,
        points: u32,
    },
    PlayerCaught {
        #[serde(rename = "livesLeft")]
        lives_left: u32,
    },
    PausedChanged {
        paused: bool,
    },
    MatchOver {
        outcome: MatchOutcome,
        #[serde(rename = "finalScore")]
        final_score: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "nowMs")]
    pub now_ms: u64,
    pub phase: MatchPhase,
    pub paused: bool,
    pub score: u32,
    pub lives: u32,
    #[serde(rename = "collectiblesEaten")]
    pub collectibles_eaten: u32,
    #[serde(rename = "collectiblesTotal")]
    pub collectibles_total: u32,
    #[serde(rename = "powerRemainingMs")]
    pub power_remaining_ms: Option<u64>,
    pub maze: MazeView,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub outcome: Option<MatchOutcome>,
    pub score: u32,
    pub lives: u32,
    #[serde(rename = "collectiblesEaten")]
    pub collectibles_eaten: u32,
    #[serde(rename = "collectiblesTotal")]
    pub collectibles_total: u32,
    #[serde(rename = "ghostsEaten")]
    pub ghosts_eaten: u32,
    pub deaths: u32,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}
