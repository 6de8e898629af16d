use thiserror::Error;

use crate::types::Vec2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze layout has no rows")]
    EmptyLayout,
    #[error("row {row} is {actual} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("maze layout has no player start marker 'P'")]
    MissingPlayerStart,
    #[error("maze layout has a second player start at {second:?} (first at {first:?})")]
    MultiplePlayerStarts { first: Vec2, second: Vec2 },
    #[error("maze layout has no dots or power pellets")]
    NoCollectibles,
    #[error("collectible at ({x},{y}) cannot be reached from the player start")]
    UnreachableCollectible { x: i32, y: i32 },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid maze: {0}")]
    Maze(#[from] MazeError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type GameResult<T> = std::result::Result<T, GameError>;
