use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DOT_SCORE, FRIGHTENED_COLOR, GHOST_INTERVAL_MS, GHOST_SCORE, PELLET_SCORE,
    PLAYER_INTERVAL_MS, POWER_DURATION_MS, REFERENCE_GHOSTS, REFERENCE_LAYOUT, STARTING_LIVES,
};
use crate::error::{GameError, GameResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostSpawn {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub color: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreTable {
    pub dot: u32,
    pub pellet: u32,
    pub ghost: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub layout: Vec<String>,
    pub ghosts: Vec<GhostSpawn>,
    #[serde(rename = "frightenedColor")]
    pub frightened_color: String,
    #[serde(rename = "playerIntervalMs")]
    pub player_interval_ms: u64,
    #[serde(rename = "ghostIntervalMs")]
    pub ghost_interval_ms: u64,
    #[serde(rename = "powerDurationMs")]
    pub power_duration_ms: u64,
    #[serde(rename = "dotScore")]
    pub dot_score: u32,
    #[serde(rename = "pelletScore")]
    pub pellet_score: u32,
    #[serde(rename = "ghostScore")]
    pub ghost_score: u32,
    #[serde(rename = "startingLives")]
    pub starting_lives: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            layout: REFERENCE_LAYOUT.iter().map(|row| row.to_string()).collect(),
            ghosts: REFERENCE_GHOSTS
                .iter()
                .map(|(name, x, y, color)| GhostSpawn {
                    name: name.to_string(),
                    x: *x,
                    y: *y,
                    color: color.to_string(),
                })
                .collect(),
            frightened_color: FRIGHTENED_COLOR.to_string(),
            player_interval_ms: PLAYER_INTERVAL_MS,
            ghost_interval_ms: GHOST_INTERVAL_MS,
            power_duration_ms: POWER_DURATION_MS,
            dot_score: DOT_SCORE,
            pellet_score: PELLET_SCORE,
            ghost_score: GHOST_SCORE,
            starting_lives: STARTING_LIVES,
        }
    }
}

impl GameConfig {
    pub fn scores(&self) -> ScoreTable {
        ScoreTable {
            dot: self.dot_score,
            pellet: self.pellet_score,
            ghost: self.ghost_score,
        }
    }

    pub fn from_json_file(path: &Path) -> GameResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Checks everything except the layout itself, which `Maze::build` owns.
    pub fn validate(&self, width: i32, height: i32) -> GameResult<()> {
        if self.player_interval_ms == 0 || self.ghost_interval_ms == 0 {
            return Err(GameError::InvalidConfig(
                "tick intervals must be positive".to_string(),
            ));
        }
        if self.starting_lives == 0 {
            return Err(GameError::InvalidConfig(
                "starting lives must be positive".to_string(),
            ));
        }
        if self.ghosts.is_empty() {
            return Err(GameError::InvalidConfig(
                "at least one ghost is required".to_string(),
            ));
        }
        for ghost in &self.ghosts {
            if ghost.x < 0 || ghost.y < 0 || ghost.x >= width || ghost.y >= height {
                return Err(GameError::InvalidConfig(format!(
                    "ghost {} home ({},{}) is outside the {}x{} maze",
                    ghost.name, ghost.x, ghost.y, width, height
                )));
            }
        }
        Ok(())
    }
}
