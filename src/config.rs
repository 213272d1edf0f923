use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::reward::{RewardConfig, RewardMode};

/// Board geometry in pixels; the grid is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game_width: u32,
    pub game_height: u32,
    pub cell_size: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { game_width: 600, game_height: 600, cell_size: 30 }
    }
}

impl GameConfig {
    /// Square grid of `cells` x `cells`, handy for tests.
    pub fn square(cells: u32) -> Self {
        Self { game_width: cells, game_height: cells, cell_size: 1 }
    }

    pub fn rows(&self) -> usize {
        (self.game_height / self.cell_size.max(1)) as usize
    }

    pub fn cols(&self) -> usize {
        (self.game_width / self.cell_size.max(1)) as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Learning rate
    pub alpha: f64,
    /// Exploration rate
    pub epsilon: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { alpha: 0.5, epsilon: 0.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// An episode stops once the score reaches this value
    pub score_cap: u32,
    pub eval_games: usize,
    pub max_steps_per_episode: usize,
    pub reward: RewardConfig,
    pub reward_mode: RewardMode,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            score_cap: 200,
            eval_games: 100,
            max_steps_per_episode: 20_000,
            reward: RewardConfig::default(),
            reward_mode: RewardMode::Separate,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub agent: AgentConfig,
    pub train: TrainConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config file {:?}", path))
    }
}
