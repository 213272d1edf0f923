//! Grid Snake simulation with a tabular Q-learning agent.
//!
//! - `game`: the board, the single-cell snake, food placement and scoring
//! - `agent`: the sparse q-table, greedy/exploratory action choice, updates
//! - `reward`: per-step reward shaping fed into the agent
//! - `store`: saving and loading trained tables
//! - `driver`: train / play / evaluate loops

pub mod agent;
pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod pos;
pub mod render;
pub mod reward;
pub mod store;

pub use agent::QAgent;
pub use config::{AgentConfig, Config, GameConfig, TrainConfig};
pub use error::{GameError, StoreError};
pub use game::{Cell, Game, State, FEATURES};
pub use pos::{Dir, Pos};
pub use reward::{RewardConfig, RewardMode};
