use std::path::PathBuf;

use crate::pos::Pos;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("invalid action index {0}, expected 0..=3")]
    InvalidAction(usize),
    #[error("no free cell left for food")]
    GridFull,
    #[error("food position {0:?} is outside the grid")]
    FoodOutOfBounds(Pos),
    #[error("food position {0:?} is occupied by the snake")]
    FoodOnSnake(Pos),
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("no trained table at {0}")]
    Missing(PathBuf),
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode q-table: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode q-table: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("failed to export q-table as json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported table format version {found}, expected {expected}")]
    Version { found: u32, expected: u32 },
}
