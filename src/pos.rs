use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// Grid coordinate. Signed so the snake can step one cell off the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn step(self, dir: Dir) -> Self {
        let (dr, dc) = dir.delta();
        Self::new(self.row + dr, self.col + dc)
    }
}

/// Heading of the snake, which doubles as the agent's action.
/// Discriminants are the action indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    Right = 0,
    Left = 1,
    Up = 2,
    Down = 3,
}

impl Dir {
    /// Fixed action order; greedy tie-breaks follow it.
    pub const ALL: [Dir; 4] = [Dir::Right, Dir::Left, Dir::Up, Dir::Down];

    pub fn from_index(index: usize) -> Result<Self, GameError> {
        Self::ALL.get(index).copied().ok_or(GameError::InvalidAction(index))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    // (row, col) offset
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Right => (0, 1),
            Dir::Left => (0, -1),
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
        }
    }
}

impl TryFrom<usize> for Dir {
    type Error = GameError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Dir::from_index(index)
    }
}
