use crate::config::GameConfig;
use crate::error::GameError;
use crate::pos::{Dir, Pos};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Length of the observation vector.
pub const FEATURES: usize = 12;

// Random draws before falling back to scanning the free cells.
const FOOD_ATTEMPTS: usize = 1024;

/// Occupancy marker of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Cell {
    Empty = 0,
    Snake = 1,
    Food = 2,
}

/// Binary observation of the board, used as the q-table key prefix.
///
/// Layout: heading one-hot (left, right, up, down), food direction
/// (left, right, below, above), snake marker in the neighbour cell
/// (left, right, above, below).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State(pub [u8; FEATURES]);

impl State {
    pub fn features(&self) -> &[u8; FEATURES] {
        &self.0
    }

    /// Whether the food lies in the direction `dir` points to.
    pub fn food_toward(&self, dir: Dir) -> bool {
        let bit = match dir {
            Dir::Left => 4,
            Dir::Right => 5,
            Dir::Down => 6,
            Dir::Up => 7,
        };
        self.0[bit] == 1
    }
}

pub struct Game {
    rows: usize,
    cols: usize,
    grid: Vec<Cell>,
    snake: Pos,
    dir: Dir,
    food: Pos,
    score: u32,
    over: bool,
    rng: SmallRng,
}

impl Game {
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        Self::from_rng(config, SmallRng::from_entropy())
    }

    pub fn with_seed(config: &GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::from_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(config: &GameConfig, rng: SmallRng) -> Result<Self, GameError> {
        let rows = config.rows();
        let cols = config.cols();
        let mut g = Self {
            rows,
            cols,
            grid: vec![Cell::Empty; rows * cols],
            snake: Pos::new(0, 0),
            dir: Dir::Right,
            food: Pos::new(0, 0),
            score: 0,
            over: false,
            rng,
        };
        g.reset()?;
        Ok(g)
    }

    /// Starts a new episode: empty board, snake at the center heading right,
    /// fresh food.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.grid.fill(Cell::Empty);
        self.score = 0;
        self.dir = Dir::Right;
        self.over = false;
        self.snake = Pos::new((self.rows / 2) as i32, (self.cols / 2) as i32);
        self.set(self.snake, Cell::Snake);
        self.food = self.generate_food()?;
        self.set(self.food, Cell::Food);
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn snake(&self) -> Pos {
        self.snake
    }

    pub fn dir(&self) -> Dir {
        self.dir
    }

    pub fn food(&self) -> Pos {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn available_actions(&self) -> &'static [Dir] {
        &Dir::ALL
    }

    pub fn in_bounds(&self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && (p.row as usize) < self.rows && (p.col as usize) < self.cols
    }

    /// Marker at `p`, or `None` off the board.
    pub fn cell(&self, p: Pos) -> Option<Cell> {
        if self.in_bounds(p) {
            Some(self.grid[p.row as usize * self.cols + p.col as usize])
        } else {
            None
        }
    }

    fn set(&mut self, p: Pos, cell: Cell) {
        if self.in_bounds(p) {
            self.grid[p.row as usize * self.cols + p.col as usize] = cell;
        }
    }

    // Off-board cells count as safe.
    fn is_unsafe(&self, p: Pos) -> u8 {
        (self.cell(p) == Some(Cell::Snake)) as u8
    }

    pub fn state(&self) -> State {
        let (s, f) = (self.snake, self.food);
        State([
            (self.dir == Dir::Left) as u8,
            (self.dir == Dir::Right) as u8,
            (self.dir == Dir::Up) as u8,
            (self.dir == Dir::Down) as u8,
            (f.col < s.col) as u8,
            (f.col > s.col) as u8,
            (f.row > s.row) as u8,
            (f.row < s.row) as u8,
            self.is_unsafe(s.step(Dir::Left)),
            self.is_unsafe(s.step(Dir::Right)),
            self.is_unsafe(s.step(Dir::Up)),
            self.is_unsafe(s.step(Dir::Down)),
        ])
    }

    /// Applies one move. Returns true if food was eaten on this step.
    ///
    /// The bound check looks at the position before the move, so the game
    /// ends on the call after the one that left the board. Once over, calls
    /// are no-ops until `reset`.
    pub fn take_action(&mut self, dir: Dir) -> Result<bool, GameError> {
        if self.over {
            return Ok(false);
        }
        self.dir = dir;

        if !self.in_bounds(self.snake) {
            self.over = true;
            debug!(score = self.score, pos = ?self.snake, "game over");
        }

        self.set(self.snake, Cell::Empty);
        self.snake = self.snake.step(dir);
        self.set(self.snake, Cell::Snake);

        if self.snake == self.food {
            self.food = self.generate_food()?;
            self.score += 1;
            trace!(score = self.score, food = ?self.food, "food eaten");
            return Ok(true);
        }
        Ok(false)
    }

    pub fn take_action_index(&mut self, action: usize) -> Result<bool, GameError> {
        self.take_action(Dir::from_index(action)?)
    }

    /// Random cell not holding the snake marker.
    pub fn generate_food(&mut self) -> Result<Pos, GameError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::GridFull);
        }
        for _ in 0..FOOD_ATTEMPTS {
            let p = Pos::new(self.rng.gen_range(0..self.rows) as i32, self.rng.gen_range(0..self.cols) as i32);
            if self.cell(p) != Some(Cell::Snake) {
                return Ok(p);
            }
        }
        let free: Vec<Pos> = (0..self.rows as i32)
            .flat_map(|row| (0..self.cols as i32).map(move |col| Pos::new(row, col)))
            .filter(|&p| self.cell(p) != Some(Cell::Snake))
            .collect();
        free.choose(&mut self.rng).copied().ok_or(GameError::GridFull)
    }

    /// Moves the food to a chosen cell.
    pub fn set_food(&mut self, p: Pos) -> Result<(), GameError> {
        if !self.in_bounds(p) {
            return Err(GameError::FoodOutOfBounds(p));
        }
        if self.cell(p) == Some(Cell::Snake) {
            return Err(GameError::FoodOnSnake(p));
        }
        if self.cell(self.food) == Some(Cell::Food) {
            self.set(self.food, Cell::Empty);
        }
        self.food = p;
        self.set(p, Cell::Food);
        Ok(())
    }
}
