//! Train / play / evaluate loops around one `Game` and one `QAgent`.

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::agent::QAgent;
use crate::config::{GameConfig, TrainConfig};
use crate::game::Game;
use crate::reward::{self, Transition};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub score: u32,
    /// Score before the final move
    pub last_score: u32,
    pub steps: usize,
    pub died: bool,
    /// Sum of the shaped rewards fed to the table (0 without learning)
    pub reward: f64,
}

/// Running totals over a training run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainReport {
    pub episodes: u64,
    pub best_score: u32,
    pub total_score: u64,
    pub last: Option<EpisodeSummary>,
    pub table_size: usize,
}

impl TrainReport {
    fn record(&mut self, summary: EpisodeSummary) {
        self.episodes += 1;
        self.best_score = self.best_score.max(summary.score);
        self.total_score += summary.score as u64;
        self.last = Some(summary);
    }

    pub fn average_score(&self) -> f64 {
        if self.episodes == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.episodes as f64
    }
}

#[derive(Debug, Clone)]
pub struct EvalReport {
    pub scores: Vec<u32>,
}

impl EvalReport {
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().map(|&s| s as f64).sum::<f64>() / self.scores.len() as f64
    }

    pub fn best(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }
}

/// One learning episode from the current game state; resets the game at the end.
pub fn train_episode(game: &mut Game, agent: &mut QAgent, cfg: &TrainConfig) -> Result<EpisodeSummary> {
    let mut steps = 0;
    let mut total = 0.0;
    let mut last_score = game.score();
    let mut last_state = game.state();
    while !game.is_over() && game.score() < cfg.score_cap && steps < cfg.max_steps_per_episode {
        let s = game.state();
        let a = agent.choose_action(&s, true);
        let score_before = game.score();
        last_score = score_before;

        game.take_action(a)?;
        let t = Transition {
            score_before,
            score_after: game.score(),
            heading: game.dir(),
            next_state: game.state(),
            over: game.is_over(),
        };
        total += reward::apply(agent, cfg.reward_mode, &cfg.reward, &s, a, &t);
        last_state = s;
        steps += 1;
    }

    let summary = EpisodeSummary { score: game.score(), last_score, steps, died: game.is_over(), reward: total };
    debug!(state = ?last_state.features(), score = summary.score, "last state");
    game.reset()?;
    Ok(summary)
}

pub fn train(game: &mut Game, agent: &mut QAgent, cfg: &TrainConfig, epochs: u64) -> Result<TrainReport> {
    let mut report = TrainReport::default();
    for i in 0..epochs {
        let summary = train_episode(game, agent, cfg).with_context(|| format!("training game {}", i + 1))?;
        info!(game = i + 1, of = epochs, score = summary.score, steps = summary.steps, reward = summary.reward, "training game finished");
        report.record(summary);
    }
    report.table_size = agent.len();
    Ok(report)
}

/// Greedy episode without learning. `on_frame` sees the game after every move.
pub fn run_greedy<F>(game: &mut Game, agent: &QAgent, cfg: &TrainConfig, score_cap: Option<u32>, mut on_frame: F) -> Result<EpisodeSummary>
where
    F: FnMut(&Game),
{
    let mut steps = 0;
    let mut last_score = game.score();
    on_frame(game);
    while !game.is_over() && steps < cfg.max_steps_per_episode {
        if score_cap.is_some_and(|cap| game.score() >= cap) {
            break;
        }
        let a = agent.greedy_action(&game.state());
        last_score = game.score();
        game.take_action(a)?;
        steps += 1;
        on_frame(game);
    }
    Ok(EpisodeSummary { score: game.score(), last_score, steps, died: game.is_over(), reward: 0.0 })
}

pub fn play<F>(game: &mut Game, agent: &QAgent, cfg: &TrainConfig, on_frame: F) -> Result<EpisodeSummary>
where
    F: FnMut(&Game),
{
    let summary = run_greedy(game, agent, cfg, None, on_frame)?;
    info!(score = summary.last_score, steps = summary.steps, "game finished");
    game.reset()?;
    Ok(summary)
}

/// Runs `cfg.eval_games` independent greedy games in parallel, each on its
/// own board. With a seed, game `i` uses `seed + i`.
pub fn evaluate(agent: &QAgent, game_cfg: &GameConfig, cfg: &TrainConfig, seed: Option<u64>) -> Result<EvalReport> {
    let scores = (0..cfg.eval_games as u64)
        .into_par_iter()
        .map(|i| -> Result<u32> {
            let mut game = match seed {
                Some(seed) => Game::with_seed(game_cfg, seed.wrapping_add(i))?,
                None => Game::new(game_cfg)?,
            };
            let summary = run_greedy(&mut game, agent, cfg, Some(cfg.score_cap), |_| {})?;
            Ok(summary.score)
        })
        .collect::<Result<Vec<u32>>>()?;
    let report = EvalReport { scores };
    info!(games = report.scores.len(), average = report.average(), best = report.best(), "evaluation finished");
    Ok(report)
}
