use serde::{Deserialize, Serialize};

use crate::agent::QAgent;
use crate::game::State;
use crate::pos::Dir;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub ate: f64,
    pub toward: f64,
    pub away: f64,
    pub death: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self { ate: 1.0, toward: 0.05, away: -0.1, death: -10.0 }
    }
}

/// How the per-step contributions reach the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RewardMode {
    /// One update call per contribution.
    #[default]
    Separate,
    /// One update call with the summed reward.
    Summed,
}

/// What changed across one `take_action`.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub score_before: u32,
    pub score_after: u32,
    pub heading: Dir,
    pub next_state: State,
    pub over: bool,
}

/// Reward contributions for a step, in the order they are applied:
/// ate, toward/away, death.
pub fn shape(cfg: &RewardConfig, t: &Transition) -> Vec<f64> {
    let mut out = Vec::with_capacity(3);
    if t.score_after > t.score_before {
        out.push(cfg.ate);
    }
    if t.next_state.food_toward(t.heading) {
        out.push(cfg.toward);
    } else {
        out.push(cfg.away);
    }
    if t.over {
        out.push(cfg.death);
    }
    out
}

/// Shapes the step and feeds it to the agent. Returns the total reward.
pub fn apply(agent: &mut QAgent, mode: RewardMode, cfg: &RewardConfig, s: &State, a: Dir, t: &Transition) -> f64 {
    let rewards = shape(cfg, t);
    match mode {
        RewardMode::Separate => {
            for &r in &rewards {
                agent.update(s, a, &t.next_state, r);
            }
        }
        RewardMode::Summed => agent.update(s, a, &t.next_state, rewards.iter().sum()),
    }
    rewards.iter().sum()
}
