use ahash::AHashMap;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::config::AgentConfig;
use crate::game::State;
use crate::pos::Dir;

// ============================
// Tabular Q-learning agent
// ============================

/// Sparse table of (state, action) -> value. Absent keys read as 0.
pub struct QAgent {
    q: AHashMap<(State, Dir), f64>,
    pub alpha: f64,
    pub epsilon: f64,
    actions: &'static [Dir],
    rng: SmallRng,
}

impl QAgent {
    pub fn new(config: &AgentConfig) -> Self {
        Self::from_rng(config, SmallRng::from_entropy())
    }

    pub fn with_seed(config: &AgentConfig, seed: u64) -> Self {
        Self::from_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(config: &AgentConfig, rng: SmallRng) -> Self {
        Self { q: AHashMap::new(), alpha: config.alpha, epsilon: config.epsilon, actions: &Dir::ALL, rng }
    }

    pub fn q_value(&self, s: &State, a: Dir) -> f64 {
        self.q.get(&(*s, a)).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// Best stored value over the available actions, 0 if there are none.
    pub fn future_estimate(&self, s: &State) -> f64 {
        self.actions
            .iter()
            .map(|&a| self.q_value(s, a))
            .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
            .unwrap_or(0.0)
    }

    /// `Q(s,a) = old + alpha * (reward + max_a' Q(ns,a') - old)`, no discount.
    pub fn update(&mut self, s: &State, a: Dir, ns: &State, reward: f64) {
        let old = self.q_value(s, a);
        let future = self.future_estimate(ns);
        let new = old + self.alpha * (reward + future - old);
        if self.q.insert((*s, a), new).is_none() {
            trace!(entries = self.q.len(), "q-table grew");
        }
    }

    /// First action in fixed order holding the strict maximum.
    pub fn greedy_action(&self, s: &State) -> Dir {
        let mut best = self.actions[0];
        let mut best_q = f64::NEG_INFINITY;
        for &a in self.actions {
            let v = self.q_value(s, a);
            if v > best_q {
                best_q = v;
                best = a;
            }
        }
        best
    }

    pub fn choose_action(&mut self, s: &State, explore: bool) -> Dir {
        if explore && self.rng.r#gen::<f64>() < self.epsilon {
            if let Some(&a) = self.actions.choose(&mut self.rng) {
                return a;
            }
        }
        self.greedy_action(s)
    }

    /// Entries in a stable order, for persistence.
    pub fn entries(&self) -> Vec<(State, Dir, f64)> {
        let mut out: Vec<_> = self.q.iter().map(|(&(s, a), &v)| (s, a, v)).collect();
        out.sort_by(|x, y| (x.0, x.1.index()).cmp(&(y.0, y.1.index())));
        out
    }

    pub fn load_entries<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (State, Dir, f64)>,
    {
        self.q.clear();
        self.q.extend(entries.into_iter().map(|(s, a, v)| ((s, a), v)));
    }
}
