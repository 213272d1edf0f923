use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use snake_q_learning::config::Config;
use snake_q_learning::game::Game;
use snake_q_learning::reward::RewardMode;
use snake_q_learning::{driver, render, store, QAgent};

#[derive(Parser)]
#[command(name = "snake-q-learning")]
#[command(version, about = "Snake on a grid, played by a tabular Q-learning agent")]
struct Cli {
    /// What to do
    #[arg(value_enum, ignore_case = true)]
    mode: Mode,

    /// Training episodes; also names the table file (trained_<epochs>.bin)
    epochs: u64,

    /// Directory holding trained tables
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,

    /// JSON config file (missing fields keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// How per-step rewards are fed to the table while training
    #[arg(long, value_enum)]
    reward_mode: Option<RewardMode>,

    /// Exploration rate used while training
    #[arg(long)]
    epsilon: Option<f64>,

    /// Pause between frames in play mode
    #[arg(long, default_value = "200")]
    delay_ms: u64,

    /// Also dump the trained table as JSON to this path
    #[arg(long)]
    export_json: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    #[value(alias = "t")]
    Train,
    #[value(alias = "p")]
    Play,
    #[value(alias = "e")]
    Evaluate,
}

fn new_game(config: &Config, seed: Option<u64>) -> Result<Game> {
    let game = match seed {
        Some(seed) => Game::with_seed(&config.game, seed),
        None => Game::new(&config.game),
    };
    game.context("Failed to set up the board")
}

fn new_agent(config: &Config, seed: Option<u64>) -> QAgent {
    match seed {
        Some(seed) => QAgent::with_seed(&config.agent, seed.wrapping_add(1)),
        None => QAgent::new(&config.agent),
    }
}

fn load_agent(cli: &Cli, config: &Config) -> Result<QAgent> {
    let mut agent = new_agent(config, cli.seed);
    let n = store::load_into(&mut agent, &cli.models_dir, cli.epochs)
        .with_context(|| format!("Cannot load the table trained for {} epochs", cli.epochs))?;
    info!(entries = n, "table loaded");
    Ok(agent)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(mode) = cli.reward_mode {
        config.train.reward_mode = mode;
    }
    if let Some(epsilon) = cli.epsilon {
        config.agent.epsilon = epsilon;
    }

    match cli.mode {
        Mode::Train => {
            let mut game = new_game(&config, cli.seed)?;
            let mut agent = new_agent(&config, cli.seed);
            let report = driver::train(&mut game, &mut agent, &config.train, cli.epochs)?;
            info!(episodes = report.episodes, best = report.best_score, average = report.average_score(), entries = report.table_size, "training done");
            store::save(&agent, &cli.models_dir, cli.epochs)?;
            if let Some(path) = &cli.export_json {
                store::export_json(&agent, path, cli.epochs)?;
            }
        }
        Mode::Play => {
            let agent = load_agent(&cli, &config)?;
            let mut game = new_game(&config, cli.seed)?;
            let delay = Duration::from_millis(cli.delay_ms);
            let summary = driver::play(&mut game, &agent, &config.train, |g| {
                println!("{}", render::render_game(g));
                std::thread::sleep(delay);
            })?;
            println!("Score: {}", summary.last_score);
        }
        Mode::Evaluate => {
            let agent = load_agent(&cli, &config)?;
            let report = driver::evaluate(&agent, &config.game, &config.train, cli.seed)?;
            println!("Average score: {}", report.average());
        }
    }
    Ok(())
}
