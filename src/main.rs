//! beer-game: plays the four-echelon beer distribution game.
//!
//! Usage:
//!   beer-game run --env classical --history-out /tmp/history.json --no-submit
//!   beer-game run --config game.toml --csv-out results.csv
//!   beer-game replay --input /tmp/history.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::error;

use beer_game::io::demand::DemandPattern;
use beer_game::io::leaderboard::{self, LeaderboardClient, LeaderboardSettings, ScoreSubmission};
use beer_game::io::{replay, reporting};
use beer_game::{Game, GameConfig};

#[derive(Parser)]
#[command(name = "beer-game", about = "Beer distribution game simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game and report its costs.
    Run {
        /// Customer demand environment. Overrides the config file's demand.
        #[arg(long, value_enum)]
        env: Option<Environment>,

        /// TOML game config. Defaults to order-up-to agents on classical demand.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Master seed for demand and randomised agents.
        #[arg(long)]
        seed: Option<u64>,

        /// Number of turns to play.
        #[arg(long)]
        turns: Option<u32>,

        /// Where to record the turn history as JSON.
        #[arg(long)]
        history_out: Option<PathBuf>,

        /// Where to write the per-echelon CSV log.
        #[arg(long)]
        csv_out: Option<PathBuf>,

        /// Skip posting the score to the leaderboard.
        #[arg(long, default_value_t = false)]
        no_submit: bool,
    },
    /// Print a recorded history turn by turn.
    Replay {
        #[arg(short, long, default_value = "/tmp/history.json")]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Environment {
    Classical,
    #[value(name = "uniform-0-2")]
    Uniform0To2,
    #[value(name = "normal-10-4")]
    Normal10To4,
    Constant,
}

impl Environment {
    fn demand(self) -> DemandPattern {
        match self {
            Environment::Classical => DemandPattern::Classical,
            Environment::Uniform0To2 => DemandPattern::Uniform { low: 0, high: 2 },
            Environment::Normal10To4 => DemandPattern::Normal {
                mean: 10.0,
                std_dev: 4.0,
            },
            Environment::Constant => DemandPattern::Constant { value: 4 },
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Commands::Run {
            env,
            config,
            seed,
            turns,
            history_out,
            csv_out,
            no_submit,
        } => {
            let mut game_config = match config {
                Some(path) => GameConfig::from_path(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GameConfig::default(),
            };
            if let Some(env) = env {
                game_config.demand = env.demand();
            }
            if let Some(seed) = seed {
                game_config.simulation.seed = seed;
            }
            if let Some(turns) = turns {
                game_config.simulation.horizon = turns;
            }
            run(game_config, history_out, csv_out, no_submit)
        }
        Commands::Replay { input } => {
            let history = reporting::read_history_json(&input)
                .with_context(|| format!("reading history {}", input.display()))?;
            println!("{}", replay::render_history(&history));
            Ok(())
        }
    }
}

fn run(
    config: GameConfig,
    history_out: Option<PathBuf>,
    csv_out: Option<PathBuf>,
    no_submit: bool,
) -> Result<()> {
    println!("=== Beer Distribution Game ===");

    let mut game = Game::from_config(&config)?;
    println!("Running simulation for {} turns...", config.simulation.horizon);
    let reports = game.run()?;

    if let Some(path) = &history_out {
        reporting::write_history_json(path, game.simulator().history())?;
        println!("History recorded to {}", path.display());
    }
    if let Some(path) = &csv_out {
        reporting::write_simulation_log(path, &reports)?;
        println!("CSV log written to {}", path.display());
    }

    println!("\n=== Cost Analysis ===");
    let summary = game.summary();
    for (role, cost) in &summary.cost_by_role {
        println!("{}: {:.2}", role, cost);
    }
    println!("Total Supply Chain Cost: {:.2}", summary.total_cost);

    if no_submit {
        return Ok(());
    }

    let submission = ScoreSubmission {
        user: leaderboard::resolve_user(),
        score: summary.total_cost,
    };
    let submitted = LeaderboardSettings::from_env()
        .and_then(LeaderboardClient::new)
        .and_then(|client| client.submit(&submission));
    if let Err(e) = submitted {
        error!("Score submission failed: {e}");
        return Err(e).context("submitting score (results above are unaffected)");
    }
    println!("Score submitted for {}", submission.user);
    Ok(())
}
