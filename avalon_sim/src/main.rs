//! Plays Avalon games with the seeded baseline agent and writes JSON records.

mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use avalon_engine::{EngineConfig, GameController, RandomAgent, Tournament, TournamentSummary};
use avalon_rules::{GameRecord, RoleCatalog, SeatName};
use clap::{Parser, Subcommand};
use serde::Serialize;

/// Avalon game simulator.
#[derive(Parser, Debug)]
#[command(name = "avalon-sim")]
#[command(about = "Play Avalon games and write JSON game records")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine configuration TOML.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Custom role catalog TOML; replaces the standard catalog for --players.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Model name passed to decision agents. Overrides the config file.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Reasoning effort passed to decision agents. Overrides the config file.
    #[arg(long, global = true)]
    reasoning_effort: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play independent games.
    Play {
        /// Number of players (5-10).
        #[arg(short, long, default_value = "5")]
        players: usize,

        /// Number of games to play.
        #[arg(short, long, default_value = "1")]
        games: usize,

        /// Base seed; game n uses seed + n. Overrides the config file.
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for game records.
        #[arg(short, long, default_value = "games")]
        output: PathBuf,
    },

    /// Play a series of games where chosen players keep memories between games.
    Tournament {
        /// Number of players (5-10).
        #[arg(short, long, default_value = "5")]
        players: usize,

        /// Number of games to play.
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// Comma-separated seat names with memory. Defaults to every seat.
        #[arg(long, value_delimiter = ',')]
        memory_players: Vec<String>,

        /// Base seed; game n uses seed + n. Overrides the config file.
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for the tournament files.
        #[arg(short, long, default_value = "tournaments")]
        output: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {:?}", path))?;
            EngineConfig::from_toml_str(&source)
                .with_context(|| format!("Invalid config: {:?}", path))
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Apply command-line tuning overrides on top of the loaded config.
fn with_tuning(
    mut config: EngineConfig,
    model: Option<String>,
    reasoning_effort: Option<String>,
) -> EngineConfig {
    if let Some(model) = model {
        config.tuning.model = model;
    }
    if let Some(reasoning_effort) = reasoning_effort {
        config.tuning.reasoning_effort = reasoning_effort;
    }
    config
}

/// Trimmed memory-player names. Blank and unseated names are skipped; an
/// empty selection means every seat.
fn memory_seats(catalog: &RoleCatalog, requested: &[String]) -> Vec<SeatName> {
    let mut seats = Vec::new();
    for name in requested.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let seat = SeatName::from(name);
        if !catalog.names.contains(&seat) {
            tracing::warn!(player = %seat, "skipping unknown memory player");
        } else if !seats.contains(&seat) {
            seats.push(seat);
        }
    }
    if requested.is_empty() {
        catalog.names.clone()
    } else {
        seats
    }
}

fn load_catalog(path: Option<&Path>, players: usize) -> Result<RoleCatalog> {
    match path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog: {:?}", path))?;
            let catalog = RoleCatalog::from_toml_str(&source)
                .with_context(|| format!("Invalid catalog: {:?}", path))?;
            if catalog.player_count != players {
                tracing::warn!(
                    catalog = catalog.player_count,
                    requested = players,
                    "catalog player count wins over --players"
                );
            }
            Ok(catalog)
        }
        None => RoleCatalog::standard(players).context("Unsupported player count"),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {:?}", path))?;
    fs::write(path, json).with_context(|| format!("Failed to write file: {:?}", path))
}

fn play(
    catalog: RoleCatalog,
    config: EngineConfig,
    games: usize,
    output: &Path,
) -> Result<Vec<GameRecord>> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {:?}", output))?;

    let base_seed = config.seed.unwrap_or_else(rand::random);
    let mut records = Vec::with_capacity(games);
    for game in 1..=games {
        let seed = base_seed.wrapping_add(game as u64);
        let record = GameController::new(
            catalog.clone(),
            config.clone().with_seed(seed),
            RandomAgent::new(seed),
        )?
        .play()
        .with_context(|| format!("Game {} failed", game))?;

        let path = output.join(format!("game_{:02}.json", game));
        write_json(&path, &record)?;
        println!(
            "Game {}/{}: {} wins ({} successes, {} fails) -> {}",
            game,
            games,
            record.winner(),
            record.outcome.good_successes,
            record.outcome.evil_fails,
            path.display()
        );
        records.push(record);
    }
    Ok(records)
}

fn tournament(
    catalog: RoleCatalog,
    config: EngineConfig,
    games: usize,
    memory_players: &[String],
    output: &Path,
) -> Result<TournamentSummary> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {:?}", output))?;

    let memory_players = memory_seats(&catalog, &memory_players);
    let seed = config.seed.unwrap_or_else(rand::random);
    let config = config.with_seed(seed);

    let mut tournament = Tournament::new(
        catalog,
        config,
        RandomAgent::new(seed),
        games,
        memory_players,
    )?;
    let report = tournament.run().context("Tournament failed")?;

    let games_dir = output.join("individual_games");
    fs::create_dir_all(&games_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", games_dir))?;
    for game in &report.games {
        write_json(
            &games_dir.join(format!("game_{:02}.json", game.game_number)),
            &game.record,
        )?;
    }
    write_json(&output.join("all_games.json"), &report.games)?;
    write_json(&output.join("player_memories.json"), &report.memory)?;
    write_json(&output.join("tournament_summary.json"), &report.summary)?;

    Ok(report.summary)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = with_tuning(
        load_config(cli.config.as_deref())?,
        cli.model,
        cli.reasoning_effort,
    );

    match cli.command {
        Commands::Play {
            players,
            games,
            seed,
            output,
        } => {
            let catalog = load_catalog(cli.catalog.as_deref(), players)?;
            let config = match seed {
                Some(seed) => config.with_seed(seed),
                None => config,
            };
            let records = play(catalog, config, games, &output)?;
            print!("{}", TournamentSummary::from_records(&records));
        }
        Commands::Tournament {
            players,
            games,
            memory_players,
            seed,
            output,
        } => {
            let catalog = load_catalog(cli.catalog.as_deref(), players)?;
            let config = match seed {
                Some(seed) => config.with_seed(seed),
                None => config,
            };
            let summary = tournament(catalog, config, games, &memory_players, &output)?;
            print!("{}", summary);
        }
    }

    Ok(())
}
