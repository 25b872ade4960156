use std::path::PathBuf;

use anyhow::{Context, Result};
use beerdie_stats::report::{build_report, render_text};
use beerdie_stats::simulation::request_rng;
use beerdie_stats::{MatchStore, StatsContext};
use clap::Parser;
use log::{info, warn};

/*
    Loads the match sheet once, then builds the report for the chosen player.
    A config file sets the session defaults, flags given on the command line win over it.
*/

#[derive(Parser)]
#[command(name = "beerdie-stats")]
#[command(about = "Player stats and beer simulation for beerdie matches")]
struct Cli {
    /// Match sheet (CSV)
    #[arg(short, long, env = "BEERDIE_DATA", default_value = "csv_data_beerdie.csv")]
    data: PathBuf,

    /// Player to report on, must be on the roster
    #[arg(short, long)]
    player: Option<String>,

    /// Session settings as JSON (roster, game type, thresholds)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulation policy: fixed, dice-count or per-point
    #[arg(long)]
    policy: Option<String>,

    /// Beers per game, only with the fixed policy (0-10, default 1)
    #[arg(long)]
    beers_per_game: Option<u32>,

    /// Seed for a reproducible simulation
    #[arg(long)]
    seed: Option<u64>,

    /// Fail on matches with crowded teams or duplicate players
    #[arg(long)]
    strict: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// List roster players present in the data and exit
    #[arg(long)]
    list_players: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut stats_context = match &cli.config {
        Some(path) => StatsContext::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => StatsContext::default(),
    };

    stats_context.apply_policy_override(cli.policy.as_deref(), cli.beers_per_game)?;
    if cli.seed.is_some() { stats_context.seed = cli.seed; }
    if cli.strict { stats_context.strict_teams = true; }
    stats_context.validate()?;

    let store = MatchStore::load(&cli.data, &stats_context)
        .with_context(|| format!("Failed to load match data from {}", cli.data.display()))?;

    if store.is_empty() {
        warn!("No {} rows for roster players in {}", stats_context.game_type, cli.data.display());
    }

    if cli.list_players {
        for p in store.players() {
            println!("{p}");
        }
        return Ok(());
    }

    let player = cli.player.as_deref()
        .ok_or_else(|| anyhow::anyhow!("--player is required (use --list-players to see who is in the data)"))?;
    stats_context.validate_player(player)?;

    let mut rng = request_rng(stats_context.seed);
    let report = build_report(player, &store, &stats_context, &mut rng)?;
    info!("Built report for {} ({} games, policy {})", player, report.stats.total_games, stats_context.policy);

    if !report.has_data() {
        warn!("No rows for {}", player);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report, &stats_context)?);
    }

    Ok(())
}
