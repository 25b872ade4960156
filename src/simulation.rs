use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data_loader::MatchRow;
use crate::error::ConfigError;
use crate::util::cumulative_sum;

// One die, one face
pub const DICE_HIT_PROBABILITY: f64 = 1.0 / 6.0;
// Two throws per point, at least one of them hits
pub const PER_POINT_HIT_PROBABILITY: f64 = 1.0 - (5.0 / 6.0) * (5.0 / 6.0);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SimulationPolicy {
    // Constant number of beers per match, replaces the recorded count
    Fixed { beers_per_game: u32 },
    // Score-bucketed throws at 1/6, added on top of the recorded count
    DiceCount,
    // One draw per point the team scored, replaces the recorded count
    PerPoint,
}

impl SimulationPolicy {
    pub fn from_name(name: &str, beers_per_game: u32) -> Result<Self, ConfigError> {
        match name {
            "fixed" => Ok(SimulationPolicy::Fixed { beers_per_game }),
            "dice-count" => Ok(SimulationPolicy::DiceCount),
            "per-point" => Ok(SimulationPolicy::PerPoint),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }

    // Whether the simulated delta stacks on the recorded beers or stands in for them
    pub fn is_additive(&self) -> bool {
        matches!(self, SimulationPolicy::DiceCount)
    }
}

impl fmt::Display for SimulationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationPolicy::Fixed { beers_per_game } => write!(f, "fixed ({beers_per_game} per game)"),
            SimulationPolicy::DiceCount => write!(f, "dice-count"),
            SimulationPolicy::PerPoint => write!(f, "per-point"),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SimulationPoint {
    pub match_id: u32,
    pub actual_cumulative: f64,
    pub simulated_cumulative: f64,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct SimulationResult {
    pub points: Vec<SimulationPoint>,
    pub actual_total: f64,
    pub simulated_total: f64,
    pub difference: f64,    // simulated minus actual
}

// Longer matches mean more throws. Buckets are inclusive at the top.
// 15 => 3 | 16 => 4 | 30 => 6 | 31 => 7
pub fn throw_count(total_points: u32) -> u32 {
    match total_points {
        0..=15 => 3,
        16..=20 => 4,
        21..=25 => 5,
        26..=30 => 6,
        _ => 7,
    }
}

/// Simulated beers for one match. `draw` must yield uniform values in [0, 1); a draw below the
/// policy's hit probability counts as one beer.
pub fn simulate_match<F>(team_score: u32, opponent_score: u32, policy: SimulationPolicy, draw: &mut F) -> u32
where
    F: FnMut() -> f64,
{
    let (throws, p) = match policy {
        SimulationPolicy::Fixed { beers_per_game } => return beers_per_game,
        SimulationPolicy::DiceCount => (throw_count(team_score.saturating_add(opponent_score)), DICE_HIT_PROBABILITY),
        SimulationPolicy::PerPoint => (team_score, PER_POINT_HIT_PROBABILITY),
    };

    (0..throws).filter(|_| draw() < p).count() as u32
}

/// Runs the policy over a player's matches in match id order, alongside the recorded beers.
pub fn simulate_series<F>(player_rows: &[MatchRow], policy: SimulationPolicy, draw: &mut F) -> SimulationResult
where
    F: FnMut() -> f64,
{
    let mut ordered: Vec<&MatchRow> = player_rows.iter().collect();
    ordered.sort_by_key(|r| r.match_id);

    let actual: Vec<f64> = ordered.iter().map(|r| r.beers()).collect();
    let simulated: Vec<f64> = ordered.iter()
        .map(|r| {
            let delta = simulate_match(r.team_score, r.opponent_score, policy, &mut *draw) as f64;
            if policy.is_additive() { r.beers() + delta } else { delta }
        })
        .collect();

    let actual_cumulative = cumulative_sum(&actual);
    let simulated_cumulative = cumulative_sum(&simulated);

    let actual_total = actual_cumulative.last().copied().unwrap_or(0.0);
    let simulated_total = simulated_cumulative.last().copied().unwrap_or(0.0);

    let points = ordered.iter()
        .zip(actual_cumulative.iter().zip(&simulated_cumulative))
        .map(|(r, (a, s))| SimulationPoint {
            match_id: r.match_id,
            actual_cumulative: *a,
            simulated_cumulative: *s,
        })
        .collect();

    SimulationResult {
        points,
        actual_total,
        simulated_total,
        difference: simulated_total - actual_total,
    }
}

pub fn simulate_series_with_rng<R: Rng>(player_rows: &[MatchRow], policy: SimulationPolicy, rng: &mut R) -> SimulationResult {
    simulate_series(player_rows, policy, &mut || rng.random::<f64>())
}

// A fresh generator per request. Seeded runs are reproducible, unseeded ones pull from the OS.
pub fn request_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
