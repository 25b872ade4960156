use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::simulation::SimulationPolicy;

pub const DEFAULT_GAME_TYPE: &str = "beerdie";
pub const DEFAULT_BEERS_PER_GAME: u32 = 1;
pub const MAX_BEERS_PER_GAME: u32 = 10;

// Everything a single stats request can be tuned with. Build one per session and pass it around,
// nothing reads these values from global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsContext {
    pub game_type: String,
    pub roster: Vec<String>,

    pub min_partner_games: u32,     // Partners below this are listed but never picked as best

    pub policy: SimulationPolicy,
    pub seed: Option<u64>,

    pub strict_teams: bool,         // Raise on malformed teams instead of taking the first teammate found
}

impl Default for StatsContext {
    fn default() -> Self {
        Self {
            game_type: DEFAULT_GAME_TYPE.to_string(),
            roster: [
                "Boogie", "Christian", "Emil", "G", "Ibh", "Jakob",
                "Lutz", "Mads", "Martin", "Nick", "Ruben",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),

            min_partner_games: 3,

            policy: SimulationPolicy::DiceCount,
            seed: None,

            strict_teams: false,
        }
    }
}

impl StatsContext {
    // Missing keys fall back to the defaults above.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let context: StatsContext = serde_json::from_str(&data)?;
        context.validate()?;
        Ok(context)
    }

    // Command-line policy selection on top of whatever the config file set. A beer count only makes
    // sense for the fixed policy and is refused otherwise.
    pub fn apply_policy_override(&mut self, policy_name: Option<&str>, beers_per_game: Option<u32>) -> Result<(), ConfigError> {
        if let Some(name) = policy_name {
            self.policy = SimulationPolicy::from_name(name, beers_per_game.unwrap_or(DEFAULT_BEERS_PER_GAME))?;
        }

        if let Some(n) = beers_per_game {
            match self.policy {
                SimulationPolicy::Fixed { .. } => self.policy = SimulationPolicy::Fixed { beers_per_game: n },
                other => return Err(ConfigError::BeersPerGameWithoutFixed { policy: other.to_string() }),
            }
        }

        Ok(())
    }

    pub fn is_on_roster(&self, player: &str) -> bool {
        self.roster.iter().any(|p| p == player)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_partner_games == 0 {
            return Err(ConfigError::ZeroPartnerGames);
        }

        if let SimulationPolicy::Fixed { beers_per_game } = self.policy {
            if beers_per_game > MAX_BEERS_PER_GAME {
                return Err(ConfigError::BeersPerGameOutOfRange { value: beers_per_game, max: MAX_BEERS_PER_GAME });
            }
        }

        Ok(())
    }

    // The selected player has to come from the fixed roster, same as the selectbox in the dashboard.
    pub fn validate_player(&self, player: &str) -> Result<(), ConfigError> {
        if !self.is_on_roster(player) {
            return Err(ConfigError::UnknownPlayer { player: player.to_string() });
        }
        Ok(())
    }
}
