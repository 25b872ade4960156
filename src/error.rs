use thiserror::Error;

// Fatal conditions hit while loading the match table. Nothing past loading returns these.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{column}' not found in match data")]
    MissingColumn { column: String },
}

// Only raised by the strict resolver. The lenient one never fails.
#[derive(Error, Debug, PartialEq)]
pub enum TeamError {
    #[error("Match {match_id}: team {team} has {rows} rows, expected at most 2")]
    CrowdedTeam { match_id: u32, team: String, rows: usize },

    #[error("Match {match_id}: player {player} appears {rows} times")]
    DuplicatePlayer { match_id: u32, player: String, rows: usize },
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Beers per game must be between 0 and {max}, got {value}")]
    BeersPerGameOutOfRange { value: u32, max: u32 },

    #[error("Player '{player}' is not on the roster")]
    UnknownPlayer { player: String },

    #[error("Unknown simulation policy '{0}' (expected fixed, dice-count or per-point)")]
    UnknownPolicy(String),

    #[error("Beers per game only applies to the fixed policy, current policy is {policy}")]
    BeersPerGameWithoutFixed { policy: String },

    #[error("Minimum partner games must be at least 1")]
    ZeroPartnerGames,
}
