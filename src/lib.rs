//! Beerdie player statistics
//!
//! Descriptive stats for a log of doubles beerdie matches:
//! - `data_loader`: loads and filters the match sheet into a read-only `MatchStore`
//! - `team_resolver`: teammate/opponent lookup for a player in one match
//! - `player_stats`: win rate, streaks, cumulative wins, match history
//! - `partnership`: per-teammate records and the best partner pick
//! - `simulation`: beer consumption simulator with an injected randomness source
//!
//! The `beerdie-stats` binary is a thin shell that prints a `PlayerReport`.

pub mod data_loader;
pub mod error;
pub mod partnership;
pub mod player_stats;
pub mod report;
pub mod simulation;
pub mod stats_context;
pub mod team_resolver;
pub mod util;

pub use data_loader::{MatchRow, MatchStore, TeamLabel};
pub use error::{ConfigError, LoadError, TeamError};
pub use report::{build_report, PlayerReport};
pub use simulation::SimulationPolicy;
pub use stats_context::StatsContext;
