use serde::Serialize;

use crate::data_loader::MatchRow;
use crate::team_resolver::resolve_context;
use crate::util::ratio;

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
    pub total_games: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub total_beers: f64,
    pub longest_win_streak: u32,
}

impl PlayerStats {
    // The sheet tracks half beers, the summary only ever showed whole ones
    pub fn beers_display(&self) -> u64 {
        self.total_beers.trunc() as u64
    }

    pub fn losses(&self) -> u32 {
        self.total_games - self.wins
    }
}

// One point on the cumulative win curve, carrying the score it was annotated with
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CumulativeWinPoint {
    pub match_id: u32,
    pub cumulative_wins: u32,
    pub team_score: u32,
    pub opponent_score: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatchHistoryEntry {
    pub match_id: u32,
    pub team_score: u32,
    pub opponent_score: u32,
    pub won: bool,
    pub beers: f64,
    pub teammate: Option<String>,
    pub opponents: Vec<String>,
}

/// Summarises one player's rows. Works on any order; the streak is taken over match id order.
pub fn compute_stats(player_rows: &[MatchRow]) -> PlayerStats {
    let total_games = player_rows.len() as u32;
    let wins = player_rows.iter().filter(|r| r.won).count() as u32;
    let total_beers = player_rows.iter().map(|r| r.beers()).sum();

    PlayerStats {
        total_games,
        wins,
        win_rate: ratio(wins, total_games),
        total_beers,
        longest_win_streak: longest_win_streak(player_rows),
    }
}

pub fn longest_win_streak(player_rows: &[MatchRow]) -> u32 {
    let mut ordered: Vec<&MatchRow> = player_rows.iter().collect();
    ordered.sort_by_key(|r| r.match_id);

    let mut streak = 0;
    let mut max_streak = 0;
    for r in ordered {
        if r.won {
            streak += 1;
            max_streak = u32::max(max_streak, streak);
        } else {
            streak = 0;
        }
    }

    max_streak
}

pub fn cumulative_wins(player_rows: &[MatchRow]) -> Vec<CumulativeWinPoint> {
    let mut ordered: Vec<&MatchRow> = player_rows.iter().collect();
    ordered.sort_by_key(|r| r.match_id);

    let mut wins = 0;
    ordered.into_iter()
        .map(|r| {
            if r.won { wins += 1; }
            CumulativeWinPoint {
                match_id: r.match_id,
                cumulative_wins: wins,
                team_score: r.team_score,
                opponent_score: r.opponent_score,
            }
        })
        .collect()
}

// The per-match table, with who played alongside and against the player looked up from the full table
pub fn match_history(player: &str, player_rows: &[MatchRow], all_rows: &[MatchRow]) -> Vec<MatchHistoryEntry> {
    let mut ordered: Vec<&MatchRow> = player_rows.iter().collect();
    ordered.sort_by_key(|r| r.match_id);

    ordered.into_iter()
        .map(|r| {
            let context = resolve_context(player, r.match_id, all_rows);
            MatchHistoryEntry {
                match_id: r.match_id,
                team_score: r.team_score,
                opponent_score: r.opponent_score,
                won: r.won,
                beers: r.beers(),
                teammate: context.teammate().map(str::to_string),
                opponents: context.opponents().to_vec(),
            }
        })
        .collect()
}
