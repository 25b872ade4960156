use serde::Serialize;

use crate::data_loader::MatchRow;
use crate::team_resolver::resolve_context;
use crate::util::ratio;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PartnerStats {
    pub name: String,
    pub games: u32,
    pub wins: u32,
}

impl PartnerStats {
    pub fn win_rate(&self) -> f64 {
        ratio(self.wins, self.games)
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct PartnershipSummary {
    pub best_partner: Option<String>,
    pub best_partner_win_rate: f64,
    pub best_partner_games: u32,
    pub all_partner_stats: Vec<PartnerStats>,  // First-encountered order, every partner regardless of games
}

impl PartnershipSummary {
    pub fn partner(&self, name: &str) -> Option<&PartnerStats> {
        self.all_partner_stats.iter().find(|p| p.name == name)
    }
}

/// Tallies games and wins per teammate for `player`, then picks the best partner among those with
/// at least `min_games` together.
///
/// Matches are walked in match id order and partners are kept in the order they first show up.
/// The best partner needs a strictly higher win rate to replace the current pick, so ties go to
/// whoever was partnered first. Solo matches count towards no one.
pub fn analyze_partnerships(player: &str, all_rows: &[MatchRow], min_games: u32) -> PartnershipSummary {
    let mut match_ids: Vec<u32> = all_rows.iter()
        .filter(|r| r.player == player)
        .map(|r| r.match_id)
        .collect();
    match_ids.sort();
    match_ids.dedup();

    let mut partners: Vec<PartnerStats> = Vec::new();

    for match_id in match_ids {
        let context = resolve_context(player, match_id, all_rows);
        let Some(teammate) = context.teammate() else { continue; };

        let won = all_rows.iter()
            .any(|r| r.match_id == match_id && r.player == player && r.won);

        // Adds the partner the first time we see them, otherwise updates their tally
        match partners.iter_mut().find(|p| p.name == teammate) {
            Some(p) => {
                p.games += 1;
                if won { p.wins += 1; }
            }
            None => partners.push(PartnerStats {
                name: teammate.to_string(),
                games: 1,
                wins: won as u32,
            }),
        }
    }

    let mut best: Option<&PartnerStats> = None;
    for p in partners.iter().filter(|p| p.games >= min_games) {
        if best.map_or(true, |b| p.win_rate() > b.win_rate()) {
            best = Some(p);
        }
    }

    let best_partner = best.map(|b| b.name.clone());
    let best_partner_win_rate = best.map_or(0.0, |b| b.win_rate());
    let best_partner_games = best.map_or(0, |b| b.games);

    PartnershipSummary {
        best_partner,
        best_partner_win_rate,
        best_partner_games,
        all_partner_stats: partners,
    }
}
