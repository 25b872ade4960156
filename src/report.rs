use std::fmt;

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::data_loader::MatchStore;
use crate::error::TeamError;
use crate::partnership::{analyze_partnerships, PartnershipSummary};
use crate::player_stats::{compute_stats, cumulative_wins, match_history, CumulativeWinPoint, MatchHistoryEntry, PlayerStats};
use crate::simulation::{simulate_series_with_rng, SimulationPolicy, SimulationResult};
use crate::stats_context::StatsContext;
use crate::team_resolver::resolve_context_strict;

// Everything the shell needs for one player selection. Plain numbers only, formatting is up to the caller.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlayerReport {
    pub player: String,
    pub stats: PlayerStats,
    pub cumulative_wins: Vec<CumulativeWinPoint>,
    pub partnerships: PartnershipSummary,
    pub history: Vec<MatchHistoryEntry>,
    pub policy: SimulationPolicy,
    pub simulation: SimulationResult,
}

impl PlayerReport {
    pub fn has_data(&self) -> bool {
        self.stats.total_games > 0
    }
}

pub fn build_report<R: Rng>(player: &str, store: &MatchStore, stats_context: &StatsContext, rng: &mut R) -> Result<PlayerReport, TeamError> {
    let player_rows = store.player_rows(player);
    debug!("{} rows for {}", player_rows.len(), player);

    if stats_context.strict_teams {
        for r in &player_rows {
            resolve_context_strict(player, r.match_id, store.rows())?;
        }
    }

    Ok(PlayerReport {
        player: player.to_string(),
        stats: compute_stats(&player_rows),
        cumulative_wins: cumulative_wins(&player_rows),
        partnerships: analyze_partnerships(player, store.rows(), stats_context.min_partner_games),
        history: match_history(player, &player_rows, store.rows()),
        policy: stats_context.policy,
        simulation: simulate_series_with_rng(&player_rows, stats_context.policy, rng),
    })
}

pub fn render_text(report: &PlayerReport, stats_context: &StatsContext) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, report, stats_context)?;
    Ok(out)
}

pub fn write_report<W: fmt::Write>(out: &mut W, report: &PlayerReport, stats_context: &StatsContext) -> fmt::Result {
    if !report.has_data() {
        return writeln!(out, "No data for selected player.");
    }

    let s = &report.stats;
    writeln!(out, "Stats for {}", report.player)?;
    writeln!(out, "  Total Games:         {}", s.total_games)?;
    writeln!(out, "  Wins:                {}", s.wins)?;
    writeln!(out, "  Win Rate:            {:.1}%", s.win_rate * 100.0)?;
    writeln!(out, "  Total Beers:         {}", s.beers_display())?;
    writeln!(out, "  Longest Win Streak:  {}", s.longest_win_streak)?;

    writeln!(out, "\nCumulative Wins")?;
    for p in &report.cumulative_wins {
        writeln!(out, "  Game {0:4} | {1:3} | {2}-{3}", p.match_id, p.cumulative_wins, p.team_score, p.opponent_score)?;
    }

    writeln!(out, "\nPartners")?;
    match &report.partnerships.best_partner {
        Some(best) => writeln!(out, "  Best partner: {} ({:.1}% over {} games)",
            best,
            report.partnerships.best_partner_win_rate * 100.0,
            report.partnerships.best_partner_games,
        )?,
        None => writeln!(out, "  Not enough data for a best partner (needs {} games together)", stats_context.min_partner_games)?,
    }
    for p in &report.partnerships.all_partner_stats {
        writeln!(out, "  {0:12} | Games {1:3} | Wins {2:3} | {3:5.1}%", p.name, p.games, p.wins, p.win_rate() * 100.0)?;
    }

    writeln!(out, "\nMatch History")?;
    writeln!(out, "  {0:>4} | {1:>4} | {2:>3} | {3:3} | {4:>5} | {5:12} | Opponents", "Game", "Team", "Opp", "Win", "Beers", "Teammate")?;
    for h in &report.history {
        writeln!(out, "  {0:4} | {1:4} | {2:3} | {3:3} | {4:5} | {5:12} | {6}",
            h.match_id,
            h.team_score,
            h.opponent_score,
            if h.won { "yes" } else { "no" },
            h.beers,
            h.teammate.as_deref().unwrap_or("(solo)"),
            h.opponents.join(" & "),
        )?;
    }

    let sim = &report.simulation;
    writeln!(out, "\nBeer Simulation ({})", report.policy)?;
    writeln!(out, "  Actual:     {:.1}", sim.actual_total)?;
    writeln!(out, "  Simulated:  {:.1}", sim.simulated_total)?;
    writeln!(out, "  Difference: {:+.1}", sim.difference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::{MatchRow, TeamLabel};
    use crate::simulation::request_rng;

    fn store() -> MatchStore {
        let rows = vec![
            MatchRow::new(1, "Emil", TeamLabel::A, true, 10, 6, 1.0),
            MatchRow::new(1, "Mads", TeamLabel::A, true, 10, 6, 2.0),
            MatchRow::new(1, "Ruben", TeamLabel::B, false, 6, 10, 3.0),
            MatchRow::new(1, "Lutz", TeamLabel::B, false, 6, 10, 0.0),
            MatchRow::new(2, "Emil", TeamLabel::B, false, 4, 10, 2.0),
            MatchRow::new(2, "Nick", TeamLabel::A, true, 10, 4, 0.0),
        ];
        MatchStore::from_rows(rows, &StatsContext::default())
    }

    #[test]
    fn report_for_player_with_games() {
        let ctx = StatsContext::default();
        let report = build_report("Emil", &store(), &ctx, &mut request_rng(Some(1))).unwrap();
        assert!(report.has_data());
        assert_eq!(report.stats.total_games, 2);
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.simulation.points.len(), 2);

        let text = render_text(&report, &ctx).unwrap();
        assert!(text.contains("Stats for Emil"));
        assert!(text.contains("Win Rate:            50.0%"));
        assert!(text.contains("(solo)"));
        assert!(text.contains("Not enough data for a best partner"));
    }

    #[test]
    fn write_report_appends_to_buffer() {
        let ctx = StatsContext::default();
        let report = build_report("Mads", &store(), &ctx, &mut request_rng(Some(1))).unwrap();

        let mut out = String::from("header\n");
        write_report(&mut out, &report, &ctx).unwrap();
        assert!(out.starts_with("header\nStats for Mads"));
        assert!(out.contains("Beer Simulation (dice-count)"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn report_for_player_without_games() {
        let ctx = StatsContext::default();
        let report = build_report("Martin", &store(), &ctx, &mut request_rng(Some(1))).unwrap();
        assert!(!report.has_data());
        assert_eq!(report.simulation, SimulationResult::default());
        assert_eq!(render_text(&report, &ctx).unwrap(), "No data for selected player.\n");
    }

    #[test]
    fn strict_report_rejects_crowded_team() {
        let mut rows = store().rows().to_vec();
        rows.push(MatchRow::new(1, "Jakob", TeamLabel::A, true, 10, 6, 0.0));
        let ctx = StatsContext { strict_teams: true, ..StatsContext::default() };
        let crowded = MatchStore::from_rows(rows, &ctx);

        assert!(build_report("Emil", &crowded, &ctx, &mut request_rng(Some(1))).is_err());
        assert!(build_report("Nick", &crowded, &ctx, &mut request_rng(Some(1))).is_ok());
    }
}
