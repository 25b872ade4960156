use serde::Serialize;

use crate::data_loader::{MatchRow, TeamLabel};
use crate::error::TeamError;

// Who a player stood with and against in one match.
// Unknown and Solo are both normal outcomes, callers tell them apart by variant.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchContext {
    Unknown,
    Solo {
        team: TeamLabel,
        opponents: Vec<String>,
    },
    Paired {
        team: TeamLabel,
        teammate: String,
        opponents: Vec<String>,
    },
}

impl MatchContext {
    pub fn team(&self) -> Option<TeamLabel> {
        match self {
            MatchContext::Unknown => None,
            MatchContext::Solo { team, .. } | MatchContext::Paired { team, .. } => Some(*team),
        }
    }

    pub fn teammate(&self) -> Option<&str> {
        match self {
            MatchContext::Paired { teammate, .. } => Some(teammate.as_str()),
            _ => None,
        }
    }

    pub fn opponents(&self) -> &[String] {
        match self {
            MatchContext::Unknown => &[],
            MatchContext::Solo { opponents, .. } | MatchContext::Paired { opponents, .. } => opponents,
        }
    }

    pub fn opponents_label(&self) -> String {
        self.opponents().join(" & ")
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, MatchContext::Unknown)
    }

    pub fn is_solo(&self) -> bool {
        matches!(self, MatchContext::Solo { .. })
    }
}

/// Finds the player's team, teammate and opponents in `match_id`.
///
/// A team with more than one other row is malformed; the first other row in table order is taken as
/// the teammate, which is what every historical report was built on. Use [`resolve_context_strict`]
/// to reject such matches instead.
pub fn resolve_context(player: &str, match_id: u32, rows: &[MatchRow]) -> MatchContext {
    let Some(own_row) = rows.iter().find(|r| r.match_id == match_id && r.player == player) else {
        return MatchContext::Unknown;
    };
    let team = own_row.team;

    let teammate = rows.iter()
        .find(|r| r.match_id == match_id && r.team == team && r.player != player)
        .map(|r| r.player.clone());

    let mut opponents: Vec<String> = rows.iter()
        .filter(|r| r.match_id == match_id && r.team != team)
        .map(|r| r.player.clone())
        .collect();
    opponents.sort();
    opponents.dedup();

    match teammate {
        Some(teammate) => MatchContext::Paired { team, teammate, opponents },
        None => MatchContext::Solo { team, opponents },
    }
}

// Same lookup, but refuses matches where a team or a player is listed too many times.
pub fn resolve_context_strict(player: &str, match_id: u32, rows: &[MatchRow]) -> Result<MatchContext, TeamError> {
    let match_rows: Vec<&MatchRow> = rows.iter().filter(|r| r.match_id == match_id).collect();

    let player_rows = match_rows.iter().filter(|r| r.player == player).count();
    if player_rows > 1 {
        return Err(TeamError::DuplicatePlayer { match_id, player: player.to_string(), rows: player_rows });
    }

    for team in [TeamLabel::A, TeamLabel::B] {
        let team_rows = match_rows.iter().filter(|r| r.team == team).count();
        if team_rows > 2 {
            return Err(TeamError::CrowdedTeam { match_id, team: team.to_string(), rows: team_rows });
        }
    }

    Ok(resolve_context(player, match_id, rows))
}
