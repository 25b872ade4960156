use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info, warn};
use serde::*;
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_number_from_string};

use crate::error::LoadError;
use crate::stats_context::{StatsContext, DEFAULT_GAME_TYPE};

// Header names exactly as they appear in the recorded sheet
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Spil", "Kamp Nr", "Spiller", "Hold", "Sejr", "Holdpoint", "modstanderpoint", "min_antal_øl",
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TeamLabel {
    A,
    B,
}

impl fmt::Display for TeamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamLabel::A => write!(f, "A"),
            TeamLabel::B => write!(f, "B"),
        }
    }
}

// One player's line for one match. Four of these make a normal doubles match, two make a 1v1.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchRow {
    #[serde(rename(deserialize = "Spil"))]
    pub game_type: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    #[serde(rename(deserialize = "Kamp Nr"))]
    pub match_id: u32,
    #[serde(rename(deserialize = "Spiller"))]
    pub player: String,
    #[serde(rename(deserialize = "Hold"))]
    pub team: TeamLabel,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    #[serde(rename(deserialize = "Sejr"))]
    pub won: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    #[serde(rename(deserialize = "Holdpoint"))]
    pub team_score: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    #[serde(rename(deserialize = "modstanderpoint"))]
    pub opponent_score: u32,
    // Blank cells are common in the sheet and count as zero. Anything else has to parse.
    #[serde(rename(deserialize = "min_antal_øl"))]
    pub beer_count: Option<f64>,
}

impl MatchRow {
    pub fn new(match_id: u32, player: &str, team: TeamLabel, won: bool, team_score: u32, opponent_score: u32, beers: f64) -> Self {
        Self {
            game_type: DEFAULT_GAME_TYPE.to_string(),
            match_id,
            player: player.to_string(),
            team,
            won,
            team_score,
            opponent_score,
            beer_count: Some(beers),
        }
    }

    pub fn beers(&self) -> f64 {
        self.beer_count.unwrap_or(0.0)
    }

    pub fn total_points(&self) -> u32 {
        self.team_score.saturating_add(self.opponent_score)
    }
}

// Read-only repository over the filtered match table. Built once per session and handed to
// whatever needs it; rows are never mutated after construction, every view is a fresh Vec.
#[derive(Debug, Clone, Default)]
pub struct MatchStore {
    rows: Vec<MatchRow>,
    roster: Vec<String>,
}

impl MatchStore {
    pub fn load(file_path: &Path, stats_context: &StatsContext) -> Result<Self, LoadError> {
        let file = File::open(file_path)?;
        let store = Self::from_reader(file, stats_context)?;
        info!("Loaded {} {} rows from {}", store.len(), stats_context.game_type, file_path.display());
        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R, stats_context: &StatsContext) -> Result<Self, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        // Check the header up front so a missing column is reported by name, not as a row error
        let headers = csv_reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(LoadError::MissingColumn { column: column.to_string() });
            }
        }

        let mut rows = Vec::new();
        for record in csv_reader.deserialize() {
            let row: MatchRow = record?;
            rows.push(row);
        }

        Ok(Self::from_rows(rows, stats_context))
    }

    // Drops other game types and anyone off the roster. Sort is stable, so file order survives within a match.
    pub fn from_rows(rows: Vec<MatchRow>, stats_context: &StatsContext) -> Self {
        let read = rows.len();

        let mut kept: Vec<MatchRow> = rows.into_iter()
            .filter(|r| r.game_type == stats_context.game_type)
            .filter(|r| {
                let on_roster = stats_context.is_on_roster(&r.player);
                if !on_roster { debug!("Skipping off-roster player '{}' in match {}", r.player, r.match_id); }
                on_roster
            })
            .collect();

        kept.sort_by_key(|r| r.match_id);

        debug!("Kept {} of {} rows after filtering", kept.len(), read);

        let store = Self { rows: kept, roster: stats_context.roster.clone() };
        store.warn_on_duplicates();
        store
    }

    pub fn rows(&self) -> &[MatchRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // Ordered by match id ascending
    pub fn player_rows(&self, player: &str) -> Vec<MatchRow> {
        self.rows.iter().filter(|r| r.player == player).cloned().collect()
    }

    pub fn match_rows(&self, match_id: u32) -> Vec<MatchRow> {
        self.rows.iter().filter(|r| r.match_id == match_id).cloned().collect()
    }

    // Roster members that actually show up in the data, in roster order
    pub fn players(&self) -> Vec<String> {
        self.roster.iter()
            .filter(|p| self.rows.iter().any(|r| &r.player == *p))
            .cloned()
            .collect()
    }

    pub fn match_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.rows.iter().map(|r| r.match_id).collect();
        ids.dedup();
        ids
    }

    fn warn_on_duplicates(&self) {
        let mut seen: HashSet<(u32, &str)> = HashSet::new();
        for r in &self.rows {
            if !seen.insert((r.match_id, r.player.as_str())) {
                warn!("Player '{}' appears more than once in match {}", r.player, r.match_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Spil,Kamp Nr,Spiller,Hold,Sejr,Holdpoint,modstanderpoint,min_antal_øl,Kommentar
beerdie,2,Emil,A,1,10,7,2,
beerdie,2,Mads,A,1,10,7,1.5,
beerdie,2,Ruben,B,0,7,10,3,øv
beerdie,2,Nick,B,0,7,10,,
beerdie,1,Emil,B,0,5,10,1,
beerdie,1,Jakob,A,true,10,5,0,
beerpong,3,Emil,A,1,10,2,4,
beerdie,4,Guest,A,1,10,2,4,
";

    #[test]
    fn filters_game_type_and_roster() {
        let store = MatchStore::from_reader(SAMPLE.as_bytes(), &StatsContext::default()).unwrap();
        assert_eq!(store.len(), 6);
        assert!(store.rows().iter().all(|r| r.game_type == "beerdie"));
        assert!(store.rows().iter().all(|r| r.player != "Guest"));
    }

    #[test]
    fn rows_are_sorted_by_match() {
        let store = MatchStore::from_reader(SAMPLE.as_bytes(), &StatsContext::default()).unwrap();
        let emil = store.player_rows("Emil");
        assert_eq!(emil.iter().map(|r| r.match_id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(store.match_ids(), vec![1, 2]);
    }

    #[test]
    fn parses_flags_and_blank_beers() {
        let store = MatchStore::from_reader(SAMPLE.as_bytes(), &StatsContext::default()).unwrap();
        let jakob = &store.player_rows("Jakob")[0];
        assert!(jakob.won);
        assert_eq!(jakob.team, TeamLabel::A);

        let nick = &store.player_rows("Nick")[0];
        assert_eq!(nick.beer_count, None);
        assert_eq!(nick.beers(), 0.0);

        let mads = &store.player_rows("Mads")[0];
        assert_eq!(mads.beers(), 1.5);
        assert_eq!(mads.total_points(), 17);
    }

    #[test]
    fn unparseable_beers_are_fatal() {
        for beers in ["abc", "\"2,5\""] {
            let data = format!("Spil,Kamp Nr,Spiller,Hold,Sejr,Holdpoint,modstanderpoint,min_antal_øl\nbeerdie,1,Emil,A,1,10,2,{beers}\n");
            let err = MatchStore::from_reader(data.as_bytes(), &StatsContext::default()).unwrap_err();
            assert!(matches!(err, LoadError::Csv(_)), "beers {beers} gave {err:?}");
        }
    }

    #[test]
    fn total_points_saturate() {
        let row = MatchRow::new(1, "Emil", TeamLabel::A, true, u32::MAX, 3, 0.0);
        assert_eq!(row.total_points(), u32::MAX);
    }

    #[test]
    fn duplicate_player_rows_are_kept() {
        let rows = vec![
            MatchRow::new(1, "Emil", TeamLabel::A, true, 10, 2, 1.0),
            MatchRow::new(1, "Emil", TeamLabel::A, true, 10, 2, 1.0),
            MatchRow::new(2, "Emil", TeamLabel::A, true, 10, 2, 1.0),
        ];
        let store = MatchStore::from_rows(rows, &StatsContext::default());
        assert_eq!(store.len(), 3);
        assert_eq!(store.match_rows(1).len(), 2);
    }

    #[test]
    fn missing_column_is_reported() {
        let data = "Spil,Kamp Nr,Spiller,Hold,Sejr,Holdpoint,min_antal_øl\nbeerdie,1,Emil,A,1,10,2\n";
        let err = MatchStore::from_reader(data.as_bytes(), &StatsContext::default()).unwrap_err();
        match err {
            LoadError::MissingColumn { column } => assert_eq!(column, "modstanderpoint"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_row_is_fatal() {
        let data = "Spil,Kamp Nr,Spiller,Hold,Sejr,Holdpoint,modstanderpoint,min_antal_øl\nbeerdie,x,Emil,A,1,10,2,1\n";
        let err = MatchStore::from_reader(data.as_bytes(), &StatsContext::default()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn players_follow_roster_order() {
        let store = MatchStore::from_reader(SAMPLE.as_bytes(), &StatsContext::default()).unwrap();
        assert_eq!(store.players(), vec!["Emil", "Jakob", "Mads", "Nick", "Ruben"]);
    }

    #[test]
    fn custom_game_type() {
        let ctx = StatsContext { game_type: "beerpong".to_string(), ..StatsContext::default() };
        let store = MatchStore::from_reader(SAMPLE.as_bytes(), &ctx).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.match_rows(3).len(), 1);
    }
}
