use serde::{Deserialize, Serialize};

use crate::stats::{CompMode, MatchStatsSnapshot, PLAYER_STATS_FIELD_COUNT, StatField, StatGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub player_field_count: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            player_field_count: PLAYER_STATS_FIELD_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSide {
    Red,
    Blue,
}

impl TeamSide {
    pub fn index(self) -> usize {
        match self {
            TeamSide::Red => 0,
            TeamSide::Blue => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfoRow {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRow {
    pub key: String,
    pub red: String,
    pub blue: String,
    pub winner: Option<TeamSide>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRow {
    pub key: String,
    pub field_id: usize,
    pub values: Vec<String>,
    pub winner: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTable {
    /// One header per player column. The key column is not included.
    pub columns: Vec<String>,
    pub rows: Vec<PlayerRow>,
}

impl PlayerTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub match_info: bool,
    pub team: bool,
    pub player: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTables {
    pub match_info: Vec<MatchInfoRow>,
    pub team: Vec<TeamRow>,
    pub player: PlayerTable,
}

impl StatsTables {
    pub fn visibility(&self) -> Visibility {
        Visibility {
            match_info: !self.match_info.is_empty(),
            team: !self.team.is_empty(),
            player: !self.player.is_empty(),
        }
    }
}

pub fn build_tables(snapshot: &MatchStatsSnapshot, cfg: TableConfig) -> StatsTables {
    StatsTables {
        match_info: build_match_info(&snapshot.generic_fields),
        team: build_team_table(&snapshot.team_stats),
        player: build_player_table(&snapshot.player_stats, cfg.player_field_count),
    }
}

pub fn build_match_info(fields: &[StatField]) -> Vec<MatchInfoRow> {
    fields
        .iter()
        .map(|f| MatchInfoRow {
            key: f.key.clone(),
            value: f.value.clone(),
        })
        .collect()
}

/// Red/blue comparison. Fields are paired by position; the analyzer emits
/// both team groups with the same layout.
pub fn build_team_table(teams: &[StatGroup]) -> Vec<TeamRow> {
    let [red, blue] = teams else {
        if !teams.is_empty() {
            log::warn!("expected 2 team groups, got {}", teams.len());
        }
        return Vec::new();
    };
    if red.fields.len() != blue.fields.len() {
        log::warn!(
            "team field counts differ ({} vs {})",
            red.fields.len(),
            blue.fields.len()
        );
        return Vec::new();
    }

    red.fields
        .iter()
        .zip(blue.fields.iter())
        .map(|(f0, f1)| TeamRow {
            key: f0.key.clone(),
            red: f0.value.clone(),
            blue: f1.value.clone(),
            winner: team_winner(f0.mode, f0.int_value, f1.int_value),
        })
        .collect()
}

fn team_winner(mode: CompMode, red: i64, blue: i64) -> Option<TeamSide> {
    let red_better = match mode {
        CompMode::BiggerWins => red > blue,
        CompMode::SmallerWins => red < blue,
        CompMode::NeitherWins => return None,
    };
    if red == blue {
        None
    } else if red_better {
        Some(TeamSide::Red)
    } else {
        Some(TeamSide::Blue)
    }
}

/// Player comparison. Players don't share a field layout: rows are driven
/// by the field id universe `0..field_count`, and a player lacking a field
/// gets an empty cell.
pub fn build_player_table(players: &[StatGroup], field_count: usize) -> PlayerTable {
    if players.is_empty() {
        return PlayerTable::default();
    }

    // lookup[p][id] -> index into players[p].fields
    let mut lookup: Vec<Vec<Option<usize>>> = vec![vec![None; field_count]; players.len()];
    for (p, group) in players.iter().enumerate() {
        for (idx, field) in group.fields.iter().enumerate() {
            let Some(slot) = lookup[p].get_mut(field.field_id) else {
                log::debug!(
                    "player {:?}: field id {} out of range, ignored",
                    group.name,
                    field.field_id
                );
                continue;
            };
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
    }

    let mut rows = Vec::new();
    for field_id in 0..field_count {
        let present: Vec<(usize, &StatField)> = players
            .iter()
            .enumerate()
            .filter_map(|(p, group)| lookup[p][field_id].map(|idx| (p, &group.fields[idx])))
            .collect();
        let Some((_, representative)) = present.first() else {
            continue;
        };

        let mut values = vec![String::new(); players.len()];
        for (p, field) in &present {
            values[*p] = field.value.clone();
        }

        rows.push(PlayerRow {
            key: representative.key.clone(),
            field_id,
            values,
            winner: player_winner(&present),
        });
    }

    PlayerTable {
        columns: players.iter().map(|g| g.name.clone()).collect(),
        rows,
    }
}

/// Left-to-right scan. The first present cell seeds the extreme; a strictly
/// better value takes over, an equal one clears the current winner. A lone
/// cell never wins.
fn player_winner(present: &[(usize, &StatField)]) -> Option<usize> {
    let mut iter = present.iter();
    let (seed_idx, seed) = iter.next()?;
    let mut extreme = seed.int_value;
    let mut winner = seed.mode.competes().then_some(*seed_idx);
    let mut contenders = usize::from(seed.mode.competes());

    for (p, field) in iter {
        if !field.mode.competes() {
            continue;
        }
        contenders += 1;
        let value = field.int_value;
        if value == extreme {
            winner = None;
        } else if (field.mode == CompMode::BiggerWins && value > extreme)
            || (field.mode == CompMode::SmallerWins && value < extreme)
        {
            extreme = value;
            winner = Some(*p);
        }
    }

    if contenders < 2 { None } else { winner }
}
