use serde::{Deserialize, Serialize};

/// Size of the player-stat field universe. Field ids handed out by the
/// analyzer live in `0..PLAYER_STATS_FIELD_COUNT`.
pub const PLAYER_STATS_FIELD_COUNT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompMode {
    BiggerWins,
    SmallerWins,
    #[default]
    NeitherWins,
}

impl CompMode {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => CompMode::BiggerWins,
            1 => CompMode::SmallerWins,
            _ => CompMode::NeitherWins,
        }
    }

    pub fn from_label(raw: &str) -> Self {
        let s: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match s.as_str() {
            "biggerwins" | "bigger" | "higher" | "max" => CompMode::BiggerWins,
            "smallerwins" | "smaller" | "lower" | "min" => CompMode::SmallerWins,
            _ => CompMode::NeitherWins,
        }
    }

    pub fn competes(self) -> bool {
        !matches!(self, CompMode::NeitherWins)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatField {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub int_value: i64,
    #[serde(default)]
    pub mode: CompMode,
    #[serde(default)]
    pub field_id: usize,
}

impl StatField {
    /// Match-level fact. Never compared.
    pub fn generic(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            int_value: 0,
            mode: CompMode::NeitherWins,
            field_id: 0,
        }
    }

    pub fn compared(
        field_id: usize,
        key: impl Into<String>,
        int_value: i64,
        mode: CompMode,
    ) -> Self {
        Self {
            key: key.into(),
            value: int_value.to_string(),
            int_value,
            mode,
            field_id,
        }
    }

    pub fn with_display(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatGroup {
    pub name: String,
    pub fields: Vec<StatField>,
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub team_index: Option<usize>,
}

impl StatGroup {
    pub fn new(name: impl Into<String>, index: i64) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            index,
            team_index: None,
        }
    }

    pub fn on_team(mut self, team_index: usize) -> Self {
        self.team_index = Some(team_index);
        self
    }

    pub fn with_field(mut self, field: StatField) -> Self {
        self.fields.push(field);
        self
    }

    /// First field carrying `field_id`; later duplicates are ignored.
    pub fn field_by_id(&self, field_id: usize) -> Option<&StatField> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatsSnapshot {
    #[serde(default)]
    pub generic_fields: Vec<StatField>,
    #[serde(default)]
    pub team_stats: Vec<StatGroup>,
    #[serde(default)]
    pub player_stats: Vec<StatGroup>,
}

impl MatchStatsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a generic field unless the value source is absent.
    pub fn add_generic_field(&mut self, key: &str, value: Option<&str>) {
        let Some(value) = value else {
            log::debug!("generic field {key:?} has no value, omitted");
            return;
        };
        self.generic_fields.push(StatField::generic(key, value));
    }

    /// Same as [`add_generic_field`](Self::add_generic_field) for raw bytes
    /// coming out of the analyzer. Invalid UTF-8 is replaced, not rejected.
    pub fn add_generic_field_bytes(&mut self, key: &str, value: Option<&[u8]>) {
        let value = value.map(|bytes| String::from_utf8_lossy(bytes).into_owned());
        self.add_generic_field(key, value.as_deref());
    }

    /// Orders team and player groups by their sort index. Stable, so groups
    /// sharing an index keep their arrival order.
    pub fn sort_groups(&mut self) {
        self.team_stats.sort_by_key(|g| g.index);
        self.player_stats.sort_by_key(|g| g.index);
    }

    pub fn players_on_team(&self, team_index: usize) -> impl Iterator<Item = &StatGroup> {
        self.player_stats
            .iter()
            .filter(move |g| g.team_index == Some(team_index))
    }
}

/// One demo file as seen by the stats view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub analyzed: bool,
    #[serde(default)]
    pub match_stats: Vec<MatchStatsSnapshot>,
}

impl DemoRecord {
    pub fn unanalyzed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            analyzed: false,
            match_stats: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CompMode, MatchStatsSnapshot, StatField, StatGroup};

    #[test]
    fn null_generic_value_is_omitted() {
        let mut snap = MatchStatsSnapshot::new();
        snap.add_generic_field("Map", Some("q3dm17"));
        snap.add_generic_field("Server", None);
        snap.add_generic_field_bytes("Mod", None);
        snap.add_generic_field_bytes("Gametype", Some(b"CTF"));
        let keys: Vec<&str> = snap.generic_fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["Map", "Gametype"]);
    }

    #[test]
    fn empty_string_value_is_kept() {
        let mut snap = MatchStatsSnapshot::new();
        snap.add_generic_field("Server", Some(""));
        assert_eq!(snap.generic_fields.len(), 1);
        assert_eq!(snap.generic_fields[0].value, "");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut snap = MatchStatsSnapshot::new();
        snap.add_generic_field_bytes("Name", Some(&[b'a', 0xff, b'b']));
        assert_eq!(snap.generic_fields[0].value, "a\u{fffd}b");
    }

    #[test]
    fn duplicate_field_id_first_wins() {
        let group = StatGroup::new("A", 0)
            .with_field(StatField::compared(3, "Kills", 10, CompMode::BiggerWins))
            .with_field(StatField::compared(3, "Kills (dup)", 99, CompMode::BiggerWins));
        assert_eq!(group.field_by_id(3).map(|f| f.int_value), Some(10));
        assert!(group.field_by_id(4).is_none());
    }

    #[test]
    fn sort_groups_is_stable() {
        let mut snap = MatchStatsSnapshot::new();
        snap.player_stats = vec![
            StatGroup::new("c", 2),
            StatGroup::new("a", 0),
            StatGroup::new("b1", 1),
            StatGroup::new("b2", 1),
        ];
        snap.sort_groups();
        let names: Vec<&str> = snap.player_stats.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn comp_mode_labels() {
        assert_eq!(CompMode::from_label("BiggerWins"), CompMode::BiggerWins);
        assert_eq!(CompMode::from_label("smaller_wins"), CompMode::SmallerWins);
        assert_eq!(CompMode::from_label("??"), CompMode::NeitherWins);
        assert_eq!(CompMode::from_code(1), CompMode::SmallerWins);
        assert_eq!(CompMode::from_code(7), CompMode::NeitherWins);
    }
}
