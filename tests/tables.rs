use std::fs;
use std::path::PathBuf;

use demo_stats::demo_loader::parse_demo_json;
use demo_stats::stats::{CompMode, DemoRecord, MatchStatsSnapshot, StatField, StatGroup};
use demo_stats::tables::{
    TableConfig, TeamSide, build_match_info, build_player_table, build_tables, build_team_table,
};

fn ctf_demo() -> DemoRecord {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("ctf_two_rounds.json");
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    parse_demo_json(&raw).expect("fixture should parse")
}

fn group(name: &str, fields: Vec<StatField>) -> StatGroup {
    StatGroup {
        name: name.to_string(),
        fields,
        index: 0,
        team_index: None,
    }
}

#[test]
fn kills_tie_between_first_and_last_clears_winner() {
    let b = CompMode::BiggerWins;
    let players = vec![
        group("A", vec![StatField::compared(5, "Kills", 10, b)]),
        group("B", vec![StatField::compared(5, "Kills", 7, b)]),
        group("C", vec![StatField::compared(5, "Kills", 10, b)]),
    ];
    let table = build_player_table(&players, 8);
    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row.key, "Kills");
    assert_eq!(row.values, vec!["10", "7", "10"]);
    assert_eq!(row.winner, None);
}

#[test]
fn all_equal_values_have_no_winner() {
    let b = CompMode::BiggerWins;
    let players: Vec<StatGroup> = (0..4)
        .map(|i| group(&format!("P{i}"), vec![StatField::compared(0, "Score", 12, b)]))
        .collect();
    let table = build_player_table(&players, 1);
    assert_eq!(table.rows[0].winner, None);
}

#[test]
fn lone_field_shows_one_cell_and_no_winner() {
    let players = vec![
        group("A", vec![]),
        group("B", vec![StatField::compared(3, "Flag Assists", 2, CompMode::BiggerWins)]),
        group("C", vec![]),
    ];
    let table = build_player_table(&players, 8);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].values, vec!["", "2", ""]);
    assert_eq!(table.rows[0].winner, None);
}

#[test]
fn unused_field_ids_produce_no_rows() {
    let b = CompMode::BiggerWins;
    let players = vec![group("A", vec![StatField::compared(7, "Suicides", 1, b)])];
    let table = build_player_table(&players, 64);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].field_id, 7);
}

#[test]
fn zero_players_means_empty_table() {
    let table = build_player_table(&[], 64);
    assert!(table.is_empty());
    assert!(table.columns.is_empty());
}

#[test]
fn team_score_red_wins() {
    let b = CompMode::BiggerWins;
    let teams = vec![
        group("Red", vec![StatField::compared(0, "Score", 3, b)]),
        group("Blue", vec![StatField::compared(0, "Score", 1, b)]),
    ];
    let rows = build_team_table(&teams);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].red, "3");
    assert_eq!(rows[0].blue, "1");
    assert_eq!(rows[0].winner, Some(TeamSide::Red));
    assert_eq!(TeamSide::Red.index(), 0);
}

#[test]
fn team_mode_comes_from_red_field() {
    let teams = vec![
        group("Red", vec![StatField::compared(0, "Deaths", 8, CompMode::SmallerWins)]),
        group("Blue", vec![StatField::compared(0, "Deaths", 5, CompMode::BiggerWins)]),
    ];
    let rows = build_team_table(&teams);
    assert_eq!(rows[0].winner, Some(TeamSide::Blue));
}

#[test]
fn match_info_keeps_input_order() {
    let mut snap = MatchStatsSnapshot::new();
    snap.add_generic_field("Map", Some("q3dm6"));
    snap.add_generic_field("Server", None);
    snap.add_generic_field("Date", Some("2009-04-12"));
    let rows = build_match_info(&snap.generic_fields);
    let pairs: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.key.as_str(), r.value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Map", "q3dm6"), ("Date", "2009-04-12")]);
}

#[test]
fn fixture_tables_end_to_end() {
    let demo = ctf_demo();
    let tables = build_tables(&demo.match_stats[0], TableConfig::default());

    assert_eq!(tables.match_info.len(), 3);

    let team: Vec<(&str, Option<TeamSide>)> =
        tables.team.iter().map(|r| (r.key.as_str(), r.winner)).collect();
    assert_eq!(
        team,
        vec![
            ("Score", Some(TeamSide::Red)),
            ("Flag Returns", None),
            ("Time Held Flag", None),
        ]
    );

    assert_eq!(tables.player.columns, vec!["Alpha", "Bravo", "Charlie"]);
    let keys: Vec<&str> = tables.player.rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["Score", "Kills", "Deaths", "Flag Assists"]);
    let winners: Vec<Option<usize>> = tables.player.rows.iter().map(|r| r.winner).collect();
    assert_eq!(winners, vec![Some(0), None, Some(0), None]);
    assert_eq!(tables.player.rows[2].values, vec!["4", "9", ""]);

    let vis = tables.visibility();
    assert!(vis.match_info && vis.team && vis.player);
}

#[test]
fn malformed_team_data_hides_team_table() {
    let demo = ctf_demo();
    let tables = build_tables(&demo.match_stats[1], TableConfig::default());
    let vis = tables.visibility();
    assert!(vis.match_info);
    assert!(!vis.team);
    assert!(!vis.player);
}

#[test]
fn smaller_field_universe_hides_higher_ids() {
    let demo = ctf_demo();
    let cfg = TableConfig {
        player_field_count: 6,
    };
    let tables = build_tables(&demo.match_stats[0], cfg);
    let ids: Vec<usize> = tables.player.rows.iter().map(|r| r.field_id).collect();
    assert_eq!(ids, vec![0, 5]);
}

#[test]
fn building_twice_is_identical() {
    let demo = ctf_demo();
    let a = build_tables(&demo.match_stats[0], TableConfig::default());
    let b = build_tables(&demo.match_stats[0], TableConfig::default());
    assert_eq!(a, b);
}
