use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::stats::{CompMode, DemoRecord, MatchStatsSnapshot, StatField, StatGroup};

const MAPS: &[&str] = &["q3ctf1", "q3ctf2", "q3ctf4", "q3tourney2", "q3dm6"];
const PLAYER_NAMES: &[&str] = &[
    "Rat", "Cypher", "Toxic", "Zero4", "k1llsen", "Vo0", "Cooller", "Fox", "Rapha", "Evil",
];

// (field id, key, mode, upper bound)
const PLAYER_FIELDS: &[(usize, &str, CompMode, i64)] = &[
    (0, "Score", CompMode::BiggerWins, 60),
    (1, "Ping", CompMode::SmallerWins, 120),
    (2, "Time", CompMode::NeitherWins, 20),
    (5, "Kills", CompMode::BiggerWins, 40),
    (6, "Deaths", CompMode::SmallerWins, 40),
    (7, "Suicides", CompMode::SmallerWins, 4),
    (10, "Flag Captures", CompMode::BiggerWins, 5),
    (11, "Flag Returns", CompMode::BiggerWins, 8),
    (12, "Flag Assists", CompMode::BiggerWins, 6),
    (20, "Accuracy", CompMode::BiggerWins, 60),
    (21, "Damage Given", CompMode::BiggerWins, 9000),
    (22, "Damage Received", CompMode::SmallerWins, 9000),
];

const TEAM_FIELDS: &[(&str, CompMode, i64)] = &[
    ("Score", CompMode::BiggerWins, 8),
    ("Flag Captures", CompMode::BiggerWins, 8),
    ("Flag Returns", CompMode::BiggerWins, 12),
    ("Quad Pickups", CompMode::BiggerWins, 10),
    ("Time Held Flag", CompMode::NeitherWins, 900),
];

/// Plausible CTF demo for the viewer's offline mode and benches.
pub fn fake_demo(seed: Option<u64>, matches: usize, players: usize) -> DemoRecord {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let match_stats = (0..matches)
        .map(|round| fake_snapshot(&mut rng, round, players))
        .collect();
    DemoRecord {
        name: "offline-sample.dm_68".to_string(),
        analyzed: true,
        match_stats,
    }
}

fn fake_snapshot(rng: &mut StdRng, round: usize, players: usize) -> MatchStatsSnapshot {
    let mut snap = MatchStatsSnapshot::new();
    let map = MAPS[rng.gen_range(0..MAPS.len())];
    snap.add_generic_field("Map", Some(map));
    snap.add_generic_field("Game Type", Some("Capture the Flag"));
    let label = format!("#{}", round + 1);
    snap.add_generic_field("Match", Some(label.as_str()));
    let duration = format!("{}:00", rng.gen_range(10..=20));
    snap.add_generic_field("Duration", Some(duration.as_str()));
    // Not every server reports a mod name.
    let mod_name = rng.gen_bool(0.5).then_some("cpma");
    snap.add_generic_field("Mod", mod_name);

    for (team_idx, team_name) in ["Red", "Blue"].into_iter().enumerate() {
        let mut group = StatGroup::new(team_name, team_idx as i64);
        for (key, mode, max) in TEAM_FIELDS {
            let value = rng.gen_range(0..=*max);
            group.fields.push(StatField::compared(0, *key, value, *mode));
        }
        snap.team_stats.push(group);
    }

    for p in 0..players {
        let name = PLAYER_NAMES[p % PLAYER_NAMES.len()];
        let mut group = StatGroup::new(name, p as i64).on_team(p % 2);
        let spectated = rng.gen_bool(0.15);
        for (id, key, mode, max) in PLAYER_FIELDS {
            // Late joiners and dead players skip some fields.
            if spectated && *id >= 10 {
                continue;
            }
            let value = rng.gen_range(0..=*max);
            let field = StatField::compared(*id, *key, value, *mode);
            let field = match *key {
                "Accuracy" => field.with_display(format!("{value}%")),
                "Time" => field.with_display(format!("{value}:00")),
                _ => field,
            };
            group.fields.push(field);
        }
        snap.player_stats.push(group);
    }
    snap.sort_groups();
    snap
}
