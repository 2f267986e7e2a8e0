use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::stats::{CompMode, DemoRecord, MatchStatsSnapshot, StatField, StatGroup};

/// Reads an analyzer export. The file may hold a single demo or an array.
pub fn load_demo_file(path: &Path) -> Result<Vec<DemoRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading demo stats from {}", path.display()))?;
    let mut demos = parse_demos_json(&raw)
        .with_context(|| format!("failed parsing demo stats in {}", path.display()))?;
    let fallback = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    for demo in &mut demos {
        if demo.name.is_empty() {
            demo.name = fallback.clone();
        }
    }
    Ok(demos)
}

pub fn parse_demos_json(raw: &str) -> Result<Vec<DemoRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid demo stats json")?;
    Ok(match &root {
        Value::Array(items) => items.iter().filter_map(parse_demo_value).collect(),
        other => parse_demo_value(other).into_iter().collect(),
    })
}

pub fn parse_demo_json(raw: &str) -> Result<DemoRecord> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(DemoRecord::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid demo stats json")?;
    Ok(parse_demo_value(&root).unwrap_or_default())
}

fn parse_demo_value(value: &Value) -> Option<DemoRecord> {
    if !value.is_object() {
        return None;
    }
    let name = pick_string(value, &["name", "file", "path"]).unwrap_or_default();
    let match_stats: Vec<MatchStatsSnapshot> =
        pick_array(value, &["matches", "matchStats", "match_stats"])
            .map(|items| items.iter().filter_map(parse_snapshot).collect())
            .unwrap_or_default();
    // Older exports omit the flag; having stats implies analysis ran.
    let analyzed = value
        .get("analyzed")
        .and_then(|v| v.as_bool())
        .unwrap_or(!match_stats.is_empty());
    Some(DemoRecord {
        name,
        analyzed,
        match_stats,
    })
}

fn parse_snapshot(value: &Value) -> Option<MatchStatsSnapshot> {
    if !value.is_object() {
        return None;
    }
    let mut snap = MatchStatsSnapshot::new();
    let generic = pick_array(value, &["generic", "genericFields", "generic_fields"]);
    for item in generic.unwrap_or_default() {
        let Some(key) = pick_string(item, &["key", "name"]) else {
            continue;
        };
        let text = value_to_text(item.get("value"));
        snap.add_generic_field(&key, text.as_deref());
    }
    // Team rows pair fields by position; player rows are keyed by field id.
    snap.team_stats = pick_array(value, &["teams", "teamStats", "team_stats"])
        .map(|items| items.iter().filter_map(|g| parse_group(g, false)).collect())
        .unwrap_or_default();
    snap.player_stats = pick_array(value, &["players", "playerStats", "player_stats"])
        .map(|items| items.iter().filter_map(|g| parse_group(g, true)).collect())
        .unwrap_or_default();
    snap.sort_groups();
    Some(snap)
}

fn parse_group(value: &Value, id_required: bool) -> Option<StatGroup> {
    if !value.is_object() {
        return None;
    }
    let name = pick_string(value, &["name"]).unwrap_or_else(|| "N/A".to_string());
    let index = pick_i64(value, &["index", "groupIndex"]).unwrap_or(0);
    let team_index = pick_i64(value, &["team", "teamIndex", "team_index"])
        .and_then(|t| usize::try_from(t).ok());
    let fields = value
        .get("fields")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|f| parse_field(f, id_required))
                .collect()
        })
        .unwrap_or_default();
    Some(StatGroup {
        name,
        fields,
        index,
        team_index,
    })
}

fn parse_field(value: &Value, id_required: bool) -> Option<StatField> {
    let key = pick_string(value, &["key", "name"])?;
    let Some(text) = value_to_text(value.get("value")) else {
        log::debug!("field {key:?} has no value, omitted");
        return None;
    };
    let int_value = pick_i64(value, &["int", "intValue", "integerValue"])
        .or_else(|| text.trim().parse::<i64>().ok())
        .unwrap_or(0);
    let mode = match value.get("mode").or_else(|| value.get("comparisonMode")) {
        Some(Value::String(s)) => CompMode::from_label(s),
        Some(Value::Number(n)) => n.as_i64().map(CompMode::from_code).unwrap_or_default(),
        _ => CompMode::NeitherWins,
    };
    let field_id = match value.get("id").or_else(|| value.get("fieldId")) {
        None if id_required => {
            log::debug!("field {key:?} has no id, omitted");
            return None;
        }
        None => 0,
        Some(v) => {
            let Some(id) = v.as_u64().and_then(|id| usize::try_from(id).ok()) else {
                log::debug!("field {key:?} has invalid id {v}, omitted");
                return None;
            };
            id
        }
    };
    Some(StatField {
        key,
        value: text,
        int_value,
        mode,
        field_id,
    })
}

/// `None` for absent or null sources, so callers can drop the field.
fn value_to_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "yes".to_string() } else { "no".to_string() }),
        other => Some(other.to_string()),
    }
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

fn pick_i64(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| value.get(*k).and_then(|v| v.as_i64()))
}

fn pick_array<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a [Value]> {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(|v| v.as_array()))
        .map(|v| v.as_slice())
}
