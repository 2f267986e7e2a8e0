use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::stats::PLAYER_STATS_FIELD_COUNT;
use crate::tables::TableConfig;

const MAX_FIELD_COUNT: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub files: Vec<PathBuf>,
    pub field_count: usize,
    pub tick_rate: Duration,
    pub export_dir: PathBuf,
    pub fake_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            field_count: PLAYER_STATS_FIELD_COUNT,
            tick_rate: Duration::from_millis(250),
            export_dir: PathBuf::from("."),
            fake_seed: None,
        }
    }
}

impl Config {
    /// Reads `DEMO_STATS_*` variables. Call `dotenvy` first if `.env` files
    /// should be honored.
    pub fn from_env() -> Self {
        let files = env::var("DEMO_STATS_FILES")
            .map(|raw| parse_paths(&raw))
            .unwrap_or_default();
        let field_count = env::var("DEMO_STATS_FIELD_COUNT")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(PLAYER_STATS_FIELD_COUNT)
            .clamp(1, MAX_FIELD_COUNT);
        let tick_ms = env::var("DEMO_STATS_TICK_MS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(250)
            .max(50);
        let export_dir = env::var("DEMO_STATS_EXPORT_DIR")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let fake_seed = env::var("DEMO_STATS_FAKE_SEED")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok());

        Self {
            files,
            field_count,
            tick_rate: Duration::from_millis(tick_ms),
            export_dir,
            fake_seed,
        }
    }

    /// Positional CLI paths replace the env list.
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        let from_args: Vec<PathBuf> = args
            .into_iter()
            .filter(|a| !a.trim().is_empty())
            .map(PathBuf::from)
            .collect();
        if !from_args.is_empty() {
            self.files = from_args;
        }
        self
    }

    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            player_field_count: self.field_count,
        }
    }
}

fn parse_paths(raw: &str) -> Vec<PathBuf> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{Config, parse_paths};

    #[test]
    fn paths_split_on_comma_and_semicolon() {
        let paths = parse_paths(" a.json, b.json;;c.json ");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a.json"),
                PathBuf::from("b.json"),
                PathBuf::from("c.json")
            ]
        );
    }

    #[test]
    fn args_override_env_files() {
        let cfg = Config {
            files: vec![PathBuf::from("env.json")],
            ..Config::default()
        };
        let cfg = cfg.with_args(vec!["cli.json".to_string()]);
        assert_eq!(cfg.files, vec![PathBuf::from("cli.json")]);
        let cfg = cfg.with_args(Vec::<String>::new());
        assert_eq!(cfg.files, vec![PathBuf::from("cli.json")]);
    }
}
