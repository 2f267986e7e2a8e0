use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;

use demo_stats::config::Config;
use demo_stats::demo_loader::load_demo_file;
use demo_stats::export::{export_path, export_tables};
use demo_stats::selection::resolve;
use demo_stats::tables::{TableConfig, build_tables};

struct FileSummary {
    path: PathBuf,
    workbooks: usize,
    skipped_unanalyzed: usize,
    errors: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let (out_dir, match_filter, positional) = parse_args();
    let config = Config::from_env().with_args(positional);
    if config.files.is_empty() {
        return Err(anyhow!(
            "usage: stats_export [--out DIR] [--match N] FILE... (or set DEMO_STATS_FILES)"
        ));
    }
    let out_dir = out_dir.unwrap_or_else(|| config.export_dir.clone());
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("unable to create {}", out_dir.display()))?;

    let started = chrono::Local::now();
    let table_config = config.table_config();
    let summaries: Vec<FileSummary> = config
        .files
        .par_iter()
        .map(|path| export_file(path, &out_dir, table_config, match_filter))
        .collect();

    let mut total = 0usize;
    let mut failed = 0usize;
    for summary in &summaries {
        total += summary.workbooks;
        println!(
            "{}: {} workbook(s), {} unanalyzed demo(s) skipped",
            summary.path.display(),
            summary.workbooks,
            summary.skipped_unanalyzed
        );
        failed += summary.errors.len();
        for err in summary.errors.iter().take(6) {
            println!("   - {err}");
        }
    }
    println!(
        "Export complete: {total} workbook(s) in {} ({} ms)",
        out_dir.display(),
        (chrono::Local::now() - started).num_milliseconds()
    );
    if failed > 0 && total == 0 {
        return Err(anyhow!("no workbook written"));
    }
    Ok(())
}

fn export_file(
    path: &Path,
    out_dir: &Path,
    table_config: TableConfig,
    match_filter: Option<isize>,
) -> FileSummary {
    let mut summary = FileSummary {
        path: path.to_path_buf(),
        workbooks: 0,
        skipped_unanalyzed: 0,
        errors: Vec::new(),
    };
    let demos = match load_demo_file(path) {
        Ok(demos) => demos,
        Err(err) => {
            summary.errors.push(format!("{err:#}"));
            return summary;
        }
    };

    for demo in &demos {
        if !demo.analyzed || demo.match_stats.is_empty() {
            log::info!("{}: not analyzed, skipped", demo.name);
            summary.skipped_unanalyzed += 1;
            continue;
        }
        let indices: Vec<usize> = match match_filter {
            Some(requested) => vec![resolve(demo.match_stats.len(), requested)],
            None => (0..demo.match_stats.len()).collect(),
        };
        for idx in indices {
            let tables = build_tables(&demo.match_stats[idx], table_config);
            let target = export_path(out_dir, &demo.name, idx);
            match export_tables(&target, &tables) {
                Ok(report) => {
                    log::info!(
                        "{} -> {} ({} team rows, {} player rows)",
                        demo.name,
                        target.display(),
                        report.team_rows,
                        report.player_rows
                    );
                    summary.workbooks += 1;
                }
                Err(err) => summary.errors.push(format!("{err:#}")),
            }
        }
    }
    summary
}

fn parse_args() -> (Option<PathBuf>, Option<isize>, Vec<String>) {
    let mut out_dir = None;
    let mut match_filter = None;
    let mut positional = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" | "-o" => out_dir = args.next().map(PathBuf::from),
            // 1-based on the command line.
            "--match" | "-m" => {
                match_filter = args
                    .next()
                    .and_then(|v| v.parse::<isize>().ok())
                    .map(|n| n - 1);
            }
            _ => positional.push(arg),
        }
    }
    (out_dir, match_filter, positional)
}
