use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::tables::{StatsTables, TeamSide};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub match_info_rows: usize,
    pub team_rows: usize,
    pub player_rows: usize,
    pub player_columns: usize,
}

/// Writes the three tables to an xlsx workbook. Winning cells are bold,
/// hidden (empty) tables still get a sheet with only the header row.
pub fn export_tables(path: &Path, tables: &StatsTables) -> Result<ExportReport> {
    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("MatchInfo")?;
        write_header(sheet, &["Key", "Value"], &bold)?;
        for (idx, row) in tables.match_info.iter().enumerate() {
            let r = (idx + 1) as u32;
            write_cell(sheet, r, 0, &row.key, None)?;
            write_cell(sheet, r, 1, &row.value, None)?;
        }
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("TeamStats")?;
        write_header(sheet, &["Key", "Red", "Blue"], &bold)?;
        for (idx, row) in tables.team.iter().enumerate() {
            let r = (idx + 1) as u32;
            write_cell(sheet, r, 0, &row.key, None)?;
            let red_fmt = (row.winner == Some(TeamSide::Red)).then_some(&bold);
            let blue_fmt = (row.winner == Some(TeamSide::Blue)).then_some(&bold);
            write_cell(sheet, r, 1, &row.red, red_fmt)?;
            write_cell(sheet, r, 2, &row.blue, blue_fmt)?;
        }
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("PlayerStats")?;
        let mut header = vec!["Key"];
        header.extend(tables.player.columns.iter().map(String::as_str));
        write_header(sheet, &header, &bold)?;
        for (idx, row) in tables.player.rows.iter().enumerate() {
            let r = (idx + 1) as u32;
            write_cell(sheet, r, 0, &row.key, None)?;
            for (col, value) in row.values.iter().enumerate() {
                let fmt = (row.winner == Some(col)).then_some(&bold);
                write_cell(sheet, r, (col + 1) as u16, value, fmt)?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        match_info_rows: tables.match_info.len(),
        team_rows: tables.team.len(),
        player_rows: tables.player.rows.len(),
        player_columns: tables.player.columns.len(),
    })
}

/// `<dir>/<demo stem>_match<N>.xlsx`, N is 1-based.
pub fn export_path(dir: &Path, demo_name: &str, match_index: usize) -> PathBuf {
    let stem = Path::new(demo_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "demo".to_string());
    let safe: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    dir.join(format!("{safe}_match{}.xlsx", match_index + 1))
}

fn write_header(sheet: &mut Worksheet, names: &[&str], bold: &Format) -> Result<()> {
    for (col, name) in names.iter().enumerate() {
        write_cell(sheet, 0, col as u16, name, Some(bold))?;
    }
    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
    format: Option<&Format>,
) -> Result<()> {
    let written = match format {
        Some(fmt) => sheet.write_string_with_format(row, col, value, fmt),
        None => sheet.write_string(row, col, value),
    };
    written.with_context(|| format!("write cell ({row},{col})"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::export_path;

    #[test]
    fn export_path_sanitizes_demo_name() {
        let path = export_path(Path::new("out"), "final round.dm_68", 1);
        assert_eq!(path, Path::new("out").join("final_round_match2.xlsx"));
        let path = export_path(Path::new("out"), "", 0);
        assert_eq!(path, Path::new("out").join("demo_match1.xlsx"));
    }
}
