use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use demo_stats::config::Config;
use demo_stats::demo_loader::load_demo_file;
use demo_stats::export::{export_path, export_tables};
use demo_stats::fake_demo::fake_demo;
use demo_stats::tables::{MatchInfoRow, PlayerTable, TeamRow, TeamSide};
use demo_stats::view::{StatsPanel, StatsView};

const KEY_COLUMN_WIDTH: u16 = 22;
const VALUE_COLUMN_WIDTH: u16 = 14;

struct App {
    view: StatsView,
    panel: StatsPanel,
    config: Config,
    should_quit: bool,
}

impl App {
    fn new(config: Config) -> Self {
        let mut view = StatsView::new(config.table_config());
        let mut demos = Vec::new();
        for path in &config.files {
            match load_demo_file(path) {
                Ok(loaded) => {
                    view.push_log(format!(
                        "[INFO] Loaded {} demo(s) from {}",
                        loaded.len(),
                        path.display()
                    ));
                    demos.extend(loaded);
                }
                Err(err) => view.push_log(format!("[WARN] {err:#}")),
            }
        }
        if demos.is_empty() {
            view.push_log("[INFO] No demo stats loaded, showing offline sample");
            demos.push(fake_demo(config.fake_seed, 3, 8));
        }
        view.set_demos(demos);

        let mut app = Self {
            view,
            panel: StatsPanel::default(),
            config,
            should_quit: false,
        };
        app.refresh();
        app
    }

    fn refresh(&mut self) {
        self.panel = self.view.populate();
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.view.select_demo_next();
                self.view.selection.reset();
                self.refresh();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.view.select_demo_prev();
                self.view.selection.reset();
                self.refresh();
            }
            KeyCode::Char('n') | KeyCode::Right => {
                self.view.select_match_next();
                self.refresh();
            }
            KeyCode::Char('p') | KeyCode::Left => {
                self.view.select_match_prev();
                self.refresh();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let requested = c as isize - '1' as isize;
                self.view.select_match(requested);
                self.refresh();
            }
            KeyCode::Char('e') => self.export_current(),
            KeyCode::Char('?') => self.view.help_overlay = !self.view.help_overlay,
            _ => {}
        }
    }

    fn export_current(&mut self) {
        if !self.panel.analyzed || self.panel.match_count == 0 {
            self.view.push_log("[INFO] Nothing to export for this demo");
            return;
        }
        let path = export_path(
            &self.config.export_dir,
            &self.panel.demo_name,
            self.panel.match_index,
        );
        match export_tables(&path, &self.panel.tables) {
            Ok(report) => self.view.push_log(format!(
                "[INFO] Exported {} ({} player rows x {} players)",
                path.display(),
                report.player_rows,
                report.player_columns
            )),
            Err(err) => self.view.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = Config::from_env().with_args(std::env::args().skip(1));
    let tick_rate = config.tick_rate;
    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, tick_rate);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_stats(frame, chunks[1], &app.panel);

    let console = Paragraph::new(console_text(&app.view))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new("j/k Demo | n/p/←/→ Match | 1-9 Jump | e Export | ? Help | q Quit");
    frame.render_widget(footer, chunks[3]);

    if app.view.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let demo_count = app.view.demos.len();
    if demo_count == 0 {
        return "DEMO STATS | no demos".to_string();
    }
    format!(
        "DEMO STATS | {} ({}/{}) | {}",
        app.panel.demo_name,
        app.view.demo_selected + 1,
        demo_count,
        app.panel.match_label()
    )
}

/// Rows plus borders and the header line.
fn section_height(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(3)
}

fn render_stats(frame: &mut Frame, area: Rect, panel: &StatsPanel) {
    if !panel.analyzed {
        let msg = Paragraph::new("This demo was not analyzed.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(msg, area);
        return;
    }

    let vis = panel.visibility;
    let tables = &panel.tables;
    let mut constraints = Vec::new();
    if vis.match_info {
        constraints.push(Constraint::Length(section_height(tables.match_info.len())));
    }
    if vis.team {
        constraints.push(Constraint::Length(section_height(tables.team.len())));
    }
    if vis.player {
        constraints.push(Constraint::Min(4));
    }
    if constraints.is_empty() {
        let msg = Paragraph::new("No stats for this match.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut slot = 0;
    if vis.match_info {
        frame.render_widget(match_info_table(&tables.match_info), chunks[slot]);
        slot += 1;
    }
    if vis.team {
        frame.render_widget(team_table(&tables.team), chunks[slot]);
        slot += 1;
    }
    if vis.player {
        frame.render_widget(player_table(&tables.player), chunks[slot]);
    }
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn value_cell(text: &str, winner: bool) -> Cell<'static> {
    let style = if winner {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Cell::from(text.to_string()).style(style)
}

fn match_info_table(rows: &[MatchInfoRow]) -> Table<'static> {
    let body = rows
        .iter()
        .map(|r| Row::new(vec![Cell::from(r.key.clone()), Cell::from(r.value.clone())]));
    Table::new(
        body,
        [Constraint::Length(KEY_COLUMN_WIDTH), Constraint::Min(10)],
    )
    .header(Row::new(vec!["Key", "Value"]).style(header_style()))
    .block(Block::default().title("Match Info").borders(Borders::ALL))
}

fn team_table(rows: &[TeamRow]) -> Table<'static> {
    let body = rows.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.key.clone()),
            value_cell(&r.red, r.winner == Some(TeamSide::Red)),
            value_cell(&r.blue, r.winner == Some(TeamSide::Blue)),
        ])
    });
    Table::new(
        body,
        [
            Constraint::Length(KEY_COLUMN_WIDTH),
            Constraint::Length(VALUE_COLUMN_WIDTH),
            Constraint::Length(VALUE_COLUMN_WIDTH),
        ],
    )
    .header(
        Row::new(vec![
            Cell::from("Key"),
            Cell::from("Red").style(header_style().fg(Color::Red)),
            Cell::from("Blue").style(header_style().fg(Color::Blue)),
        ])
        .style(header_style()),
    )
    .block(
        Block::default()
            .title("Team Scores and Stats")
            .borders(Borders::ALL),
    )
}

/// Key column stays fixed; one value column per player.
fn player_table(table: &PlayerTable) -> Table<'static> {
    let mut widths = vec![Constraint::Length(KEY_COLUMN_WIDTH)];
    widths.extend(
        table
            .columns
            .iter()
            .map(|_| Constraint::Length(VALUE_COLUMN_WIDTH)),
    );

    let mut header = vec![Cell::from("Key")];
    header.extend(table.columns.iter().map(|name| Cell::from(name.clone())));

    let body = table.rows.iter().map(|r| {
        let mut cells = vec![Cell::from(r.key.clone())];
        cells.extend(
            r.values
                .iter()
                .enumerate()
                .map(|(idx, v)| value_cell(v, r.winner == Some(idx))),
        );
        Row::new(cells)
    });

    Table::new(body, widths)
        .header(Row::new(header).style(header_style()))
        .block(
            Block::default()
                .title("Player Scores and Stats")
                .borders(Borders::ALL),
        )
}

fn console_text(view: &StatsView) -> String {
    if view.logs.is_empty() {
        return "No messages yet".to_string();
    }
    view.logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Demo Stats - Help",
        "",
        "  j/k or ↑/↓   Next/previous demo",
        "  n/p or ←/→   Next/previous match in demo",
        "  1-9          Jump to match N",
        "  e            Export current match to xlsx",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Bold green cells are the best value in their row.",
        "Ties are never highlighted.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
