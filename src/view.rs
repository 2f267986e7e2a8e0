use std::collections::VecDeque;

use crate::selection::SelectionState;
use crate::stats::DemoRecord;
use crate::tables::{StatsTables, TableConfig, Visibility, build_tables};

const MAX_LOGS: usize = 200;

/// Everything a renderer needs for one frame of the stats tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsPanel {
    pub demo_name: String,
    /// `false` means the "not analyzed" message replaces the tables.
    pub analyzed: bool,
    pub match_index: usize,
    pub match_count: usize,
    pub tables: StatsTables,
    pub visibility: Visibility,
}

impl StatsPanel {
    pub fn match_label(&self) -> String {
        if self.match_count == 0 {
            "no matches".to_string()
        } else {
            format!("match {} / {}", self.match_index + 1, self.match_count)
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatsView {
    pub demos: Vec<DemoRecord>,
    pub demo_selected: usize,
    pub selection: SelectionState,
    pub table_config: TableConfig,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for StatsView {
    fn default() -> Self {
        Self::new(TableConfig::default())
    }
}

impl StatsView {
    pub fn new(table_config: TableConfig) -> Self {
        Self {
            demos: Vec::new(),
            demo_selected: 0,
            selection: SelectionState::new(),
            table_config,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn set_demos(&mut self, demos: Vec<DemoRecord>) {
        self.demos = demos;
        if self.demo_selected >= self.demos.len() {
            self.demo_selected = 0;
        }
    }

    pub fn selected_demo(&self) -> Option<&DemoRecord> {
        self.demos.get(self.demo_selected)
    }

    /// Builds the panel for the selected demo and match. The match index is
    /// clamped and stored back so the next call starts from a valid value.
    pub fn populate(&mut self) -> StatsPanel {
        let Some(demo) = self.demos.get(self.demo_selected) else {
            return StatsPanel::default();
        };
        let mut panel = StatsPanel {
            demo_name: demo.name.clone(),
            analyzed: demo.analyzed,
            match_count: demo.match_stats.len(),
            ..StatsPanel::default()
        };
        if !demo.analyzed || demo.match_stats.is_empty() {
            return panel;
        }

        let idx = self.selection.current(demo.match_stats.len());
        let tables = build_tables(&demo.match_stats[idx], self.table_config);
        panel.match_index = idx;
        panel.visibility = tables.visibility();
        panel.tables = tables;
        panel
    }

    pub fn select_demo_next(&mut self) {
        let total = self.demos.len();
        if total == 0 {
            self.demo_selected = 0;
            return;
        }
        self.demo_selected = (self.demo_selected + 1) % total;
    }

    pub fn select_demo_prev(&mut self) {
        let total = self.demos.len();
        if total == 0 {
            self.demo_selected = 0;
            return;
        }
        if self.demo_selected == 0 {
            self.demo_selected = total - 1;
        } else {
            self.demo_selected -= 1;
        }
    }

    fn match_count(&self) -> usize {
        self.selected_demo().map_or(0, |d| d.match_stats.len())
    }

    pub fn select_match(&mut self, requested: isize) {
        self.selection.select(requested);
    }

    pub fn select_match_next(&mut self) {
        let count = self.match_count();
        self.selection.select_next(count);
    }

    pub fn select_match_prev(&mut self) {
        let count = self.match_count();
        self.selection.select_prev(count);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StatsView;
    use crate::stats::{DemoRecord, MatchStatsSnapshot};
    use crate::tables::TableConfig;

    fn demo_with_matches(n: usize) -> DemoRecord {
        let match_stats = (0..n)
            .map(|i| {
                let mut snap = MatchStatsSnapshot::new();
                let round = i.to_string();
                snap.add_generic_field("Round", Some(round.as_str()));
                snap
            })
            .collect();
        DemoRecord {
            name: "demo".to_string(),
            analyzed: true,
            match_stats,
        }
    }

    #[test]
    fn unanalyzed_demo_hides_everything() {
        let mut view = StatsView::new(TableConfig::default());
        view.set_demos(vec![DemoRecord::unanalyzed("raw.dm_68")]);
        let panel = view.populate();
        assert!(!panel.analyzed);
        assert!(!panel.visibility.match_info);
        assert!(!panel.visibility.team);
        assert!(!panel.visibility.player);
    }

    #[test]
    fn match_selection_wraps_and_clamps() {
        let mut view = StatsView::default();
        view.set_demos(vec![demo_with_matches(3), demo_with_matches(1)]);
        view.select_match_prev();
        let panel = view.populate();
        assert_eq!(panel.match_index, 2);
        assert_eq!(panel.tables.match_info[0].value, "2");

        view.select_demo_next();
        let panel = view.populate();
        assert_eq!(panel.match_index, 0);
        assert_eq!(panel.match_label(), "match 1 / 1");
    }

    #[test]
    fn log_is_bounded() {
        let mut view = StatsView::default();
        for i in 0..250 {
            view.push_log(format!("[INFO] {i}"));
        }
        assert_eq!(view.logs.len(), 200);
        assert_eq!(view.logs.front().map(String::as_str), Some("[INFO] 50"));
    }
}
