//! Dashboard screen
//!
//! Summary cards over every issue, the active filters, the issues table and
//! a status bar. Dashboard filters run before the table's own search and
//! sort.

use crate::action::Action;
use crate::component::Component;
use crate::components::data_table::{ActionItem, DataTable, TableOptions};
use crate::components::issue_columns::{issue_columns, status_style};
use crate::components::layout::calculate_dashboard_layout;
use crate::config::TableConfig;
use crate::model::{Issue, IssueFilter, IssueStatus, StatusCounts, Toast, ToastLevel};
use crate::theme::{Theme, ThemeMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct DashboardComponent {
    table: DataTable<Issue>,
    /// Unfiltered issues from the last load
    issues: Vec<Issue>,
    filter: IssueFilter,
    counts: StatusCounts,
    show_dock: bool,
    theme_mode: ThemeMode,
    user: Option<String>,
    toast: Option<Toast>,
}

impl DashboardComponent {
    pub fn new(table_config: &TableConfig) -> Self {
        let options = TableOptions {
            bordered: table_config.bordered,
            hide_header: table_config.hide_header,
            selectable_row: true,
            force_light: table_config.force_light,
            show_deselect: table_config.show_deselect,
            caption: None,
            header_action: Some(ActionItem::new('n', "New issue", Action::OpenCreateIssue)),
        };
        let table = DataTable::new(issue_columns(), Vec::new())
            .with_options(options)
            .with_loading_indicator("Loading issues...")
            .with_action_footer(vec![ActionItem::new('v', "View details", Action::OpenIssueDetail)])
            .on_row_select(|issue: &Issue| Some(Action::IssueSelected(issue.id.clone())));

        Self {
            table,
            issues: Vec::new(),
            filter: IssueFilter::default(),
            counts: StatusCounts::default(),
            show_dock: table_config.show_dock,
            theme_mode: ThemeMode::default(),
            user: None,
            toast: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inputs from the App
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_issues(&mut self, issues: &[Issue]) {
        self.issues = issues.to_vec();
        self.counts = StatusCounts::from_issues(&self.issues);
        self.refresh_table();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.table.set_loading(loading);
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.theme_mode = mode;
        self.table.set_theme_mode(mode);
    }

    pub fn set_user(&mut self, user: Option<String>) {
        self.user = user;
    }

    pub fn set_toast(&mut self, toast: Option<Toast>) {
        self.toast = toast;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn filter(&self) -> &IssueFilter {
        &self.filter
    }

    pub fn table(&self) -> &DataTable<Issue> {
        &self.table
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        self.table.selected_row()
    }

    fn refresh_table(&mut self) {
        self.table.set_data(self.filter.apply(&self.issues));
    }

    /// Dock actions scoped to the selected issue
    fn rebuild_dock(&mut self) {
        let items = match self.table.selected_row() {
            Some(issue) if self.show_dock => vec![
                ActionItem::new(
                    'F',
                    format!("Only {}", issue.floor),
                    Action::SetFloorFilter(Some(issue.floor.clone())),
                ),
                ActionItem::new(
                    'S',
                    format!("Only {}", issue.status),
                    Action::SetStatusFilter(Some(issue.status)),
                ),
            ],
            _ => Vec::new(),
        };
        self.table.set_dock_actions(items);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn draw_title(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let user = self.user.as_deref().unwrap_or("signed out");
        let right = format!("{}  ·  {} theme ", user, self.theme_mode.name());
        let title = " Facilities Issues";
        let pad = (area.width as usize).saturating_sub(title.len() + right.chars().count());
        let line = Line::from(vec![
            Span::styled(title, theme.title()),
            Span::raw(" ".repeat(pad)),
            Span::styled(right, theme.dim()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_summary(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if area.height == 0 {
            return;
        }
        let cards = [
            ("Total Issues", self.counts.total, Style::default().fg(theme.accent)),
            ("Open", self.counts.open, status_style(IssueStatus::Open, theme)),
            (
                "In Progress",
                self.counts.in_progress,
                status_style(IssueStatus::InProgress, theme),
            ),
            ("Resolved", self.counts.resolved, status_style(IssueStatus::Resolved, theme)),
        ];
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        for ((label, count, style), chunk) in cards.into_iter().zip(chunks.iter()) {
            let card = Paragraph::new(vec![
                Line::from(Span::styled(label, theme.dim())),
                Line::from(Span::styled(count.to_string(), style.add_modifier(Modifier::BOLD))),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border)),
            );
            frame.render_widget(card, *chunk);
        }
    }

    fn draw_filters(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let active = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
        let value = |text: String, is_set: bool| Span::styled(text, if is_set { active } else { theme.text() });
        let sep = || Span::styled("  │  ", Style::default().fg(theme.border));

        let mut spans = vec![
            Span::styled(" [f] Floor: ", theme.dim()),
            value(
                self.filter.floor.clone().unwrap_or_else(|| "All".to_string()),
                self.filter.floor.is_some(),
            ),
            sep(),
            Span::styled("[t] Status: ", theme.dim()),
            value(
                self.filter.status.map_or("All".to_string(), |s| s.to_string()),
                self.filter.status.is_some(),
            ),
            sep(),
            Span::styled("[d] Reported: ", theme.dim()),
            value(
                self.filter
                    .date_range
                    .map_or("Any date".to_string(), |range| range.label()),
                self.filter.date_range.is_some(),
            ),
            sep(),
            Span::styled("[o] ", theme.dim()),
            value(self.filter.sort_order.label().to_string(), false),
        ];
        if self.filter.is_active() {
            spans.push(sep());
            spans.push(Span::styled("[C] Clear filters", theme.key_hint(theme.danger)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Issues on screen after filters and table search
    fn status_text(&mut self) -> String {
        let shown = self.table.row_count();
        let mut text = format!(" Showing {} of {} issues", shown, self.issues.len());
        if !self.table.search().is_empty() {
            text.push_str(&format!("  ·  search \"{}\"", self.table.search()));
        }
        text
    }

    fn draw_status(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let summary = self.status_text();
        let line = match &self.toast {
            Some(toast) => {
                let color = match toast.level {
                    ToastLevel::Success => theme.success,
                    ToastLevel::Error => theme.danger,
                    ToastLevel::Info => theme.accent,
                };
                Line::from(Span::styled(
                    format!(" {}", toast.message),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
            }
            None => Line::from(Span::styled(summary, theme.dim())),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let hints: &[(&str, &str)] = if self.table.is_search_mode() {
            &[("Esc/Enter", "Done"), ("Ctrl+u", "Clear")]
        } else {
            &[
                ("j/k", "Move"),
                ("Enter", "Select"),
                ("s", "Sort"),
                ("/", "Search"),
                ("n", "New"),
                ("R", "Refresh"),
                ("T", "Theme"),
                ("?", "Help"),
                ("q", "Quit"),
            ]
        };
        let mut spans = Vec::new();
        for (key, label) in hints {
            spans.push(Span::styled(format!(" {} ", key), theme.key_hint(theme.warning)));
            spans.push(Span::styled(format!("{} ", label), theme.dim()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for DashboardComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // The table gets first pick so row and search keys win
        if let Some(action) = self.table.handle_key_event(key)? {
            return Ok(Some(action));
        }
        if self.table.is_search_mode() {
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Char('f') => Some(Action::OpenFloorFilter),
            KeyCode::Char('t') => Some(Action::OpenStatusFilter),
            KeyCode::Char('d') => Some(Action::OpenDateRange),
            KeyCode::Char('o') => Some(Action::ToggleSortOrder),
            KeyCode::Char('C') => Some(Action::ClearFilters),
            KeyCode::Char('n') => Some(Action::OpenCreateIssue),
            KeyCode::Char('R') => Some(Action::RefreshIssues),
            KeyCode::Char('T') => Some(Action::ToggleTheme),
            KeyCode::Char('L') => Some(Action::SignOut),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        self.table.handle_mouse_event(mouse)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::SetFloorFilter(floor) => {
                self.filter.floor = floor;
                self.refresh_table();
            }
            Action::SetStatusFilter(status) => {
                self.filter.status = status;
                self.refresh_table();
            }
            Action::SetDateRange(range) => {
                self.filter.date_range = range;
                self.refresh_table();
            }
            Action::ToggleSortOrder => {
                self.filter.sort_order = self.filter.sort_order.toggled();
                self.refresh_table();
            }
            Action::ClearFilters => {
                let sort_order = self.filter.sort_order;
                self.filter = IssueFilter {
                    sort_order,
                    ..Default::default()
                };
                self.refresh_table();
            }
            Action::IssueSelected(_) => self.rebuild_dock(),
            other => {
                let follow_up = self.table.update(other)?;
                // Any table action can change the selection
                self.rebuild_dock();
                return Ok(follow_up);
            }
        }
        self.rebuild_dock();
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let theme = Theme::from_mode(self.theme_mode);
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)), area);

        let layout = calculate_dashboard_layout(area);
        self.draw_title(frame, layout.title, &theme);
        self.draw_summary(frame, layout.summary, &theme);
        self.draw_filters(frame, layout.filters, &theme);
        self.table.draw(frame, layout.table)?;
        self.draw_status(frame, layout.status, &theme);
        self.draw_help(frame, layout.help, &theme);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn issue(id: &str, floor: &str, status: IssueStatus, day: u32) -> Issue {
        Issue {
            id: id.to_string(),
            floor: floor.to_string(),
            equipment: format!("Unit {}", id),
            description: "Check".to_string(),
            first_reported: Some(Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap()),
            reported_by: "unknown".to_string(),
            status,
            expected_resolution_date: None,
            date_resolved: None,
            notes: Vec::new(),
        }
    }

    fn dashboard() -> DashboardComponent {
        let mut d = DashboardComponent::new(&TableConfig::default());
        d.set_issues(&[
            issue("a", "1st Floor", IssueStatus::Open, 1),
            issue("b", "2nd Floor", IssueStatus::Resolved, 2),
            issue("c", "1st Floor", IssueStatus::InProgress, 3),
        ]);
        d
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn shown_ids(d: &DashboardComponent) -> Vec<String> {
        d.table().model().data().iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_newest_first_by_default() {
        let d = dashboard();
        assert_eq!(shown_ids(&d), vec!["c", "b", "a"]);
        assert_eq!(d.counts.total, 3);
    }

    #[test]
    fn test_filters_narrow_table_but_not_counts() {
        let mut d = dashboard();
        d.update(Action::SetFloorFilter(Some("1st Floor".to_string()))).unwrap();
        assert_eq!(shown_ids(&d), vec!["c", "a"]);
        assert_eq!(d.counts.open, 1);

        d.update(Action::ToggleSortOrder).unwrap();
        assert_eq!(shown_ids(&d), vec!["a", "c"]);

        d.update(Action::ClearFilters).unwrap();
        assert_eq!(shown_ids(&d), vec!["a", "b", "c"]);
        assert!(!d.filter().is_active());
    }

    #[test]
    fn test_status_count_follows_table_search() {
        let mut d = dashboard();
        d.update(Action::SetFloorFilter(Some("1st Floor".to_string()))).unwrap();
        assert!(d.status_text().contains("Showing 2 of 3 issues"));

        for c in "in progress".chars() {
            d.update(Action::SearchInput(c)).unwrap();
        }
        let text = d.status_text();
        assert!(text.contains("Showing 1 of 3 issues"));
        assert!(text.contains("search \"in progress\""));
    }

    #[test]
    fn test_selection_builds_dock_actions() {
        let mut d = dashboard();
        let follow_up = d.update(Action::ClickRow(0)).unwrap();
        assert_eq!(follow_up, Some(Action::IssueSelected("c".to_string())));
        d.update(Action::IssueSelected("c".to_string())).unwrap();

        assert_eq!(
            d.handle_key_event(key('F')).unwrap(),
            Some(Action::SetFloorFilter(Some("1st Floor".to_string())))
        );
        assert_eq!(
            d.handle_key_event(key('S')).unwrap(),
            Some(Action::SetStatusFilter(Some(IssueStatus::InProgress)))
        );
        assert_eq!(d.handle_key_event(key('v')).unwrap(), Some(Action::OpenIssueDetail));
    }

    #[test]
    fn test_dock_disabled_by_config() {
        let config = TableConfig {
            show_dock: false,
            ..Default::default()
        };
        let mut d = DashboardComponent::new(&config);
        d.set_issues(&[issue("a", "Roof", IssueStatus::Open, 1)]);
        d.update(Action::ClickRow(0)).unwrap();
        assert_eq!(d.handle_key_event(key('F')).unwrap(), None);
    }

    #[test]
    fn test_filter_change_drops_selection() {
        let mut d = dashboard();
        d.update(Action::ClickRow(1)).unwrap();
        assert!(d.selected_issue().is_some());
        d.update(Action::SetStatusFilter(Some(IssueStatus::Open))).unwrap();
        assert!(d.selected_issue().is_none());
    }

    #[test]
    fn test_dashboard_keys() {
        let mut d = dashboard();
        assert_eq!(d.handle_key_event(key('f')).unwrap(), Some(Action::OpenFloorFilter));
        assert_eq!(d.handle_key_event(key('n')).unwrap(), Some(Action::OpenCreateIssue));
        assert_eq!(d.handle_key_event(key('q')).unwrap(), Some(Action::OpenQuitDialog));
        // Table keys come first
        assert_eq!(d.handle_key_event(key('j')).unwrap(), Some(Action::NextRow));
    }

    #[test]
    fn test_search_mode_swallows_dashboard_keys() {
        let mut d = dashboard();
        d.update(Action::EnterSearchMode).unwrap();
        assert_eq!(d.handle_key_event(key('q')).unwrap(), Some(Action::SearchInput('q')));
    }

    #[test]
    fn test_draw_shows_summary_and_rows() {
        let mut d = dashboard();
        d.set_user(Some("ops@example.com".to_string()));
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal
            .draw(|frame| {
                d.draw(frame, frame.area()).unwrap();
            })
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Total Issues"));
        assert!(screen.contains("Unit b"));
        assert!(screen.contains("ops@example.com"));
        assert!(screen.contains("Showing 3 of 3 issues"));
    }
}
