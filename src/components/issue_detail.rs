//! Issue detail sheet
//!
//! Slides in from the right over the dashboard and shows every field of the
//! selected issue plus its notes.

use crate::action::Action;
use crate::component::Component;
use crate::components::issue_columns::status_style;
use crate::components::layout::sheet_rect;
use crate::model::dates::{format_long_date, format_relative};
use crate::model::Issue;
use crate::theme::Theme;
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

#[derive(Default)]
pub struct IssueDetailSheet {
    issue: Option<Issue>,
    pub scroll_offset: usize,
    theme: Option<Theme>,
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => format_long_date(d.with_timezone(&Local).date_naive()),
        None => "Not set".to_string(),
    }
}

impl IssueDetailSheet {
    pub fn set_issue(&mut self, issue: Option<Issue>) {
        self.issue = issue;
        self.scroll_offset = 0;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = Some(theme);
    }

    fn build_lines(issue: &Issue, theme: &Theme) -> Vec<Line<'static>> {
        let label = |text: &str| Span::styled(format!("  {:<20}", text), theme.dim());
        let field = |name: &str, value: String| Line::from(vec![label(name), Span::styled(value, theme.text())]);

        let reported = match issue.first_reported {
            Some(d) => format!("{} ({})", format_date(Some(d)), format_relative(d, Utc::now())),
            None => format_date(None),
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", issue.equipment),
                theme.title(),
            )),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("● {}", issue.status), status_style(issue.status, theme)),
            ]),
            Line::from(""),
            field("Floor", issue.floor.clone()),
            field("Reported by", issue.reported_by.clone()),
            field("First reported", reported),
            field("Expected resolution", format_date(issue.expected_resolution_date)),
            field("Date resolved", format_date(issue.date_resolved)),
            Line::from(""),
            Line::from(Span::styled("  Description", theme.title())),
            Line::from(Span::styled(format!("  {}", issue.description), theme.text())),
            Line::from(""),
            Line::from(Span::styled(format!("  Notes ({})", issue.notes.len()), theme.title())),
        ];

        if issue.notes.is_empty() {
            lines.push(Line::from(Span::styled("  No notes yet", theme.dim())));
        }
        for note in &issue.notes {
            let stamp = note
                .timestamp
                .map(format_timestamp)
                .unwrap_or_else(|| "undated".to_string());
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", stamp), Style::default().fg(theme.accent)),
                Span::styled(
                    note.updated_by.clone(),
                    theme.dim().add_modifier(Modifier::ITALIC),
                ),
            ]));
            lines.push(Line::from(Span::styled(format!("    {}", note.comment), theme.text())));
        }
        lines
    }
}

impl Component for IssueDetailSheet {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('v') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollDown => self.scroll_offset = self.scroll_offset.saturating_add(1),
            Action::ScrollUp => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let theme = self.theme.unwrap_or_else(Theme::dark);
        let sheet = sheet_rect(area, 48);
        frame.render_widget(Clear, sheet);

        let lines = match &self.issue {
            Some(issue) => Self::build_lines(issue, &theme),
            None => vec![
                Line::from(""),
                Line::from(Span::styled("  No issue selected", theme.dim())),
            ],
        };
        let total = lines.len();
        let visible_height = sheet.height.saturating_sub(2) as usize;
        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset as u16, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Issue Details ")
                    .title_style(theme.title())
                    .border_style(Style::default().fg(theme.accent))
                    .style(Style::default().bg(theme.bg).fg(theme.fg)),
            );
        frame.render_widget(paragraph, sheet);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                sheet.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
        Ok(())
    }
}
