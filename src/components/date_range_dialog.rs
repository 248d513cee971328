//! Date range dialog for the first-reported filter

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::components::text_input::TextInput;
use crate::model::DateRange;
use crate::theme::Theme;
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct DateRangeDialog {
    from: TextInput,
    to: TextInput,
    /// 0 = from, 1 = to
    focus: usize,
    error: Option<String>,
    theme: Theme,
}

impl Default for DateRangeDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl DateRangeDialog {
    pub fn new() -> Self {
        Self {
            from: TextInput::new("From").placeholder("YYYY-MM-DD"),
            to: TextInput::new("To").placeholder("YYYY-MM-DD (optional)"),
            focus: 0,
            error: None,
            theme: Theme::dark(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Prefill from the active range
    pub fn reset(&mut self, current: Option<DateRange>) {
        self.from.clear();
        self.to.clear();
        if let Some(range) = current {
            self.from.set_value(range.from.format(DATE_FORMAT).to_string());
            if let Some(to) = range.to {
                self.to.set_value(to.format(DATE_FORMAT).to_string());
            }
        }
        self.focus = 0;
        self.error = None;
    }

    /// Parse the fields; an empty "from" clears the filter
    fn parse(&self) -> Result<Option<DateRange>, String> {
        let from = self.from.value().trim();
        let to = self.to.value().trim();
        if from.is_empty() {
            return Ok(None);
        }
        let from = NaiveDate::parse_from_str(from, DATE_FORMAT)
            .map_err(|_| format!("Invalid start date '{}'", from))?;
        let to = if to.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(to, DATE_FORMAT)
                    .map_err(|_| format!("Invalid end date '{}'", to))?,
            )
        };
        if to.is_some_and(|to| to < from) {
            return Err("End date is before start date".to_string());
        }
        Ok(Some(DateRange { from, to }))
    }

    fn focused_input(&mut self) -> &mut TextInput {
        if self.focus == 0 {
            &mut self.from
        } else {
            &mut self.to
        }
    }
}

impl Component for DateRangeDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = 1 - self.focus;
                None
            }
            KeyCode::Enter => match self.parse() {
                Ok(range) => Some(Action::SetDateRange(range)),
                Err(message) => {
                    self.error = Some(message);
                    None
                }
            },
            _ => {
                if self.focused_input().handle_key(key) {
                    self.error = None;
                }
                None
            }
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let theme = self.theme;
        let popup_area = centered_popup(area, 52, 10);
        frame.render_widget(Clear, popup_area);

        let status = match &self.error {
            Some(message) => Line::from(Span::styled(message.clone(), Style::default().fg(theme.danger))),
            None => Line::from(Span::styled("Leave From empty to show all dates", theme.dim())),
        };
        let content = vec![
            Line::from(""),
            self.from.line(self.focus == 0, &theme),
            self.to.line(self.focus == 1, &theme),
            Line::from(""),
            status,
            Line::from(""),
            Line::from(vec![
                Span::styled(" Enter ", theme.key_hint(theme.success)),
                Span::raw("Apply  "),
                Span::styled(" Tab ", theme.key_hint(theme.accent)),
                Span::raw("Switch  "),
                Span::styled(" Esc ", theme.key_hint(theme.danger)),
                Span::raw("Cancel"),
            ])
            .alignment(Alignment::Center),
        ];

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" First Reported Between ")
                .title_style(theme.title())
                .border_style(Style::default().fg(theme.accent))
                .style(Style::default().bg(theme.bg).fg(theme.fg)),
        );
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn type_text(dialog: &mut DateRangeDialog, text: &str) {
        for c in text.chars() {
            dialog
                .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .unwrap();
        }
    }

    fn press(dialog: &mut DateRangeDialog, code: KeyCode) -> Option<Action> {
        dialog.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_range() {
        let mut dialog = DateRangeDialog::new();
        type_text(&mut dialog, "2024-03-01");
        press(&mut dialog, KeyCode::Tab);
        type_text(&mut dialog, "2024-03-31");
        assert_eq!(
            press(&mut dialog, KeyCode::Enter),
            Some(Action::SetDateRange(Some(DateRange {
                from: date(2024, 3, 1),
                to: Some(date(2024, 3, 31)),
            })))
        );
    }

    #[test]
    fn test_empty_from_clears() {
        let mut dialog = DateRangeDialog::new();
        assert_eq!(press(&mut dialog, KeyCode::Enter), Some(Action::SetDateRange(None)));
    }

    #[test]
    fn test_invalid_input_reports_error() {
        let mut dialog = DateRangeDialog::new();
        type_text(&mut dialog, "03/01/2024");
        assert_eq!(press(&mut dialog, KeyCode::Enter), None);
        assert!(dialog.error.as_deref().unwrap().contains("Invalid start date"));

        // Editing clears the message
        press(&mut dialog, KeyCode::Backspace);
        assert!(dialog.error.as_deref().is_none());
    }

    #[test]
    fn test_reversed_range_rejected() {
        let mut dialog = DateRangeDialog::new();
        dialog.reset(Some(DateRange {
            from: date(2024, 5, 10),
            to: Some(date(2024, 5, 1)),
        }));
        assert_eq!(press(&mut dialog, KeyCode::Enter), None);
        assert_eq!(dialog.error.as_deref(), Some("End date is before start date"));
    }
}
