//! New issue form

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::components::text_input::TextInput;
use crate::model::{floor_options, NewIssue};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Focus order: floor picker, then the text fields
const FIELD_COUNT: usize = 4;

pub struct CreateIssueDialog {
    floors: Vec<String>,
    floor: Option<usize>,
    equipment: TextInput,
    description: TextInput,
    note: TextInput,
    focus: usize,
    error: Option<String>,
    theme: Theme,
}

impl Default for CreateIssueDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateIssueDialog {
    pub fn new() -> Self {
        Self {
            floors: floor_options(),
            floor: None,
            equipment: TextInput::new("Equipment").placeholder("e.g. Chiller 2"),
            description: TextInput::new("Description").placeholder("What is wrong?"),
            note: TextInput::new("Note").placeholder("Optional"),
            focus: 0,
            error: None,
            theme: Theme::dark(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Empty the form for a fresh entry
    pub fn reset(&mut self) {
        self.floor = None;
        self.equipment.clear();
        self.description.clear();
        self.note.clear();
        self.focus = 0;
        self.error = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn draft(&self) -> NewIssue {
        NewIssue {
            floor: self
                .floor
                .and_then(|idx| self.floors.get(idx))
                .cloned()
                .unwrap_or_default(),
            equipment: self.equipment.value().to_string(),
            description: self.description.value().to_string(),
            note: self.note.value().to_string(),
        }
    }

    fn cycle_floor(&mut self, forward: bool) {
        let len = self.floors.len();
        if len == 0 {
            return;
        }
        self.floor = Some(match (self.floor, forward) {
            (None, _) => 0,
            (Some(idx), true) => (idx + 1) % len,
            (Some(idx), false) => (idx + len - 1) % len,
        });
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            1 => Some(&mut self.equipment),
            2 => Some(&mut self.description),
            3 => Some(&mut self.note),
            _ => None,
        }
    }

    fn floor_line(&self) -> Line<'static> {
        let theme = &self.theme;
        let focused = self.focus == 0;
        let label_style = if focused {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            theme.dim()
        };
        let value = match self.floor.and_then(|idx| self.floors.get(idx)) {
            Some(floor) => Span::styled(floor.clone(), theme.text()),
            None => Span::styled("Select a floor", theme.dim()),
        };
        let mut spans = vec![Span::styled(format!("{:>12}: ", "Floor"), label_style)];
        if focused {
            spans.push(Span::styled("◀ ", Style::default().fg(theme.accent)));
            spans.push(value);
            spans.push(Span::styled(" ▶", Style::default().fg(theme.accent)));
        } else {
            spans.push(value);
        }
        Line::from(spans)
    }
}

impl Component for CreateIssueDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::SubmitIssue(self.draft())),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELD_COUNT;
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
                None
            }
            KeyCode::Left if self.focus == 0 => {
                self.cycle_floor(false);
                None
            }
            KeyCode::Right | KeyCode::Char(' ') if self.focus == 0 => {
                self.cycle_floor(true);
                None
            }
            _ => {
                if let Some(input) = self.focused_input() {
                    if input.handle_key(key) {
                        self.error = None;
                    }
                }
                None
            }
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let theme = self.theme;
        let popup_area = centered_popup(area, 64, 14);
        frame.render_widget(Clear, popup_area);

        let status = match &self.error {
            Some(message) => Line::from(Span::styled(message.clone(), Style::default().fg(theme.danger))),
            None => Line::from(Span::styled(
                "Floor, equipment and description are required",
                theme.dim(),
            )),
        };
        let content = vec![
            Line::from(""),
            self.floor_line(),
            self.equipment.line(self.focus == 1, &theme),
            self.description.line(self.focus == 2, &theme),
            self.note.line(self.focus == 3, &theme),
            Line::from(""),
            status,
            Line::from(""),
            Line::from(vec![
                Span::styled(" Enter ", theme.key_hint(theme.success)),
                Span::raw("Create  "),
                Span::styled(" Tab ", theme.key_hint(theme.accent)),
                Span::raw("Next field  "),
                Span::styled(" ←/→ ", theme.key_hint(theme.accent)),
                Span::raw("Floor  "),
                Span::styled(" Esc ", theme.key_hint(theme.danger)),
                Span::raw("Cancel"),
            ])
            .alignment(Alignment::Center),
        ];

        let paragraph = Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Log New Issue ")
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

    fn press(dialog: &mut CreateIssueDialog, code: KeyCode) -> Option<Action> {
        dialog.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(dialog: &mut CreateIssueDialog, text: &str) {
        for c in text.chars() {
            press(dialog, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_fill_and_submit() {
        let mut dialog = CreateIssueDialog::new();
        press(&mut dialog, KeyCode::Right);
        press(&mut dialog, KeyCode::Right);
        press(&mut dialog, KeyCode::Tab);
        type_text(&mut dialog, "Boiler");
        press(&mut dialog, KeyCode::Tab);
        type_text(&mut dialog, "No heat");

        match press(&mut dialog, KeyCode::Enter) {
            Some(Action::SubmitIssue(draft)) => {
                assert_eq!(draft.floor, "1st Floor");
                assert_eq!(draft.equipment, "Boiler");
                assert_eq!(draft.description, "No heat");
                assert_eq!(draft.note, "");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_floor_picker_wraps() {
        let mut dialog = CreateIssueDialog::new();
        press(&mut dialog, KeyCode::Left);
        assert_eq!(dialog.draft().floor, "Ground Floor");
        press(&mut dialog, KeyCode::Left);
        assert_eq!(dialog.draft().floor, "Roof");
    }

    #[test]
    fn test_space_is_text_outside_floor_picker() {
        let mut dialog = CreateIssueDialog::new();
        press(&mut dialog, KeyCode::BackTab);
        type_text(&mut dialog, "see log");
        assert_eq!(dialog.draft().note, "see log");
        assert_eq!(dialog.draft().floor, "");
    }

    #[test]
    fn test_reset_clears_form() {
        let mut dialog = CreateIssueDialog::new();
        press(&mut dialog, KeyCode::Right);
        press(&mut dialog, KeyCode::Tab);
        type_text(&mut dialog, "Pump");
        dialog.set_error("Missing required fields");
        dialog.reset();
        assert_eq!(dialog.draft(), NewIssue::default());
        assert!(dialog.error.is_none());
    }
}
